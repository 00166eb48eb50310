//! Entity trait: records that keep their identity across re-fetches.

/// A catalog record addressed by id. Two fetches of the same product are the
/// same entity even when price or flags changed in between.
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
