//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one (see `FilterConfig::with_sort` in the catalog crate).
///
/// - **Value Object**: `Price`, `FilterConfig`, `Quantity`
/// - **Entity**: `Product`, `Category` (identified by their ids)
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
