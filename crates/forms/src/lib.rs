//! Client-side forms: signup, reclamation (complaint) and job application.
//!
//! Validation runs synchronously before anything is sent; a form with field
//! errors never produces a payload.

pub mod application;
pub mod field;
pub mod reclamation;
pub mod signup;

pub use application::{Experience, JobApplication, JobApplicationField, JobApplicationForm, Position};
pub use field::{Attachment, FieldErrors, SubmissionState, UnknownChoice, is_valid_email};
pub use reclamation::{IssueType, ReclamationField, ReclamationForm, ReclamationPayload};
pub use signup::{SignupField, SignupForm, SignupRequest};
