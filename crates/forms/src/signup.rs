//! Account signup form.

use serde::{Deserialize, Serialize};

use crate::field::{FieldErrors, is_blank, is_valid_email};

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SignupField {
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    AgreeTerms,
}

/// Validated signup data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub agree_terms: bool,
    errors: FieldErrors<SignupField>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit a text field. Editing clears any error shown for that field.
    pub fn set(&mut self, field: SignupField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SignupField::FirstName => self.first_name = value,
            SignupField::LastName => self.last_name = value,
            SignupField::Email => self.email = value,
            SignupField::Password => self.password = value,
            SignupField::ConfirmPassword => self.confirm_password = value,
            SignupField::AgreeTerms => {
                self.agree_terms = !value.is_empty() && value != "false";
            }
        }
        self.errors.clear(field);
    }

    pub fn set_agree_terms(&mut self, agreed: bool) {
        self.agree_terms = agreed;
        self.errors.clear(SignupField::AgreeTerms);
    }

    pub fn errors(&self) -> &FieldErrors<SignupField> {
        &self.errors
    }

    pub fn error(&self, field: SignupField) -> Option<&'static str> {
        self.errors.get(field)
    }

    fn check(&self) -> FieldErrors<SignupField> {
        let mut errors = FieldErrors::new();

        if is_blank(&self.first_name) {
            errors.add(SignupField::FirstName, "First name is required");
        }
        if is_blank(&self.last_name) {
            errors.add(SignupField::LastName, "Last name is required");
        }

        if is_blank(&self.email) {
            errors.add(SignupField::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add(SignupField::Email, "Email address is invalid");
        }

        if self.password.is_empty() {
            errors.add(SignupField::Password, "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                SignupField::Password,
                "Password must be at least 6 characters",
            );
        }

        if self.confirm_password.is_empty() {
            errors.add(SignupField::ConfirmPassword, "Please confirm your password");
        } else if self.confirm_password != self.password {
            errors.add(SignupField::ConfirmPassword, "Passwords do not match");
        }

        if !self.agree_terms {
            errors.add(
                SignupField::AgreeTerms,
                "You must agree to the terms and conditions",
            );
        }

        errors
    }

    /// Run every rule. On failure the errors are also kept on the form for
    /// display until the offending fields are edited.
    pub fn validate(&mut self) -> Result<SignupRequest, FieldErrors<SignupField>> {
        let errors = self.check();
        self.errors = errors.clone();
        if !errors.is_empty() {
            tracing::debug!(invalid = errors.len(), "signup form rejected");
        }
        errors.into_result(|| SignupRequest {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> SignupForm {
        let mut form = SignupForm::new();
        form.set(SignupField::FirstName, "Ada");
        form.set(SignupField::LastName, "Lovelace");
        form.set(SignupField::Email, "ada@example.com");
        form.set(SignupField::Password, "secret1");
        form.set(SignupField::ConfirmPassword, "secret1");
        form.set_agree_terms(true);
        form
    }

    #[test]
    fn empty_form_reports_every_field() {
        let mut form = SignupForm::new();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 6);
        assert_eq!(errors.get(SignupField::FirstName), Some("First name is required"));
        assert_eq!(errors.get(SignupField::LastName), Some("Last name is required"));
        assert_eq!(errors.get(SignupField::Email), Some("Email is required"));
        assert_eq!(errors.get(SignupField::Password), Some("Password is required"));
        assert_eq!(
            errors.get(SignupField::ConfirmPassword),
            Some("Please confirm your password")
        );
        assert_eq!(
            errors.get(SignupField::AgreeTerms),
            Some("You must agree to the terms and conditions")
        );
    }

    #[test]
    fn shape_rules_after_presence() {
        let mut form = filled();
        form.set(SignupField::Email, "not-an-email");
        form.set(SignupField::Password, "abc");
        form.set(SignupField::ConfirmPassword, "abcd");

        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(SignupField::Email), Some("Email address is invalid"));
        assert_eq!(
            errors.get(SignupField::Password),
            Some("Password must be at least 6 characters")
        );
        assert_eq!(
            errors.get(SignupField::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert_eq!(errors.get(SignupField::FirstName), None);
    }

    #[test]
    fn editing_clears_only_that_field() {
        let mut form = SignupForm::new();
        let _ = form.validate();
        form.set(SignupField::Email, "x");
        assert_eq!(form.error(SignupField::Email), None);
        assert_eq!(form.error(SignupField::FirstName), Some("First name is required"));
    }

    #[test]
    fn whitespace_names_are_blank() {
        let mut form = filled();
        form.set(SignupField::FirstName, "   ");
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.get(SignupField::FirstName), Some("First name is required"));
    }

    #[test]
    fn valid_form_yields_trimmed_request() {
        let mut form = filled();
        form.set(SignupField::FirstName, " Ada ");
        let request = form.validate().unwrap();
        assert_eq!(request.first_name, "Ada");
        assert!(form.errors().is_empty());

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["firstName"], "Ada");
        assert_eq!(body["lastName"], "Lovelace");
    }
}
