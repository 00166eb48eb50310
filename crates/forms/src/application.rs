//! "Join the team" job application form.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::field::{
    Attachment, FieldErrors, SubmissionState, UnknownChoice, is_blank, is_valid_email,
};

pub const RESUME_MISSING_MESSAGE: &str = "Resume file is missing.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Position {
    Developer,
    Designer,
    Marketing,
    Sales,
    CustomerSupport,
    Other,
}

impl Position {
    pub const ALL: [Position; 6] = [
        Position::Developer,
        Position::Designer,
        Position::Marketing,
        Position::Sales,
        Position::CustomerSupport,
        Position::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Developer => "developer",
            Position::Designer => "designer",
            Position::Marketing => "marketing",
            Position::Sales => "sales",
            Position::CustomerSupport => "customer-support",
            Position::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Position::Developer => "Developer",
            Position::Designer => "Designer",
            Position::Marketing => "Marketing Specialist",
            Position::Sales => "Sales Representative",
            Position::CustomerSupport => "Customer Support",
            Position::Other => "Other",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s.trim())
            .ok_or_else(|| UnknownChoice::new("position", s))
    }
}

/// Years of experience bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Experience {
    #[serde(rename = "0-1")]
    UpToOne,
    #[serde(rename = "1-3")]
    OneToThree,
    #[serde(rename = "3-5")]
    ThreeToFive,
    #[serde(rename = "5-10")]
    FiveToTen,
    #[serde(rename = "10+")]
    TenPlus,
}

impl Experience {
    pub const ALL: [Experience; 5] = [
        Experience::UpToOne,
        Experience::OneToThree,
        Experience::ThreeToFive,
        Experience::FiveToTen,
        Experience::TenPlus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Experience::UpToOne => "0-1",
            Experience::OneToThree => "1-3",
            Experience::ThreeToFive => "3-5",
            Experience::FiveToTen => "5-10",
            Experience::TenPlus => "10+",
        }
    }

    pub fn label(&self) -> String {
        format!("{} years", self.as_str())
    }
}

impl fmt::Display for Experience {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Experience {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|e| e.as_str() == s.trim())
            .ok_or_else(|| UnknownChoice::new("experience", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum JobApplicationField {
    FirstName,
    LastName,
    Email,
    Phone,
    Position,
    Experience,
    Message,
    Resume,
}

/// A validated application, ready to send as multipart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub position: Position,
    pub experience: Experience,
    pub message: Option<String>,
    pub resume: Attachment,
}

impl JobApplication {
    /// Text parts in request-parameter form; optional fields are left out when empty.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = vec![
            ("firstName", self.first_name.clone()),
            ("lastName", self.last_name.clone()),
            ("email", self.email.clone()),
        ];
        if let Some(phone) = &self.phone {
            fields.push(("phone", phone.clone()));
        }
        fields.push(("position", self.position.as_str().to_string()));
        fields.push(("experience", self.experience.as_str().to_string()));
        if let Some(message) = &self.message {
            fields.push(("message", message.clone()));
        }
        fields
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

#[derive(Debug, Clone, Default)]
pub struct JobApplicationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub position: String,
    pub experience: String,
    pub message: String,
    resume: Option<Attachment>,
    errors: FieldErrors<JobApplicationField>,
    state: SubmissionState,
}

impl JobApplicationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Edit a text field. The resume is set with [`Self::set_resume`].
    pub fn set(&mut self, field: JobApplicationField, value: impl Into<String>) {
        let value = value.into();
        match field {
            JobApplicationField::FirstName => self.first_name = value,
            JobApplicationField::LastName => self.last_name = value,
            JobApplicationField::Email => self.email = value,
            JobApplicationField::Phone => self.phone = value,
            JobApplicationField::Position => self.position = value,
            JobApplicationField::Experience => self.experience = value,
            JobApplicationField::Message => self.message = value,
            JobApplicationField::Resume => return,
        }
        self.errors.clear(field);
    }

    pub fn set_resume(&mut self, resume: Attachment) {
        self.resume = Some(resume);
        self.errors.clear(JobApplicationField::Resume);
    }

    pub fn errors(&self) -> &FieldErrors<JobApplicationField> {
        &self.errors
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn validate(&mut self) -> Result<JobApplication, FieldErrors<JobApplicationField>> {
        let mut errors = FieldErrors::new();

        if is_blank(&self.first_name) {
            errors.add(JobApplicationField::FirstName, "First name is required");
        }
        if is_blank(&self.last_name) {
            errors.add(JobApplicationField::LastName, "Last name is required");
        }
        if is_blank(&self.email) {
            errors.add(JobApplicationField::Email, "Email is required");
        } else if !is_valid_email(&self.email) {
            errors.add(JobApplicationField::Email, "Email address is invalid");
        }

        let position = self.position.parse::<Position>();
        if position.is_err() {
            errors.add(JobApplicationField::Position, "Please select a position");
        }
        let experience = self.experience.parse::<Experience>();
        if experience.is_err() {
            errors.add(
                JobApplicationField::Experience,
                "Please select your experience level",
            );
        }

        let resume = self.resume.as_ref().filter(|r| !r.is_empty());
        if resume.is_none() {
            errors.add(JobApplicationField::Resume, RESUME_MISSING_MESSAGE);
        }

        self.errors = errors.clone();
        match (position, experience, resume) {
            (Ok(position), Ok(experience), Some(resume)) if errors.is_empty() => {
                Ok(JobApplication {
                    first_name: self.first_name.trim().to_string(),
                    last_name: self.last_name.trim().to_string(),
                    email: self.email.trim().to_string(),
                    phone: optional(&self.phone),
                    position,
                    experience,
                    message: optional(&self.message),
                    resume: resume.clone(),
                })
            }
            _ => Err(errors),
        }
    }

    pub fn mark_submitted(&mut self) {
        self.state = SubmissionState::Submitted;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
