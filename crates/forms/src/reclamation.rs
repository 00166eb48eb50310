//! Product reclamation (complaint) form.

use core::fmt;
use core::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::field::{
    Attachment, FieldErrors, SubmissionState, UnknownChoice, is_blank, is_valid_email,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueType {
    Damaged,
    Defective,
    WrongItem,
    MissingParts,
    LateDelivery,
    NotDelivered,
    Other,
}

impl IssueType {
    pub const ALL: [IssueType; 7] = [
        IssueType::Damaged,
        IssueType::Defective,
        IssueType::WrongItem,
        IssueType::MissingParts,
        IssueType::LateDelivery,
        IssueType::NotDelivered,
        IssueType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IssueType::Damaged => "damaged",
            IssueType::Defective => "defective",
            IssueType::WrongItem => "wrong-item",
            IssueType::MissingParts => "missing-parts",
            IssueType::LateDelivery => "late-delivery",
            IssueType::NotDelivered => "not-delivered",
            IssueType::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            IssueType::Damaged => "Damaged Product",
            IssueType::Defective => "Defective Product",
            IssueType::WrongItem => "Wrong Item Received",
            IssueType::MissingParts => "Missing Parts",
            IssueType::LateDelivery => "Late Delivery",
            IssueType::NotDelivered => "Not Delivered",
            IssueType::Other => "Other",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueType {
    type Err = UnknownChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim())
            .ok_or_else(|| UnknownChoice::new("issue type", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReclamationField {
    OrderNumber,
    PurchaseDate,
    Name,
    Email,
    Phone,
    IssueType,
    ProductName,
    Description,
}

/// JSON `data` part of `POST /api/reclamations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReclamationPayload {
    pub order_number: String,
    pub purchase_date: NaiveDate,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub issue_type: IssueType,
    pub product_name: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct ReclamationForm {
    pub order_number: String,
    pub purchase_date: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub issue_type: String,
    pub product_name: String,
    pub description: String,
    photos: Vec<Attachment>,
    errors: FieldErrors<ReclamationField>,
    state: SubmissionState,
}

impl ReclamationForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: ReclamationField, value: impl Into<String>) {
        let value = value.into();
        let slot = match field {
            ReclamationField::OrderNumber => &mut self.order_number,
            ReclamationField::PurchaseDate => &mut self.purchase_date,
            ReclamationField::Name => &mut self.name,
            ReclamationField::Email => &mut self.email,
            ReclamationField::Phone => &mut self.phone,
            ReclamationField::IssueType => &mut self.issue_type,
            ReclamationField::ProductName => &mut self.product_name,
            ReclamationField::Description => &mut self.description,
        };
        *slot = value;
        self.errors.clear(field);
    }

    /// Replace the selected photos.
    pub fn set_photos(&mut self, photos: Vec<Attachment>) {
        self.photos = photos;
    }

    pub fn photos(&self) -> &[Attachment] {
        &self.photos
    }

    pub fn errors(&self) -> &FieldErrors<ReclamationField> {
        &self.errors
    }

    pub fn state(&self) -> SubmissionState {
        self.state
    }

    /// Validate and build the `data` part.
    pub fn payload(&mut self) -> Result<ReclamationPayload, FieldErrors<ReclamationField>> {
        let mut errors = FieldErrors::new();
        let required = [
            (ReclamationField::OrderNumber, &self.order_number, "Order number is required"),
            (ReclamationField::PurchaseDate, &self.purchase_date, "Purchase date is required"),
            (ReclamationField::Name, &self.name, "Name is required"),
            (ReclamationField::Email, &self.email, "Email is required"),
            (ReclamationField::IssueType, &self.issue_type, "Please select an issue type"),
            (ReclamationField::ProductName, &self.product_name, "Product name is required"),
            (ReclamationField::Description, &self.description, "Description is required"),
        ];
        for (field, value, message) in required {
            if is_blank(value) {
                errors.add(field, message);
            }
        }

        let purchase_date = NaiveDate::parse_from_str(self.purchase_date.trim(), DATE_FORMAT);
        if purchase_date.is_err() {
            errors.add(ReclamationField::PurchaseDate, "Purchase date is invalid");
        }
        let issue_type = self.issue_type.parse::<IssueType>();
        if issue_type.is_err() {
            errors.add(ReclamationField::IssueType, "Please select an issue type");
        }
        if !is_valid_email(&self.email) {
            errors.add(ReclamationField::Email, "Email address is invalid");
        }

        self.errors = errors.clone();
        match (purchase_date, issue_type) {
            (Ok(purchase_date), Ok(issue_type)) if errors.is_empty() => Ok(ReclamationPayload {
                order_number: self.order_number.trim().to_string(),
                purchase_date,
                name: self.name.trim().to_string(),
                email: self.email.trim().to_string(),
                phone: self.phone.trim().to_string(),
                issue_type,
                product_name: self.product_name.trim().to_string(),
                description: self.description.trim().to_string(),
            }),
            _ => Err(errors),
        }
    }

    /// The API accepted the reclamation.
    pub fn mark_submitted(&mut self) {
        self.state = SubmissionState::Submitted;
    }

    /// "Submit another": back to an empty form.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
