use validator::ValidateEmail;

use crate::core::error::{AppError, Result};
use crate::features::reports::dtos::ReportSubmission;
use crate::features::reports::models::{NewReport, ReportCategory, ReportPriority, ReportStatus};

/// Form fields that must be present and non-blank, in reporting order
pub const REQUIRED_FIELDS: [&str; 6] = [
    "fullName",
    "email",
    "category",
    "title",
    "description",
    "address",
];

/// A submission whose text fields passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedReport {
    pub full_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: ReportCategory,
    pub title: String,
    pub description: String,
    pub priority: ReportPriority,
    pub address: String,
    pub landmarks: Option<String>,
}

impl ValidatedReport {
    pub fn into_new_report(self, photos: Vec<String>) -> NewReport {
        NewReport {
            full_name: self.full_name,
            email: self.email,
            phone: self.phone,
            category: self.category,
            title: self.title,
            description: self.description,
            priority: self.priority,
            address: self.address,
            landmarks: self.landmarks,
            photos,
            status: ReportStatus::Pending,
        }
    }
}

/// Validates the text portion of a submission.
///
/// Checks run in a fixed order: required fields (all missing ones reported
/// together), email syntax, category. Priority never fails and falls back to
/// medium.
pub struct ReportValidator;

impl ReportValidator {
    pub fn validate(submission: &ReportSubmission) -> Result<ValidatedReport> {
        let missing: Vec<String> = REQUIRED_FIELDS
            .iter()
            .filter(|name| submission.field(name).map_or(true, str::is_empty))
            .map(|name| name.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(AppError::MissingFields(missing));
        }

        let required = |name: &str| submission.field(name).unwrap_or_default().to_string();
        let optional = |name: &str| {
            submission
                .field(name)
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        let email = required("email");
        if !email.validate_email() || !has_dotted_domain(&email) {
            return Err(AppError::InvalidEmail);
        }

        let category = required("category")
            .parse::<ReportCategory>()
            .map_err(|_| AppError::InvalidCategory)?;

        Ok(ValidatedReport {
            full_name: required("fullName"),
            email,
            phone: optional("phone"),
            category,
            title: required("title"),
            description: required("description"),
            priority: ReportPriority::parse_or_default(submission.field("priority")),
            address: required("address"),
            landmarks: optional("landmarks"),
        })
    }
}

/// Hostname domains need at least one inner dot (`a@b` and `a@localhost` are
/// rejected). Bracketed IP literals are left to `ValidateEmail`.
fn has_dotted_domain(email: &str) -> bool {
    match email.rsplit_once('@') {
        Some((_, domain)) if domain.starts_with('[') => true,
        Some((_, domain)) => {
            domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}
