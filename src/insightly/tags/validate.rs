//! Checks loaded exports for missing and invalid fields.
//!
//! Problems fall into two classes. Errors are fatal for the file they were
//! found in and the caller must abandon the report; warnings are collected and
//! shown once the run has finished.

use tracing::{debug, warn};

use crate::insightly::tags::error::{Result, ToolError};
use crate::insightly::tags::model::{ContactRecord, EnrolmentRecord};

/// Tags the enrolment database is allowed to carry, compared lowercased.
pub const ENROLMENT_TAGS: [&str; 12] = [
    "n/a",
    "green",
    "orange",
    "red",
    "black",
    "purple",
    "suspended",
    "withdrawn",
    "graduated",
    "expired",
    "on hold",
    "cancelled",
];

/// The two exports a report is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Enrolments,
    Contacts,
}

impl DataSource {
    /// Human readable name used in warning headers and error log names.
    pub fn label(self) -> &'static str {
        match self {
            DataSource::Enrolments => "Existing Students Data File",
            DataSource::Contacts => "Insightly Data File",
        }
    }
}

/// Outcome of validating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub source: DataSource,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl ValidationReport {
    fn new(source: DataSource) -> Self {
        Self {
            source,
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Converts a fatal report into [`ToolError::Validation`], passing clean
    /// and warning-only reports through.
    pub fn into_result(self) -> Result<Self> {
        if self.is_fatal() {
            return Err(ToolError::Validation {
                source_label: self.source.label().to_string(),
                errors: self.errors,
            });
        }
        Ok(self)
    }
}

/// Returns true when the value is one of [`ENROLMENT_TAGS`], ignoring case
/// and surrounding whitespace.
pub fn is_valid_enrolment_tag(tag: &str) -> bool {
    let lowered = tag.trim().to_lowercase();
    ENROLMENT_TAGS.contains(&lowered.as_str())
}

/// Validates the enrolment export: a student ID is required, status and tag
/// are expected, and a present tag must belong to [`ENROLMENT_TAGS`].
pub fn validate_enrolments(records: &[EnrolmentRecord]) -> ValidationReport {
    let mut report = ValidationReport::new(DataSource::Enrolments);

    for record in records {
        let student_id = record.student_id.trim();
        if student_id.is_empty() {
            report.errors.push(format!(
                "Student ID is missing for student with the Enrolment Code {}",
                record.enrolment_code.trim()
            ));
        }
        if record.status.trim().is_empty() {
            report.warnings.push(format!(
                "Status is missing for student with the Student ID {student_id}"
            ));
        }
        if record.tag.trim().is_empty() {
            report.warnings.push(format!(
                "Tag is missing for student with the Student ID {student_id}"
            ));
        } else if !is_valid_enrolment_tag(&record.tag) {
            report.errors.push(format!(
                "Tag for student with the Student ID {student_id} is not valid."
            ));
        }
    }

    log_outcome(&report, records.len());
    report
}

/// Validates the contact export: first and last names are required, tags are
/// expected.
pub fn validate_contacts(records: &[ContactRecord]) -> ValidationReport {
    let mut report = ValidationReport::new(DataSource::Contacts);

    for record in records {
        let student_id = record.student_id.trim();
        if record.first_name.trim().is_empty() {
            report.errors.push(format!(
                "First Name is missing for student with the Student ID {student_id}"
            ));
        }
        if record.last_name.trim().is_empty() {
            report.errors.push(format!(
                "Last Name is missing for student with the Student ID {student_id}"
            ));
        }
        if record.tags.trim().is_empty() {
            report.warnings.push(format!(
                "Tags is missing for student with the Student ID {student_id}"
            ));
        }
    }

    log_outcome(&report, records.len());
    report
}

fn log_outcome(report: &ValidationReport, record_count: usize) {
    debug!(
        source = report.source.label(),
        record_count,
        warning_count = report.warnings.len(),
        error_count = report.errors.len(),
        "validated records"
    );
    if report.is_fatal() {
        warn!(
            source = report.source.label(),
            error_count = report.errors.len(),
            "fatal validation errors found"
        );
    }
}
