use std::fmt;

use serde::{Deserialize, Serialize};

/// Sentinel written wherever a value could not be derived.
pub const NOT_APPLICABLE: &str = "N/A";

/// A single row as handed over by a table loader, cells in file order.
pub type RawRow = Vec<String>;

/// One row of the enrolment export.
///
/// Column order: EnrolmentPK, StudentID, CourseFK, TutorFK, StartDate,
/// ExpiryDate, Status, Tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrolmentRecord {
    pub enrolment_code: String,
    pub student_id: String,
    pub course_ref: String,
    pub tutor_ref: String,
    pub start_date: String,
    pub expiry_date: String,
    pub status: String,
    pub tag: String,
}

impl EnrolmentRecord {
    /// Maps a positional row onto the enrolment columns. Missing trailing
    /// cells become empty strings so the validator can report them.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
        Self {
            enrolment_code: cell(0),
            student_id: cell(1),
            course_ref: cell(2),
            tutor_ref: cell(3),
            start_date: cell(4),
            expiry_date: cell(5),
            status: cell(6),
            tag: cell(7),
        }
    }
}

/// The enrolment columns the reconciler consumes, trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enrolment {
    pub enrolment_code: String,
    pub student_id: String,
    pub tag: String,
}

/// One row of the Insightly contact-tag export.
///
/// Column order: StudentID, FirstName, LastName, Tags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub tags: String,
}

impl ContactRecord {
    pub fn from_row(row: &[String]) -> Self {
        let cell = |idx: usize| row.get(idx).cloned().unwrap_or_default();
        Self {
            student_id: cell(0),
            first_name: cell(1),
            last_name: cell(2),
            tags: cell(3),
        }
    }
}

/// Status labels recognised inside a tag blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusTag {
    Suspended,
    Withdrawn,
    Graduated,
    Expired,
    OnHold,
    Cancelled,
    Green,
    Orange,
    Red,
    Black,
    Purple,
    NotApplicable,
}

impl StatusTag {
    /// Canonical capitalised label used in reports.
    pub fn label(self) -> &'static str {
        match self {
            StatusTag::Suspended => "Suspended",
            StatusTag::Withdrawn => "Withdrawn",
            StatusTag::Graduated => "Graduated",
            StatusTag::Expired => "Expired",
            StatusTag::OnHold => "On Hold",
            StatusTag::Cancelled => "Cancelled",
            StatusTag::Green => "Green",
            StatusTag::Orange => "Orange",
            StatusTag::Red => "Red",
            StatusTag::Black => "Black",
            StatusTag::Purple => "Purple",
            StatusTag::NotApplicable => NOT_APPLICABLE,
        }
    }
}

impl fmt::Display for StatusTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered list of literal strings searched for inside tag blobs. Earlier
/// entries win when several occur in the same blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    entries: Vec<String>,
}

impl Vocabulary {
    /// Builds a vocabulary, dropping blank entries since an empty needle
    /// would match every blob.
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(Into::into)
            .filter(|entry: &String| !entry.trim().is_empty())
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A contact with the fields derived from its tag blob. Only the fields the
/// current report asks for are populated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichedContact {
    pub contact: ContactRecord,
    pub course: Option<String>,
    pub tutor: Option<String>,
    pub status: Option<StatusTag>,
}

impl EnrichedContact {
    pub fn new(contact: ContactRecord) -> Self {
        Self {
            contact,
            course: None,
            tutor: None,
            status: None,
        }
    }
}

/// One student row after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergedRow {
    pub enrolment_code: String,
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    pub course: Option<String>,
    pub tutor: Option<String>,
    pub status: Option<StatusTag>,
}

/// The four report variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    Status,
    Course,
    Tutor,
    All,
}

impl ReportType {
    /// Prefix used for the output file and worksheet name.
    pub fn prefix(self) -> &'static str {
        match self {
            ReportType::Status => "Status",
            ReportType::Course => "Course",
            ReportType::Tutor => "Tutor",
            ReportType::All => "All",
        }
    }

    pub fn needs_status(self) -> bool {
        matches!(self, ReportType::Status | ReportType::All)
    }

    pub fn needs_courses(self) -> bool {
        matches!(self, ReportType::Course | ReportType::All)
    }

    pub fn needs_tutors(self) -> bool {
        matches!(self, ReportType::Tutor | ReportType::All)
    }
}

/// Whether contacts missing from the enrolment extract are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InclusionMode {
    /// Only students present in both files.
    #[default]
    Inner,
    /// Every contact, with `N/A` as enrolment code when unmatched.
    RightOuter,
}

/// Which contacts enter tag extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SampleFilter {
    #[default]
    All,
    /// Drops contacts tagged withdrawn, expired, graduated or transferred.
    Active,
}

/// Everything the pipeline needs to know about the report being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub report_type: ReportType,
    pub inclusion: InclusionMode,
    pub sample: SampleFilter,
}
