use chrono::{DateTime, Local};
use tracing::{debug, info, instrument};

use crate::insightly::tags::activity::filter_active;
use crate::insightly::tags::clean::clean_records;
use crate::insightly::tags::error::{Result, ToolError};
use crate::insightly::tags::extract::{extract_from_list, extract_status};
use crate::insightly::tags::model::{
    ContactRecord, EnrichedContact, EnrolmentRecord, MergedRow, NOT_APPLICABLE, ReportRequest,
    ReportType, SampleFilter, Vocabulary,
};
use crate::insightly::tags::reconcile::reconcile;
use crate::insightly::tags::validate::{ValidationReport, validate_contacts, validate_enrolments};

/// Headings shared by every report.
const BASE_COLUMNS: [&str; 4] = ["Enrolment Code", "StudentID", "First Name", "Last Name"];

/// A table that will be materialised as a single Excel sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetTable {
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Loaded exports and reference lists for one report run.
#[derive(Debug, Clone, Default)]
pub struct ReportInputs {
    pub enrolments: Vec<EnrolmentRecord>,
    pub contacts: Vec<ContactRecord>,
    pub courses: Option<Vocabulary>,
    pub tutors: Option<Vocabulary>,
}

/// A generated report together with the non-fatal findings gathered while
/// building it.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub report_type: ReportType,
    pub table: SheetTable,
    pub validations: Vec<ValidationReport>,
}

impl Report {
    pub fn has_warnings(&self) -> bool {
        self.validations.iter().any(ValidationReport::has_warnings)
    }

    /// Warning lines grouped under a header per data source, in the order
    /// they were raised.
    pub fn warning_lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for validation in self.validations.iter().filter(|v| v.has_warnings()) {
            lines.push(format!("{} Warnings:", validation.source.label()));
            lines.extend(validation.warnings.iter().cloned());
        }
        lines
    }
}

/// Runs the full pipeline: validate, clean, optionally drop inactive
/// contacts, extract tags, reconcile, and lay out the output table.
///
/// A fatal validation problem in either export aborts with
/// [`ToolError::Validation`] before anything else happens.
#[instrument(level = "info", skip(inputs), fields(report = request.report_type.prefix()))]
pub fn generate_report(request: &ReportRequest, inputs: &ReportInputs) -> Result<Report> {
    let report_type = request.report_type;
    let courses = required_vocabulary(report_type.needs_courses(), &inputs.courses, "course")?;
    let tutors = required_vocabulary(report_type.needs_tutors(), &inputs.tutors, "tutor")?;

    let enrolment_check = validate_enrolments(&inputs.enrolments).into_result()?;
    let contact_check = validate_contacts(&inputs.contacts).into_result()?;

    let enrolments = clean_records(&inputs.enrolments);
    let mut contacts = clean_records(&inputs.contacts);
    if request.sample == SampleFilter::Active {
        contacts = filter_active(contacts);
    }

    let enriched: Vec<EnrichedContact> = contacts
        .into_iter()
        .map(|contact| enrich(contact, report_type, courses, tutors))
        .collect();

    let rows = reconcile(&enrolments, &enriched, request.inclusion);
    info!(row_count = rows.len(), "report rows assembled");

    let table = build_table(report_type, &rows);
    debug!(column_count = table.columns.len(), "report table constructed");

    Ok(Report {
        report_type,
        table,
        validations: vec![enrolment_check, contact_check],
    })
}

fn required_vocabulary<'a>(
    needed: bool,
    vocabulary: &'a Option<Vocabulary>,
    kind: &'static str,
) -> Result<Option<&'a Vocabulary>> {
    match (needed, vocabulary) {
        (false, _) => Ok(None),
        (true, Some(vocabulary)) => Ok(Some(vocabulary)),
        (true, None) => Err(ToolError::MissingVocabulary(kind)),
    }
}

fn enrich(
    contact: ContactRecord,
    report_type: ReportType,
    courses: Option<&Vocabulary>,
    tutors: Option<&Vocabulary>,
) -> EnrichedContact {
    let course = courses.map(|courses| extract_from_list(&contact.tags, courses));
    let tutor = tutors.map(|tutors| extract_from_list(&contact.tags, tutors));
    let status = report_type
        .needs_status()
        .then(|| extract_status(&contact.tags));

    let mut enriched = EnrichedContact::new(contact);
    enriched.course = course;
    enriched.tutor = tutor;
    enriched.status = status;
    enriched
}

/// Column headings for a report type. Single-value reports name their
/// derived column `Tags`; the combined report names each one.
pub fn report_columns(report_type: ReportType) -> Vec<String> {
    let mut columns: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    match report_type {
        ReportType::Status | ReportType::Course | ReportType::Tutor => {
            columns.push("Tags".to_string());
        }
        ReportType::All => {
            columns.extend(["Course", "Tutor", "Status"].map(String::from));
        }
    }
    columns
}

/// Lays merged rows out in the fixed column order of the report type.
pub fn build_table(report_type: ReportType, rows: &[MergedRow]) -> SheetTable {
    let cells = rows
        .iter()
        .map(|row| {
            let mut cells = vec![
                row.enrolment_code.clone(),
                row.student_id.clone(),
                row.first_name.clone(),
                row.last_name.clone(),
            ];
            let course = || row.course.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string());
            let tutor = || row.tutor.clone().unwrap_or_else(|| NOT_APPLICABLE.to_string());
            let status = || {
                row.status
                    .map(|status| status.label().to_string())
                    .unwrap_or_else(|| NOT_APPLICABLE.to_string())
            };
            match report_type {
                ReportType::Status => cells.push(status()),
                ReportType::Course => cells.push(course()),
                ReportType::Tutor => cells.push(tutor()),
                ReportType::All => cells.extend([course(), tutor(), status()]),
            }
            cells
        })
        .collect();

    SheetTable {
        sheet_name: format!("{}_Tags", report_type.prefix()),
        columns: report_columns(report_type),
        rows: cells,
    }
}

/// Timestamp fragment used in generated file names.
pub fn time_string(now: DateTime<Local>) -> String {
    now.format("%Y-%m-%d_%H%M%S").to_string()
}

/// File name for a report generated at `timestamp`.
pub fn report_file_name(report_type: ReportType, timestamp: &str) -> String {
    format!("{}_Tags_{timestamp}.xlsx", report_type.prefix())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::insightly::tags::model::{InclusionMode, RawRow};

    fn row(cells: &[&str]) -> RawRow {
        cells.iter().map(|cell| cell.to_string()).collect()
    }

    fn inputs() -> ReportInputs {
        ReportInputs {
            enrolments: vec![EnrolmentRecord::from_row(&row(&[
                "E1",
                "S1",
                "C1",
                "T1",
                "2020-01-01",
                "2021-01-01",
                "Active",
                "Green",
            ]))],
            contacts: vec![
                ContactRecord::from_row(&row(&["S1", "Jane", "Doe", "BIO101 Suspended SmithTutor"])),
                ContactRecord::from_row(&row(&["S2", "John", "Roe", "CHEM201 Withdrawn"])),
            ],
            courses: Some(Vocabulary::new(["BIO101", "CHEM201"])),
            tutors: Some(Vocabulary::new(["SmithTutor"])),
        }
    }

    fn request(report_type: ReportType, inclusion: InclusionMode) -> ReportRequest {
        ReportRequest {
            report_type,
            inclusion,
            sample: SampleFilter::All,
        }
    }

    #[test]
    fn combined_inner_report_matches_expected_row() {
        let report = generate_report(&request(ReportType::All, InclusionMode::Inner), &inputs())
            .expect("report generated");

        assert_eq!(
            report.table.columns,
            row(&[
                "Enrolment Code",
                "StudentID",
                "First Name",
                "Last Name",
                "Course",
                "Tutor",
                "Status"
            ])
        );
        assert_eq!(
            report.table.rows,
            vec![row(&["E1", "S1", "Jane", "Doe", "BIO101", "SmithTutor", "Suspended"])]
        );
        assert!(!report.has_warnings());
    }

    #[test]
    fn single_value_reports_use_tags_column() {
        let report = generate_report(
            &request(ReportType::Course, InclusionMode::RightOuter),
            &inputs(),
        )
        .expect("report generated");

        assert_eq!(report.table.columns[4], "Tags");
        assert_eq!(
            report.table.rows,
            vec![
                row(&["E1", "S1", "Jane", "Doe", "BIO101"]),
                row(&["N/A", "S2", "John", "Roe", "CHEM201"]),
            ]
        );
        assert_eq!(report.table.sheet_name, "Course_Tags");
    }

    #[test]
    fn active_sample_drops_inactive_contacts_before_join() {
        let mut req = request(ReportType::Status, InclusionMode::RightOuter);
        req.sample = SampleFilter::Active;

        let report = generate_report(&req, &inputs()).expect("report generated");
        assert_eq!(
            report.table.rows,
            vec![row(&["E1", "S1", "Jane", "Doe", "Suspended"])]
        );
    }

    #[test]
    fn status_report_does_not_need_vocabularies() {
        let mut data = inputs();
        data.courses = None;
        data.tutors = None;

        let report = generate_report(&request(ReportType::Status, InclusionMode::Inner), &data)
            .expect("report generated");
        assert_eq!(report.table.rows.len(), 1);
    }

    #[test]
    fn missing_vocabulary_is_reported() {
        let mut data = inputs();
        data.tutors = None;

        let error = generate_report(&request(ReportType::Tutor, InclusionMode::Inner), &data)
            .unwrap_err();
        assert!(matches!(error, ToolError::MissingVocabulary("tutor")));
    }

    #[test]
    fn fatal_validation_aborts_the_report() {
        let mut data = inputs();
        data.enrolments[0].tag = "Blue".into();

        let error = generate_report(&request(ReportType::Status, InclusionMode::Inner), &data)
            .unwrap_err();
        match error {
            ToolError::Validation { source_label, errors } => {
                assert_eq!(source_label, "Existing Students Data File");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn warnings_are_grouped_by_source() {
        let mut data = inputs();
        data.contacts[1].tags = "  ".into();

        let report = generate_report(&request(ReportType::Status, InclusionMode::Inner), &data)
            .expect("report generated");
        assert!(report.has_warnings());
        assert_eq!(
            report.warning_lines(),
            vec![
                "Insightly Data File Warnings:".to_string(),
                "Tags is missing for student with the Student ID S2".to_string(),
            ]
        );
    }

    #[test]
    fn file_names_carry_prefix_and_timestamp() {
        assert_eq!(
            report_file_name(ReportType::All, "2024-01-02_030405"),
            "All_Tags_2024-01-02_030405.xlsx"
        );
    }
}
