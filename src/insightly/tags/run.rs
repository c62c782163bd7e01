use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{info, instrument};

use crate::insightly::tags::error::{Result, ToolError};
use crate::insightly::tags::io::error_log::write_error_log;
use crate::insightly::tags::io::excel_write::write_table;
use crate::insightly::tags::io::table_read::read_rows;
use crate::insightly::tags::io::vocabulary::load_vocabulary;
use crate::insightly::tags::model::{ContactRecord, EnrolmentRecord, ReportRequest};
use crate::insightly::tags::report::{
    Report, ReportInputs, generate_report, report_file_name, time_string,
};

/// Input files for one report run.
#[derive(Debug, Clone)]
pub struct ReportPaths {
    pub enrolments: PathBuf,
    pub contacts: PathBuf,
    pub courses: PathBuf,
    pub tutors: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub report: Report,
    pub output: PathBuf,
}

/// Loads the exports, generates the report and writes it to `output_dir`.
///
/// When validation fails an error log is written to `output_dir` instead and
/// the validation error is returned; no report file is created.
#[instrument(
    level = "info",
    skip_all,
    fields(report = request.report_type.prefix(), output_dir = %output_dir.display())
)]
pub fn run_report(
    request: &ReportRequest,
    paths: &ReportPaths,
    output_dir: &Path,
) -> Result<RunOutcome> {
    let inputs = load_inputs(request, paths)?;
    let timestamp = time_string(Local::now());

    let report = match generate_report(request, &inputs) {
        Ok(report) => report,
        Err(ToolError::Validation {
            source_label,
            errors,
        }) => {
            fs::create_dir_all(output_dir)?;
            write_error_log(output_dir, &source_label, &errors, &timestamp)?;
            return Err(ToolError::Validation {
                source_label,
                errors,
            });
        }
        Err(other) => return Err(other),
    };

    fs::create_dir_all(output_dir)?;
    let output = output_dir.join(report_file_name(request.report_type, &timestamp));
    write_table(&output, &report.table)?;
    info!(
        path = %output.display(),
        row_count = report.table.rows.len(),
        "report saved"
    );

    Ok(RunOutcome { report, output })
}

/// Reads both exports plus whichever vocabularies the report type needs.
pub fn load_inputs(request: &ReportRequest, paths: &ReportPaths) -> Result<ReportInputs> {
    let enrolments: Vec<EnrolmentRecord> = read_rows(&paths.enrolments)?
        .iter()
        .map(|row| EnrolmentRecord::from_row(row))
        .collect();
    let contacts: Vec<ContactRecord> = read_rows(&paths.contacts)?
        .iter()
        .map(|row| ContactRecord::from_row(row))
        .collect();
    info!(
        enrolment_count = enrolments.len(),
        contact_count = contacts.len(),
        "loaded exports"
    );

    let courses = if request.report_type.needs_courses() {
        Some(load_vocabulary(&paths.courses)?)
    } else {
        None
    };
    let tutors = if request.report_type.needs_tutors() {
        Some(load_vocabulary(&paths.tutors)?)
    } else {
        None
    };

    Ok(ReportInputs {
        enrolments,
        contacts,
        courses,
        tutors,
    })
}
