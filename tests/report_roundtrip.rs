use std::fs;
use std::path::Path;

use calamine::{DataType, Reader, Xlsx, open_workbook};
use insightly_tags::ToolError;
use insightly_tags::model::{InclusionMode, ReportRequest, ReportType, SampleFilter};
use insightly_tags::run::{self, ReportPaths};
use tempfile::tempdir;

const ENROLMENTS: &str = "\
EnrolmentPK,StudentID,CourseFK,TutorFK,StartDate,ExpiryDate,Status,Tag
E1, S1 ,C1,T1,2020-01-01,2021-01-01,Active,Green
E2,S2,C2,T2,2020-02-01,2021-02-01,Active,Red
";

const CONTACTS: &str = "\
StudentID,FirstName,LastName,Tags
S1,Jane,Doe,BIO101 Suspended SmithTutor
S2,John,Roe,\"CHEM201, Withdrawn, JonesTutor\"
S3,Cat,Poe,BIO101 Orange
";

fn write_inputs(dir: &Path, enrolments: &str) -> ReportPaths {
    let paths = ReportPaths {
        enrolments: dir.join("enrolments.csv"),
        contacts: dir.join("contacts.csv"),
        courses: dir.join("courses.txt"),
        tutors: dir.join("tutors.txt"),
    };
    fs::write(&paths.enrolments, enrolments).expect("enrolments written");
    fs::write(&paths.contacts, CONTACTS).expect("contacts written");
    fs::write(&paths.courses, "BIO101,CHEM201\n").expect("courses written");
    fs::write(&paths.tutors, "SmithTutor,JonesTutor\n").expect("tutors written");
    paths
}

fn read_sheet(path: &Path) -> Vec<Vec<String>> {
    let mut workbook: Xlsx<_> = open_workbook(path).expect("workbook opened");
    let range = workbook
        .worksheet_range_at(0)
        .expect("sheet present")
        .expect("sheet read");
    range
        .rows()
        .map(|row| {
            row.iter()
                .map(|cell| match cell {
                    DataType::String(value) => value.clone(),
                    DataType::Empty => String::new(),
                    other => other.to_string(),
                })
                .collect()
        })
        .collect()
}

fn strings(cells: &[&str]) -> Vec<String> {
    cells.iter().map(|cell| cell.to_string()).collect()
}

#[test]
fn combined_report_is_written_with_fixed_columns() {
    let temp_dir = tempdir().expect("temporary directory");
    let paths = write_inputs(temp_dir.path(), ENROLMENTS);
    let output_dir = temp_dir.path().join("out");

    let request = ReportRequest {
        report_type: ReportType::All,
        inclusion: InclusionMode::Inner,
        sample: SampleFilter::All,
    };
    let outcome = run::run_report(&request, &paths, &output_dir).expect("report generated");

    let file_name = outcome
        .output
        .file_name()
        .and_then(|name| name.to_str())
        .expect("file name");
    assert!(file_name.starts_with("All_Tags_"));
    assert!(file_name.ends_with(".xlsx"));

    let sheet = read_sheet(&outcome.output);
    assert_eq!(
        sheet,
        vec![
            strings(&[
                "Enrolment Code",
                "StudentID",
                "First Name",
                "Last Name",
                "Course",
                "Tutor",
                "Status"
            ]),
            strings(&["E1", "S1", "Jane", "Doe", "BIO101", "SmithTutor", "Suspended"]),
            strings(&["E2", "S2", "John", "Roe", "CHEM201", "JonesTutor", "Withdrawn"]),
        ]
    );
}

#[test]
fn active_outer_status_report_keeps_unenrolled_contacts() {
    let temp_dir = tempdir().expect("temporary directory");
    let paths = write_inputs(temp_dir.path(), ENROLMENTS);

    let request = ReportRequest {
        report_type: ReportType::Status,
        inclusion: InclusionMode::RightOuter,
        sample: SampleFilter::Active,
    };
    let outcome =
        run::run_report(&request, &paths, temp_dir.path()).expect("report generated");

    let sheet = read_sheet(&outcome.output);
    assert_eq!(
        sheet,
        vec![
            strings(&["Enrolment Code", "StudentID", "First Name", "Last Name", "Tags"]),
            strings(&["E1", "S1", "Jane", "Doe", "Suspended"]),
            strings(&["N/A", "S3", "Cat", "Poe", "Orange"]),
        ]
    );
}

#[test]
fn invalid_enrolment_tag_writes_error_log_and_no_report() {
    let temp_dir = tempdir().expect("temporary directory");
    let enrolments = "\
EnrolmentPK,StudentID,CourseFK,TutorFK,StartDate,ExpiryDate,Status,Tag
E1,S1,C1,T1,2020-01-01,2021-01-01,Active,Blue
";
    let paths = write_inputs(temp_dir.path(), enrolments);
    let output_dir = temp_dir.path().join("out");

    let request = ReportRequest {
        report_type: ReportType::Course,
        inclusion: InclusionMode::Inner,
        sample: SampleFilter::All,
    };
    let error = run::run_report(&request, &paths, &output_dir).unwrap_err();
    assert!(matches!(error, ToolError::Validation { .. }));

    let written: Vec<String> = fs::read_dir(&output_dir)
        .expect("output directory exists")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("Existing_Students_Data_File_Error_Log_"));

    let log = fs::read_to_string(output_dir.join(&written[0])).expect("log read");
    assert!(log.contains("Tag for student with the Student ID S1 is not valid."));
}

#[test]
fn tutor_report_requires_tutor_file() {
    let temp_dir = tempdir().expect("temporary directory");
    let mut paths = write_inputs(temp_dir.path(), ENROLMENTS);
    paths.tutors = temp_dir.path().join("missing.txt");

    let request = ReportRequest {
        report_type: ReportType::Tutor,
        inclusion: InclusionMode::Inner,
        sample: SampleFilter::All,
    };
    let error = run::run_report(&request, &paths, temp_dir.path()).unwrap_err();
    assert!(matches!(error, ToolError::MissingInput(_)));
}
