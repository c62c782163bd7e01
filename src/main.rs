use std::path::PathBuf;

use clap::{Parser, Subcommand};
use insightly_tags::config::ToolConfig;
use insightly_tags::model::{InclusionMode, ReportRequest, ReportType, SampleFilter};
use insightly_tags::run::{self, ReportPaths};
use insightly_tags::{Result, ToolError};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_logging().and_then(|()| execute(cli)) {
        eprintln!("error: {error}");
        if let ToolError::Validation { errors, .. } = &error {
            for message in errors {
                eprintln!("  {message}");
            }
        }
        std::process::exit(1);
    }
}

fn init_logging() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| ToolError::Logging(err.to_string()))
}

fn execute(cli: Cli) -> Result<()> {
    let (report_type, args) = match cli.command {
        Command::Status(args) => (ReportType::Status, args),
        Command::Tutor(args) => (ReportType::Tutor, args),
        Command::Course(args) => (ReportType::Course, args),
        Command::All(args) => (ReportType::All, args),
    };

    let config = ToolConfig::load_or_default(args.config.as_deref())?;
    let request = args.request(report_type);
    let output_dir = args.output_dir.clone().unwrap_or(config.output_dir);
    let paths = ReportPaths {
        enrolments: args.enrolments,
        contacts: args.contacts,
        courses: args.courses.unwrap_or(config.courses_file),
        tutors: args.tutors.unwrap_or(config.tutors_file),
    };

    let outcome = run::run_report(&request, &paths, &output_dir)?;
    println!(
        "{}_Tags has been saved to {}",
        report_type.prefix(),
        outcome.output.display()
    );

    if outcome.report.has_warnings() {
        if args.show_warnings {
            for line in outcome.report.warning_lines() {
                println!("{line}");
            }
        } else {
            println!("Warnings were raised; re-run with --show-warnings to view them.");
        }
    }
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Extract course, tutor and status tags from an Insightly export."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract each student's status tag.
    Status(ReportArgs),
    /// Extract each student's tutor tag.
    Tutor(ReportArgs),
    /// Extract each student's course tag.
    Course(ReportArgs),
    /// Extract course, tutor and status tags together.
    All(ReportArgs),
}

#[derive(clap::Args)]
struct ReportArgs {
    /// Enrolments export from the student database (CSV or XLSX).
    #[arg(long)]
    enrolments: PathBuf,

    /// Insightly contact tag list (CSV or XLSX).
    #[arg(long)]
    contacts: PathBuf,

    /// Keep contacts that are not in the student database.
    #[arg(long)]
    include_unenrolled: bool,

    /// Drop withdrawn, expired, graduated and transferred contacts.
    #[arg(long)]
    active_only: bool,

    /// Comma-separated course codes, overriding the configured file.
    #[arg(long)]
    courses: Option<PathBuf>,

    /// Comma-separated tutor names, overriding the configured file.
    #[arg(long)]
    tutors: Option<PathBuf>,

    /// Directory for reports and error logs.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Optional JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print collected warnings once the report is saved.
    #[arg(long)]
    show_warnings: bool,
}

impl ReportArgs {
    fn request(&self, report_type: ReportType) -> ReportRequest {
        ReportRequest {
            report_type,
            inclusion: if self.include_unenrolled {
                InclusionMode::RightOuter
            } else {
                InclusionMode::Inner
            },
            sample: if self.active_only {
                SampleFilter::Active
            } else {
                SampleFilter::All
            },
        }
    }
}
