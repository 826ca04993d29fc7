use clap::Parser;
use job_assistant::config::AppConfig;
use job_assistant::error::AppError;
use job_assistant::telemetry;
use job_assistant::workflows::application::{
    render_listing, render_reference_checks, DocumentCatalog, GoogleDriveClient,
    JobApplicationAssistant,
};
use std::io::{self, BufRead, Read};
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "job-assistant",
    about = "Generate customized cover letters based on job descriptions",
    version
)]
struct Cli {
    /// Path to a file containing the job description
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,
    /// List available files in Google Drive
    #[arg(short = 'l', long = "list-files")]
    list_files: bool,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    if cli.list_files {
        return run_listing(&config);
    }

    let job_description = match cli.file.as_deref() {
        Some(path) => read_job_description_file(path)?,
        None => {
            println!("Please paste the job description below.");
            println!("After pasting, press Enter, then Ctrl+D (Unix) or Ctrl+Z then Enter (Windows) to finish:");
            read_job_description(io::stdin().lock())?
        }
    };

    if job_description.trim().is_empty() {
        println!("Error: No job description provided");
        return Ok(());
    }

    let assistant = JobApplicationAssistant::from_config(&config)?;
    info!(
        profile_enabled = assistant.profile_enabled(),
        "job application assistant ready"
    );
    assistant.generate_application_documents(&job_description);
    Ok(())
}

fn run_listing(config: &AppConfig) -> Result<(), AppError> {
    let drive = GoogleDriveClient::authenticate(&config.drive)?;
    let catalog = DocumentCatalog::new(&drive);

    print!(
        "{}",
        render_reference_checks(&catalog.check_references(&config.documents))
    );
    print!("{}", render_listing(&catalog.list()));
    Ok(())
}

fn read_job_description_file(path: &Path) -> io::Result<String> {
    std::fs::read_to_string(path)
}

/// Reads interactive input until end-of-file.
fn read_job_description<R: BufRead>(mut input: R) -> io::Result<String> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    #[test]
    fn reads_stdin_until_eof() {
        let input = Cursor::new("Backend Engineer at Acme Corp\nRust, Postgres\n");
        let text = read_job_description(input).expect("reads input");
        assert_eq!(text, "Backend Engineer at Acme Corp\nRust, Postgres\n");
    }

    #[test]
    fn reads_job_description_from_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        write!(file, "Staff Engineer at Globex").expect("write job description");

        let text = read_job_description_file(file.path()).expect("reads file");
        assert_eq!(text, "Staff Engineer at Globex");
    }

    #[test]
    fn whitespace_only_input_counts_as_empty() {
        let text = read_job_description(Cursor::new("  \n\t\n")).expect("reads input");
        assert!(text.trim().is_empty());
    }

    #[test]
    fn parses_list_flag() {
        let cli = Cli::try_parse_from(["job-assistant", "--list-files"]).expect("flags parse");
        assert!(cli.list_files);
        assert!(cli.file.is_none());

        let cli = Cli::try_parse_from(["job-assistant", "-f", "posting.txt"]).expect("flags parse");
        assert_eq!(cli.file, Some(PathBuf::from("posting.txt")));
    }
}
