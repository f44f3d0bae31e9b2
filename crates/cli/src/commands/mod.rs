//! CLI definition and execution
//!
//! The program has a single command: five required options drive the
//! list / upload / list / delete / list sequence in [`example`].

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::error::ErrorKind;
use clap::{ArgAction, CommandFactory, Parser};
use dc_core::ConnectionConfig;
use dc_rest::StoreManagerClient;

use crate::exit_code::ExitCode;
use crate::output::{Formatter, OutputConfig};

pub mod example;

pub use example::{RunReport, run};

/// Performs a few simple actions using the DuraCloud REST API
///
/// Lists spaces, stores a local file in a space, then deletes it again.
#[derive(Parser, Clone)]
#[command(name = "simple-api-example")]
#[command(author, version, about, long_about = None)]
#[command(disable_help_flag = true)]
pub struct Cli {
    /// The host address of the DuraCloud DuraStore application
    #[arg(short = 'h', long, value_parser = NonEmptyStringValueParser::new())]
    pub host: String,

    /// The username necessary to perform writes to DuraStore
    #[arg(short = 'u', long, value_parser = NonEmptyStringValueParser::new())]
    pub username: String,

    /// The password necessary to perform writes to DuraStore
    #[arg(short = 'p', long, value_parser = NonEmptyStringValueParser::new())]
    pub password: String,

    /// The space identifier
    #[arg(short = 's', long = "spaceid", value_parser = NonEmptyStringValueParser::new())]
    pub space_id: String,

    /// Full path to a local file which will be copied into DuraCloud
    #[arg(short = 'c', long = "content")]
    pub content: PathBuf,

    /// Enable debug logging
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Disable colored output
    #[arg(long, default_value = "false")]
    pub no_color: bool,

    /// Disable progress bar
    #[arg(long, default_value = "false")]
    pub no_progress: bool,

    /// Print help
    #[arg(long, action = ArgAction::Help)]
    #[allow(dead_code)]
    help: Option<bool>,
}

impl fmt::Debug for Cli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cli")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("space_id", &self.space_id)
            .field("content", &self.content)
            .field("debug", &self.debug)
            .field("no_color", &self.no_color)
            .field("no_progress", &self.no_progress)
            .finish()
    }
}

impl Cli {
    /// Output configuration derived from the flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig {
            no_color: self.no_color,
            no_progress: self.no_progress,
        }
    }
}

/// Parse arguments, printing usage to standard output on failure
///
/// Returns the exit code to terminate with when the program should not run:
/// `Success` after `--help` or `--version`, `UsageError` for bad arguments.
pub fn parse_from<I, T>(args: I) -> Result<Cli, ExitCode>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            print!("{e}");
            Err(ExitCode::Success)
        }
        Err(e) => {
            print!("{e}");
            println!();
            println!("{}", Cli::command().render_help());
            Err(ExitCode::UsageError)
        }
    }
}

/// Execute the example and return an exit code
pub async fn execute(cli: Cli) -> ExitCode {
    let formatter = Formatter::new(cli.output_config());

    let config = ConnectionConfig::new(&cli.host);
    let mut manager = match StoreManagerClient::new(&config) {
        Ok(manager) => manager,
        Err(e) => {
            formatter.error(&format!("Failed to create store manager: {e}"));
            return ExitCode::from_error(&e);
        }
    };

    match run(&mut manager, &cli, &formatter).await {
        Ok(report) => {
            tracing::info!(content_id = %report.content_id, "Example completed");
            ExitCode::Success
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Example failed");
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
