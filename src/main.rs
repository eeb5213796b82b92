//! # mdview
//!
//! A minimal markdown viewer for the desktop.
//!
//! mdview converts a markdown file to HTML and shows it in a native window
//! with an embedded web view. The page follows the desktop's appearance:
//! - Light or dark palette from the desktop color scheme
//! - Body and code fonts from the interface font settings
//! - Relative links and images resolved against the file's directory

mod app;
mod error;
mod font;
mod markdown;
mod theme;
mod uri;

use app::{MarkdownViewerApp, APP_NAME};
use error::ViewerError;
use std::env;
use std::ffi::OsString;
use std::process::ExitCode;

/// What the command line asks for.
#[derive(Debug, PartialEq)]
enum Command {
    View(OsString),
    Help,
    Version,
}

/// Parses `args`, including the program name in first position. Only the
/// first argument after the program name is looked at.
fn parse_args(mut args: impl Iterator<Item = OsString>) -> Result<Command, ViewerError> {
    let program = args
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| APP_NAME.to_string());

    match args.next() {
        None => Err(ViewerError::Usage { program }),
        Some(arg) if arg == "-h" || arg == "--help" => Ok(Command::Help),
        Some(arg) if arg == "-V" || arg == "--version" => Ok(Command::Version),
        Some(path) => Ok(Command::View(path)),
    }
}

/// Main entry point for mdview.
///
/// Every fatal error is reported before a window is created.
fn main() -> ExitCode {
    env_logger::init();

    let path = match parse_args(env::args_os()) {
        Ok(Command::View(path)) => path,
        Ok(Command::Help) => {
            println!("Usage: {APP_NAME} <markdown-file>");
            return ExitCode::SUCCESS;
        }
        Ok(Command::Version) => {
            println!("{APP_NAME} {}", env!("CARGO_PKG_VERSION"));
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    let app = match MarkdownViewerApp::load_file(path) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(e.exit_code());
        }
    };

    match app.run() {
        Ok(status) => ExitCode::from(u8::try_from(status).unwrap_or(1)),
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
