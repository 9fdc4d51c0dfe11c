//! CLI command definitions and handlers

mod detect;
mod init;
mod watch;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indent_detective::config::{IndentConfig, WidthEntry};
use indent_detective::driver::Driver;
use indent_detective::inference::InferenceEngine;
use indent_detective::models::IndentChoice;
use indent_detective::registry::ManualOverrideRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::reporters::OutputFormat;

/// Parse a `FILE=CHOICE` manual override
fn parse_override(s: &str) -> Result<ManualOverride, String> {
    let (file, choice) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("'{}' is not FILE=CHOICE", s))?;
    if file.is_empty() {
        return Err(format!("'{}' has no file", s));
    }
    let choice = IndentChoice::parse(choice).ok_or_else(|| {
        format!(
            "'{}' is not a valid choice (use automatic, tabs, or a width)",
            choice
        )
    })?;
    Ok(ManualOverride {
        file: PathBuf::from(file),
        choice,
    })
}

/// Parse a comma-separated list of widths
fn parse_widths(s: &str) -> Result<WidthList, String> {
    let entries: Vec<WidthEntry> = s
        .split(',')
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(WidthEntry::from)
        .collect();
    if entries.is_empty() {
        Err("at least one width is required".to_string())
    } else {
        Ok(WidthList(entries))
    }
}

/// Widths given on the command line
#[derive(Debug, Clone)]
pub struct WidthList(pub Vec<WidthEntry>);

/// A user-forced setting for one file
#[derive(Debug, Clone)]
pub struct ManualOverride {
    pub file: PathBuf,
    pub choice: IndentChoice,
}

/// indent-detective - detect indentation style from source
#[derive(Parser, Debug)]
#[command(name = "indent-detective")]
#[command(
    version,
    about = "Detect whether source files indent with tabs or spaces, and how many",
    long_about = "indent-detective votes on the indentation changes between consecutive \
code lines (skipping blank lines, comments and strings) and picks the best-supported \
width from a list of plausible widths.\n\n\
Run without a subcommand to scan the current directory:\n  \
indent-detective .",
    after_help = "\
Examples:
  indent-detective .                           Scan current directory
  indent-detective src/main.rs                 Detect a single file
  indent-detective detect . --format json      JSON output for scripting
  indent-detective detect . --set a.py=tabs    Force a setting for one file
  indent-detective watch .                     Re-detect as files change
  indent-detective choices                     List the available settings"
)]
pub struct Cli {
    /// File or directory to scan (default: current directory)
    #[arg(global = true, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Log per-line votes and decisions (overrides enable_debug_messages)
    #[arg(long, global = true)]
    pub debug: bool,

    /// Comma-separated indentation widths to consider (overrides config)
    #[arg(long, global = true, value_parser = parse_widths)]
    pub indentations: Option<WidthList>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Detect indentation of every supported source file under PATH
    #[command(after_help = "\
Examples:
  indent-detective detect .                        Scan current directory
  indent-detective detect . --format json          JSON output
  indent-detective detect . --set src/x.c=tabs     Force tabs for one file
  indent-detective detect . --fail-on-mixed        Exit 1 if tabs and spaces are mixed")]
    Detect {
        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Force a setting for a file: FILE=CHOICE (automatic, tabs, or a width)
        #[arg(long = "set", value_name = "FILE=CHOICE", value_parser = parse_override)]
        overrides: Vec<ManualOverride>,

        /// Exit with code 1 if some files use tabs and others spaces
        #[arg(long)]
        fail_on_mixed: bool,

        /// Maximum files to scan (0 = unlimited)
        #[arg(long, default_value = "0")]
        max_files: usize,
    },

    /// Watch PATH and re-detect files as they change
    Watch {
        /// Force a setting for a file: FILE=CHOICE
        #[arg(long = "set", value_name = "FILE=CHOICE", value_parser = parse_override)]
        overrides: Vec<ManualOverride>,
    },

    /// List the indentation choices for the configured widths
    Choices,

    /// Write an example indent-detective.toml
    Init,
}

impl Cli {
    /// Directory config files are looked up in
    fn config_root(&self) -> PathBuf {
        if self.path.is_file() {
            self.path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        } else {
            self.path.clone()
        }
    }

    /// Effective configuration: files, then flags
    pub fn config(&self) -> IndentConfig {
        let mut config = IndentConfig::load(&self.config_root());
        if let Some(WidthList(widths)) = &self.indentations {
            config.possible_indentations = widths.clone();
        }
        if self.debug {
            config.enable_debug_messages = true;
        }
        config
    }
}

/// Build a driver with a fresh override registry
fn build_driver(config: &IndentConfig) -> Driver {
    let engine = InferenceEngine::new(config.inference_config());
    Driver::new(engine, Arc::new(ManualOverrideRegistry::new()))
}

/// Run the CLI command
pub fn run(cli: Cli, config: IndentConfig) -> Result<()> {

    match cli.command {
        Some(Commands::Init) => init::run(&cli.path),

        Some(Commands::Choices) => {
            let driver = build_driver(&config);
            for choice in driver.choices() {
                println!("{}", choice);
            }
            Ok(())
        }

        Some(Commands::Watch { ref overrides }) => {
            let driver = build_driver(&config);
            watch::run(&cli.path, &driver, overrides)
        }

        Some(Commands::Detect {
            ref format,
            ref output,
            ref overrides,
            fail_on_mixed,
            max_files,
        }) => {
            let format: OutputFormat = format.parse()?;
            let driver = build_driver(&config);
            detect::run(
                &cli.path,
                &driver,
                format,
                output.as_deref(),
                overrides,
                fail_on_mixed,
                max_files,
            )
        }

        None => {
            let driver = build_driver(&config);
            detect::run(&cli.path, &driver, OutputFormat::Text, None, &[], false, 0)
                .with_context(|| format!("Failed to scan {}", cli.path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indent_detective::models::IndentLength;

    #[test]
    fn test_parse_override() {
        let o = parse_override("src/main.py=4").unwrap();
        assert_eq!(o.file, PathBuf::from("src/main.py"));
        assert_eq!(o.choice.length, IndentLength::Spaces(4));

        let o = parse_override("a=b.c=tabs").unwrap();
        assert_eq!(o.file, PathBuf::from("a=b.c"));
        assert_eq!(o.choice.length, IndentLength::Tab);

        assert!(parse_override("nochoice").is_err());
        assert!(parse_override("=4").is_err());
        assert!(parse_override("a.py=wide").is_err());
    }

    #[test]
    fn test_parse_widths() {
        let widths = parse_widths("2, 4,,8").unwrap();
        assert_eq!(widths.0.len(), 3);
        assert!(parse_widths(" , ").is_err());
    }

    #[test]
    fn test_cli_parses_detect() {
        let cli = Cli::parse_from([
            "indent-detective",
            "detect",
            "src",
            "--format",
            "json",
            "--set",
            "x.rs=tabs",
            "--indentations",
            "2,4",
        ]);
        assert_eq!(cli.path, PathBuf::from("src"));
        assert_eq!(cli.indentations.as_ref().map(|w| w.0.len()), Some(2));
        match cli.command {
            Some(Commands::Detect {
                format, overrides, ..
            }) => {
                assert_eq!(format, "json");
                assert_eq!(overrides.len(), 1);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::parse_from([
            "indent-detective",
            dir.path().to_str().unwrap(),
            "--debug",
            "--indentations",
            "3",
        ]);
        let config = cli.config();
        assert!(config.enable_debug_messages);
        assert_eq!(config.whitelist().iter().collect::<Vec<_>>(), vec![3]);
    }
}
