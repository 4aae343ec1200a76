//! `airoute zone validate`
//!
//! Prints `[OK] <file>: valid` or `[ERROR] <file>: <defect>` per file and a
//! summary line when more than one file was checked.

use std::path::PathBuf;

use airoute_core::zone::validate_zone_file;
use airoute_core::zone::zone_files;
use clap::Parser;
use clap::Subcommand;

use crate::exit_codes;

#[derive(Debug, Parser)]
pub struct ZoneCli {
    #[command(subcommand)]
    pub command: ZoneSubcommand,
}

impl ZoneCli {
    pub fn run(self) -> i32 {
        match self.command {
            ZoneSubcommand::Validate(args) => run_validate(args),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum ZoneSubcommand {
    /// Validate zone files
    ///
    /// A zone's file stem must equal its identity (`acme.json` holds
    /// `"identity": "acme"`). Exits 2 if any file is invalid.
    Validate(ValidateArgs),
}

#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Zone files to check
    #[arg(value_name = "FILE", required_unless_present = "dir")]
    pub files: Vec<PathBuf>,

    /// Check every *.json file in this directory
    #[arg(long, value_name = "DIR", conflicts_with = "files")]
    pub dir: Option<PathBuf>,
}

fn run_validate(args: ValidateArgs) -> i32 {
    let files = match args.dir {
        Some(dir) => match zone_files(&dir) {
            Ok(files) => files,
            Err(err) => {
                eprintln!("error: cannot list {}: {err}", dir.display());
                return exit_codes::FAILURE;
            }
        },
        None => args.files,
    };
    if files.is_empty() {
        eprintln!("error: no zone files to validate");
        return exit_codes::FAILURE;
    }

    let mut failed = 0usize;
    for path in &files {
        match validate_zone_file(path) {
            Ok(()) => println!("[OK] {}: valid", path.display()),
            Err(err) => {
                tracing::debug!(path = %path.display(), "zone rejected");
                println!("[ERROR] {}: {err}", path.display());
                failed += 1;
            }
        }
    }

    if files.len() > 1 {
        if failed > 0 {
            println!("\n{failed} zone file(s) failed validation.");
        } else {
            println!("\nAll zone files are valid.");
        }
    }

    if failed > 0 {
        exit_codes::INVALID
    } else {
        exit_codes::SUCCESS
    }
}
