//! The scan command: read-only catalogue listing

use colored::Colorize;

use mirror_fs::{path as fs_path, scan};

use crate::cli::ScanArgs;
use crate::error::{CliError, Result};

pub fn run_scan(args: ScanArgs) -> Result<()> {
    fs_path::validate_local_absolute(&args.source)?;
    if !args.source.is_dir() {
        return Err(CliError::user(format!(
            "not a directory: {}",
            args.source.display()
        )));
    }

    let catalogue = scan::scan(&args.source)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalogue)?);
        return Ok(());
    }

    for entry in &catalogue {
        match &entry.fingerprint {
            Some(digest) => println!("{}  {}", digest.as_str().dimmed(), entry.path.display()),
            None => println!(
                "{:<64}  {}",
                "(empty directory)".yellow(),
                entry.path.display()
            ),
        }
    }
    println!("{} {} entries", "OK".green().bold(), catalogue.len());
    Ok(())
}
