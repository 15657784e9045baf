//! Backup CLI commands
//!
//! Implements CLI commands for creating and listing backups.

use clap::Subcommand;

use crate::backup::{BackupOutcome, BackupService};
use crate::display::{format_backup_details, format_backup_list, format_size};
use crate::error::RestorePointResult;
use crate::models::BackupType;

use super::CommandStatus;

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up every included file
    Full,

    /// Back up files modified since the latest backup
    Incremental,

    /// List all recorded backups
    List {
        /// Show every backup with its file list
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    service: &BackupService,
    cmd: BackupCommands,
) -> RestorePointResult<CommandStatus> {
    match cmd {
        BackupCommands::Full => {
            println!("Creating full backup...");
            Ok(report_outcome(service.engine().run(BackupType::Full)))
        }

        BackupCommands::Incremental => {
            println!("Creating incremental backup...");
            Ok(report_outcome(service.engine().run(BackupType::Incremental)))
        }

        BackupCommands::List { verbose } => {
            let backups = service.list_backups();

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: restorepoint backup full");
                return Ok(CommandStatus::Success);
            }

            if verbose {
                for backup in &backups {
                    println!("{}", format_backup_details(backup));
                }
                println!("Total: {} backup(s)", backups.len());
            } else {
                print!("{}", format_backup_list(&backups, chrono::Utc::now()));
            }

            Ok(CommandStatus::Success)
        }
    }
}

/// Print a finished backup, its skipped files and whether it was recorded
pub(crate) fn report_outcome(outcome: BackupOutcome) -> CommandStatus {
    let record = &outcome.record;

    println!("Backup created: {}", record.id);
    println!("Files:    {}", record.file_count());
    println!("Size:     {}", format_size(record.size));
    println!("Location: {}", record.path.display());

    if !outcome.failures.is_empty() {
        println!();
        println!("Skipped {} file(s):", outcome.failures.len());
        for failure in &outcome.failures {
            println!("  {}: {}", failure.path, failure.error);
        }
    }

    match outcome.persisted {
        Ok(()) => CommandStatus::Success,
        Err(e) => {
            eprintln!("Error: backup was not recorded and its copies were removed: {}", e);
            CommandStatus::Failure
        }
    }
}
