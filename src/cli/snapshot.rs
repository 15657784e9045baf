//! Snapshot CLI commands

use clap::Subcommand;

use crate::backup::BackupService;
use crate::display::format_snapshot_list;
use crate::error::RestorePointResult;

use super::CommandStatus;

/// Snapshot subcommands
#[derive(Subcommand)]
pub enum SnapshotCommands {
    /// Take a full backup and label it as a restore point
    Create {
        /// Label, e.g. "before next 14 upgrade"
        label: String,
    },

    /// List all snapshots
    List,
}

/// Handle a snapshot command
pub fn handle_snapshot_command(
    service: &BackupService,
    cmd: SnapshotCommands,
) -> RestorePointResult<CommandStatus> {
    match cmd {
        SnapshotCommands::Create { label } => {
            let snapshot = service.create_snapshot(&label)?;
            println!("{}", snapshot.description);
            println!("Snapshot: {}", snapshot.id);
            println!("Backup:   {}", snapshot.backup_id);
            println!();
            println!("Restore with: restorepoint restore-snapshot {} --force", snapshot.id);
        }

        SnapshotCommands::List => {
            let snapshots = service.list_snapshots();
            if snapshots.is_empty() {
                println!("No snapshots found.");
                println!("Create one with: restorepoint snapshot create <label>");
            } else {
                print!("{}", format_snapshot_list(&snapshots));
            }
        }
    }

    Ok(CommandStatus::Success)
}
