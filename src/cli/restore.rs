//! Validation and restore CLI commands

use crate::backup::BackupService;
use crate::display::{format_backup_details, format_restore_result, format_validation};
use crate::error::{RestorePointError, RestorePointResult};
use crate::models::BackupRecord;

use super::CommandStatus;

/// Validate a backup and print every problem found
pub fn handle_validate(service: &BackupService, id: &str) -> RestorePointResult<CommandStatus> {
    let result = service.validate_backup(id);
    print!("{}", format_validation(id, &result));

    Ok(status(result.success))
}

/// Restore from a backup; without `force` only show what would be restored
pub fn handle_restore(
    service: &BackupService,
    id: &str,
    force: bool,
) -> RestorePointResult<CommandStatus> {
    if !force {
        return Ok(preview(service, find_backup(service, id)?, &format!("restore {}", id)));
    }

    println!("Restoring from backup {}...", id);
    let result = service.restore_from_backup(id);
    print!("{}", format_restore_result(&result));

    Ok(status(result.success))
}

/// Restore from a snapshot; without `force` only show what would be restored
pub fn handle_restore_snapshot(
    service: &BackupService,
    snapshot_id: &str,
    force: bool,
) -> RestorePointResult<CommandStatus> {
    if !force {
        let snapshot = service
            .list_snapshots()
            .into_iter()
            .find(|s| s.id == snapshot_id)
            .ok_or_else(|| RestorePointError::snapshot_not_found(snapshot_id))?;

        println!("Snapshot: {} ({})", snapshot.id, snapshot.label);
        let backup = find_backup(service, &snapshot.backup_id)?;
        return Ok(preview(
            service,
            backup,
            &format!("restore-snapshot {}", snapshot_id),
        ));
    }

    println!("Restoring from snapshot {}...", snapshot_id);
    let result = service.restore_from_snapshot(snapshot_id);
    print!("{}", format_restore_result(&result));

    Ok(status(result.success))
}

fn find_backup(service: &BackupService, id: &str) -> RestorePointResult<BackupRecord> {
    service
        .list_backups()
        .into_iter()
        .find(|b| b.id == id)
        .ok_or_else(|| RestorePointError::backup_not_found(id))
}

fn preview(service: &BackupService, backup: BackupRecord, command: &str) -> CommandStatus {
    let validation = service.validate_backup(&backup.id);

    println!("{}", format_backup_details(&backup));
    print!("{}", format_validation(&backup.id, &validation));
    println!();
    println!("WARNING: This will overwrite the files listed above!");
    println!("To proceed, run again with --force flag:");
    println!("  restorepoint {} --force", command);

    CommandStatus::Success
}

fn status(success: bool) -> CommandStatus {
    if success {
        CommandStatus::Success
    } else {
        CommandStatus::Failure
    }
}
