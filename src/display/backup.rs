//! Backup and snapshot display formatting
//!
//! Formats records and results for terminal output in table and detail views.

use chrono::{DateTime, Utc};

use crate::models::{BackupRecord, RestoreResult, SnapshotRecord, ValidationResult};

/// Format a list of backups as a table, ages relative to `now`
pub fn format_backup_list(backups: &[BackupRecord], now: DateTime<Utc>) -> String {
    if backups.is_empty() {
        return "No backups found.".to_string();
    }

    let id_width = backups.iter().map(|b| b.id.len()).max().unwrap_or(2).max(2);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<11}  {:>6}  {:>10}  {:>6}  {}\n",
        "ID",
        "Type",
        "Files",
        "Size",
        "Age",
        "Env",
        id_width = id_width,
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<11}  {:->6}  {:->10}  {:->6}  {:-<3}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        id_width = id_width,
    ));

    for backup in backups {
        output.push_str(&format!(
            "{:<id_width$}  {:<11}  {:>6}  {:>10}  {:>6}  {}\n",
            backup.id,
            backup.backup_type,
            backup.file_count(),
            format_size(backup.size),
            format_age(now.signed_duration_since(backup.timestamp)),
            if backup.has_environment_snapshot { "yes" } else { "" },
            id_width = id_width,
        ));
    }

    let total: u64 = backups.iter().map(|b| b.size).sum();
    output.push_str(&format!(
        "\nTotal: {} backup(s), {}\n",
        backups.len(),
        format_size(total)
    ));

    output
}

/// Format a single backup with its file list
pub fn format_backup_details(backup: &BackupRecord) -> String {
    let mut output = String::new();

    output.push_str(&format!("Backup:    {}\n", backup.id));
    output.push_str(&format!("Type:      {}\n", backup.backup_type));
    output.push_str(&format!(
        "Created:   {}\n",
        backup.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    output.push_str(&format!("Size:      {}\n", format_size(backup.size)));
    output.push_str(&format!("Checksum:  {}\n", backup.checksum));
    output.push_str(&format!("Location:  {}\n", backup.path.display()));
    if backup.has_environment_snapshot {
        output.push_str("Env:       captured\n");
    }

    output.push_str(&format!("Files ({}):\n", backup.file_count()));
    for file in &backup.included_files {
        output.push_str(&format!("  {}\n", file));
    }

    output
}

/// Format a list of snapshots as a table
pub fn format_snapshot_list(snapshots: &[SnapshotRecord]) -> String {
    if snapshots.is_empty() {
        return "No snapshots found.".to_string();
    }

    let id_width = snapshots.iter().map(|s| s.id.len()).max().unwrap_or(2).max(2);
    let label_width = snapshots
        .iter()
        .map(|s| s.label.chars().count())
        .max()
        .unwrap_or(5)
        .max(5);
    let backup_width = snapshots
        .iter()
        .map(|s| s.backup_id.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<id_width$}  {:<label_width$}  {:<backup_width$}  {}\n",
        "ID",
        "Label",
        "Backup",
        "Created",
        id_width = id_width,
        label_width = label_width,
        backup_width = backup_width,
    ));
    output.push_str(&format!(
        "{:-<id_width$}  {:-<label_width$}  {:-<backup_width$}  {:-<19}\n",
        "",
        "",
        "",
        "",
        id_width = id_width,
        label_width = label_width,
        backup_width = backup_width,
    ));

    for snapshot in snapshots {
        output.push_str(&format!(
            "{:<id_width$}  {:<label_width$}  {:<backup_width$}  {}\n",
            snapshot.id,
            snapshot.label,
            snapshot.backup_id,
            snapshot.timestamp.format("%Y-%m-%d %H:%M:%S"),
            id_width = id_width,
            label_width = label_width,
            backup_width = backup_width,
        ));
    }

    output
}

/// Format a validation result
pub fn format_validation(id: &str, result: &ValidationResult) -> String {
    if result.success {
        return format!("Backup {} is valid.\n", id);
    }

    let mut output = format!("Backup {} failed validation:\n", id);
    for error in &result.errors {
        output.push_str(&format!("  - {}\n", error));
    }
    output
}

/// Format a restore result
pub fn format_restore_result(result: &RestoreResult) -> String {
    let mut output = String::new();
    output.push_str(&result.summary());
    output.push('\n');

    for error in &result.errors {
        output.push_str(&format!("  - {}\n", error));
    }

    output
}

/// Format a duration in human-readable form
pub fn format_age(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    format!("{}mo", days / 30)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
