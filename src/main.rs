use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use restorepoint::backup::BackupService;
use restorepoint::cli::{
    handle_backup_command, handle_restore, handle_restore_snapshot, handle_snapshot_command,
    handle_validate, BackupCommands, CommandStatus, SnapshotCommands,
};
use restorepoint::config::{RestorePointPaths, Settings};

#[derive(Parser)]
#[command(
    name = "restorepoint",
    version,
    about = "Backup, snapshot and restore for project working trees",
    long_about = "restorepoint protects a project's files during risky changes such as \
                  framework upgrades. Take a labelled snapshot before each step, validate \
                  backups with a content checksum and roll back when a step goes wrong."
)]
struct Cli {
    /// Project root to back up and restore into
    #[arg(long, global = true, env = "RESTOREPOINT_PROJECT_ROOT", default_value = ".")]
    project_root: PathBuf,

    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, env = "RESTOREPOINT_LOG", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the state directory and default settings
    Init,

    /// Show current configuration and paths
    Config,

    /// Backup management commands
    #[command(subcommand)]
    Backup(BackupCommands),

    /// Snapshot management commands
    #[command(subcommand)]
    Snapshot(SnapshotCommands),

    /// Check a backup for missing files and corruption
    Validate {
        /// Backup id
        id: String,
    },

    /// Restore the working tree from a backup
    Restore {
        /// Backup id
        id: String,

        /// Overwrite files without asking
        #[arg(short, long)]
        force: bool,
    },

    /// Restore the working tree from a snapshot
    RestoreSnapshot {
        /// Snapshot id
        id: String,

        /// Overwrite files without asking
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    restorepoint::logging::init(&cli.log_level)?;

    let paths = RestorePointPaths::new(&cli.project_root)
        .with_context(|| format!("Invalid project root: {}", cli.project_root.display()))?;
    let settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        Some(command) => command,
        None => {
            println!("restorepoint - Backup, snapshot and restore for project working trees");
            println!();
            println!("Run 'restorepoint --help' for usage information.");
            println!("Run 'restorepoint init' to get started.");
            return Ok(ExitCode::SUCCESS);
        }
    };

    let status = match command {
        Commands::Init => {
            println!("Initializing restorepoint at: {}", paths.state_dir().display());
            paths.ensure_directories()?;
            settings.save(&paths)?;
            println!("Initialization complete!");
            println!();
            println!("Settings written to {}", paths.settings_file().display());
            println!("Run 'restorepoint snapshot create <label>' before your first risky change.");
            CommandStatus::Success
        }
        Commands::Config => {
            println!("restorepoint Configuration");
            println!("==========================");
            println!("Project root:     {}", paths.project_root().display());
            println!("State directory:  {}", paths.state_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Initialized:      {}", paths.is_initialized());
            println!();
            println!("Settings:");
            println!("  Include patterns: {}", settings.include_patterns.join(", "));
            println!("  Exclude patterns: {}", settings.exclude_patterns.join(", "));
            if settings.environment_keys.is_empty() {
                println!("  Environment keys: (none)");
            } else {
                println!("  Environment keys: {}", settings.environment_keys.join(", "));
            }
            println!("  Verify before restore: {}", settings.verify_before_restore);
            CommandStatus::Success
        }
        command => {
            let service = BackupService::open(paths, settings)?;
            match command {
                Commands::Backup(cmd) => handle_backup_command(&service, cmd)?,
                Commands::Snapshot(cmd) => handle_snapshot_command(&service, cmd)?,
                Commands::Validate { id } => handle_validate(&service, &id)?,
                Commands::Restore { id, force } => handle_restore(&service, &id, force)?,
                Commands::RestoreSnapshot { id, force } => {
                    handle_restore_snapshot(&service, &id, force)?
                }
                Commands::Init | Commands::Config => CommandStatus::Success,
            }
        }
    };

    Ok(match status {
        CommandStatus::Success => ExitCode::SUCCESS,
        CommandStatus::Failure => ExitCode::FAILURE,
    })
}
