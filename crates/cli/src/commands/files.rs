//! Files command handler.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Subcommand};
use vectordeck_console::{format_bytes, format_timestamp, BatchOutcome, Console, UploadRequest};
use vectordeck_core::{config::AppConfig, AppError, AppResult};
use vectordeck_gateway::{FilePurpose, Gateway};

/// Uploaded file management
#[derive(Args, Debug)]
pub struct FilesCommand {
    #[command(subcommand)]
    pub action: FilesAction,
}

#[derive(Subcommand, Debug)]
pub enum FilesAction {
    /// List uploaded files with their vector store memberships
    List(FilesListCommand),
    /// Upload files, one at a time
    Upload(FilesUploadCommand),
    /// Delete files by id
    Delete(FilesDeleteCommand),
}

impl FilesCommand {
    pub async fn execute(self, config: &AppConfig, gateway: Arc<dyn Gateway>) -> AppResult<()> {
        match self.action {
            FilesAction::List(cmd) => cmd.execute(config, gateway).await,
            FilesAction::Upload(cmd) => cmd.execute(config, gateway).await,
            FilesAction::Delete(cmd) => cmd.execute(config, gateway).await,
        }
    }
}

/// List uploaded files
#[derive(Args, Debug)]
pub struct FilesListCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FilesListCommand {
    pub async fn execute(&self, config: &AppConfig, gateway: Arc<dyn Gateway>) -> AppResult<()> {
        let mut console = Console::from_config(gateway, config);
        console.refresh().await?;

        if self.json {
            let rows: Vec<serde_json::Value> = console
                .files()
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "id": f.id,
                        "name": f.name,
                        "kind": f.kind.as_str(),
                        "sizeBytes": f.size_bytes,
                        "createdAt": f.created_at,
                        "status": f.status,
                        "storeCount": console.membership_count(&f.id),
                        "stores": console.store_ids_for(&f.id),
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
            return Ok(());
        }

        if console.files().is_empty() {
            println!("No files yet. Upload some to get started.");
            return Ok(());
        }

        println!(
            "{:<28} {:<24} {:<10} {:>10} {:<23} {:>6}",
            "ID", "NAME", "TYPE", "SIZE", "CREATED", "STORES"
        );
        for file in console.files() {
            println!(
                "{:<28} {:<24} {:<10} {:>10} {:<23} {:>6}",
                file.id,
                file.name,
                file.kind.as_str(),
                format_bytes(file.size_bytes),
                format_timestamp(file.created_at),
                console.membership_count(&file.id),
            );
        }
        Ok(())
    }
}

/// Upload files
#[derive(Args, Debug)]
pub struct FilesUploadCommand {
    /// Paths of the files to upload
    pub paths: Vec<PathBuf>,

    /// Purpose: assistants, responses, fine-tune, batch
    #[arg(long, default_value = "assistants")]
    pub purpose: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FilesUploadCommand {
    pub async fn execute(&self, config: &AppConfig, gateway: Arc<dyn Gateway>) -> AppResult<()> {
        let purpose: FilePurpose = self.purpose.parse()?;

        let mut uploads = Vec::with_capacity(self.paths.len());
        for path in &self.paths {
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .ok_or_else(|| {
                    AppError::Validation(format!("Path {:?} has no usable file name", path))
                })?
                .to_string();
            let content = std::fs::read(path)?;
            uploads.push(UploadRequest { name, content });
        }

        let mut console = Console::from_config(gateway, config);
        let outcome = console.upload_files(uploads, purpose).await?;
        report_outcome(&outcome, self.json)
    }
}

/// Delete files
#[derive(Args, Debug)]
pub struct FilesDeleteCommand {
    /// Ids of the files to delete
    pub ids: Vec<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl FilesDeleteCommand {
    pub async fn execute(&self, config: &AppConfig, gateway: Arc<dyn Gateway>) -> AppResult<()> {
        let mut console = Console::from_config(gateway, config);
        console.refresh().await?;

        let outcome = console.delete_files(&self.ids).await?;
        report_outcome(&outcome, self.json)
    }
}

/// Print a batch outcome as a summary line plus per-item failures.
pub fn report_outcome(outcome: &BatchOutcome, json: bool) -> AppResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }

    println!("{}", outcome.summary());
    for failure in &outcome.failed {
        println!("  failed: {} ({})", failure.target, failure.message);
    }
    for name in &outcome.not_attempted {
        println!("  not attempted: {}", name);
    }
    Ok(())
}
