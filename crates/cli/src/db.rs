//! Database location, initialization and status

use anyhow::{Context, Result};
use ibank_business::{BankConfig, BranchService, ServiceContext};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::commands::Output;

/// Config từ environment, `--db` (nếu có) override database URL
fn load_config(db_path: Option<&Path>) -> BankConfig {
    let config = BankConfig::from_env();
    match db_path {
        Some(path) => config.with_database_url(format!("sqlite:{}?mode=rwc", path.display())),
        None => config,
    }
}

/// Đường dẫn file của một `sqlite:` URL (None cho in-memory)
fn database_file(url: &str) -> Option<PathBuf> {
    let path = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(PathBuf::from(path))
}

/// Open the ledger store, creating the data directory and schema if needed
pub async fn connect(db_path: Option<&Path>) -> Result<ServiceContext> {
    let config = load_config(db_path);
    if let Some(parent) = database_file(&config.database_url)
        .as_deref()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    tracing::debug!(url = %config.database_url, "Opening database");
    ServiceContext::connect(&config)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))
}

/// `init --force`: xóa file database cũ
pub fn remove_database(db_path: Option<&Path>, out: &Output) -> Result<()> {
    let config = load_config(db_path);
    let Some(file) = database_file(&config.database_url) else {
        return Ok(());
    };
    if file.exists() {
        std::fs::remove_file(&file).context("Failed to remove existing database")?;
        for suffix in ["-wal", "-shm"] {
            let mut side = file.clone().into_os_string();
            side.push(suffix);
            // Sidecar files may not exist
            let _ = std::fs::remove_file(PathBuf::from(side));
        }
        if !out.is_json() {
            println!("🗑️  Removed existing database");
        }
    }
    Ok(())
}

/// Show database status after init
pub async fn show_status(ctx: &ServiceContext, out: &Output) -> Result<()> {
    let branches = BranchService::new(ctx).list_branches().await?;
    if out.is_json() {
        return out.json(&json!({ "initialized": true, "branches": branches.len() }));
    }
    println!("✅ Database initialized");
    println!("   Branches: {}", branches.len());
    Ok(())
}
