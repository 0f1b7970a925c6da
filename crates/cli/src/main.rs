//! Administrative CLI for Armoire.

use anyhow::{Context, Result};
use armoire_core::config::AppConfig;
use armoire_sync::{IntegrityReport, SyncService};
use clap::{Args, Parser, Subcommand};
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use std::io::{BufRead, Write};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "armoirectl")]
#[command(about = "Administrative CLI for Armoire")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    config: ConfigArgs,
}

#[derive(Args, Clone)]
struct ConfigArgs {
    /// Config file path
    #[arg(long, env = "ARMOIRE_CONFIG", default_value = "config/server.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the three-source integrity check and print the report
    Integrity {
        /// Output the report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Deep-check a single item by id, classname, name, or filename
    Check {
        /// Item identifier
        identifier: String,
    },
    /// Synchronize the database, storage, and catalog to the catalog's view.
    ///
    /// This is a DESTRUCTIVE operation: it deletes assets missing from any
    /// source and rewrites mismatched database values.
    Sync {
        /// Output results as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
        /// Skip data sync (only schema + deletions)
        #[arg(long = "skip-data", default_value_t = false)]
        skip_data: bool,
        /// Skip the interactive confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config: AppConfig = Figment::new()
        .merge(Toml::file(&cli.config.config))
        .merge(Env::prefixed("ARMOIRE_").split("__"))
        .extract()
        .context("failed to load configuration")?;
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {e}"))?;

    let storage = armoire_storage::from_config(&config.storage)
        .await
        .context("failed to initialize storage backend")?;
    let db = armoire_db::from_config(&config.database)
        .await
        .context("failed to connect to emulator database")?;
    let service = SyncService::new(storage, db);

    match cli.command {
        Commands::Integrity { json } => run_integrity(&service, json).await,
        Commands::Check { identifier } => run_check(&service, &identifier).await,
        Commands::Sync {
            json,
            skip_data,
            yes,
        } => run_sync(&service, json, skip_data, yes).await,
    }
}

async fn run_integrity(service: &SyncService, json: bool) -> Result<()> {
    let report = service
        .check_integrity(&CancellationToken::new())
        .await
        .context("integrity check failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_integrity_summary(&report);
    }
    Ok(())
}

async fn run_check(service: &SyncService, identifier: &str) -> Result<()> {
    let report = service
        .check_item(identifier)
        .await
        .context("item check failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

async fn run_sync(service: &SyncService, json: bool, skip_data: bool, yes: bool) -> Result<()> {
    let cancel = CancellationToken::new();

    // 1. Preview.
    let preview = service
        .check_integrity(&cancel)
        .await
        .context("integrity check failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&preview)?);
    } else {
        print_integrity_summary(&preview);
        println!();
        println!("WARNING: DESTRUCTIVE OPERATION");
        println!();
        println!("This sync will:");
        println!("  - Add new columns to the database schema");
        println!(
            "  - Update {} rows with mismatched values",
            preview.with_mismatches
        );
        println!(
            "  - DELETE {} items not registered in FurniData",
            preview.furnidata_missing
        );
        println!();
        println!("This action CANNOT be undone. Make sure you have backups.");
    }

    // 2. Confirmation.
    if !yes && !prompt_for_yes()? {
        println!("Sync cancelled.");
        return Ok(());
    }

    // 3. Execute.
    tracing::info!(skip_data, "starting sync operation");
    let report = service
        .full_sync(&cancel, true, skip_data)
        .await
        .context("sync failed")?;

    // 4. Results.
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("Sync completed in {}", report.execution_time);
        println!("  Rows updated:      {}", report.rows_updated);
        println!("  Database deleted:  {}", report.database_deleted);
        println!("  Storage deleted:   {}", report.storage_deleted);
        println!("  FurniData removed: {}", report.furnidata_deleted);

        if !report.schema_changes.is_empty() {
            println!();
            println!("Schema changes:");
            for change in &report.schema_changes {
                println!("  - {change}");
            }
        }

        if !report.errors.is_empty() {
            println!();
            println!("Errors during sync:");
            for error in &report.errors {
                println!("  - {error}");
            }
        }
    }
    Ok(())
}

fn print_integrity_summary(report: &IntegrityReport) {
    println!("Furniture integrity report");
    println!("  Total assets:      {}", report.total_assets);
    println!("  Storage missing:   {}", report.storage_missing);
    println!("  Database missing:  {}", report.database_missing);
    println!("  FurniData missing: {}", report.furnidata_missing);
    println!("  With mismatches:   {}", report.with_mismatches);
}

fn prompt_for_yes() -> Result<bool> {
    print!("\nDo you want to proceed? Type 'yes' to continue: ");
    std::io::stdout().flush()?;

    let mut response = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut response)
        .context("failed to read confirmation")?;
    Ok(response.trim().eq_ignore_ascii_case("yes"))
}
