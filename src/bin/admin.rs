//! CLI administration tool for seo-urlgen.
//!
//! Runs the catalog operations directly against the configured status store
//! and upstream services, without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # How many URLs would be generated
//! cargo run --bin admin -- preview BUS#acme
//!
//! # Generate and reconcile
//! cargo run --bin admin -- generate BUS#acme
//!
//! # List stored URLs, optionally by status
//! cargo run --bin admin -- list BUS#acme --status error
//!
//! # Submit every generated URL to the active website
//! cargo run --bin admin -- submit BUS#acme --all-generated
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`seo_urlgen::config`]. With `STATUS_STORE=memory`
//! every invocation starts from an empty set.
//!
//! # Features
//!
//! - **Catalog**: Preview, generate, list, progress and submit
//! - **Database Tools**: Connection checks and info queries
//! - **Interactive Prompts**: Confirmation before writes and submissions
//! - **Colored Output**: Terminal-friendly formatting using `colored` crate

use seo_urlgen::application::services::UrlCatalogService;
use seo_urlgen::config::{self, Config, StoreKind};
use seo_urlgen::domain::entities::{TargetSite, UrlStatus};
use seo_urlgen::server;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;

/// CLI tool for managing seo-urlgen.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// Show how many URLs the current configuration yields
    Preview { business_id: String },

    /// Generate URLs and merge them into the stored set
    Generate {
        business_id: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List stored URLs
    List {
        business_id: String,

        /// Only show URLs in this status (generated, pending, error)
        #[arg(short, long)]
        status: Option<UrlStatus>,
    },

    /// Show per-status counts
    Progress { business_id: String },

    /// Submit URLs to the content queue
    Submit {
        business_id: String,

        /// URL ids to submit
        ids: Vec<String>,

        /// Submit every URL currently in `generated` status
        #[arg(long, conflicts_with = "ids")]
        all_generated: bool,

        /// Target site (defaults to the business's active website)
        #[arg(short, long)]
        target: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand, Clone, Copy)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env().context("Invalid configuration")?;

    if let Commands::Db { action } = &cli.command {
        return handle_db_action(*action, &config).await;
    }

    let catalog = server::build_catalog(&config).await?;

    match cli.command {
        Commands::Preview { business_id } => preview(&catalog, &business_id).await?,
        Commands::Generate { business_id, yes } => generate(&catalog, &business_id, yes).await?,
        Commands::List {
            business_id,
            status,
        } => list(&catalog, &business_id, status).await?,
        Commands::Progress { business_id } => progress(&catalog, &business_id).await?,
        Commands::Submit {
            business_id,
            ids,
            all_generated,
            target,
            yes,
        } => submit(&catalog, &business_id, ids, all_generated, target, yes).await?,
        Commands::Db { .. } => {}
    }

    Ok(())
}

/// Prints the preview breakdown.
async fn preview(catalog: &UrlCatalogService, business_id: &str) -> Result<()> {
    println!("{}", "🔍 Preview".bright_blue().bold());
    println!();

    let breakdown = catalog.preview_breakdown(business_id).await?;

    println!("  Business:  {}", business_id.cyan());
    println!(
        "  URLs:      {}",
        breakdown.total_urls.to_string().bright_green().bold()
    );
    println!("  Cities:    {}", breakdown.city_count);
    println!("  States:    {}", breakdown.state_count);
    println!("  Keywords:  {}", breakdown.keyword_count);
    println!();

    Ok(())
}

/// Generates and reconciles after showing what will happen.
async fn generate(catalog: &UrlCatalogService, business_id: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "⚙️  Generate URLs".bright_blue().bold());
    println!();

    let breakdown = catalog.preview_breakdown(business_id).await?;
    println!(
        "  {} keywords × {} areas = {} candidate URLs",
        breakdown.keyword_count,
        breakdown.city_count,
        breakdown.total_urls.to_string().bright_white().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Generate and store new URLs?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let report = catalog.generate_and_reconcile(business_id).await?;

    println!();
    println!("{}", "✅ Reconciled".green().bold());
    println!(
        "  Added:    {}",
        report.summary.added.to_string().bright_green().bold()
    );
    println!("  Retained: {}", report.summary.retained);
    println!("  Stale:    {}", report.summary.stale);
    println!("  Total:    {}", report.urls.len());
    if !report.collisions.is_empty() {
        println!(
            "  {} {}",
            "⚠️  Colliding ids (first kept):".yellow(),
            report.collisions.join(", ")
        );
    }
    println!();

    Ok(())
}

/// Lists stored URLs.
///
/// # Output Format
///
/// ```text
/// 📋 URLs for acme
///
///   Status     Id                                   Path
///   ─────────────────────────────────────────────────────────────────────
///   generated  towson-dispensary                    /dispensary/towson-md
///   pending    towson-cbd-shop                      /cbd-shop/towson-md
/// ```
async fn list(
    catalog: &UrlCatalogService,
    business_id: &str,
    status: Option<UrlStatus>,
) -> Result<()> {
    println!(
        "{}",
        format!("📋 URLs for {}", business_id).bright_blue().bold()
    );
    println!();

    let urls = catalog.list_urls(business_id).await?;
    let rows: Vec<_> = urls
        .iter()
        .filter(|url| status.is_none_or(|wanted| url.status == wanted))
        .collect();

    if rows.is_empty() {
        println!("{}", "  No URLs found".yellow());
        println!();
        println!(
            "  Generate them with: {} admin generate {}",
            "cargo run --bin".bright_cyan(),
            business_id
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:<36} {}",
        "Status".bright_white().bold(),
        "Id".bright_white().bold(),
        "Path".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for url in &rows {
        let status = match url.status {
            UrlStatus::Generated => "generated".normal(),
            UrlStatus::Pending => "pending".yellow(),
            UrlStatus::Error => "error".red(),
        };

        println!("  {:<10} {:<36} {}", status, url.id.cyan(), url.path);
        if let Some(error) = &url.error {
            println!("  {:<10} {}", "", error.bright_black());
        }
    }

    println!();
    println!("  Total: {}", rows.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Prints per-status counts.
async fn progress(catalog: &UrlCatalogService, business_id: &str) -> Result<()> {
    println!("{}", "📊 Progress".bright_blue().bold());
    println!();

    let counts = catalog.progress(business_id).await?;

    println!(
        "  Total:     {}",
        counts.total.to_string().bright_white().bold()
    );
    println!("  Generated: {}", counts.generated);
    println!(
        "  Pending:   {}",
        counts.pending.to_string().yellow().bold()
    );
    println!("  Error:     {}", counts.error.to_string().red().bold());
    println!();

    Ok(())
}

/// Submits a selection after confirmation.
///
/// # Safety
///
/// - Requires confirmation (default: No) unless `--yes`
/// - Nothing changes locally when the queue call fails
async fn submit(
    catalog: &UrlCatalogService,
    business_id: &str,
    ids: Vec<String>,
    all_generated: bool,
    target: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🚀 Submit to content queue".bright_blue().bold());
    println!();

    let ids = if all_generated {
        catalog
            .list_urls(business_id)
            .await?
            .with_status(UrlStatus::Generated)
            .map(|url| url.id.clone())
            .collect()
    } else {
        ids
    };

    if ids.is_empty() {
        println!("{}", "⚠️  Nothing selected".yellow());
        return Ok(());
    }

    let target = target
        .as_deref()
        .map(TargetSite::parse)
        .transpose()
        .context("Invalid target site")?;

    println!("  Business: {}", business_id.cyan());
    println!(
        "  URLs:     {}",
        ids.len().to_string().bright_white().bold()
    );
    match &target {
        Some(site) => println!("  Target:   {}", site.as_str().cyan()),
        None => println!("  Target:   {}", "active website".bright_black()),
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Submit this batch?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let result = catalog.submit_selection(business_id, &ids, target).await?;

    println!();
    println!("{}", "✅ Batch accepted".green().bold());
    println!(
        "  Accepted: {}",
        result.accepted_count.to_string().bright_green().bold()
    );
    println!("  Batch id: {}", result.batch_id.bright_black());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, config: &Config) -> Result<()> {
    if config.status_store != StoreKind::Postgres {
        println!(
            "{}",
            "⚠️  STATUS_STORE is not postgres; nothing to check".yellow()
        );
        return Ok(());
    }

    let pool = server::connect_database(config).await?;

    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(&pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(&pool)
                .await?;
            let businesses: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_sets")
                .fetch_one(&pool)
                .await?;
            let urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM generated_urls")
                .fetch_one(&pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!(
                "  Businesses: {}",
                businesses.to_string().bright_green().bold()
            );
            println!("  URLs:       {}", urls.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
