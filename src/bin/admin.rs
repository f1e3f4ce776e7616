//! CLI administration tool for link-tracker.
//!
//! Creates and inspects links, prints analytics and captured leads, and
//! performs database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a link (prompts for missing owner and URL)
//! cargo run --bin admin -- link create --owner user-1 --url https://example.com
//!
//! # List an owner's links
//! cargo run --bin admin -- link list --owner user-1
//!
//! # Analytics for one link
//! cargo run --bin admin -- analytics 6f1c0c5e-...
//!
//! # Leads for one link
//! cargo run --bin admin -- leads 6f1c0c5e-... --page 2
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (or `DB_HOST`/`DB_USER`/...): PostgreSQL connection
//! - `PUBLIC_BASE_URL`: prefix used when printing short URLs

use link_tracker::application::services::{
    AnalyticsService, CreateLinkOptions, LeadService, LinkService,
};
use link_tracker::config::Config;
use link_tracker::domain::analytics::AnalyticsSummary;
use link_tracker::infrastructure::geoip::DisabledLocator;
use link_tracker::infrastructure::persistence::Storage;
use link_tracker::state::{DynAnalyticsService, DynLeadService, DynLinkService};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::collections::BTreeMap;
use std::sync::Arc;
use uuid::Uuid;

/// CLI tool for managing link-tracker.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show click analytics for a link
    Analytics {
        /// Link id
        link_id: Uuid,
    },

    /// Show leads captured for a link
    Leads {
        /// Link id
        link_id: Uuid,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Create a new link
    Create {
        /// Owner id the link belongs to
        #[arg(short, long)]
        owner: Option<String>,

        /// Destination URL
        #[arg(short, long)]
        url: Option<String>,

        /// Custom alias (3-32 letters or digits)
        #[arg(short, long)]
        alias: Option<String>,

        #[arg(short, long)]
        title: Option<String>,

        /// Show the lead capture gate before redirecting
        #[arg(long)]
        lead_capture: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List an owner's links
    List {
        #[arg(short, long)]
        owner: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info and row counts
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let database_url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(database_url)
        .await
        .context("Failed to connect to database")?;

    let storage = Storage::postgres(pool.clone());

    match cli.command {
        Commands::Link { action } => {
            let links = LinkService::new(storage.links.clone(), config.public_base_url.as_str());
            handle_link_action(action, &links).await?
        }
        Commands::Analytics { link_id } => {
            let analytics = AnalyticsService::new(storage.clicks.clone(), storage.links.clone());
            show_analytics(&analytics, link_id).await?
        }
        Commands::Leads {
            link_id,
            page,
            page_size,
        } => {
            let leads = LeadService::new(
                storage.leads.clone(),
                storage.links.clone(),
                Arc::new(DisabledLocator),
            );
            show_leads(&leads, link_id, page, page_size).await?
        }
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands.
async fn handle_link_action(action: LinkAction, links: &DynLinkService) -> Result<()> {
    match action {
        LinkAction::Create {
            owner,
            url,
            alias,
            title,
            lead_capture,
            yes,
        } => {
            let options = CreateLinkOptions {
                custom_alias: alias,
                title,
                lead_capture_enabled: lead_capture,
                ..Default::default()
            };
            create_link(links, owner, url, options, yes).await
        }
        LinkAction::List { owner } => list_links(links, &owner).await,
    }
}

/// Creates a link, prompting for owner and URL when not given.
async fn create_link(
    links: &DynLinkService,
    owner: Option<String>,
    url: Option<String>,
    options: CreateLinkOptions,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let owner = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner id").interact_text()?,
    };

    let url = match url {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Destination URL")
            .with_initial_text("https://")
            .interact_text()?,
    };

    println!("{}", "Link details:".bright_white().bold());
    println!("  Owner:        {}", owner.cyan());
    println!("  Destination:  {}", url.cyan());
    if let Some(alias) = &options.custom_alias {
        println!("  Alias:        {}", alias.cyan());
    }
    println!(
        "  Lead capture: {}",
        if options.lead_capture_enabled {
            "on".green()
        } else {
            "off".bright_black()
        }
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this link?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let link = links
        .create_link(&owner, &url, options)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!();
    println!("{}", "✅ Link created successfully!".green().bold());
    println!("  ID:        {}", link.id.to_string().bright_black());
    println!(
        "  Short URL: {}",
        links.short_url(&link).bright_yellow().bold()
    );
    println!();

    Ok(())
}

/// Lists an owner's links, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Links for user-1
///
///   Code       Clicks  Unique  Leads  Created           Destination
///   ──────────────────────────────────────────────────────────────────
///   promo24        42      17      3  2026-05-01 10:30  https://example.com
/// ```
async fn list_links(links: &DynLinkService, owner: &str) -> Result<()> {
    println!(
        "{} {}",
        "📋 Links for".bright_blue().bold(),
        owner.bright_blue().bold()
    );
    println!();

    let items = links
        .list_for_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if items.is_empty() {
        println!("{}", "  No links found".yellow());
        println!();
        println!(
            "  Create one with: {} admin link create --owner {}",
            "cargo run --bin".bright_cyan(),
            owner
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:>6}  {:>6}  {:>5}  {:<17} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Unique".bright_white().bold(),
        "Leads".bright_white().bold(),
        "Created".bright_white().bold(),
        "Destination".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &items {
        let code = if link.is_expired() || !link.is_active {
            link.short_code.bright_black()
        } else {
            link.short_code.cyan()
        };

        println!(
            "  {:<10} {:>6}  {:>6}  {:>5}  {:<17} {}",
            code,
            link.total_clicks,
            link.unique_clicks,
            link.lead_captures,
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.destination_url
        );
    }

    println!();
    println!("  Total: {}", items.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_analytics(
    analytics: &DynAnalyticsService,
    link_id: Uuid,
) -> Result<()> {
    let summary = analytics
        .get_analytics(link_id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load analytics: {}", e))?;

    print_summary(&summary);

    Ok(())
}

fn print_summary(summary: &AnalyticsSummary) {
    println!("{}", "📊 Analytics".bright_blue().bold());
    println!();
    println!(
        "  Total clicks:  {}",
        summary.total_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Unique clicks: {}",
        summary.unique_clicks.to_string().bright_green().bold()
    );
    println!(
        "  Bot clicks:    {}",
        summary.bot_clicks.to_string().bright_yellow()
    );
    println!();

    print_group("Countries", &summary.clicks_by_country);
    print_group("Devices", &summary.clicks_by_device);
    print_group("Browsers", &summary.clicks_by_browser);
    print_group("Operating systems", &summary.clicks_by_os);
    print_group("Days", &summary.clicks_by_day);

    if !summary.top_referrers.is_empty() {
        println!("  {}", "Top referrers".bright_white().bold());
        for r in &summary.top_referrers {
            println!("    {:<30} {:>6}", r.domain.cyan(), r.count);
        }
        println!();
    }

    if !summary.recent_clicks.is_empty() {
        println!("  {}", "Recent clicks".bright_white().bold());
        for c in &summary.recent_clicks {
            println!(
                "    {}  {:<15} {:<8} {}",
                c.clicked_at
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
                    .bright_black(),
                c.geo.country.as_deref().unwrap_or("Unknown"),
                c.client.device.as_str(),
                c.client.browser.as_str()
            );
        }
        println!();
    }
}

fn print_group(title: &str, counts: &BTreeMap<String, u64>) {
    if counts.is_empty() {
        return;
    }

    println!("  {}", title.bright_white().bold());
    for (key, count) in counts {
        println!("    {:<30} {:>6}", key.cyan(), count);
    }
    println!();
}

async fn show_leads(
    leads: &DynLeadService,
    link_id: Uuid,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<()> {
    let result = leads
        .list_for_link(link_id, page, page_size)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list leads: {}", e))?;

    println!("{}", "📇 Leads".bright_blue().bold());
    println!();

    if result.items.is_empty() {
        println!("{}", "  No leads on this page".yellow());
    } else {
        println!(
            "  {:<32} {:<24} {:<15} {}",
            "Email".bright_white().bold(),
            "Name".bright_white().bold(),
            "Country".bright_white().bold(),
            "Captured".bright_white().bold()
        );
        println!("  {}", "─".repeat(90).bright_black());

        for lead in &result.items {
            println!(
                "  {:<32} {:<24} {:<15} {}",
                lead.email.cyan(),
                lead.name,
                lead.geo.country.as_deref().unwrap_or("Unknown"),
                lead.captured_at
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
                    .bright_black()
            );
        }
    }

    println!();
    println!(
        "  Page {} of {} ({} total)",
        result.page,
        result.total_pages().max(1),
        result.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();

            for table in ["links", "clicks", "lead_captures"] {
                let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
                    .fetch_one(pool)
                    .await?;
                println!(
                    "  {:<14} {}",
                    format!("{table}:"),
                    count.to_string().bright_green().bold()
                );
            }
            println!();
        }
    }

    Ok(())
}
