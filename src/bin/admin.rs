//! CLI administration tool for shortlink.
//!
//! Works directly against the PostgreSQL store, going through the same services
//! as the HTTP API, so codes issued here follow the same rules.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/a/very/long/path --owner 1234
//!
//! # Resolve a code
//! cargo run --bin admin -- resolve b7F3x2
//!
//! # List an owner's links
//! cargo run --bin admin -- list 1234
//!
//! # Delete a link (asks for confirmation)
//! cargo run --bin admin -- delete b7F3x2 --owner 1234
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same database variables as the server (`DATABASE_URL` or `DB_*`).

use shortlink::application::services::{LinkService, RedirectResolver};
use shortlink::config;
use shortlink::domain::repositories::LinkRepository;
use shortlink::infrastructure::persistence::PgLinkRepository;
use shortlink::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shortlink.
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
    /// Create a short link
    Shorten {
        /// Destination URL (http/https)
        url: String,

        /// Owner id to record
        #[arg(short, long)]
        owner: Option<String>,

        /// Use this code instead of a generated one
        #[arg(short, long)]
        code: Option<String>,
    },

    /// Show the destination of a short code
    Resolve { code: String },

    /// List an owner's links, most recent first
    List { owner: String },

    /// Delete a short link
    Delete {
        code: String,

        /// Owner id to delete as (omit for anonymous links)
        #[arg(short, long)]
        owner: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    if config.database_url.is_none() {
        anyhow::bail!("The admin tool needs DATABASE_URL (or DB_* variables)");
    }

    let pool = connect_pool(&config).await?;
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    match cli.command {
        Commands::Shorten { url, owner, code } => {
            let service = LinkService::new(repo, config.shorten_settings());
            shorten(&service, &url, owner, code, config.public_base_url.as_deref()).await?
        }
        Commands::Resolve { code } => resolve(&RedirectResolver::new(repo), &code).await?,
        Commands::List { owner } => {
            let service = LinkService::new(repo, config.shorten_settings());
            list_links(&service, &owner).await?
        }
        Commands::Delete { code, owner, yes } => {
            let service = LinkService::new(repo, config.shorten_settings());
            delete_link(&service, &code, owner, yes).await?
        }
        Commands::Stats => handle_stats(&repo).await?,
        Commands::Db { action } => handle_db_action(action, &pool, repo.as_ref()).await?,
    }

    Ok(())
}

async fn shorten(
    service: &LinkService<PgLinkRepository>,
    url: &str,
    owner: Option<String>,
    code: Option<String>,
    public_base_url: Option<&str>,
) -> Result<()> {
    println!("{}", "🔗 Shorten URL".bright_blue().bold());
    println!();

    let link = match code {
        Some(code) => service.shorten_with_code(url, &code, owner).await,
        None => service.shorten(url, owner).await,
    }
    .map_err(|e| anyhow::anyhow!("Failed to shorten URL: {}", e))?;

    println!("  Code:  {}", link.short_code.bright_yellow().bold());
    println!("  URL:   {}", link.original_url.cyan());
    if let Some(base) = public_base_url {
        println!("  Short: {}/{}", base, link.short_code.bright_green());
    }
    if let Some(ref owner) = link.owner_id {
        println!("  Owner: {}", owner.bright_white());
    }
    println!();

    Ok(())
}

async fn resolve<R: LinkRepository + ?Sized>(
    resolver: &RedirectResolver<R>,
    code: &str,
) -> Result<()> {
    let url = resolver
        .resolve(code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to resolve {}: {}", code, e))?;

    println!("{} -> {}", code.bright_yellow(), url.cyan());

    Ok(())
}

/// Lists an owner's links.
///
/// # Output Format
///
/// ```text
/// 📋 Links for 1234
///
///   Code         Created              URL
///   ───────────────────────────────────────────────────────────
///   b7F3x2       2025-01-15 10:30     https://example.com/a/very/long/path
/// ```
async fn list_links(service: &LinkService<PgLinkRepository>, owner: &str) -> Result<()> {
    println!("{} {}", "📋 Links for".bright_blue().bold(), owner.cyan());
    println!();

    let links = service
        .list_by_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<20} {}",
        "Code".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<12} {:<20} {}",
            link.short_code.bright_yellow(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url.cyan()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(
    service: &LinkService<PgLinkRepository>,
    code: &str,
    owner: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete Short Link".bright_blue().bold());
    println!();

    let link = service
        .get_link(code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Code:  {}", link.short_code.bright_yellow());
    println!("  URL:   {}", link.original_url.cyan());
    println!(
        "  Owner: {}",
        link.owner_id.as_deref().unwrap_or("(anonymous)").bright_white()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete_link(code, owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

async fn handle_stats(repo: &PgLinkRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count = repo
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to count links: {}", e))?;

    println!(
        "  Links: {}",
        links_count.to_string().bright_green().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool, repo: &PgLinkRepository) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            repo.ping()
                .await
                .map_err(|e| anyhow::anyhow!("Database check failed: {}", e))?;

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
        }
    }

    Ok(())
}
