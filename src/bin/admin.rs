//! CLI administration tool for snaplink.
//!
//! Provides commands for seeding and inspecting the plan catalogue, minting
//! session tokens, and viewing statistics without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Seed the default plan catalogue (no-op when plans exist)
//! cargo run --bin admin -- plans seed
//!
//! # List the catalogue
//! cargo run --bin admin -- plans list
//!
//! # Mint a session token for user 42
//! cargo run --bin admin -- session create 42
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
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `TOKEN_SIGNING_SECRET` (required for `session create`)

use snaplink::application::services::{AuthService, PlanService};
use snaplink::infrastructure::persistence::{
    PgPlanRepository, PgSessionRepository, PgUserRepository,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
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
    /// Manage the plan catalogue
    Plans {
        #[command(subcommand)]
        action: PlanAction,
    },

    /// Manage API session tokens
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Plan catalogue subcommands.
#[derive(Subcommand)]
enum PlanAction {
    /// Insert the default catalogue when the plans table is empty
    Seed,

    /// List all active plans
    List,
}

/// Session token subcommands.
#[derive(Subcommand)]
enum SessionAction {
    /// Mint a session token for a user
    Create {
        /// User id to issue the token for
        user_id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Plans { action } => handle_plan_action(action, &pool).await?,
        Commands::Session { action } => handle_session_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches plan catalogue commands.
async fn handle_plan_action(action: PlanAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let service = PlanService::new(
        Arc::new(PgPlanRepository::new(pool.clone())),
        Arc::new(PgUserRepository::new(pool)),
    );

    match action {
        PlanAction::Seed => {
            println!("{}", "🌱 Seeding plan catalogue".bright_blue().bold());
            println!();

            let inserted = service
                .seed_defaults()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to seed plans: {}", e))?;

            if inserted == 0 {
                println!("{}", "  Catalogue already populated, nothing to do".yellow());
            } else {
                println!(
                    "{} {} plans inserted",
                    "✅".green(),
                    inserted.to_string().bright_green().bold()
                );
            }
        }
        PlanAction::List => {
            println!("{}", "📋 Plan Catalogue".bright_blue().bold());
            println!();

            let plans = service
                .list_active()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list plans: {}", e))?;

            if plans.is_empty() {
                println!("{}", "  No plans found".yellow());
                println!();
                println!(
                    "  Seed the defaults with: {} admin plans seed",
                    "cargo run --bin".bright_cyan()
                );
                return Ok(());
            }

            println!(
                "  {:<14} {:<16} {:>10} {:>8} {:>8}",
                "Name".bright_white().bold(),
                "Display".bright_white().bold(),
                "Price".bright_white().bold(),
                "Expiry".bright_white().bold(),
                "Aliases".bright_white().bold()
            );
            println!("  {}", "─".repeat(62).bright_black());

            for plan in &plans {
                let expiry = match plan.link_expiry_days {
                    Some(days) => format!("{days}d"),
                    None => "never".to_string(),
                };
                let aliases = if plan.custom_alias_allowed {
                    "yes".green()
                } else {
                    "no".red()
                };

                println!(
                    "  {:<14} {:<16} {:>10} {:>8} {:>8}",
                    plan.name.cyan(),
                    plan.display_name,
                    format!("${:.2}", plan.price_cents as f64 / 100.0).bright_green(),
                    expiry.bright_black(),
                    aliases
                );
            }

            println!();
            println!("  Total: {}", plans.len().to_string().bright_white().bold());
        }
    }

    println!();
    Ok(())
}

/// Dispatches session token commands.
async fn handle_session_action(action: SessionAction, pool: &PgPool) -> Result<()> {
    let signing_secret =
        std::env::var("TOKEN_SIGNING_SECRET").context("TOKEN_SIGNING_SECRET must be set")?;

    let service = AuthService::new(
        Arc::new(PgSessionRepository::new(Arc::new(pool.clone()))),
        signing_secret,
    );

    match action {
        SessionAction::Create { user_id, yes } => {
            println!("{}", "🔑 Create Session Token".bright_blue().bold());
            println!();
            println!("  User id: {}", user_id.to_string().cyan());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Create a session token for this user?")
                    .default(true)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let token = service
                .issue_token(user_id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to create session: {}", e))?;

            println!();
            println!("{}", "✅ Session token created!".green().bold());
            println!();
            println!(
                "{}",
                "⚠️  IMPORTANT: Save this token now! You won't be able to see it again."
                    .red()
                    .bold()
            );
            println!();
            println!(
                "  {}: Bearer {}",
                "Authorization".bright_cyan(),
                token.bright_yellow().bold()
            );
            println!();
            println!("{}", "Example:".bright_white());
            println!(
                "  curl -H \"Authorization: Bearer {}\" http://localhost:3000/api/links",
                token.bright_yellow()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of links and clicks
/// - Number of users and paid plans
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0) FROM links")
        .fetch_one(pool)
        .await?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let paid_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE plan <> 'free'")
        .fetch_one(pool)
        .await?;

    println!(
        "  Links:      {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:     {}",
        clicks_count.to_string().bright_green().bold()
    );
    println!(
        "  Users:      {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Paid plans: {}",
        paid_count.to_string().bright_green().bold()
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
        }
    }

    Ok(())
}
