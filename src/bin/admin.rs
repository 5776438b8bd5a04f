//! CLI administration tool for shortkeun.
//!
//! Provides commands for managing users and sessions, viewing statistics,
//! and performing database checks without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Create a pre-verified user
//! cargo run --bin admin -- user create
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Delete sessions idle for more than 7 days
//! cargo run --bin admin -- session purge
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

use shortkeun::application::services::SessionService;
use shortkeun::domain::entities::NewUser;
use shortkeun::domain::repositories::{ClickRepository, LinkRepository, UserRepository};
use shortkeun::infrastructure::persistence::{
    PgClickRepository, PgLinkRepository, PgSessionRepository, PgUserRepository,
};
use shortkeun::utils::password::hash_password;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use validator::ValidateEmail;

/// Store timeout for CLI operations.
const ADMIN_STORE_TIMEOUT: Duration = Duration::from_secs(10);

/// CLI tool for managing shortkeun.
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
    /// Manage user accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage login sessions
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

#[derive(Subcommand)]
enum UserAction {
    /// Create a user whose email is already verified
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Delete sessions idle for longer than 7 days
    Purge,
}

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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;
    let pool = Arc::new(pool);

    match cli.command {
        Commands::User { action } => handle_user_action(action, pool).await?,
        Commands::Session { action } => handle_session_action(action, pool).await?,
        Commands::Stats => handle_stats(pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgUserRepository::new(pool);

    match action {
        UserAction::Create { name, email, yes } => create_user(&repo, name, email, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a user interactively.
///
/// The account is stored with `email_verified_at = now`, so no verification
/// mail is needed.
async fn create_user(
    repo: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::<String>::new()
            .with_prompt("Email")
            .validate_with(|input: &String| {
                if input.trim().validate_email() {
                    Ok(())
                } else {
                    Err("Not a valid email address")
                }
            })
            .interact_text()?,
    };
    let email = email.trim().to_lowercase();
    anyhow::ensure!(email.validate_email(), "Not a valid email address: {email}");

    if repo
        .find_by_email(&email)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .is_some()
    {
        println!("{}", "⚠️  A user with this email already exists".yellow());
        return Ok(());
    }

    let password = Password::new()
        .with_prompt("Password")
        .with_confirmation("Repeat password", "Passwords do not match")
        .validate_with(|input: &String| {
            if input.chars().count() >= 6 {
                Ok(())
            } else {
                Err("Password must be at least 6 characters")
            }
        })
        .interact()?;

    println!();
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let password_hash =
        hash_password(&password).map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;

    let user = repo
        .create(NewUser {
            name: name.trim().to_string(),
            email,
            password_hash,
            email_verified_at: Some(Utc::now()),
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!(
        "{} (id {})",
        "✅ User created successfully!".green().bold(),
        user.id.to_string().bright_white()
    );
    println!();

    Ok(())
}

/// Lists all users with verification status.
async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<5} {:<24} {:<36} {:<10}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "─".repeat(80).bright_black());

    for user in &users {
        let status = if user.is_verified() {
            "VERIFIED".green()
        } else {
            "PENDING".yellow()
        };

        println!(
            "  {:<5} {:<24} {:<36} {}",
            user.id.to_string().bright_black(),
            user.name.cyan(),
            user.email,
            status
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_session_action(action: SessionAction, pool: Arc<PgPool>) -> Result<()> {
    match action {
        SessionAction::Purge => {
            let service = SessionService::new(
                Arc::new(PgSessionRepository::new(pool.clone())),
                Arc::new(PgUserRepository::new(pool)),
                ADMIN_STORE_TIMEOUT,
            );

            println!("{}", "🧹 Purging idle sessions...".bright_blue());

            let removed = service
                .purge_idle()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to purge sessions: {}", e))?;

            println!(
                "{} {}",
                "✅ Removed sessions:".green().bold(),
                removed.to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays user, link and click counts.
async fn handle_stats(pool: Arc<PgPool>) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool.as_ref())
        .await?;

    let links_count = PgLinkRepository::new(pool.clone())
        .count_active()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let clicks_count = PgClickRepository::new(pool)
        .count_all()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!(
        "  Users:         {}",
        users_count.to_string().bright_green().bold()
    );
    println!(
        "  Active links:  {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_count.to_string().bright_green().bold()
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
