//! Storekeep CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Apply database migrations
//! sk-cli migrate
//!
//! # Create the first admin account (the create endpoint itself sits behind
//! # authentication, so bootstrap happens here)
//! sk-cli admin create -n root -p <password> -m 13800000000 -e root@example.com
//! ```
//!
//! Both commands read `STOREKEEP_DATABASE_URL` from the environment (or a
//! `.env` file).

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stderr)]

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod commands;

#[derive(Parser)]
#[command(name = "sk-cli")]
#[command(author, version, about = "Storekeep CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply database migrations
    Migrate,
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create an admin account
    Create {
        /// Account name
        #[arg(short, long)]
        name: String,
        /// Plain-text password (hashed before storage)
        #[arg(short, long)]
        password: String,
        /// Mobile number
        #[arg(short, long)]
        mobile: String,
        /// Email address
        #[arg(short, long)]
        email: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storekeep_cli=info,sqlx=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let _ = dotenvy::dotenv();
    let database_url = match std::env::var("STOREKEEP_DATABASE_URL") {
        Ok(url) => SecretString::from(url),
        Err(_) => {
            eprintln!("STOREKEEP_DATABASE_URL is not set");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Migrate => commands::migrate::run(&database_url).await,
        Commands::Admin {
            action:
                AdminAction::Create {
                    name,
                    password,
                    mobile,
                    email,
                },
        } => commands::admin::create(&database_url, &name, &password, &mobile, &email).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
