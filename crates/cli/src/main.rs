//! iHUZA CLI - inventory dashboard from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in with the sample admin account
//! IHUZA_PASSWORD=admin123 ihuza login -e admin@huza.com
//!
//! # Landing page figures
//! ihuza overview
//!
//! # Add a product
//! ihuza products add -n "Speaker" -c Audio -s AUD-001 -p 99 -q 10
//!
//! # Remove a user (admin only)
//! ihuza users delete 2
//! ```
//!
//! # Commands
//!
//! - `register` / `login` / `logout` / `whoami` - Session management
//! - `overview` / `nav` - Dashboard figures and the sidebar
//! - `products` - Product catalog
//! - `categories` - Product categories
//! - `users` - User management (admin only)
//!
//! Data is printed to stdout as JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use ihuza_core::{FileStorage, Inventory};
use rust_decimal::Decimal;
use secrecy::SecretString;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use commands::CliError;
use config::{Config, LogFormat};

#[derive(Parser)]
#[command(name = "ihuza")]
#[command(author, version, about = "iHUZA inventory dashboard")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account and sign in
    Register {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (or set `IHUZA_PASSWORD`)
        #[arg(short, long, env = "IHUZA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: ihuza_core::Role,
    },
    /// Sign in with an existing account
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (or set `IHUZA_PASSWORD`)
        #[arg(short, long, env = "IHUZA_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Show the dashboard overview
    Overview,
    /// List the sidebar entries visible to the signed-in account
    Nav,
    /// Manage products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Manage categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Manage users (admin only)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List all products
    List,
    /// Search products by name, SKU or category
    Search {
        /// Case-insensitive substring; omit to list everything
        query: Option<String>,
    },
    /// Show one product
    Show { id: String },
    /// Add a product
    Add {
        #[arg(short, long)]
        name: String,

        /// Category name
        #[arg(short, long)]
        category: String,

        #[arg(short, long)]
        sku: String,

        #[arg(short, long)]
        price: Decimal,

        /// Units in stock
        #[arg(short = 'q', long, default_value_t = 0)]
        stock: u32,

        /// `in-stock`, `low-stock` or `out-of-stock`
        #[arg(long, default_value = "in-stock")]
        status: ihuza_core::ProductStatus,
    },
    /// Change fields of a product
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        category: Option<String>,

        #[arg(short, long)]
        sku: Option<String>,

        #[arg(short, long)]
        price: Option<Decimal>,

        #[arg(short = 'q', long)]
        stock: Option<u32>,

        #[arg(long)]
        status: Option<ihuza_core::ProductStatus>,
    },
    /// Delete a product
    Delete { id: String },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// List all categories
    List,
    /// Show one category
    Show { id: String },
    /// Add a category
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long, default_value = "")]
        description: String,
    },
    /// Change fields of a category
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Overwrite the stored product count
        #[arg(long)]
        product_count: Option<u32>,
    },
    /// Delete a category
    Delete { id: String },
}

#[derive(Subcommand)]
enum UserAction {
    /// List all users
    List,
    /// Show one user
    Show { id: String },
    /// Add a user
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: ihuza_core::Email,

        /// Password (or set `IHUZA_PASSWORD`)
        #[arg(short, long, env = "IHUZA_PASSWORD", hide_env_values = true)]
        password: String,

        /// Account role (`admin`, `user`)
        #[arg(short, long, default_value = "user")]
        role: ihuza_core::Role,
    },
    /// Change fields of a user
    Update {
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<ihuza_core::Email>,

        /// New password, hashed before storing
        #[arg(short, long)]
        password: Option<String>,

        #[arg(short, long)]
        role: Option<ihuza_core::Role>,

        /// `active` or `inactive`
        #[arg(long)]
        status: Option<ihuza_core::AccountStatus>,
    },
    /// Delete a user
    Delete { id: String },
}

fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ihuza_cli=info,ihuza_core=info".into());

    let json = format == LogFormat::Json;
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

fn main() -> ExitCode {
    // Loads `.env` before clap reads `IHUZA_PASSWORD`
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Text);
            tracing::error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    let cli = Cli::parse();
    match run(cli, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Command failed: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli, config: &Config) -> Result<(), CliError> {
    let storage = FileStorage::open(&config.data_dir)?;
    let mut inventory = Inventory::open(Arc::new(storage), config.recovery)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "inventory opened");

    match cli.command {
        Commands::Register {
            email,
            password,
            role,
        } => commands::session::register(
            &mut inventory,
            &email,
            &SecretString::from(password),
            role,
        ),
        Commands::Login { email, password } => {
            commands::session::login(&mut inventory, &email, &SecretString::from(password))
        }
        Commands::Logout => commands::session::logout(&mut inventory),
        Commands::Whoami => commands::session::whoami(&inventory),
        Commands::Overview => commands::dashboard::overview(&inventory),
        Commands::Nav => commands::dashboard::nav(&inventory),
        Commands::Products { action } => match action {
            ProductAction::List => commands::products::list(&inventory),
            ProductAction::Search { query } => {
                commands::products::search(&inventory, query.as_deref())
            }
            ProductAction::Show { id } => commands::products::show(&inventory, &id.into()),
            ProductAction::Add {
                name,
                category,
                sku,
                price,
                stock,
                status,
            } => commands::products::add(
                &inventory,
                ihuza_core::NewProduct {
                    name,
                    category,
                    sku,
                    price,
                    stock,
                    status,
                },
            ),
            ProductAction::Update {
                id,
                name,
                category,
                sku,
                price,
                stock,
                status,
            } => commands::products::update(
                &inventory,
                &id.into(),
                ihuza_core::ProductPatch {
                    name,
                    category,
                    sku,
                    price,
                    stock,
                    status,
                },
            ),
            ProductAction::Delete { id } => commands::products::delete(&inventory, &id.into()),
        },
        Commands::Categories { action } => match action {
            CategoryAction::List => commands::categories::list(&inventory),
            CategoryAction::Show { id } => commands::categories::show(&inventory, &id.into()),
            CategoryAction::Add { name, description } => commands::categories::add(
                &inventory,
                ihuza_core::NewCategory { name, description },
            ),
            CategoryAction::Update {
                id,
                name,
                description,
                product_count,
            } => commands::categories::update(
                &inventory,
                &id.into(),
                ihuza_core::CategoryPatch {
                    name,
                    description,
                    product_count,
                },
            ),
            CategoryAction::Delete { id } => {
                commands::categories::delete(&inventory, &id.into())
            }
        },
        Commands::Users { action } => match action {
            UserAction::List => commands::users::list(&inventory),
            UserAction::Show { id } => commands::users::show(&inventory, &id.into()),
            UserAction::Add {
                name,
                email,
                password,
                role,
            } => commands::users::add(
                &inventory,
                name,
                email,
                &SecretString::from(password),
                role,
            ),
            UserAction::Update {
                id,
                name,
                email,
                password,
                role,
                status,
            } => commands::users::update(
                &inventory,
                &id.into(),
                commands::users::UserChanges {
                    name,
                    email,
                    password: password.map(SecretString::from),
                    role,
                    status,
                },
            ),
            UserAction::Delete { id } => commands::users::delete(&inventory, &id.into()),
        },
    }
}
