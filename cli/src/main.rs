mod commands;
mod config;
mod server;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    cmd_favlist_list, cmd_menu_add, cmd_menu_delete, cmd_menu_list, cmd_record_list, cmd_recover,
    cmd_user_register, cmd_user_show,
};
use crate::config::Config;
use nutricalc_core::service::NutritionService;

#[derive(Parser)]
#[command(
    name = "nutricalc",
    version,
    about = "Meal tracking and nutrition calculator"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value = "8080")]
        port: u16,
        /// Address to bind to (default: 127.0.0.1, use 0.0.0.0 to expose to network)
        #[arg(short, long, default_value = "127.0.0.1")]
        bind: String,
    },
    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
    /// Manage the shared menu catalog
    Menu {
        #[command(subcommand)]
        command: MenuCommands,
    },
    /// Show favorite lists
    Favlist {
        #[command(subcommand)]
        command: FavlistCommands,
    },
    /// Show logged meals
    Record {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Remove a deleted menu from a user's favorites and favorite lists
    Recover {
        /// Owner of the favorites to clean up
        user_id: String,
        /// ID of the deleted menu
        menu_id: i64,
        /// Re-create the menu and substitute it in favorite lists
        #[arg(long)]
        replace: bool,
        /// Name for the replacement menu (default: the deleted menu's name)
        #[arg(long)]
        name: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum UserCommands {
    /// Register a new user
    Register {
        /// User ID (at least 6 letters, digits or '_')
        user_id: String,
        /// Display name (at least 6 letters, digits or '_')
        username: String,
        /// Password (at least 6 characters, no whitespace)
        #[arg(long, env = "NUTRICALC_PASSWORD", hide_env_values = true)]
        password: String,
        /// Body weight in kg
        #[arg(long, default_value = "0")]
        weight: f64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a user's profile
    Show {
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MenuCommands {
    /// Add a menu to the catalog
    Add {
        /// Menu name
        name: String,
        /// Protein in grams
        #[arg(long)]
        protein: f64,
        /// Fat in grams
        #[arg(long)]
        fat: f64,
        /// Carbs in grams
        #[arg(long)]
        carb: f64,
        /// Creating user's ID
        #[arg(long)]
        creator: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the catalog, including deleted menus
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a menu by ID
    Delete {
        /// Menu ID
        id: i64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum FavlistCommands {
    /// List a user's favorite lists with nutrition totals
    List {
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum RecordCommands {
    /// List a user's records, most recent first
    List {
        user_id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Commands print their own output; only the server logs at info by default.
    let default_level = if matches!(cli.command, Commands::Serve { .. }) {
        "info"
    } else {
        "warn"
    };
    init_tracing(default_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let service = NutritionService::new(&config.db_path)?;

    match cli.command {
        Commands::Serve { port, bind } => server::start_server(service, port, &bind).await,
        Commands::User { command } => match command {
            UserCommands::Register {
                user_id,
                username,
                password,
                weight,
                json,
            } => cmd_user_register(&service, user_id, username, password, weight, json),
            UserCommands::Show { user_id, json } => cmd_user_show(&service, &user_id, json),
        },
        Commands::Menu { command } => match command {
            MenuCommands::Add {
                name,
                protein,
                fat,
                carb,
                creator,
                json,
            } => cmd_menu_add(&service, name, protein, fat, carb, creator, json),
            MenuCommands::List { json } => cmd_menu_list(&service, json),
            MenuCommands::Delete { id, json } => cmd_menu_delete(&service, id, json),
        },
        Commands::Favlist { command } => match command {
            FavlistCommands::List { user_id, json } => cmd_favlist_list(&service, &user_id, json),
        },
        Commands::Record { command } => match command {
            RecordCommands::List { user_id, json } => cmd_record_list(&service, &user_id, json),
        },
        Commands::Recover {
            user_id,
            menu_id,
            replace,
            name,
            json,
        } => cmd_recover(&service, user_id, menu_id, replace, name, json),
    }
}
