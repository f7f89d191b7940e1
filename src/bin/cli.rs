//! Frontdesk CLI
//!
//! Console front desk against the hotel backend:
//! - Log in and out (session kept in a file between runs)
//! - Open any page through the same guards the dashboards use
//! - List the route table
//! - Generate a config file

use clap::{Parser, Subcommand};
use frontdesk::app::{FrontDesk, Opened, PageView};
use frontdesk::client::{Credentials, HttpBackend};
use frontdesk::config::{generate_default_config, Config};
use frontdesk::logging;
use frontdesk::routing::RouteEntry;
use frontdesk::session::{FileStore, SessionService};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Redirects `open --follow` will chase
const MAX_FOLLOW: usize = 4;

#[derive(Parser)]
#[command(name = "frontdesk-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel front desk from the terminal")]
#[command(long_about = "Frontdesk CLI logs staff into the hotel backend and opens pages of the\npublic site, the admin dashboard and the receptionist dashboard.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend API base URL (overrides config)
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Session file (overrides config)
    #[arg(long, global = true)]
    pub session_file: Option<PathBuf>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Log in and store the session
    Login {
        /// Staff email
        #[arg(short, long)]
        email: String,
        /// Password
        #[arg(short, long)]
        password: String,
    },

    /// Clear the stored session
    Logout,

    /// Show the stored session
    Whoami,

    /// Open a page and print its data
    Open {
        /// Page path, e.g. /receptionist/dashboard
        path: String,
        /// Follow guard redirects
        #[arg(long)]
        follow: bool,
    },

    /// List every page with its guard
    Routes,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(url) = &cli.backend_url {
        config.backend.url = url.clone();
    }
    if let Some(path) = &cli.session_file {
        config.session.path = path.to_string_lossy().to_string();
    }

    // Keep stdout for command output
    config.logging.level = if cli.verbose { "debug" } else { "warn" }.to_string();
    logging::init(&config.logging);

    let backend = Arc::new(HttpBackend::new(&config.backend)?);
    let session = SessionService::new(Arc::new(FileStore::new(&config.session.path)));
    let desk = FrontDesk::hotel(
        session,
        backend,
        Duration::from_millis(config.backend.cache_ttl_ms),
    );

    match cli.command {
        Commands::Login { email, password } => {
            let credentials = Credentials::new(email, password);
            match desk.login(&credentials).await {
                Ok(outcome) => match cli.format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&outcome)?),
                    _ => {
                        println!("Logged in as {}", outcome.role);
                        println!("Landing page: {}", outcome.redirect_to);
                    }
                },
                Err(e) => {
                    eprintln!("Login failed: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Logout => {
            let home = desk.logout()?;
            println!("Logged out, back to {}", home);
        }

        Commands::Whoami => {
            let session = desk.session().snapshot();
            let updated = desk
                .session()
                .updated_at()
                .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string());

            match cli.format.as_str() {
                "json" => {
                    let body = serde_json::json!({
                        "authenticated": session.is_authenticated(),
                        "role": session.role(),
                        "updated_at": updated,
                    });
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                _ => {
                    if !session.is_authenticated() {
                        println!("Not logged in");
                    } else {
                        println!("Role:    {}", session.role().unwrap_or("(none)"));
                    }
                    if let Some(updated) = updated {
                        println!("Updated: {}", updated);
                    }
                }
            }
        }

        Commands::Open { path, follow } => {
            let mut target = path;
            let mut opened = desk.open(&target).await?;

            if follow {
                for _ in 0..MAX_FOLLOW {
                    match &opened {
                        Opened::Redirect { to, reason } => {
                            tracing::debug!(from = %target, to = %to, ?reason, "Following redirect");
                            target = to.to_string();
                        }
                        _ => break,
                    }
                    opened = desk.open(&target).await?;
                }
            }

            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&opened)?),
                _ => print_opened(&opened)?,
            }

            if matches!(opened, Opened::NotFound { .. }) {
                std::process::exit(1);
            }
        }

        Commands::Routes => {
            let entries = desk.routes().entries();
            match cli.format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&entries)?),
                _ => print_routes(&entries),
            }
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn print_opened(opened: &Opened) -> Result<(), serde_json::Error> {
    match opened {
        Opened::Page(view) => print_page(view)?,
        Opened::Redirect { to, reason } => {
            println!("Redirected to {} ({:?})", to, reason);
        }
        Opened::NotFound { path } => {
            eprintln!("No page at {}", path);
        }
    }
    Ok(())
}

fn print_page(view: &PageView) -> Result<(), serde_json::Error> {
    println!("{} ({})", view.title, view.path);
    if !view.params.is_empty() {
        let params: Vec<String> = view
            .params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        println!("Params: {}", params.join(", "));
    }
    println!();

    if let Some(error) = &view.error {
        println!("Data failed to load: {}", error);
    } else if let Some(data) = &view.data {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        println!("(no data)");
    }
    Ok(())
}

fn print_routes(entries: &[RouteEntry]) {
    println!("{:<36} | {:<26} | {:<12}", "Path", "Page", "Role");
    println!("{}", "-".repeat(80));

    for entry in entries {
        let role = entry.required.map(|r| r.as_str()).unwrap_or("-");
        println!("{:<36} | {:<26} | {:<12}", entry.path, entry.page.slug(), role);
    }

    println!();
    println!("{} pages", entries.len());
}
