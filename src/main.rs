//! `ctban` maintenance CLI
//!
//! Inspect and manage a ban database file from the command line: list and
//! query bans, add or remove them, run a cleanup pass, and show the tracked
//! leaver/freekiller menus. Presentation only; everything goes through the
//! same registry interface the in-game layers use.

use clap::{Parser, Subcommand};

use ctban::registry::{BanRegistry, DEFAULT_DATABASE_PATH};
use ctban::{duration_label, logging, Error};

#[derive(Parser, Debug)]
#[command(name = "ctban")]
#[command(about = "Maintenance tool for the CT ban database")]
struct Args {
    /// Path to the ban database file
    #[arg(short, long, default_value = DEFAULT_DATABASE_PATH)]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all bans, sorted by display name
    List,
    /// Check whether an identity is currently banned
    Query { identity: String },
    /// Ban an identity; a duration of 0 means permanent
    Ban {
        identity: String,
        display_name: String,
        /// Ban duration in seconds
        #[arg(short = 't', long, default_value = "0")]
        duration: u64,
    },
    /// Remove a ban
    Unban { identity: String },
    /// Remove expired bans and persist the result
    Cleanup,
    /// Show the tracked recent leavers
    Leavers,
    /// Show the tracked recent freekillers
    Freekillers,
}

async fn run(args: Args) -> Result<(), Error> {
    let registry = BanRegistry::load(&args.database).await?;

    match args.command {
        Command::List => {
            let mut bans = registry.list_bans();
            bans.sort_by(|a, b| a.display_name.cmp(&b.display_name));

            if bans.is_empty() {
                println!("No bans recorded.");
            }
            for record in bans {
                println!(
                    "{} ({}) - {}",
                    record.display_name, record.identity, record.expiry
                );
            }
        }
        Command::Query { identity } => {
            if registry.is_banned(&identity) {
                println!("{identity} is CT-banned.");
            } else {
                println!("{identity} is not CT-banned.");
            }
        }
        Command::Ban {
            identity,
            display_name,
            duration,
        } => {
            registry.add_ban(&identity, duration, &display_name).await;
            let label = duration_label(duration)
                .map_or_else(|| format!("{duration} seconds"), str::to_string);
            println!("{display_name} has been banned from the CT team ({label}).");
        }
        Command::Unban { identity } => match registry.remove_ban(&identity).await {
            Some(record) => {
                println!("{} has been unbanned from the CT team.", record.display_name);
            }
            None => println!("{identity} was not banned."),
        },
        Command::Cleanup => {
            let removed = registry.cleanup().await;
            println!("Cleanup removed {removed} expired ban(s).");
        }
        Command::Leavers => {
            for entry in registry.list_leavers() {
                println!("{} ({})", entry.display_name, entry.identity);
            }
        }
        Command::Freekillers => {
            for entry in registry.list_freekillers() {
                println!("{} ({})", entry.display_name, entry.identity);
            }
        }
    }

    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(err) = logging::init() {
        eprintln!("Failed to initialize logging: {err}");
    }
    logging::log_console(format!(
        "ctban maintenance tool starting (database: {})",
        args.database
    ));

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to build tokio runtime")
        .block_on(run(args));

    if let Err(err) = result {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
