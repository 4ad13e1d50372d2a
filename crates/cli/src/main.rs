//! Snowdex CLI - collect snowmen from photos.
//!
//! # Usage
//!
//! ```bash
//! # Create a profile and list all profiles
//! snowdex profile create "눈사람 마스터"
//! snowdex profile list
//!
//! # Analyze a photo into the profile's collection
//! snowdex capture --profile <PROFILE_ID> snowman.jpg
//!
//! # Browse the collection
//! snowdex collection --profile <PROFILE_ID>
//! snowdex show --profile <PROFILE_ID> <ENTRY_ID> --sticker-out frosty.png --photo-out frosty.jpg
//! ```
//!
//! # Commands
//!
//! - `profile` - Create and list local profiles (no API key needed)
//! - `capture` - Analyze a photo and add it to a collection
//! - `collection` - List a profile's entries and rank
//! - `show` - Show one entry, optionally exporting its sticker or photo

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use snowdex::config::LogFormat;
use snowdex_core::{EntryId, ProfileId};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "snowdex")]
#[command(author, version, about = "Snowman collection tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage local profiles
    Profile {
        #[command(subcommand)]
        action: ProfileAction,
    },
    /// Analyze a snowman photo and add it to a collection
    Capture {
        /// Profile that receives the entry
        #[arg(short, long)]
        profile: ProfileId,

        /// Photo to analyze (PNG, JPEG, GIF, WebP, or a data-URI text file)
        image: PathBuf,
    },
    /// List a profile's collection
    Collection {
        /// Profile whose collection to list
        #[arg(short, long)]
        profile: ProfileId,
    },
    /// Show a single entry
    Show {
        /// Profile that owns the entry
        #[arg(short, long)]
        profile: ProfileId,

        /// Entry to show
        entry: EntryId,

        /// Write the entry's sticker (or photo, if it has none) to this path
        #[arg(long)]
        sticker_out: Option<PathBuf>,

        /// Write the entry's original photo to this path
        #[arg(long)]
        photo_out: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum ProfileAction {
    /// Create a new profile
    Create {
        /// Display name
        name: String,
    },
    /// List all profiles
    List,
}

#[tokio::main]
async fn main() {
    // RUST_LOG and SNOWDEX_LOG_FORMAT may come from .env.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_format = LogFormat::from_env();
    init_tracing(log_format.as_ref().copied().unwrap_or_default());

    let result = match log_format {
        Ok(_) => run(cli).await,
        Err(e) => Err(e.into()),
    };
    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(format: LogFormat) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "snowdex=info,snowdex_cli=info".into());

    let is_json = format == LogFormat::Json;
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), snowdex::AppError> {
    match cli.command {
        Commands::Profile { action } => match action {
            ProfileAction::Create { name } => commands::profile::create(&name)?,
            ProfileAction::List => commands::profile::list()?,
        },
        Commands::Capture { profile, image } => {
            commands::capture::capture(&profile, &image).await?;
        }
        Commands::Collection { profile } => commands::collection::list(&profile)?,
        Commands::Show {
            profile,
            entry,
            sticker_out,
            photo_out,
        } => {
            let exports = commands::collection::Exports {
                sticker: sticker_out.as_deref(),
                photo: photo_out.as_deref(),
            };
            commands::collection::show(&profile, &entry, exports).await?;
        }
    }
    Ok(())
}
