//! Shelfscan CLI - scan book covers and list captured books

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shelfscan_core::{ScanConfig, SessionContext, VisionApi};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Directory holding persisted book lists
    #[arg(long, global = true, env = "SHELFSCAN_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Signed-in user id
    #[arg(short, long, global = true, env = "SHELFSCAN_USER")]
    user: Option<String>,

    /// Signed-in user's email address
    #[arg(long, global = true, env = "SHELFSCAN_EMAIL")]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a photo of a book and add it to your list
    Scan {
        /// JPEG image of the book's ISBN
        image: PathBuf,

        /// Vision API variant (chat, responses)
        #[arg(long)]
        vision_api: Option<String>,

        /// Treat the camera as not permitted
        #[arg(long)]
        no_camera_permission: bool,
    },

    /// Show your scanned books
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find an ISBN in a piece of text
    Parse {
        /// Text to search
        text: String,
    },

    /// Look up book details for an ISBN
    Lookup {
        /// 10 or 13 digit ISBN
        isbn: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// The session the identity provider would hand us
    fn session(&self) -> Result<SessionContext> {
        let user = self
            .user
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .context("No signed-in user (pass --user or set SHELFSCAN_USER)")?;

        let session = SessionContext::signed_in(user);
        Ok(match &self.email {
            Some(email) => session.with_email(email),
            None => session,
        })
    }

    fn config(&self) -> Result<ScanConfig> {
        let mut config = ScanConfig::from_env().context("Invalid configuration")?;
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "shelfscan_cli=debug,shelfscan_core=debug"
    } else {
        "shelfscan_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match &cli.command {
        Commands::Scan {
            image,
            vision_api,
            no_camera_permission,
        } => {
            let mut config = cli.config()?;
            if let Some(api) = vision_api {
                config.vision_api = api.parse::<VisionApi>()?;
            }
            commands::scan(&config, &cli.session()?, image, !no_camera_permission).await
        }

        Commands::List { json } => commands::list(&cli.config()?, &cli.session()?, *json).await,

        Commands::Parse { text } => commands::parse(text),

        Commands::Lookup { isbn, json } => commands::lookup(&cli.config()?, isbn, *json).await,
    }
}
