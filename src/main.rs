use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hotsheet::{api, db};

const DEFAULT_PORT: u16 = 3000;

#[derive(Parser)]
#[command(name = "hotsheet")]
#[command(about = "Feature posts in a sidebar until a chosen date")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the Hot Sheet server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value_t = DEFAULT_PORT)]
        port: u16,

        /// Database file (defaults to the platform data directory)
        #[arg(long, env = "HOTSHEET_DB")]
        db: Option<PathBuf>,
    },
    /// Apply pending database migrations and exit
    Migrate {
        #[arg(long, env = "HOTSHEET_DB")]
        db: Option<PathBuf>,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "hotsheet=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn open_database(path: Option<PathBuf>) -> anyhow::Result<db::Database> {
    let path = match path {
        Some(path) => path,
        None => db::default_path()?,
    };
    tracing::info!("Using database at {}", path.display());

    let db = db::Database::open(path)?;
    db.migrate()?;
    Ok(db)
}

async fn serve(port: u16, db_path: Option<PathBuf>) -> anyhow::Result<()> {
    tracing::info!("Starting Hot Sheet server on port {}", port);

    let db = open_database(db_path)?;
    let app = api::create_router(db);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("Hot Sheet server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve { port, db }) => serve(port, db).await?,
        Some(Commands::Migrate { db }) => {
            open_database(db)?;
            tracing::info!("Database is up to date");
        }
        None => serve(DEFAULT_PORT, None).await?,
    }

    Ok(())
}
