//! Parking Console Entry Point
//!
//! Application entry point and shell initialization.
//! Uses `anyhow` for command-line misuse; everything after argument
//! parsing fails as a `kernel::error::AppError` and exits with its code.
//!
//! Flags:
//! - `--in-memory` - keep everything in process memory (no `DATABASE_URL` needed)
//! - `--reset` - free every spot and clear tickets before starting (database only)

use parking::domain::repository::{
    ParkingSpotRepository, RecurringUserRepository, TicketRepository,
};
use parking::{
    InMemoryParkingRepository, InteractiveShell, ParkingConfig, PgParkingRepository,
    TicketLifecycle,
};
use platform::clock::{Clock, SystemClock};
use sqlx::postgres::PgPoolOptions;
use std::env;
use std::io;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Re-export unified error types
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

/// Spot layout used for `--in-memory` runs, same as the database seed
const IN_MEMORY_CARS: i32 = 3;
const IN_MEMORY_BIKES: i32 = 2;

#[derive(Debug, Default)]
struct Options {
    in_memory: bool,
    reset: bool,
}

fn parse_options(args: impl IntoIterator<Item = String>) -> anyhow::Result<Options> {
    let mut options = Options::default();
    for arg in args {
        match arg.as_str() {
            "--in-memory" => options.in_memory = true,
            "--reset" => options.reset = true,
            other => anyhow::bail!("Unknown argument: {other} (expected --in-memory or --reset)"),
        }
    }
    if options.in_memory && options.reset {
        anyhow::bail!("--reset has no effect with --in-memory (the in-memory store always starts empty)");
    }
    Ok(options)
}

fn database_url(value: Option<String>) -> AppResult<String> {
    value
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            AppError::invalid_input("DATABASE_URL must be set in environment")
                .with_action("Export DATABASE_URL or pass --in-memory")
        })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing; stdout belongs to the shell dialogue
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "parkit=info,parking=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let options = parse_options(env::args().skip(1))?;

    if let Err(err) = start(options).await {
        tracing::error!(error = %err, kind = %err.kind(), "Parking console terminated");
        std::process::exit(err.exit_code());
    }

    Ok(())
}

async fn start(options: Options) -> AppResult<()> {
    let config = Arc::new(ParkingConfig::from_env()?);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    if options.in_memory {
        tracing::info!(
            cars = IN_MEMORY_CARS,
            bikes = IN_MEMORY_BIKES,
            "Using in-memory storage"
        );
        let repo = Arc::new(InMemoryParkingRepository::with_spots(
            IN_MEMORY_CARS,
            IN_MEMORY_BIKES,
        ));
        let lifecycle = TicketLifecycle::from_repository(repo, config, clock)?;
        return run_shell(lifecycle).await;
    }

    // Database connection
    let database_url = database_url(env::var("DATABASE_URL").ok())?;

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await
        .map_err(|e| AppError::persistence("Database migration failed").with_source(e))?;

    tracing::info!("Migrations completed");

    let repo = Arc::new(PgParkingRepository::new(pool));
    if options.reset {
        repo.reset().await?;
    }

    let lifecycle = TicketLifecycle::from_repository(repo, config, clock)?;
    run_shell(lifecycle).await
}

async fn run_shell<P, T, U>(lifecycle: TicketLifecycle<P, T, U>) -> AppResult<()>
where
    P: ParkingSpotRepository,
    T: TicketRepository,
    U: RecurringUserRepository,
{
    let stdin = io::stdin();
    let mut shell = InteractiveShell::new(Arc::new(lifecycle), stdin.lock(), io::stdout());
    shell.run().await?;
    Ok(())
}
