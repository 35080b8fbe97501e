use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tokio::sync::Notify;

use games_catalog::config::{AppState, Config, DEFAULT_CONFIG_PATH};
use games_catalog::{logger, provision, server};

#[derive(Parser)]
#[command(name = "games-catalog")]
#[command(version)]
#[command(about = "Games catalog API and frontend server", long_about = None)]
struct Cli {
    /// Configuration file (extension optional)
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP server (default)
    Serve,
    /// Create the store, apply the schema and load the seed data
    InitDb,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let cfg = Config::load_from(&cli.config)?;
    logger::init(&cfg)?;

    if cfg.app.uses_placeholder_secret() {
        logger::log_warning("app.secret_key is the development placeholder; set SECRET_KEY");
    }

    match cli.command.unwrap_or(Command::Serve) {
        Command::InitDb => init_db(&cfg),
        Command::Serve => serve(cfg),
    }
}

fn init_db(cfg: &Config) -> Result<(), Box<dyn Error>> {
    let report = provision::init_db(cfg)?;
    if report.seeding_skipped() {
        logger::log_info(&format!(
            "[INIT] Store ready with {} existing games",
            report.existing
        ));
    } else {
        logger::log_info(&format!(
            "[INIT] Store ready: {} games inserted, {} failed",
            report.inserted, report.failed
        ));
    }
    Ok(())
}

fn serve(cfg: Config) -> Result<(), Box<dyn Error>> {
    // Size the runtime from the workers setting, CPU cores otherwise
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_reusable_listener(addr)?;
    let state = Arc::new(AppState::new(&cfg));

    if !state.storage.path().exists() {
        logger::log_warning(&format!(
            "Store {} does not exist yet; run `games-catalog init-db`",
            state.storage.path().display()
        ));
    }

    logger::log_server_start(&addr, &cfg);

    let shutdown = Arc::new(Notify::new());
    server::start_signal_handler(Arc::clone(&shutdown));

    // LocalSet for spawn_local support
    let local = tokio::task::LocalSet::new();
    local
        .run_until(server::run_server(listener, state, shutdown))
        .await;
    Ok(())
}
