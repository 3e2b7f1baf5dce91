use tracing::{error, info};

use library_board::config::JWT_SECRET_ENV;
use library_board::{Config, Database, FileStorage, WebServer};

const CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    let config = match Config::load_with_env(CONFIG_PATH) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load {CONFIG_PATH}: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    if let Err(e) = library_board::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        library_board::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = run(config).await {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> library_board::Result<()> {
    config.validate().map_err(|e| {
        eprintln!("Hint: export {JWT_SECRET_ENV}=<secret> to set the token key.");
        e
    })?;

    info!(site = %config.server.site_name, "Starting library board");

    let db = Database::open(&config.database.path).await?;
    let storage = FileStorage::new(&config.files)?;
    info!(upload_dir = %config.files.upload_dir, "File storage ready");

    let server = WebServer::new(&config, db, storage)?;
    info!("Server configured on {}", server.addr());
    server.run().await
}
