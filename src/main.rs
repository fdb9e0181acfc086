use tokio::net::TcpListener;

use notepad::logger::Logger;
use notepad::{build_router, AppState, Config, ConfigStore, NotesError};

#[tokio::main]
async fn main() -> Result<(), NotesError> {
    if let Err(e) = Logger::init() {
        eprintln!("Logger already installed: {}", e);
    }

    let config = Config::new();
    let settings = ConfigStore::load_or_init(config.app_config_file.clone())?;
    let state = AppState::new(&config, settings);
    state.pages.ensure_storage_dir()?;

    let app = build_router(state);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    log::info!("Server running on http://localhost:{}/", config.port);
    log::info!("Press 'CTRL+C' to stop the server.");
    axum::serve(listener, app).await.map_err(NotesError::from)
}
