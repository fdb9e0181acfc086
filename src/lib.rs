//! Notepad - a single-user note-taking web server
//!
//! Pages are plain-text files in a storage directory, addressed as
//! `/<action>/<identifier>` and rendered through HTML views.

pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod routing;
pub mod services;
pub mod types;
pub mod utils;

use axum::{routing::get, Router};

// Re-export commonly used items
pub use config::{AppConfig, Config, ConfigStore};
pub use errors::NotesError;
pub use routing::{Action, PageId};
pub use types::{AppState, IndexContext, Page};
pub use services::{IndexService, PageService};
pub use components::{TemplateComponent, View};

/// Assemble the route table.
///
/// Page routes are dispatched from the fallback so that every path outside the
/// fixed routes goes through identifier validation.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::handle_root)
                .post(handlers::handle_update_username)
                .fallback(handlers::redirect_root),
        )
        .route("/favicon.ico", get(handlers::handle_favicon))
        .route("/assets/*path", get(handlers::handle_assets))
        .route("/css/*path", get(handlers::handle_css))
        .route("/img/*path", get(handlers::handle_img))
        .fallback(handlers::handle_page)
        .with_state(state)
}
