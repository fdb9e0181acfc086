use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::errors::NotesError;
use crate::utils::write_private;

pub const DEFAULT_USERNAME: &str = "New User";

/// Application configuration and constants
pub struct Config {
    pub storage_dir: Arc<PathBuf>,
    pub assets_dir: Arc<PathBuf>,
    pub css_dir: Arc<PathBuf>,
    pub img_dir: Arc<PathBuf>,
    pub template_dir: Arc<PathBuf>,
    pub app_config_file: PathBuf,
    pub page_extension: String,
    pub port: u16,
    pub host: String,
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self {
            storage_dir: Arc::new(PathBuf::from("docs")),
            assets_dir: Arc::new(PathBuf::from("assets")),
            css_dir: Arc::new(PathBuf::from("css")),
            img_dir: Arc::new(PathBuf::from("img")),
            template_dir: Arc::new(PathBuf::from("tmpl")),
            app_config_file: PathBuf::from("app-config.json"),
            page_extension: ".txt".to_string(),
            port: 4646,
            host: "0.0.0.0".to_string(),
        }
    }

    /// Create configuration rooted at `root`, keeping the default layout beneath it
    pub fn with_custom(root: &Path, port: Option<u16>, host: Option<String>) -> Self {
        let defaults = Self::new();
        Self {
            storage_dir: Arc::new(root.join(defaults.storage_dir.as_ref())),
            assets_dir: Arc::new(root.join(defaults.assets_dir.as_ref())),
            css_dir: Arc::new(root.join(defaults.css_dir.as_ref())),
            img_dir: Arc::new(root.join(defaults.img_dir.as_ref())),
            template_dir: Arc::new(root.join(defaults.template_dir.as_ref())),
            app_config_file: root.join(&defaults.app_config_file),
            page_extension: defaults.page_extension,
            port: port.unwrap_or(defaults.port),
            host: host.unwrap_or(defaults.host),
        }
    }

    /// Get the socket address for binding
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        let ip = self
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or(std::net::IpAddr::from([0, 0, 0, 0]));
        std::net::SocketAddr::new(ip, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// User settings persisted as `app-config.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    pub username: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { username: DEFAULT_USERNAME.to_string() }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, NotesError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), NotesError> {
        let json = serde_json::to_string(self)?;
        write_private(path, json.as_bytes())?;
        Ok(())
    }
}

/// Shared handle to the user settings and the file backing them.
///
/// Updates are not serialised against each other: two concurrent writers both
/// persist and the last one to write the file wins.
#[derive(Clone)]
pub struct ConfigStore {
    path: Arc<PathBuf>,
    current: Arc<RwLock<AppConfig>>,
}

impl ConfigStore {
    /// Load the settings file, writing a default one when it is missing or unreadable.
    ///
    /// Fails only when the default cannot be written.
    pub fn load_or_init(path: impl Into<PathBuf>) -> Result<Self, NotesError> {
        let path = path.into();
        let config = match AppConfig::load(&path) {
            Ok(config) => {
                info!("Loaded app config from {:?}", path);
                config
            }
            Err(e) => {
                warn!("Could not load app config {:?} ({}), writing defaults", path, e);
                let config = AppConfig::default();
                config.save(&path)?;
                config
            }
        };
        Ok(Self { path: Arc::new(path), current: Arc::new(RwLock::new(config)) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn username(&self) -> String {
        match self.current.read() {
            Ok(guard) => guard.username.clone(),
            Err(poisoned) => poisoned.into_inner().username.clone(),
        }
    }

    /// Replace the username and persist the settings file
    pub fn update_username(&self, username: &str) -> Result<(), NotesError> {
        let snapshot = {
            let mut guard = match self.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.username = username.to_string();
            guard.clone()
        };
        snapshot.save(&self.path)?;
        info!("Username updated");
        Ok(())
    }
}
