use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::components::TemplateComponent;
use crate::config::{Config, ConfigStore};
use crate::routing::PageId;
use crate::services::{IndexService, PageService};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pages: PageService,
    pub index: IndexService,
    pub settings: ConfigStore,
    pub templates: Arc<TemplateComponent>,
    pub page_extension: Arc<String>,
    pub assets_dir: Arc<PathBuf>,
    pub css_dir: Arc<PathBuf>,
    pub img_dir: Arc<PathBuf>,
}

impl AppState {
    pub fn new(config: &Config, settings: ConfigStore) -> Self {
        Self {
            pages: PageService::new(config.storage_dir.as_ref().clone(), &config.page_extension),
            index: IndexService::new(config.storage_dir.as_ref().clone()),
            settings,
            templates: Arc::new(TemplateComponent::new(config.template_dir.as_ref().clone())),
            page_extension: Arc::new(config.page_extension.clone()),
            assets_dir: config.assets_dir.clone(),
            css_dir: config.css_dir.clone(),
            img_dir: config.img_dir.clone(),
        }
    }
}

/// A stored note
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub id: PageId,
    pub body: Vec<u8>,
}

impl Page {
    pub fn new(id: PageId, body: impl Into<Vec<u8>>) -> Self {
        Self { id, body: body.into() }
    }

    /// Blank page offered when editing something that does not exist yet
    pub fn empty(id: PageId) -> Self {
        Self { id, body: Vec::new() }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Data handed to the index view
#[derive(Debug, Clone, Default)]
pub struct IndexContext {
    pub title: String,
    pub links: Vec<String>,
    pub year: i32,
    pub username: String,
    pub errors: BTreeMap<String, String>,
}
