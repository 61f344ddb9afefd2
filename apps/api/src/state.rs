use std::sync::Arc;

use crate::clients::{DocProcClient, TemplateClient};
use crate::config::Config;
use crate::store::DocStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocStore>,
    pub templates: TemplateClient,
    pub docproc: DocProcClient,
    pub config: Config,
}
