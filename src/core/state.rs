use std::sync::Arc;

use crate::api::ApiClient;
use crate::core::config::Settings;

/// Process-wide handles shared by every page of the shell.
#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    api: ApiClient,
}

impl AppState {
    pub(crate) fn new(settings: Settings, api: ApiClient) -> Self {
        Self { inner: Arc::new(InnerState { settings, api }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn api(&self) -> &ApiClient {
        &self.inner.api
    }
}
