//! View loading with timeout, logging and metrics.

use std::sync::Arc;
use std::time::{Duration, Instant};

use url::Url;

use crate::config::ViewsConfig;
use crate::dispatch::handler::Continuation;
use crate::observability::metrics;
use crate::view::source::{FileViewSource, HttpViewSource, ViewSource};
use crate::view::types::{ViewError, ViewResult};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Loads named templates through a [`ViewSource`].
///
/// Clones share the source; handlers capture their own copy.
#[derive(Clone)]
pub struct ViewLoader {
    source: Arc<dyn ViewSource>,
    timeout: Duration,
}

impl std::fmt::Debug for ViewLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewLoader")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl ViewLoader {
    pub fn new(source: Arc<dyn ViewSource>) -> Self {
        Self {
            source,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build a loader from configuration.
    ///
    /// `file://` base URLs read templates from disk; anything else is
    /// fetched over HTTP.
    pub fn from_config(config: &ViewsConfig) -> ViewResult<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| ViewError::InvalidBase {
            url: config.base_url.clone(),
            message: e.to_string(),
        })?;

        let source: Arc<dyn ViewSource> = if base.scheme() == "file" {
            let root = base.to_file_path().map_err(|_| ViewError::InvalidBase {
                url: config.base_url.clone(),
                message: "not a local path".to_string(),
            })?;
            Arc::new(FileViewSource::new(
                root,
                config.templates_path.clone(),
                config.extension.clone(),
            ))
        } else {
            Arc::new(HttpViewSource::new(
                reqwest::Client::new(),
                base,
                config.templates_path.clone(),
                config.extension.clone(),
            ))
        };

        Ok(Self::new(source).with_timeout(Duration::from_secs(config.timeout_secs)))
    }

    /// Load the raw content of view `name`.
    pub async fn load(&self, name: &str) -> ViewResult<String> {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.timeout, self.source.fetch(name)).await {
            Ok(result) => result,
            Err(_) => Err(ViewError::Timeout {
                view: name.to_string(),
                timeout: self.timeout,
            }),
        };

        match &result {
            Ok(content) => {
                tracing::debug!(view = %name, bytes = content.len(), "View loaded");
                metrics::record_view_load("ok", start);
            }
            Err(e) => {
                tracing::warn!(view = %name, error = %e, "View load failed");
                metrics::record_view_load("error", start);
            }
        }
        result
    }

    /// Load view `name` and hand the outcome to `next`.
    pub async fn make(&self, name: &str, next: Continuation) {
        match self.load(name).await {
            Ok(content) => next.done(content),
            Err(e) => next.fail(e),
        }
    }

    /// [`make`](Self::make) on a spawned task, for continuation-style
    /// handlers that cannot await.
    pub fn spawn_make(&self, name: impl Into<String>, next: Continuation) {
        let loader = self.clone();
        let name = name.into();
        tokio::spawn(async move {
            loader.make(&name, next).await;
        });
    }
}
