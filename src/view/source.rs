//! Template transports.

use std::path::PathBuf;

use dashmap::DashMap;
use futures_util::future::{BoxFuture, FutureExt};
use url::Url;

use crate::view::types::{ViewError, ViewResult};

/// Fetches the raw content of a named template.
pub trait ViewSource: Send + Sync {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ViewResult<String>>;
}

fn relative_path(templates_path: &str, name: &str, extension: &str) -> String {
    let dir = templates_path.trim_matches('/');
    if dir.is_empty() {
        format!("{name}.{extension}")
    } else {
        format!("{dir}/{name}.{extension}")
    }
}

/// Templates served over HTTP: `GET {base}/{templates_path}/{name}.{ext}`.
#[derive(Debug, Clone)]
pub struct HttpViewSource {
    client: reqwest::Client,
    base: Url,
    templates_path: String,
    extension: String,
}

impl HttpViewSource {
    pub fn new(
        client: reqwest::Client,
        mut base: Url,
        templates_path: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        // Url::join drops the last segment of a base without a trailing slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Self {
            client,
            base,
            templates_path: templates_path.into(),
            extension: extension.into(),
        }
    }

    /// URL a view is fetched from.
    pub fn url_for(&self, name: &str) -> ViewResult<Url> {
        let relative = relative_path(&self.templates_path, name, &self.extension);
        self.base.join(&relative).map_err(|e| ViewError::InvalidLocation {
            view: name.to_string(),
            message: e.to_string(),
        })
    }
}

impl ViewSource for HttpViewSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ViewResult<String>> {
        async move {
            let url = self.url_for(name)?;
            tracing::debug!(view = %name, url = %url, "Fetching view");

            let res = self
                .client
                .get(url)
                .send()
                .await
                .map_err(|e| ViewError::transport(name, e))?;

            let status = res.status().as_u16();
            if !(200..400).contains(&status) {
                return Err(ViewError::Status {
                    view: name.to_string(),
                    status,
                });
            }

            res.text().await.map_err(|e| ViewError::transport(name, e))
        }
        .boxed()
    }
}

/// Templates read from a local directory.
#[derive(Debug, Clone)]
pub struct FileViewSource {
    root: PathBuf,
    templates_path: String,
    extension: String,
}

impl FileViewSource {
    pub fn new(
        root: impl Into<PathBuf>,
        templates_path: impl Into<String>,
        extension: impl Into<String>,
    ) -> Self {
        Self {
            root: root.into(),
            templates_path: templates_path.into(),
            extension: extension.into(),
        }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root
            .join(relative_path(&self.templates_path, name, &self.extension))
    }
}

impl ViewSource for FileViewSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ViewResult<String>> {
        async move {
            let path = self.path_for(name);
            tracing::debug!(view = %name, path = ?path, "Reading view");
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|source| ViewError::Io {
                    view: name.to_string(),
                    source,
                })
        }
        .boxed()
    }
}

/// Templates held in memory, keyed by view name.
#[derive(Debug, Default)]
pub struct StaticViews {
    views: DashMap<String, String>,
}

impl StaticViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, name: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(name, content);
        self
    }

    pub fn insert(&self, name: impl Into<String>, content: impl Into<String>) {
        self.views.insert(name.into(), content.into());
    }

    pub fn remove(&self, name: &str) {
        self.views.remove(name);
    }
}

impl ViewSource for StaticViews {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, ViewResult<String>> {
        let result = self
            .views
            .get(name)
            .map(|v| v.value().clone())
            .ok_or_else(|| ViewError::Status {
                view: name.to_string(),
                status: 404,
            });
        futures_util::future::ready(result).boxed()
    }
}
