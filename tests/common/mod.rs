//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use hashroute::config::RouterConfig;
use hashroute::host::{
    Host, Location, MemoryDocument, MemoryLocation, MemorySessionStore, MemoryTarget,
    NavigationEvent,
};
use hashroute::view::StaticViews;
use hashroute::{Dispatcher, RouteRegistry, ViewLoader};

pub const NOT_FOUND_HTML: &str = "<h1>404</h1>";

/// A dispatcher wired to in-memory capabilities.
pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub location: Arc<MemoryLocation>,
    pub document: Arc<MemoryDocument>,
    pub storage: Arc<MemorySessionStore>,
    pub target: Arc<MemoryTarget>,
    pub views: Arc<StaticViews>,
    pub events: Option<mpsc::UnboundedReceiver<NavigationEvent>>,
}

impl Harness {
    /// Point the location at `hash` without going through the event channel.
    pub fn at(&self, hash: &str) {
        use hashroute::host::NavigationSource;
        self.location.navigate(hash);
    }

    pub fn content(&self) -> String {
        self.target.content()
    }
}

/// Build a harness whose views include a `404` page. `routes` registers the
/// routes under test against the harness's view loader.
pub fn harness<F>(routes: F) -> Harness
where
    F: FnOnce(&mut RouteRegistry, &ViewLoader),
{
    harness_with(StaticViews::new().with("404", NOT_FOUND_HTML), routes)
}

pub fn harness_with<F>(views: StaticViews, routes: F) -> Harness
where
    F: FnOnce(&mut RouteRegistry, &ViewLoader),
{
    let config = RouterConfig::default();
    let views = Arc::new(views);
    let loader = ViewLoader::new(views.clone()).with_timeout(Duration::from_secs(2));

    let mut registry = RouteRegistry::new();
    routes(&mut registry, &loader);

    let target = Arc::new(MemoryTarget::new());
    let document =
        Arc::new(MemoryDocument::new().with_element(config.render.element_id.clone(), target.clone()));
    let (location, events) = MemoryLocation::new(Location::default());
    let storage = Arc::new(MemorySessionStore::new());

    let host = Host {
        navigation: location.clone(),
        document: document.clone(),
        storage: storage.clone(),
    };
    let dispatcher = Arc::new(Dispatcher::new(registry, host, loader, &config));

    Harness {
        dispatcher,
        location,
        document,
        storage,
        target,
        views,
        events: Some(events),
    }
}

/// Wait until the target has been written `writes` times.
pub async fn wait_for_writes(target: &MemoryTarget, writes: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while target.writes() < writes {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("render target was not written in time");
}

/// Start a template server on an ephemeral port.
///
/// Serves `/views/{file}` from `pages`. `broken.html` always answers 500.
pub async fn start_view_server(pages: &[(&str, &str)]) -> SocketAddr {
    let pages: Arc<HashMap<String, String>> = Arc::new(
        pages
            .iter()
            .map(|(name, body)| (name.to_string(), body.to_string()))
            .collect(),
    );

    let app = Router::new()
        .route("/views/{file}", get(serve_view))
        .with_state(pages);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn serve_view(
    State(pages): State<Arc<HashMap<String, String>>>,
    Path(file): Path<String>,
) -> (StatusCode, String) {
    if file == "broken.html" {
        return (StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string());
    }
    match pages.get(&file) {
        Some(body) => (StatusCode::OK, body.clone()),
        None => (StatusCode::NOT_FOUND, "missing".to_string()),
    }
}

/// An address nothing listens on.
pub async fn unused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}
