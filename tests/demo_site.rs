//! The bundled demo routes against the bundled templates on disk.

use std::path::Path;
use std::sync::Arc;

use hashroute::config::{RouterConfig, ViewsConfig};
use hashroute::host::{
    FormSnapshot, Host, Location, MemoryDocument, MemoryLocation, MemorySessionStore, MemoryTarget,
    NavigationSource,
};
use hashroute::{site, Dispatcher, RouteRegistry, ViewLoader};
use url::Url;

struct Demo {
    dispatcher: Dispatcher,
    location: Arc<MemoryLocation>,
    target: Arc<MemoryTarget>,
}

fn demo() -> Demo {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let config = RouterConfig {
        views: ViewsConfig {
            base_url: Url::from_directory_path(root).unwrap().to_string(),
            ..ViewsConfig::default()
        },
        ..RouterConfig::default()
    };

    let views = ViewLoader::from_config(&config.views).unwrap();
    let mut registry = RouteRegistry::new();
    site::register(&mut registry, &views).unwrap();

    let target = Arc::new(MemoryTarget::new());
    let (location, _events) = MemoryLocation::new(Location::default());
    let host = Host {
        navigation: location.clone(),
        document: Arc::new(MemoryDocument::new().with_element("view", target.clone())),
        storage: Arc::new(MemorySessionStore::new()),
    };

    Demo {
        dispatcher: Dispatcher::new(registry, host, views, &config),
        location,
        target,
    }
}

#[tokio::test]
async fn test_home_and_about() {
    let d = demo();

    assert!(d.dispatcher.dispatch().await.unwrap().is_rendered());
    assert!(d.target.content().contains("<h1>Home</h1>"));

    d.location.navigate("#about");
    assert!(d.dispatcher.dispatch().await.unwrap().is_rendered());
    assert!(d.target.content().contains("<h1>About</h1>"));
}

#[tokio::test]
async fn test_noview_is_literal() {
    let d = demo();
    d.location.navigate("#noview");
    d.dispatcher.dispatch().await.unwrap();
    assert_eq!(
        d.target.content(),
        r#"<div class="container">Just sending in some text</div>"#
    );
}

#[tokio::test]
async fn test_user_profile_shows_escaped_id() {
    let d = demo();
    d.location.navigate("#user/%3Cb%3E7");
    d.dispatcher.dispatch().await.unwrap();
    assert!(d
        .target
        .content()
        .contains(r#"<span id="user-id">&lt;b&gt;7</span>"#));
}

#[tokio::test]
async fn test_contact_form_round_trip() {
    let d = demo();
    d.location.navigate("#contact");
    d.dispatcher.dispatch().await.unwrap();
    assert!(d.target.content().contains(r##"action="#post""##));

    let form = FormSnapshot::new("#post")
        .method("post")
        .field("yourname", "Ann")
        .field("comment", "Hello");
    assert!(d.dispatcher.submit(&form));
    d.dispatcher.dispatch().await.unwrap();

    let html = d.target.content();
    assert!(html.contains(r#"<dd id="submitted-name">Ann</dd>"#));
    assert!(html.contains(r#"<dd id="submitted-email">Not provided</dd>"#));
    assert!(html.contains(r#"<dd id="submitted-comment">Hello</dd>"#));
}

#[tokio::test]
async fn test_unknown_route_shows_404_template() {
    let d = demo();
    d.location.navigate("#no/such/page");
    let outcome = d.dispatcher.dispatch().await.unwrap();
    assert!(!outcome.is_rendered());
    assert!(d.target.content().contains("<h1>404</h1>"));
}
