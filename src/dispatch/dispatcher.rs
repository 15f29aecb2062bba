//! Navigation dispatch.
//!
//! # Responsibilities
//! - Resolve verb and path from the current location and document forms
//! - Look up the route and build request data
//! - Invoke the handler and reconcile its output into the render target
//! - Render the not-found view on any failure
//!
//! # Design Decisions
//! - Dispatch is split in two: [`Dispatcher::prepare`] runs synchronously
//!   up to the handler call, [`PendingRender::render`] awaits deferred
//!   content and writes it
//! - The event loop finishes `prepare` for each navigation in order but
//!   lets renders overlap; a slow render from an older navigation may land
//!   after a newer one
//! - On shutdown the loop prepares events already queued and waits for
//!   every render it started
//! - The render target is looked up once and cached

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinSet;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::{NavigationConfig, RenderConfig, RouterConfig};
use crate::dispatch::handler::{Continuation, HandlerError, HandlerOutput};
use crate::dispatch::types::{DispatchError, DispatchOutcome, DispatchResult};
use crate::host::{FormSnapshot, Host, Location, NavigationEvent, RenderTarget};
use crate::observability::metrics;
use crate::request::{form, RequestExtractor};
use crate::routing::{RouteRegistry, Verb};
use crate::view::ViewLoader;

/// Routes navigations to handlers and renders the result.
pub struct Dispatcher {
    registry: Arc<RouteRegistry>,
    host: Host,
    views: ViewLoader,
    extractor: RequestExtractor,
    render: Arc<RenderConfig>,
    navigation: NavigationConfig,
    target: OnceLock<Arc<dyn RenderTarget>>,
}

impl Dispatcher {
    pub fn new(registry: RouteRegistry, host: Host, views: ViewLoader, config: &RouterConfig) -> Self {
        tracing::info!(routes = registry.len(), element_id = %config.render.element_id, "Dispatcher initialized");
        Self {
            registry: Arc::new(registry),
            host,
            views,
            extractor: RequestExtractor::new(
                config.navigation.post_marker.clone(),
                config.navigation.stash_key.clone(),
            ),
            render: Arc::new(config.render.clone()),
            navigation: config.navigation.clone(),
            target: OnceLock::new(),
        }
    }

    pub fn registry(&self) -> &RouteRegistry {
        &self.registry
    }

    pub fn views(&self) -> &ViewLoader {
        &self.views
    }

    /// Verb and path a location routes to.
    ///
    /// The POST marker forces `POST` and the configured post path. Otherwise
    /// a form whose action equals the fragment and whose method is a known
    /// verb decides the verb.
    pub fn resolve(&self, location: &Location) -> (Verb, String) {
        if location.hash == self.navigation.post_marker {
            return (Verb::Post, self.navigation.post_path.clone());
        }

        let mut verb = Verb::Get;
        let mut path = self.path_or_default(location.fragment_path());

        if let Some(form) = self.host.document.form_for_action(&location.hash) {
            if let Some(method) = form.method.as_deref().and_then(|m| m.parse::<Verb>().ok()) {
                verb = method;
                if let Some(action) = form.action.as_deref().filter(|a| a.starts_with('#')) {
                    path = self.path_or_default(Location::from_hash(action).fragment_path());
                }
            }
        }

        (verb, path)
    }

    fn path_or_default(&self, path: &str) -> String {
        if path.is_empty() {
            self.navigation.default_path.clone()
        } else {
            path.to_string()
        }
    }

    fn target(&self) -> DispatchResult<Arc<dyn RenderTarget>> {
        if let Some(target) = self.target.get() {
            return Ok(target.clone());
        }

        let id = &self.render.element_id;
        match self.host.document.element(id) {
            Some(found) => Ok(self.target.get_or_init(|| found).clone()),
            None => {
                tracing::error!(element_id = %id, "No element with id found");
                Err(DispatchError::MissingRenderTarget(id.clone()))
            }
        }
    }

    /// Handle the current location end to end.
    pub async fn dispatch(&self) -> DispatchResult<DispatchOutcome> {
        Ok(self.prepare()?.render().await)
    }

    /// Resolving phase: everything up to and including the handler call.
    pub fn prepare(&self) -> DispatchResult<PendingRender> {
        let target = self.target()?;
        let location = self.host.navigation.location();
        let (verb, path) = self.resolve(&location);

        let nav_id = Uuid::new_v4();
        let span = tracing::info_span!("dispatch", nav_id = %nav_id, verb = %verb, path = %path);
        let entered = span.enter();

        let route = self.registry.find(verb, &path);
        let data = self.extractor.extract(
            &location,
            self.host.document.as_ref(),
            self.host.storage.as_ref(),
        );

        let step = match route {
            None => Step::Failed(DispatchError::RouteNotFound {
                verb,
                path: path.clone(),
            }),
            Some(route) => {
                tracing::debug!(pattern = %route.pattern, params = ?route.params, "Route matched");
                let handler = route.handler.as_ref();
                match guarded(|| handler.call(&route.params, &data)) {
                    Err(e) => Step::Failed(e.into()),
                    Ok(HandlerOutput::Literal(html)) => Step::Ready {
                        pattern: route.pattern,
                        html,
                    },
                    Ok(HandlerOutput::Deferred(future)) => Step::Awaiting {
                        pattern: route.pattern,
                        future,
                    },
                    Ok(HandlerOutput::ContinuationStyle) => {
                        let (next, rx) = Continuation::channel();
                        match guarded(|| handler.call_with_continuation(next, &route.params, &data)) {
                            Err(e) => Step::Failed(e.into()),
                            Ok(()) => Step::Awaiting {
                                pattern: route.pattern,
                                future: async move {
                                    rx.await.unwrap_or(Err(HandlerError::ContinuationDropped))
                                }
                                .boxed(),
                            },
                        }
                    }
                }
            }
        };

        drop(entered);
        Ok(PendingRender {
            verb,
            path,
            step,
            target,
            views: self.views.clone(),
            render: self.render.clone(),
            span,
            start: Instant::now(),
        })
    }

    /// Stash a form's fields and navigate to its action.
    ///
    /// Stands in for the browser's submit action on a same-page form.
    /// Returns false when the location did not change, in which case no
    /// navigation event fires and the stash is removed again.
    pub fn submit(&self, form: &FormSnapshot) -> bool {
        let storage = self.host.storage.as_ref();
        let key = self.extractor.stash_key();
        let fields = form::fields_of(form);
        form::stash(storage, key, &fields);

        let action = form
            .action
            .clone()
            .unwrap_or_else(|| self.host.navigation.location().hash);
        tracing::debug!(action = %action, fields = fields.len(), "Form submitted");

        if self.host.navigation.navigate(&action) {
            return true;
        }
        storage.remove(key);
        tracing::debug!(action = %action, "Location unchanged, stash discarded");
        false
    }

    /// Dispatch every navigation event until the channel closes or
    /// shutdown is signalled.
    ///
    /// Returns once every render it started has written its content.
    pub async fn run(
        &self,
        mut events: mpsc::UnboundedReceiver<NavigationEvent>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        tracing::info!("Dispatch loop started");
        let mut renders = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping dispatch loop");
                    break;
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        tracing::info!("Navigation source closed");
                        break;
                    };
                    self.accept(event, &mut renders);
                }
            }

            while let Some(finished) = renders.try_join_next() {
                log_join_failure(finished);
            }
        }

        while let Ok(event) = events.try_recv() {
            self.accept(event, &mut renders);
        }
        if !renders.is_empty() {
            tracing::debug!(pending = renders.len(), "Waiting for in-flight renders");
        }
        while let Some(finished) = renders.join_next().await {
            log_join_failure(finished);
        }
        tracing::info!("Dispatch loop stopped");
    }

    fn accept(&self, event: NavigationEvent, renders: &mut JoinSet<DispatchOutcome>) {
        tracing::debug!(event = ?event, "Navigation event");
        match self.prepare() {
            Ok(pending) => {
                renders.spawn(pending.render());
            }
            Err(e) => tracing::error!(error = %e, "Dispatch abandoned"),
        }
    }
}

fn log_join_failure(finished: Result<DispatchOutcome, tokio::task::JoinError>) {
    if let Err(e) = finished {
        tracing::error!(error = %e, "Render task failed");
    }
}

/// Run a synchronous handler entry point, turning a panic into an error.
fn guarded<T>(f: impl FnOnce() -> Result<T, HandlerError>) -> Result<T, HandlerError> {
    match catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => Err(HandlerError::Panicked(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

enum Step {
    Ready { pattern: String, html: String },
    Awaiting {
        pattern: String,
        future: BoxFuture<'static, Result<String, HandlerError>>,
    },
    Failed(DispatchError),
}

/// Rendering phase of a dispatch. Owns everything it needs, so it can be
/// spawned.
#[must_use = "nothing is rendered until the pending render is awaited"]
pub struct PendingRender {
    verb: Verb,
    path: String,
    step: Step,
    target: Arc<dyn RenderTarget>,
    views: ViewLoader,
    render: Arc<RenderConfig>,
    span: tracing::Span,
    start: Instant,
}

impl PendingRender {
    pub fn verb(&self) -> Verb {
        self.verb
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Await the handler's content and write it, or the not-found view.
    pub async fn render(self) -> DispatchOutcome {
        let span = self.span.clone();
        self.render_inner().instrument(span).await
    }

    async fn render_inner(self) -> DispatchOutcome {
        let Self {
            verb,
            path,
            step,
            target,
            views,
            render,
            start,
            ..
        } = self;

        let result = match step {
            Step::Ready { pattern, html } => Ok((pattern, html)),
            Step::Awaiting { pattern, future } => {
                match AssertUnwindSafe(future).catch_unwind().await {
                    Ok(Ok(html)) => Ok((pattern, html)),
                    Ok(Err(e)) => Err(DispatchError::from(e)),
                    Err(payload) => Err(HandlerError::Panicked(panic_message(payload.as_ref())).into()),
                }
            }
            Step::Failed(e) => Err(e),
        };

        let outcome = match result {
            Ok((pattern, html)) => {
                target.render(&html);
                tracing::debug!(pattern = %pattern, bytes = html.len(), "Rendered");
                DispatchOutcome::Rendered { verb, path, pattern }
            }
            Err(cause) => {
                match &cause {
                    DispatchError::RouteNotFound { .. } => tracing::warn!("No route matched"),
                    other => tracing::error!(error = %other, "Error rendering view"),
                }
                metrics::record_not_found(cause.kind());
                render_not_found(&views, &render, target.as_ref()).await;
                DispatchOutcome::NotFound { verb, path, cause }
            }
        };

        metrics::record_dispatch(verb.as_str(), outcome.label(), start);
        outcome
    }
}

async fn render_not_found(views: &ViewLoader, render: &RenderConfig, target: &dyn RenderTarget) {
    let html = match views.load(&render.not_found_view).await {
        Ok(content) if !content.is_empty() => content,
        Ok(_) => render.fallback_text.clone(),
        Err(e) => {
            tracing::warn!(error = %e, "Not-found view unavailable, using fallback text");
            render.fallback_text.clone()
        }
    };
    target.render(&html);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::handler::handler;
    use crate::host::{MemoryDocument, MemoryLocation, MemorySessionStore, MemoryTarget};
    use crate::view::StaticViews;

    fn dispatcher_at(hash: &str, doc: MemoryDocument) -> Dispatcher {
        let (location, _events) = MemoryLocation::new(Location::from_hash(hash));
        let host = Host {
            navigation: location,
            document: Arc::new(doc),
            storage: Arc::new(MemorySessionStore::new()),
        };
        let views = ViewLoader::new(Arc::new(StaticViews::new()));
        Dispatcher::new(RouteRegistry::new(), host, views, &RouterConfig::default())
    }

    #[test]
    fn test_resolve_empty_fragment_is_root() {
        let d = dispatcher_at("", MemoryDocument::new());
        assert_eq!(d.resolve(&Location::default()), (Verb::Get, "/".to_string()));
    }

    #[test]
    fn test_resolve_post_marker() {
        let d = dispatcher_at("", MemoryDocument::new());
        assert_eq!(
            d.resolve(&Location::from_hash("#post")),
            (Verb::Post, "post".to_string())
        );
    }

    #[test]
    fn test_resolve_form_method_override() {
        let doc = MemoryDocument::new();
        doc.add_form(FormSnapshot::new("#contact").method("put"));
        let d = dispatcher_at("", doc);

        assert_eq!(
            d.resolve(&Location::from_hash("#contact")),
            (Verb::Put, "contact".to_string())
        );
    }

    #[test]
    fn test_resolve_ignores_unknown_form_method() {
        let doc = MemoryDocument::new();
        doc.add_form(FormSnapshot::new("#contact").method("patch"));
        let d = dispatcher_at("", doc);

        assert_eq!(
            d.resolve(&Location::from_hash("#contact")),
            (Verb::Get, "contact".to_string())
        );
    }

    #[test]
    fn test_resolve_strips_fragment_query() {
        let d = dispatcher_at("", MemoryDocument::new());
        assert_eq!(
            d.resolve(&Location::from_hash("#search?q=x")),
            (Verb::Get, "search".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_render_target() {
        let d = dispatcher_at("#about", MemoryDocument::new());
        let err = d.dispatch().await.unwrap_err();
        assert!(matches!(err, DispatchError::MissingRenderTarget(id) if id == "view"));
    }

    #[tokio::test]
    async fn test_render_target_is_cached() {
        let target = Arc::new(MemoryTarget::new());
        let doc = MemoryDocument::new().with_element("view", target.clone());
        let (location, _events) = MemoryLocation::new(Location::default());
        let mut registry = RouteRegistry::new();
        registry
            .get("/", handler(|_, _| Ok(HandlerOutput::literal("home"))))
            .unwrap();
        let d = Dispatcher::new(
            registry,
            Host {
                navigation: location,
                document: Arc::new(doc),
                storage: Arc::new(MemorySessionStore::new()),
            },
            ViewLoader::new(Arc::new(StaticViews::new())),
            &RouterConfig::default(),
        );

        assert!(d.dispatch().await.unwrap().is_rendered());
        assert!(d.dispatch().await.unwrap().is_rendered());
        assert_eq!(target.writes(), 2);
    }

    #[test]
    fn test_submit_to_current_location_leaves_no_stash() {
        let (location, _events) = MemoryLocation::new(Location::from_hash("#post"));
        let storage = Arc::new(MemorySessionStore::new());
        let d = Dispatcher::new(
            RouteRegistry::new(),
            Host {
                navigation: location,
                document: Arc::new(MemoryDocument::new()),
                storage: storage.clone(),
            },
            ViewLoader::new(Arc::new(StaticViews::new())),
            &RouterConfig::default(),
        );

        let form = FormSnapshot::new("#post").field("name", "Ann");
        assert!(!d.submit(&form));
        assert!(storage.is_empty());
    }

    #[test]
    fn test_panic_message() {
        let err = guarded::<()>(|| panic!("kaboom"));
        assert!(matches!(err, Err(HandlerError::Panicked(msg)) if msg == "kaboom"));
    }
}
