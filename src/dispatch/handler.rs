//! Route handlers and their result variants.
//!
//! A handler returns one of three things:
//! - `Literal`: HTML written straight to the render target
//! - `Deferred`: a future resolving to HTML
//! - `ContinuationStyle`: the handler wants to be called again with a
//!   [`Continuation`] as its first argument and report through it
//!
//! Closures are adapted with [`handler`], [`deferred`] and
//! [`with_continuation`].

use std::fmt;
use std::future::Future;

use futures_util::future::BoxFuture;
use thiserror::Error;
use tokio::sync::oneshot;

use crate::request::RequestData;
use crate::routing::Params;
use crate::view::ViewError;

/// Errors a handler can report.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("{0}")]
    Message(String),

    #[error(transparent)]
    View(#[from] ViewError),

    #[error("handler panicked: {0}")]
    Panicked(String),

    #[error("continuation dropped without a result")]
    ContinuationDropped,

    #[error("handler does not accept a continuation")]
    NoContinuation,
}

impl HandlerError {
    pub fn msg(message: impl Into<String>) -> Self {
        HandlerError::Message(message.into())
    }
}

/// Future produced by a deferred handler.
pub type HandlerFuture = BoxFuture<'static, Result<String, HandlerError>>;

/// What a handler produced.
pub enum HandlerOutput {
    Literal(String),
    Deferred(HandlerFuture),
    ContinuationStyle,
}

impl HandlerOutput {
    pub fn literal(html: impl Into<String>) -> Self {
        HandlerOutput::Literal(html.into())
    }

    pub fn deferred<F>(future: F) -> Self
    where
        F: Future<Output = Result<String, HandlerError>> + Send + 'static,
    {
        HandlerOutput::Deferred(Box::pin(future))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            HandlerOutput::Literal(_) => "literal",
            HandlerOutput::Deferred(_) => "deferred",
            HandlerOutput::ContinuationStyle => "continuation",
        }
    }
}

impl fmt::Debug for HandlerOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerOutput::Literal(html) => f.debug_tuple("Literal").field(html).finish(),
            HandlerOutput::Deferred(_) => f.write_str("Deferred(..)"),
            HandlerOutput::ContinuationStyle => f.write_str("ContinuationStyle"),
        }
    }
}

/// One-shot callback handed to continuation-style handlers.
///
/// Dropping it without calling [`done`](Self::done) or
/// [`fail`](Self::fail) reports [`HandlerError::ContinuationDropped`].
#[derive(Debug)]
pub struct Continuation {
    tx: oneshot::Sender<Result<String, HandlerError>>,
}

impl Continuation {
    /// A continuation and the receiver its outcome arrives on.
    pub fn channel() -> (Self, oneshot::Receiver<Result<String, HandlerError>>) {
        let (tx, rx) = oneshot::channel();
        (Self { tx }, rx)
    }

    pub fn done(self, html: impl Into<String>) {
        self.complete(Ok(html.into()));
    }

    pub fn fail(self, err: impl Into<HandlerError>) {
        self.complete(Err(err.into()));
    }

    pub fn complete(self, result: Result<String, HandlerError>) {
        // The dispatcher may already be gone; nothing left to render into.
        let _ = self.tx.send(result);
    }
}

/// Behaviour bound to a route.
pub trait Handler: Send + Sync {
    fn call(&self, params: &Params, data: &RequestData) -> Result<HandlerOutput, HandlerError>;

    /// Second call for handlers that answered `ContinuationStyle`.
    fn call_with_continuation(
        &self,
        next: Continuation,
        _params: &Params,
        _data: &RequestData,
    ) -> Result<(), HandlerError> {
        next.fail(HandlerError::NoContinuation);
        Ok(())
    }
}

/// Adapter for closures returning a [`HandlerOutput`].
pub struct FnHandler<F>(F);

pub fn handler<F>(f: F) -> FnHandler<F>
where
    F: Fn(&Params, &RequestData) -> Result<HandlerOutput, HandlerError> + Send + Sync,
{
    FnHandler(f)
}

impl<F> Handler for FnHandler<F>
where
    F: Fn(&Params, &RequestData) -> Result<HandlerOutput, HandlerError> + Send + Sync,
{
    fn call(&self, params: &Params, data: &RequestData) -> Result<HandlerOutput, HandlerError> {
        (self.0)(params, data)
    }
}

/// Adapter for closures returning a future of HTML.
pub struct Deferred<F>(F);

pub fn deferred<F, Fut>(f: F) -> Deferred<F>
where
    F: Fn(&Params, &RequestData) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
{
    Deferred(f)
}

impl<F, Fut> Handler for Deferred<F>
where
    F: Fn(&Params, &RequestData) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, HandlerError>> + Send + 'static,
{
    fn call(&self, params: &Params, data: &RequestData) -> Result<HandlerOutput, HandlerError> {
        Ok(HandlerOutput::deferred((self.0)(params, data)))
    }
}

/// Adapter for closures written in the continuation style.
pub struct WithContinuation<F>(F);

pub fn with_continuation<F>(f: F) -> WithContinuation<F>
where
    F: Fn(Continuation, &Params, &RequestData) -> Result<(), HandlerError> + Send + Sync,
{
    WithContinuation(f)
}

impl<F> Handler for WithContinuation<F>
where
    F: Fn(Continuation, &Params, &RequestData) -> Result<(), HandlerError> + Send + Sync,
{
    fn call(&self, _params: &Params, _data: &RequestData) -> Result<HandlerOutput, HandlerError> {
        Ok(HandlerOutput::ContinuationStyle)
    }

    fn call_with_continuation(
        &self,
        next: Continuation,
        params: &Params,
        data: &RequestData,
    ) -> Result<(), HandlerError> {
        (self.0)(next, params, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_handler() {
        let h = handler(|params, _| Ok(HandlerOutput::literal(format!("id={}", params["id"]))));
        let mut params = Params::new();
        params.insert("id".into(), "42".into());

        match h.call(&params, &RequestData::default()).unwrap() {
            HandlerOutput::Literal(html) => assert_eq!(html, "id=42"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_deferred_handler() {
        let h = deferred(|_, _| async { Ok::<_, HandlerError>("<p>later</p>".to_string()) });
        match h.call(&Params::new(), &RequestData::default()).unwrap() {
            HandlerOutput::Deferred(fut) => assert_eq!(fut.await.unwrap(), "<p>later</p>"),
            other => panic!("unexpected output: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_continuation_handler() {
        let h = with_continuation(|next, _, data| {
            next.done(format!("q={}", data.query.get("q").cloned().unwrap_or_default()));
            Ok(())
        });
        let mut data = RequestData::default();
        data.query.insert("q".into(), "rust".into());

        let out = h.call(&Params::new(), &data).unwrap();
        assert_eq!(out.kind(), "continuation");

        let (next, rx) = Continuation::channel();
        h.call_with_continuation(next, &Params::new(), &data).unwrap();
        assert_eq!(rx.await.unwrap().unwrap(), "q=rust");
    }

    #[tokio::test]
    async fn test_dropped_continuation_closes_channel() {
        let (next, rx) = Continuation::channel();
        drop(next);
        assert!(rx.await.is_err());
    }

    #[tokio::test]
    async fn test_default_continuation_rejects() {
        let h = handler(|_, _| Ok(HandlerOutput::ContinuationStyle));
        let (next, rx) = Continuation::channel();
        h.call_with_continuation(next, &Params::new(), &RequestData::default())
            .unwrap();
        assert!(matches!(rx.await.unwrap(), Err(HandlerError::NoContinuation)));
    }
}
