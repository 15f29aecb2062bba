//! Route registration and lookup.
//!
//! # Responsibilities
//! - Store compiled routes per verb, in registration order
//! - Look up the handler for a (verb, path) pair
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Patterns compiled once at registration, never per lookup
//! - O(1) exact lookup first, independent of registration order
//! - O(n) pattern scan afterwards; first registered wins
//! - Re-registering a (verb, pattern) replaces the handler in place

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::dispatch::handler::Handler;
use crate::routing::pattern::{compile, CompiledPattern, Params, PatternError};
use crate::routing::verb::Verb;

/// A registered route.
pub struct RouteEntry {
    pattern: CompiledPattern,
    handler: Arc<dyn Handler>,
}

impl RouteEntry {
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("pattern", &self.pattern.as_str())
            .finish_non_exhaustive()
    }
}

/// Result of a successful lookup.
#[derive(Clone)]
pub struct RouteMatch {
    /// Pattern that matched, as registered.
    pub pattern: String,
    pub handler: Arc<dyn Handler>,
    pub params: Params,
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Default)]
struct VerbTable {
    entries: Vec<RouteEntry>,
    exact: HashMap<String, usize>,
}

impl VerbTable {
    fn insert(&mut self, pattern: CompiledPattern, handler: Arc<dyn Handler>) {
        match self.exact.get(pattern.as_str()) {
            Some(&idx) => self.entries[idx].handler = handler,
            None => {
                self.exact
                    .insert(pattern.as_str().to_string(), self.entries.len());
                self.entries.push(RouteEntry { pattern, handler });
            }
        }
    }

    fn find(&self, path: &str) -> Option<RouteMatch> {
        if let Some(&idx) = self.exact.get(path) {
            let entry = &self.entries[idx];
            return Some(RouteMatch {
                pattern: entry.pattern.as_str().to_string(),
                handler: entry.handler.clone(),
                params: Params::new(),
            });
        }

        self.entries.iter().find_map(|entry| {
            entry.pattern.matches(path).map(|params| RouteMatch {
                pattern: entry.pattern.as_str().to_string(),
                handler: entry.handler.clone(),
                params,
            })
        })
    }
}

/// Verb → pattern → handler table.
///
/// Built mutably at startup, then shared behind an `Arc` and only read.
#[derive(Debug, Default)]
pub struct RouteRegistry {
    tables: [VerbTable; 4],
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `verb` and `pattern`.
    pub fn register<H>(&mut self, verb: Verb, pattern: &str, handler: H) -> Result<(), PatternError>
    where
        H: Handler + 'static,
    {
        let compiled = compile(pattern)?;
        tracing::debug!(verb = %verb, pattern = %pattern, "Registering route");
        self.tables[verb.index()].insert(compiled, Arc::new(handler));
        Ok(())
    }

    pub fn get<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), PatternError> {
        self.register(Verb::Get, pattern, handler)
    }

    pub fn post<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), PatternError> {
        self.register(Verb::Post, pattern, handler)
    }

    pub fn put<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), PatternError> {
        self.register(Verb::Put, pattern, handler)
    }

    pub fn delete<H: Handler + 'static>(&mut self, pattern: &str, handler: H) -> Result<(), PatternError> {
        self.register(Verb::Delete, pattern, handler)
    }

    /// Find the route for `path` under `verb`.
    ///
    /// Exact pattern keys are tried first, then every pattern of the verb
    /// in registration order.
    pub fn find(&self, verb: Verb, path: &str) -> Option<RouteMatch> {
        self.tables[verb.index()].find(path)
    }

    /// Registered routes for `verb`, in registration order.
    pub fn routes(&self, verb: Verb) -> &[RouteEntry] {
        &self.tables[verb.index()].entries
    }

    /// Total number of registered routes across all verbs.
    pub fn len(&self) -> usize {
        self.tables.iter().map(|t| t.entries.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
