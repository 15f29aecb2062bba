//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Split a pattern into literal runs and `:name` parameters
//! - Match a concrete path against the compiled form (anchored)
//! - Extract parameter values positionally, percent-decoded
//!
//! # Design Decisions
//! - A parameter is `:` followed by `[A-Za-z0-9_]+` and captures one or
//!   more non-slash characters
//! - Everything else is literal, including `.` and other characters that
//!   would be special in a regex
//! - No regex: a parameter followed by a literal in the same segment
//!   backtracks from the longest candidate, same result as a greedy capture

use std::collections::HashMap;

use thiserror::Error;

use crate::request::decode_component;

/// Extracted route parameters, keyed by name.
pub type Params = HashMap<String, String>;

/// Errors raised while compiling a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// The same `:name` appears twice in one pattern.
    #[error("duplicate parameter '{name}' in route pattern '{pattern}'")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Param(String),
}

/// A route pattern ready for matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledPattern {
    raw: String,
    tokens: Vec<Token>,
    param_names: Vec<String>,
}

impl CompiledPattern {
    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Parameter names in left-to-right order.
    pub fn param_names(&self) -> &[String] {
        &self.param_names
    }

    /// True when the pattern has no parameters, i.e. it is an exact string.
    pub fn is_static(&self) -> bool {
        self.param_names.is_empty()
    }

    /// Match `path` against the whole pattern.
    ///
    /// Returns the parameter map on success. The map has exactly one entry
    /// per parameter name.
    pub fn matches(&self, path: &str) -> Option<Params> {
        if path.is_empty() && self.raw == "/" {
            return Some(Params::new());
        }

        let mut captures = Vec::with_capacity(self.param_names.len());
        if !match_tokens(&self.tokens, path, &mut captures) {
            return None;
        }

        Some(
            self.param_names
                .iter()
                .cloned()
                .zip(captures.into_iter().map(decode_component))
                .collect(),
        )
    }
}

/// Compile a route pattern.
pub fn compile(pattern: &str) -> Result<CompiledPattern, PatternError> {
    let mut tokens = Vec::new();
    let mut param_names: Vec<String> = Vec::new();
    let mut literal = String::new();
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        if c != ':' {
            literal.push(c);
            continue;
        }

        let mut name = String::new();
        while let Some(&next) = chars.peek() {
            if !is_ident_char(next) {
                break;
            }
            name.push(next);
            chars.next();
        }

        // A bare ':' is an ordinary character.
        if name.is_empty() {
            literal.push(':');
            continue;
        }

        if param_names.contains(&name) {
            return Err(PatternError::DuplicateParam {
                pattern: pattern.to_string(),
                name,
            });
        }

        if !literal.is_empty() {
            tokens.push(Token::Literal(std::mem::take(&mut literal)));
        }
        param_names.push(name.clone());
        tokens.push(Token::Param(name));
    }

    if !literal.is_empty() {
        tokens.push(Token::Literal(literal));
    }

    Ok(CompiledPattern {
        raw: pattern.to_string(),
        tokens,
        param_names,
    })
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn match_tokens<'p>(tokens: &[Token], path: &'p str, captures: &mut Vec<&'p str>) -> bool {
    match tokens.split_first() {
        None => path.is_empty(),
        Some((Token::Literal(lit), rest)) => match path.strip_prefix(lit.as_str()) {
            Some(tail) => match_tokens(rest, tail, captures),
            None => false,
        },
        Some((Token::Param(_), rest)) => {
            let segment_end = path.find('/').unwrap_or(path.len());
            for end in (1..=segment_end).rev() {
                if !path.is_char_boundary(end) {
                    continue;
                }
                captures.push(&path[..end]);
                if match_tokens(rest, &path[end..], captures) {
                    return true;
                }
                captures.pop();
            }
            false
        }
    }
}
