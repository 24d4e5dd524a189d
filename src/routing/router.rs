//! Route lookup.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the first route matching a request path
//! - Return the matched route or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan over routes (the table is small)
//! - Explicit None rather than a silent default view

use serde::Serialize;
use thiserror::Error;

use crate::config::RouteConfig;
use crate::routing::matcher::{Matcher, PathMatcher};
use crate::routing::View;

/// Errors raised while compiling a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid route pattern '{pattern}': {reason}")]
    InvalidPattern {
        pattern: String,
        reason: &'static str,
    },

    #[error("route pattern '{pattern}' is declared more than once")]
    DuplicatePattern { pattern: String },

    #[error("route '{pattern}' can never match: '{shadowed_by}' is declared before it")]
    Unreachable {
        pattern: String,
        shadowed_by: String,
    },
}

/// A single path-to-view mapping.
#[derive(Debug, Clone, Serialize)]
pub struct Route {
    pub pattern: String,
    pub view: View,
    pub case_sensitive: bool,
    #[serde(skip)]
    matcher: PathMatcher,
}

impl Route {
    /// Compile a case-insensitive route.
    pub fn new(pattern: &str, view: View) -> Result<Self, RouteError> {
        Self::with_case(pattern, view, false)
    }

    pub fn with_case(pattern: &str, view: View, case_sensitive: bool) -> Result<Self, RouteError> {
        let matcher = PathMatcher::parse(pattern, case_sensitive)?;
        Ok(Self {
            pattern: matcher.to_string(),
            view,
            case_sensitive,
            matcher,
        })
    }

    /// Returns true if the request path selects this route.
    pub fn matches(&self, path: &str) -> bool {
        self.matcher.matches(path)
    }
}

/// Every route that an earlier route would always win over, with its position.
pub fn conflicts(routes: &[Route]) -> Vec<(usize, RouteError)> {
    let mut errors = Vec::new();
    for (i, route) in routes.iter().enumerate() {
        let Some(earlier) = routes[..i].iter().find(|e| e.matcher.covers(&route.matcher)) else {
            continue;
        };
        if route.matcher.covers(&earlier.matcher) {
            errors.push((
                i,
                RouteError::DuplicatePattern {
                    pattern: route.pattern.clone(),
                },
            ));
        } else {
            errors.push((
                i,
                RouteError::Unreachable {
                    pattern: route.pattern.clone(),
                    shadowed_by: earlier.pattern.clone(),
                },
            ));
        }
    }
    errors
}

/// Ordered, immutable route table. First match wins.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Build a table, rejecting routes that an earlier entry would always win over.
    pub fn new(routes: Vec<Route>) -> Result<Self, RouteError> {
        match conflicts(&routes).into_iter().next() {
            Some((_, err)) => Err(err),
            None => Ok(Self { routes }),
        }
    }

    /// Compile the table described by configuration.
    pub fn from_config(configs: &[RouteConfig]) -> Result<Self, RouteError> {
        let routes = configs
            .iter()
            .map(|c| Route::with_case(&c.path, c.view, c.case_sensitive))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(routes)
    }

    /// Find the first route matching `path`.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        self.routes.iter().find(|r| r.matches(path))
    }

    /// Routes in declaration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteTable {
    /// The application's route table: `/exercises` → NewExercise, `/` → Home.
    ///
    /// Panics if the built-in routes fail to compile.
    fn default() -> Self {
        Self::from_config(&RouteConfig::defaults()).expect("built-in routes must compile")
    }
}
