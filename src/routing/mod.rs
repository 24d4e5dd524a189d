//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered route lookup)
//!     → matcher.rs (evaluate path pattern)
//!     → Return: matched Route (and its View) or None
//!
//! Route Compilation (at startup and on reload):
//!     RouteConfig[]
//!     → Normalize patterns
//!     → Compile matchers (exact or catch-all)
//!     → Reject duplicates and unreachable routes
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled up front, immutable afterwards
//! - No regex (static segments and trailing splat only)
//! - First match wins, in declaration order

pub mod matcher;
pub mod router;

pub use matcher::{decode_path, normalize_path, Matcher, PathMatcher};
pub use router::{conflicts, Route, RouteError, RouteTable};

use serde::{Deserialize, Serialize};
use std::fmt;

/// A renderable page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum View {
    Home,
    NewExercise,
}

impl View {
    /// Stable identifier used in markup, logs and metric labels.
    pub fn slug(&self) -> &'static str {
        match self {
            View::Home => "home",
            View::NewExercise => "new-exercise",
        }
    }

    /// Human-readable page title.
    pub fn title(&self) -> &'static str {
        match self {
            View::Home => "Home",
            View::NewExercise => "New Exercise",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}
