//! Exercise tracker web front.
//!
//! Maps request paths to application views through an ordered route table
//! and serves each view's HTML page.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod views;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteTable, View};
