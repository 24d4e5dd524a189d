//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::View;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Page shell settings shared by every view.
    pub app: PageConfig,

    /// Route definitions mapping paths to views, in match order.
    pub routes: Vec<RouteConfig>,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    pub security: SecurityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            app: PageConfig::default(),
            routes: RouteConfig::defaults(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Page shell configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PageConfig {
    /// Application title, appended to every page title.
    pub title: String,

    /// Client bundle loaded by every page, if any.
    pub script_src: Option<String>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            title: "Exercise Tracker".to_string(),
            script_src: Some("/packs/application.js".to_string()),
        }
    }
}

/// A single route: path pattern to view.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Path pattern (`/`, `/exercises`, `/docs/*`).
    pub path: String,

    /// View rendered when the pattern matches.
    pub view: View,

    #[serde(default)]
    pub case_sensitive: bool,
}

impl RouteConfig {
    pub fn new(path: impl Into<String>, view: View) -> Self {
        Self {
            path: path.into(),
            view,
            case_sensitive: false,
        }
    }

    /// The application's routes, in match order.
    pub fn defaults() -> Vec<RouteConfig> {
        vec![
            RouteConfig::new("/exercises", View::NewExercise),
            RouteConfig::new("/", View::Home),
        ]
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,

    /// Grace period for in-flight requests on shutdown, in seconds.
    pub shutdown_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            shutdown_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security response headers.
    pub enable_headers: bool,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.routes, RouteConfig::defaults());
        assert_eq!(config.app.title, "Exercise Tracker");
    }

    #[test]
    fn test_parse_routes() {
        let config: AppConfig = toml::from_str(
            r#"
            [app]
            title = "Gym Log"

            [[routes]]
            path = "/exercises"
            view = "new_exercise"
            case_sensitive = true

            [[routes]]
            path = "/"
            view = "home"
            "#,
        )
        .unwrap();

        assert_eq!(config.app.title, "Gym Log");
        assert_eq!(config.routes.len(), 2);
        assert_eq!(config.routes[0].view, View::NewExercise);
        assert!(config.routes[0].case_sensitive);
        assert_eq!(config.routes[1], RouteConfig::new("/", View::Home));
    }

    #[test]
    fn test_unknown_view_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [[routes]]
            path = "/"
            view = "dashboard"
            "#,
        );
        assert!(result.is_err());
    }
}
