//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every route pattern compiles
//! - Detect duplicate and unreachable routes
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::{conflicts, Route, RouteError};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("at least one route is required")]
    NoRoutes,

    #[error("routes[{index}]: {source}")]
    Route { index: usize, source: RouteError },

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Validate a deserialized configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    errors.extend(validate_routes(config));

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_routes(config: &AppConfig) -> Vec<ValidationError> {
    if config.routes.is_empty() {
        return vec![ValidationError::NoRoutes];
    }

    let mut errors = Vec::new();
    let mut compiled = Vec::new();
    for (index, rc) in config.routes.iter().enumerate() {
        match Route::with_case(&rc.path, rc.view, rc.case_sensitive) {
            Ok(route) => compiled.push((index, route)),
            Err(source) => errors.push(ValidationError::Route { index, source }),
        }
    }

    let routes: Vec<Route> = compiled.iter().map(|(_, r)| r.clone()).collect();
    for (position, source) in conflicts(&routes) {
        errors.push(ValidationError::Route {
            index: compiled[position].0,
            source,
        });
    }

    errors
}
