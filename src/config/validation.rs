//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses and the admin prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Cassette paths are checked for existence only when loaded

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::ServerConfig;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("admin prefix {0:?} must start with '/' and not be '/'")]
    AdminPrefix(String),

    #[error("cassette path #{0} is empty")]
    EmptyCassettePath(usize),
}

pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let prefix = &config.admin.prefix;
    if config.admin.enabled && (!prefix.starts_with('/') || prefix == "/" || prefix.ends_with('/')) {
        errors.push(ValidationError::AdminPrefix(prefix.clone()));
    }

    for (i, path) in config.cassettes.paths.iter().enumerate() {
        if path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyCassettePath(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
