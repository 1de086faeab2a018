//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses the service itself binds to
//! - Check gate names are present and unique
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Gate address lists and error codes are not checked here; gates
//!   degrade on their own and report diagnostics

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GateServiceConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address {0:?}")]
    BindAddress(String),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("gate #{0} has an empty name")]
    EmptyGateName(usize),

    #[error("duplicate gate name {0:?}")]
    DuplicateGateName(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &GateServiceConfig) -> Result<(), Vec<ValidationError>> {
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

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for (index, gate) in config.gates.iter().enumerate() {
        if gate.name.trim().is_empty() {
            errors.push(ValidationError::EmptyGateName(index));
        } else if !seen.insert(gate.name.as_str()) {
            errors.push(ValidationError::DuplicateGateName(gate.name.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
