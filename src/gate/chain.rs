//! Ordered gate chains built from configuration.
//!
//! A chain is realised as nested gate middleware around an application
//! router, so every link's continuation is the rest of the chain.

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Router};

use crate::config::schema::GateConfig;
use crate::gate::{
    middleware::{admit_on_match, deny_on_match},
    AddressGate, GateMode, GateOptions, Verdict,
};

/// One gate applied with one polarity.
#[derive(Debug, Clone)]
pub struct ChainLink {
    pub mode: GateMode,
    pub gate: Arc<AddressGate>,
}

/// Gates evaluated in order; a request proceeds only if every link forwards it.
#[derive(Debug, Clone, Default)]
pub struct GateChain {
    links: Vec<ChainLink>,
}

impl GateChain {
    pub fn new(links: Vec<ChainLink>) -> Self {
        Self { links }
    }

    /// Build a chain from `[[gates]]` configuration entries.
    pub fn from_config(gates: &[GateConfig]) -> Self {
        let links = gates
            .iter()
            .map(|cfg| {
                let options = cfg
                    .error_code
                    .clone()
                    .map(|code| GateOptions::new().with_error_code(code));
                ChainLink {
                    mode: cfg.mode,
                    gate: Arc::new(AddressGate::named(&cfg.name, cfg.addresses.clone(), options)),
                }
            })
            .collect();
        Self { links }
    }

    pub fn push(&mut self, mode: GateMode, gate: Arc<AddressGate>) {
        self.links.push(ChainLink { mode, gate });
    }

    pub fn links(&self) -> &[ChainLink] {
        &self.links
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// First link that refuses `remote`, if any.
    ///
    /// Pure evaluation: denial handlers are not consulted.
    pub fn refusing_link(&self, remote: Option<&str>) -> Option<&ChainLink> {
        self.links
            .iter()
            .find(|link| link.gate.evaluate(link.mode, remote) == Verdict::Deny)
    }

    /// Wrap `app` so that the first link is the outermost layer.
    pub fn guard(&self, app: Router) -> Router {
        self.links.iter().rev().fold(app, |router, link| match link.mode {
            GateMode::Whitelist => router.layer(from_fn_with_state(link.gate.clone(), admit_on_match)),
            GateMode::Blacklist => router.layer(from_fn_with_state(link.gate.clone(), deny_on_match)),
        })
    }
}
