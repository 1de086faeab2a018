//! Address-based request gating.
//!
//! # Data Flow
//! ```text
//! Construction:
//!     AddressInput → list.rs (validate literals, drop bad entries)
//!     GateOptions  → options.rs (resolve Denial, discard invalid options)
//!     → AddressGate (immutable, shared via Arc)
//!
//! Per request:
//!     remote address (ConnectInfo) → is_member
//!     → admit_on_match / deny_on_match
//!     → Next::run  or  Denial::apply
//! ```
//!
//! # Design Decisions
//! - Construction never fails; bad input is dropped and logged
//! - Exact string membership, no subnet matching
//! - No per-request state; gates are read-only after construction

pub mod chain;
pub mod diagnostic;
pub mod list;
pub mod middleware;
pub mod options;

use std::fmt;

use axum::{extract::Request, middleware::Next, response::Response};
use serde::{Deserialize, Serialize};

use crate::observability::metrics;

pub use chain::GateChain;
pub use diagnostic::GateDiagnostic;
pub use list::{AddressInput, AddressList};
pub use options::{Denial, DenyHandler, ErrorCode, GateOptions};

const DEFAULT_GATE_NAME: &str = "gate";

/// Which polarity a gate is applied with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GateMode {
    /// Forward only listed addresses.
    #[serde(alias = "allow")]
    Whitelist,
    /// Forward only unlisted addresses.
    #[serde(alias = "deny")]
    Blacklist,
}

impl GateMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GateMode::Whitelist => "whitelist",
            GateMode::Blacklist => "blacklist",
        }
    }
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one gate for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Forward,
    Deny,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Forward => "forwarded",
            Verdict::Deny => "denied",
        }
    }
}

/// Allow/deny decision gate over a static address list.
#[derive(Debug)]
pub struct AddressGate {
    name: String,
    list: AddressList,
    denial: Denial,
    diagnostics: Vec<GateDiagnostic>,
}

impl AddressGate {
    /// Build a gate from raw addresses and optional options.
    ///
    /// Invalid entries and invalid options are dropped with a warning.
    pub fn new(addresses: impl Into<AddressInput>, options: Option<GateOptions>) -> Self {
        Self::named(DEFAULT_GATE_NAME, addresses, options)
    }

    /// Like [`AddressGate::new`], with a name used in logs and metrics.
    pub fn named(
        name: impl Into<String>,
        addresses: impl Into<AddressInput>,
        options: Option<GateOptions>,
    ) -> Self {
        let name = name.into();
        let (list, mut diagnostics) = AddressList::parse(addresses.into());
        let (denial, discarded) = Denial::resolve(options);
        diagnostics.extend(discarded);

        for diagnostic in &diagnostics {
            tracing::warn!(gate = %name, "{}", diagnostic);
        }

        tracing::debug!(
            gate = %name,
            entries = list.len(),
            denial = ?denial,
            "Address gate constructed"
        );

        Self {
            name,
            list,
            denial,
            diagnostics,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn list(&self) -> &AddressList {
        &self.list
    }

    pub fn denial(&self) -> &Denial {
        &self.denial
    }

    /// Problems found while constructing this gate.
    pub fn diagnostics(&self) -> &[GateDiagnostic] {
        &self.diagnostics
    }

    /// Exact string membership test against the sanitized list.
    pub fn is_member(&self, address: &str) -> bool {
        self.list.contains(address)
    }

    /// Decide whether a request from `remote` passes this gate in `mode`.
    ///
    /// A request without a remote address is never a member.
    pub fn evaluate(&self, mode: GateMode, remote: Option<&str>) -> Verdict {
        let matched = remote.is_some_and(|address| self.is_member(address));
        let verdict = match (mode, matched) {
            (GateMode::Whitelist, true) | (GateMode::Blacklist, false) => Verdict::Forward,
            (GateMode::Whitelist, false) | (GateMode::Blacklist, true) => Verdict::Deny,
        };

        tracing::debug!(
            gate = %self.name,
            mode = %mode,
            remote = remote.unwrap_or("<unknown>"),
            matched,
            verdict = verdict.as_str(),
            "Performing address-based filtering"
        );
        metrics::record_decision(&self.name, mode, verdict);

        verdict
    }

    /// Whitelist entry point: forward members, deny everyone else.
    pub async fn admit_on_match(&self, req: Request, next: Next) -> Response {
        self.run(GateMode::Whitelist, req, next).await
    }

    /// Blacklist entry point: deny members, forward everyone else.
    pub async fn deny_on_match(&self, req: Request, next: Next) -> Response {
        self.run(GateMode::Blacklist, req, next).await
    }

    /// Apply this gate's denial procedure.
    pub async fn deny(&self, req: Request, next: Next) -> Response {
        self.denial.apply(req, next).await
    }

    pub(crate) async fn run(&self, mode: GateMode, req: Request, next: Next) -> Response {
        let remote = middleware::remote_address(&req);
        match self.evaluate(mode, remote.as_deref()) {
            Verdict::Forward => next.run(req).await,
            Verdict::Deny => self.deny(req, next).await,
        }
    }
}
