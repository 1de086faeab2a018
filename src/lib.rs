//! Address-based allow/deny gates for axum services.
//!
//! ```no_run
//! use std::sync::Arc;
//! use axum::{middleware::from_fn_with_state, routing::get, Router};
//! use address_gate::gate::{middleware::admit_on_match, AddressGate, GateOptions};
//!
//! let office = Arc::new(AddressGate::new(
//!     ["10.0.0.1", "10.0.0.2"],
//!     Some(GateOptions::new().with_error_code(403u16)),
//! ));
//! let app: Router = Router::new()
//!     .route("/", get(|| async { "hello" }))
//!     .layer(from_fn_with_state(office, admit_on_match));
//! ```

pub mod config;
pub mod gate;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GateServiceConfig;
pub use gate::{AddressGate, GateChain, GateMode, GateOptions};
pub use http::GateServer;
pub use lifecycle::Shutdown;
