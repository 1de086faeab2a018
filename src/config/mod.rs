//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GateServiceConfig (validated, immutable)
//!     → GateChain built from [[gates]]
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → new config sent to the server, which swaps its chain
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal configs
//! - Bad addresses or error codes inside a gate never reject the file;
//!   the gate degrades and logs instead
//! - Structural problems (bind address, gate names) are hard errors

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{GateConfig, GateServiceConfig, ListenerConfig, ObservabilityConfig, TimeoutConfig};
