//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (peer address captured as ConnectInfo)
//!     → TraceLayer → TimeoutLayer
//!     → live router (guarded app loaded from ArcSwap)
//!     → gate layers, first configured gate outermost
//!     → application router / fallback handler
//! ```

pub mod server;

pub use server::GateServer;
