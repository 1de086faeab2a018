//! Construction-time degradation signals.

use std::net::AddrParseError;

use thiserror::Error;

/// Problems found while building a gate.
///
/// None of these fail construction; the offending data is dropped and the
/// diagnostic is logged and kept on the gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateDiagnostic {
    /// An entry is not a valid IP address literal.
    #[error("address not valid for list, it will be ignored: {entry:?} ({reason})")]
    InvalidAddress {
        entry: String,
        reason: AddrParseError,
    },

    /// The address input is not a string or a sequence of strings.
    #[error("address list is not a list of strings ({found}), it will be ignored")]
    MalformedList { found: String },

    /// Neither a known error code nor a callback was supplied.
    #[error("invalid gate options, they are ignored: {options}")]
    OptionsDiscarded { options: String },
}
