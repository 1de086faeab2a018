//! Address list parsing and membership.
//!
//! # Design Decisions
//! - Entries are validated as IP literals but stored verbatim
//! - Membership is exact string equality (no CIDR, no canonicalisation)
//! - Bad input never fails construction; it is dropped and reported

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::gate::diagnostic::GateDiagnostic;

/// Raw address list input as supplied by the embedding application.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AddressInput {
    /// A single address, treated as a one-element list.
    Single(String),
    /// A sequence of addresses.
    List(Vec<String>),
    /// Anything that is not a string or a sequence of strings.
    Malformed(toml::Value),
}

impl Default for AddressInput {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl From<&str> for AddressInput {
    fn from(address: &str) -> Self {
        Self::Single(address.to_string())
    }
}

impl From<String> for AddressInput {
    fn from(address: String) -> Self {
        Self::Single(address)
    }
}

impl From<Vec<String>> for AddressInput {
    fn from(addresses: Vec<String>) -> Self {
        Self::List(addresses)
    }
}

impl From<Vec<&str>> for AddressInput {
    fn from(addresses: Vec<&str>) -> Self {
        Self::List(addresses.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for AddressInput {
    fn from(addresses: &[&str]) -> Self {
        Self::List(addresses.iter().map(|a| a.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for AddressInput {
    fn from(addresses: [&str; N]) -> Self {
        Self::List(addresses.iter().map(|a| a.to_string()).collect())
    }
}

/// Sanitized list of address literals.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    entries: Vec<String>,
}

impl AddressList {
    /// Build a list from raw input, returning the problems found along the way.
    pub fn parse(input: AddressInput) -> (Self, Vec<GateDiagnostic>) {
        let candidates = match input {
            AddressInput::Single(address) => vec![address],
            AddressInput::List(addresses) => addresses,
            AddressInput::Malformed(value) => {
                let diagnostic = GateDiagnostic::MalformedList {
                    found: value.type_str().to_string(),
                };
                return (Self::default(), vec![diagnostic]);
            }
        };

        let mut diagnostics = Vec::new();
        let entries = candidates
            .into_iter()
            .filter(|entry| match entry.parse::<IpAddr>() {
                Ok(_) => true,
                Err(reason) => {
                    diagnostics.push(GateDiagnostic::InvalidAddress {
                        entry: entry.clone(),
                        reason,
                    });
                    false
                }
            })
            .collect();

        (Self { entries }, diagnostics)
    }

    /// Returns true if `address` is exactly one of the stored entries.
    pub fn contains(&self, address: &str) -> bool {
        self.entries.iter().any(|entry| entry == address)
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_string_is_one_element_list() {
        let (list, diagnostics) = AddressList::parse("127.0.0.1".into());
        assert_eq!(list.entries(), ["127.0.0.1"]);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn invalid_entries_are_dropped_individually() {
        let (list, diagnostics) = AddressList::parse(["not-an-ip", "127.0.0.1", "300.1.1.1"].into());
        assert_eq!(list.entries(), ["127.0.0.1"]);
        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(
            &diagnostics[0],
            GateDiagnostic::InvalidAddress { entry, .. } if entry == "not-an-ip"
        ));
    }

    #[test]
    fn malformed_input_yields_empty_list() {
        let (list, diagnostics) = AddressList::parse(AddressInput::Malformed(toml::Value::Integer(42)));
        assert!(list.is_empty());
        assert!(matches!(
            diagnostics.as_slice(),
            [GateDiagnostic::MalformedList { found }] if found == "integer"
        ));
    }

    #[test]
    fn membership_is_exact_string_match() {
        let (list, _) = AddressList::parse(["::1", "0:0:0:0:0:0:0:2", "10.0.0.1"].into());
        assert!(list.contains("::1"));
        assert!(list.contains("0:0:0:0:0:0:0:2"));
        // Same address, different spelling
        assert!(!list.contains("::2"));
        assert!(!list.contains("0:0:0:0:0:0:0:1"));
        assert!(!list.contains("::ffff:10.0.0.1"));
        assert!(!list.contains("10.0.0.10"));
    }

    #[test]
    fn ipv6_literals_are_accepted() {
        let (list, diagnostics) = AddressList::parse(["fe80::1", "2001:db8::ff00:42:8329"].into());
        assert_eq!(list.len(), 2);
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn deserializes_single_list_and_malformed() {
        #[derive(Deserialize)]
        struct Doc {
            addresses: AddressInput,
        }

        let doc: Doc = toml::from_str(r#"addresses = "127.0.0.1""#).unwrap();
        assert_eq!(doc.addresses, AddressInput::Single("127.0.0.1".into()));

        let doc: Doc = toml::from_str(r#"addresses = ["127.0.0.1", "::1"]"#).unwrap();
        assert_eq!(doc.addresses, AddressInput::from(vec!["127.0.0.1", "::1"]));

        let doc: Doc = toml::from_str(r#"addresses = ["127.0.0.1", 7]"#).unwrap();
        assert!(matches!(doc.addresses, AddressInput::Malformed(_)));
    }
}
