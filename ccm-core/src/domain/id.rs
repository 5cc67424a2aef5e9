//! Remote identifiers

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::str::FromStr;

/// Opaque identifier assigned by the task server
///
/// The server currently hands out integer ids, but the client treats them as
/// opaque: a JSON number or a JSON string is accepted and written back in the
/// same shape it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteId {
    Number(u64),
    Text(String),
}

impl std::fmt::Display for RemoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteId::Number(n) => write!(f, "{}", n),
            RemoteId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for RemoteId {
    type Err = Infallible;

    /// Numeric input becomes `Number`, anything else is kept as text
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.parse::<u64>() {
            Ok(n) => RemoteId::Number(n),
            Err(_) => RemoteId::Text(s.to_string()),
        })
    }
}

impl From<u64> for RemoteId {
    fn from(n: u64) -> Self {
        RemoteId::Number(n)
    }
}

impl From<&str> for RemoteId {
    fn from(s: &str) -> Self {
        RemoteId::Text(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_and_text_ids_keep_their_shape() {
        let n: RemoteId = serde_json::from_str("42").unwrap();
        assert_eq!(n, RemoteId::Number(42));
        assert_eq!(serde_json::to_string(&n).unwrap(), "42");

        let t: RemoteId = serde_json::from_str("\"task-7\"").unwrap();
        assert_eq!(t, RemoteId::Text("task-7".to_string()));
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"task-7\"");
    }

    #[test]
    fn test_parse_from_cli_input() {
        assert_eq!("17".parse::<RemoteId>().unwrap(), RemoteId::Number(17));
        assert_eq!(
            "abc".parse::<RemoteId>().unwrap(),
            RemoteId::Text("abc".to_string())
        );
        assert_eq!(RemoteId::Number(3).to_string(), "3");
    }
}
