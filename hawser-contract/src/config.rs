use std::time::Duration;

use serde::Deserialize;
use url::Url;

/// Connection configuration for an Ethereum-compatible JSON-RPC endpoint.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ConnectionConf {
    /// HTTP connection details.
    Http {
        /// Fully qualified string to connect to.
        url: String,
    },
    /// Websocket connection details. Live log subscriptions require this
    /// flavour on most nodes.
    Ws {
        /// Fully qualified string to connect to.
        url: String,
    },
}

impl ConnectionConf {
    /// The configured endpoint, parsed.
    pub fn url(&self) -> Result<Url, url::ParseError> {
        match self {
            Self::Http { url } | Self::Ws { url } => url.parse(),
        }
    }
}

impl Default for ConnectionConf {
    fn default() -> Self {
        Self::Http {
            url: Default::default(),
        }
    }
}

/// Receipt-polling configuration for [`crate::wait_mined`].
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct TxPollConf {
    /// Milliseconds between receipt queries.
    pub poll_interval_ms: u64,
    /// Milliseconds before giving up on a pending transaction.
    pub timeout_ms: u64,
}

impl TxPollConf {
    /// Interval between receipt queries.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Deadline for a pending transaction.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for TxPollConf {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1_000,
            timeout_ms: 300_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connection_conf_deserializes_tagged() {
        let conf: ConnectionConf =
            serde_json::from_str(r#"{"type": "ws", "url": "wss://rpc.example/ws"}"#).unwrap();
        assert_eq!(
            conf,
            ConnectionConf::Ws {
                url: "wss://rpc.example/ws".into()
            }
        );
        assert_eq!(conf.url().unwrap().scheme(), "wss");
    }

    #[test]
    fn poll_conf_defaults_apply_per_field() {
        let conf: TxPollConf = serde_json::from_str(r#"{"pollIntervalMs": 250}"#).unwrap();
        assert_eq!(conf.poll_interval(), Duration::from_millis(250));
        assert_eq!(conf.timeout(), Duration::from_millis(300_000));
    }
}
