//! Recipient set.
//!
//! # Responsibilities
//! - Parse the comma-separated recipient list once at startup
//! - Pre-compute the outbound `/bid` URI of every recipient
//! - Stay immutable afterwards so handlers can share it without locking
//!
//! Accepted entry forms:
//! - bare port: `8051` → `http://<default_host>:8051/bid`
//! - host and port: `bidder-1:8051` → `http://bidder-1:8051/bid`
//! - full URL: `http://10.0.0.7:9000/v2/bid` (used as given)

use std::fmt;
use std::sync::Arc;

use axum::http::Uri;
use thiserror::Error;
use url::Url;

use crate::config::schema::RecipientsConfig;

/// Errors raised while parsing the recipient list.
#[derive(Debug, Error)]
pub enum RecipientSetError {
    #[error("recipient entry #{position} is empty")]
    EmptyEntry { position: usize },

    #[error("recipient {entry:?} has an invalid port")]
    InvalidPort { entry: String },

    #[error("recipient {entry:?} is not a valid URL: {source}")]
    InvalidUrl {
        entry: String,
        #[source]
        source: url::ParseError,
    },

    #[error("recipient {entry:?} uses unsupported scheme {scheme:?}")]
    UnsupportedScheme { entry: String, scheme: String },

    #[error("recipient {entry:?} has no host")]
    MissingHost { entry: String },

    #[error("recipient {entry:?} cannot be used as a request URI: {source}")]
    InvalidUri {
        entry: String,
        #[source]
        source: axum::http::uri::InvalidUri,
    },
}

/// A single bidder endpoint.
#[derive(Debug, Clone)]
pub struct Recipient {
    index: usize,
    endpoint: Url,
    uri: Uri,
}

impl Recipient {
    /// Position in the configured list.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Full `/bid` URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Same endpoint, pre-parsed for the HTTP client.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }
}

impl fmt::Display for Recipient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint.as_str())
    }
}

/// Ordered, immutable list of recipients.
#[derive(Debug, Clone, Default)]
pub struct RecipientSet {
    recipients: Vec<Arc<Recipient>>,
}

impl RecipientSet {
    /// Build the set from the recipients section of the configuration.
    pub fn from_config(config: &RecipientsConfig) -> Result<Self, RecipientSetError> {
        Self::parse(&config.list, &config.default_host, &config.bid_path)
    }

    /// Parse a comma-separated recipient list.
    ///
    /// A blank list yields an empty set; blank entries inside a list are errors.
    pub fn parse(raw: &str, default_host: &str, bid_path: &str) -> Result<Self, RecipientSetError> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }

        let recipients = raw
            .split(',')
            .enumerate()
            .map(|(index, entry)| parse_entry(index, entry.trim(), default_host, bid_path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { recipients })
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Recipient>> {
        self.recipients.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Recipient>> {
        self.recipients.get(index)
    }
}

fn parse_entry(
    index: usize,
    entry: &str,
    default_host: &str,
    bid_path: &str,
) -> Result<Arc<Recipient>, RecipientSetError> {
    if entry.is_empty() {
        return Err(RecipientSetError::EmptyEntry { position: index + 1 });
    }

    let raw_url = if entry.bytes().all(|b| b.is_ascii_digit()) {
        let port = entry
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| RecipientSetError::InvalidPort { entry: entry.to_string() })?;
        format!("http://{default_host}:{port}")
    } else if entry.contains("://") {
        entry.to_string()
    } else {
        format!("http://{entry}")
    };

    let mut endpoint = Url::parse(&raw_url).map_err(|source| RecipientSetError::InvalidUrl {
        entry: entry.to_string(),
        source,
    })?;

    if endpoint.scheme() != "http" {
        return Err(RecipientSetError::UnsupportedScheme {
            entry: entry.to_string(),
            scheme: endpoint.scheme().to_string(),
        });
    }
    if endpoint.host_str().map_or(true, str::is_empty) {
        return Err(RecipientSetError::MissingHost { entry: entry.to_string() });
    }
    if endpoint.path() == "/" {
        endpoint.set_path(bid_path);
    }

    let uri = endpoint
        .as_str()
        .parse::<Uri>()
        .map_err(|source| RecipientSetError::InvalidUri {
            entry: entry.to_string(),
            source,
        })?;

    Ok(Arc::new(Recipient { index, endpoint, uri }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<RecipientSet, RecipientSetError> {
        RecipientSet::parse(raw, "localhost", "/bid")
    }

    #[test]
    fn test_bare_ports() {
        let set = parse("8051,8052, 8053").unwrap();
        let endpoints: Vec<String> = set.iter().map(|r| r.to_string()).collect();
        assert_eq!(
            endpoints,
            vec![
                "http://localhost:8051/bid",
                "http://localhost:8052/bid",
                "http://localhost:8053/bid",
            ]
        );
        assert_eq!(set.get(2).unwrap().index(), 2);
    }

    #[test]
    fn test_host_port_and_urls() {
        let set = parse("bidder-1:9000,http://10.0.0.7:9100/v2/bid").unwrap();
        assert_eq!(set.get(0).unwrap().endpoint().as_str(), "http://bidder-1:9000/bid");
        assert_eq!(set.get(1).unwrap().endpoint().as_str(), "http://10.0.0.7:9100/v2/bid");
        assert_eq!(set.get(1).unwrap().uri().path(), "/v2/bid");
    }

    #[test]
    fn test_blank_list_is_empty_set() {
        assert!(parse("").unwrap().is_empty());
        assert!(parse("   ").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_entries() {
        assert!(matches!(parse("8051,,8052"), Err(RecipientSetError::EmptyEntry { position: 2 })));
        assert!(matches!(parse("99999"), Err(RecipientSetError::InvalidPort { .. })));
        assert!(matches!(parse("0"), Err(RecipientSetError::InvalidPort { .. })));
        assert!(matches!(
            parse("https://secure:443"),
            Err(RecipientSetError::UnsupportedScheme { .. })
        ));
        assert!(matches!(parse("host:notaport"), Err(RecipientSetError::InvalidUrl { .. })));
    }
}
