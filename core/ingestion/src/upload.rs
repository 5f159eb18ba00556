use std::net::SocketAddr;
use thiserror::Error;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

pub const DEFAULT_PORT: u16 = 21960;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 2 * 1024 * 1024;

/// Decode an uploaded blob into text.
///
/// Decoding is lossy: invalid UTF-8 sequences become U+FFFD rather than
/// failing, and a single leading byte-order mark is dropped. Content is
/// treated as text no matter what the upload claimed to be; there is no
/// extension or encoding validation.
pub fn decode_upload(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid BIND_ADDR {value:?}: {source}")]
    InvalidBindAddr {
        value: String,
        source: std::net::AddrParseError,
    },
    #[error("invalid MAX_UPLOAD_BYTES {value:?}: {source}")]
    InvalidMaxUploadBytes {
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Service configuration, read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ServiceConfig {
    /// Read `BIND_ADDR` and `MAX_UPLOAD_BYTES`, falling back to defaults
    /// when unset. A variable that is set but unparsable is a startup
    /// error; the service refuses to run on a silently-misread config.
    pub fn from_env() -> Result<Self, ConfigError> {
        let bind_addr = std::env::var("BIND_ADDR").ok();
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES").ok();
        Self::from_values(bind_addr.as_deref(), max_upload_bytes.as_deref())
    }

    fn from_values(
        bind_addr: Option<&str>,
        max_upload_bytes: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = bind_addr {
            config.bind_addr = value.parse().map_err(|source| ConfigError::InvalidBindAddr {
                value: value.to_string(),
                source,
            })?;
        }

        if let Some(value) = max_upload_bytes {
            config.max_upload_bytes =
                value
                    .parse()
                    .map_err(|source| ConfigError::InvalidMaxUploadBytes {
                        value: value.to_string(),
                        source,
                    })?;
        }

        Ok(config)
    }
}
