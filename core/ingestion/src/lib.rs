pub mod cache;
pub mod extractor;
pub mod service;
pub mod upload;

pub use cache::ExtractionCache;
pub use extractor::{RecordExtractor, RecordLine};
pub use service::{router, AppState};
pub use upload::{decode_upload, ConfigError, ServiceConfig};
