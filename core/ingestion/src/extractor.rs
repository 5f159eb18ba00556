use rootline_schemas::{ExtractionResult, PersonRecord};
use tracing::debug;

use crate::cache::ExtractionCache;

/// One line of record text, split into the leading fields of the
/// `<level> <TAG> <value>` convention.
///
/// A borrowed view over the input; the extractor never copies or mutates
/// the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordLine<'a> {
    pub raw: &'a str,
    pub level: Option<&'a str>,
    pub tag: Option<&'a str>,
    pub payload: Option<&'a str>,
}

impl<'a> RecordLine<'a> {
    /// Split a raw line into level, tag and payload on the single space
    /// separator. A line with fewer fields leaves the missing ones unset.
    /// Nothing is trimmed or repaired: leading whitespace or a doubled
    /// separator shows up as an empty or shifted field and the line will
    /// simply fail to classify.
    pub fn parse(raw: &'a str) -> Self {
        let mut fields = raw.splitn(3, ' ');
        Self {
            raw,
            level: fields.next(),
            tag: fields.next(),
            payload: fields.next(),
        }
    }

    /// Whether this line declares a display name: level `1` and tag `NAME`,
    /// by exact case-sensitive token equality. `1 NAMESAKE ...` or
    /// `2 NAME ...` are not name declarations.
    pub fn is_name_declaration(&self) -> bool {
        self.level == Some("1") && self.tag == Some("NAME")
    }
}

/// Record extractor: one lenient pass over line-oriented genealogy text.
///
/// Every line that declares a name inserts (or overwrites) an entry in the
/// result; every other line, well-formed or not, is ignored. Extraction
/// never fails, whatever the input looks like.
pub struct RecordExtractor;

impl Default for RecordExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract all person records from `text`.
    ///
    /// Input is split on `\n` with a trailing `\r` dropped per line, so LF
    /// and CRLF inputs behave identically. The result is built fresh per
    /// call; duplicate names collapse last-write-wins.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        let mut result = ExtractionResult::new();

        for raw in text.lines() {
            let line = RecordLine::parse(raw);
            if !line.is_name_declaration() {
                continue;
            }

            let Some(payload) = line.payload else {
                // Bare `1 NAME` with no value: nothing to record.
                continue;
            };

            let name = normalize_display_name(payload);
            if name.is_empty() {
                continue;
            }

            result.insert(name, PersonRecord::placeholder());
        }

        debug!(
            "Record extractor found {} distinct individuals",
            result.len()
        );

        result
    }

    /// Extract through a caller-owned cache: return the memoized result on
    /// an exact input match, otherwise extract and store. Observable
    /// extraction semantics are identical with or without the cache.
    pub fn extract_cached(&self, cache: &mut ExtractionCache, text: &str) -> ExtractionResult {
        if let Some(hit) = cache.lookup(text) {
            return hit.clone();
        }

        debug!("Extraction cache miss, scanning {} bytes", text.len());
        let result = self.extract(text);
        cache.store(text, result.clone());
        result
    }
}

/// Normalize a name payload into a display name.
///
/// The payload is split on whitespace; each token has `/` (the surname
/// delimiter of the source format) stripped from both of its ends; tokens
/// reduced to nothing are dropped; the survivors are rejoined with single
/// spaces. So `Marta /Majdan/` becomes `Marta Majdan`, a delimiter inside a
/// token (`Jan/Kowalski`) is preserved, and a payload of nothing but
/// delimiters normalizes to the empty string.
fn normalize_display_name(payload: &str) -> String {
    payload
        .split_whitespace()
        .map(|token| token.trim_matches('/'))
        .filter(|token| !token.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
