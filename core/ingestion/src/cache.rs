use rootline_schemas::ExtractionResult;
use tracing::debug;

/// Single-slot memo for extraction results.
///
/// Holds at most one prior input/output pair, keyed on exact input
/// equality. The cache is owned by the caller: the service keeps one
/// behind a lock, library users may skip it entirely. Storing a different
/// input evicts the previous pair.
#[derive(Debug, Default)]
pub struct ExtractionCache {
    slot: Option<(String, ExtractionResult)>,
}

impl ExtractionCache {
    pub fn new() -> Self {
        Self { slot: None }
    }

    /// Return the cached result when `text` equals the stored input exactly.
    pub fn lookup(&self, text: &str) -> Option<&ExtractionResult> {
        match &self.slot {
            Some((input, result)) if input == text => {
                debug!("Extraction cache hit ({} records)", result.len());
                Some(result)
            }
            _ => None,
        }
    }

    /// Replace the slot with a new input/output pair.
    pub fn store(&mut self, text: &str, result: ExtractionResult) {
        self.slot = Some((text.to_string(), result));
    }

    /// Drop the cached pair, if any.
    pub fn clear(&mut self) {
        self.slot = None;
    }

    /// Whether the slot currently holds an entry.
    pub fn is_primed(&self) -> bool {
        self.slot.is_some()
    }
}
