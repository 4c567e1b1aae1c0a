use peg_common::CapturePosition;
use serde::{Deserialize, Serialize};

/// Per-parser settings.
///
/// Deserializes from partial documents: missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Record failure diagnostics. Turning this off gives a plain yes/no
    /// match with no error log.
    pub track_errors: bool,
    /// Longest input, in characters, the parser accepts.
    pub max_input_len: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            track_errors: true,
            max_input_len: CapturePosition::MAX_OFFSET,
        }
    }
}

impl ParserConfig {
    pub fn with_track_errors(mut self, track_errors: bool) -> Self {
        self.track_errors = track_errors;
        self
    }

    pub fn with_max_input_len(mut self, max_input_len: usize) -> Self {
        self.max_input_len = max_input_len;
        self
    }

    /// The input limit actually enforced: every offset must fit a capture.
    pub fn effective_max_input_len(&self) -> usize {
        self.max_input_len.min(CapturePosition::MAX_OFFSET)
    }
}
