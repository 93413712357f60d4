/// Default maximum nesting depth limit.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Decode-time resource limits.
///
/// Limits are enforced deterministically and must not depend on background timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeLimits {
    /// Maximum total input length in bytes.
    pub max_input_bytes: usize,
    /// Maximum nesting depth of arrays, maps and tagged items.
    pub max_depth: usize,
}

impl DecodeLimits {
    /// Limits for inputs of at most `max_message_bytes` bytes, with the default depth.
    #[must_use]
    pub const fn for_bytes(max_message_bytes: usize) -> Self {
        Self {
            max_input_bytes: max_message_bytes,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Return a copy with a different depth limit.
    #[must_use]
    pub const fn with_max_depth(self, max_depth: usize) -> Self {
        Self {
            max_input_bytes: self.max_input_bytes,
            max_depth,
        }
    }
}

impl Default for DecodeLimits {
    fn default() -> Self {
        Self::for_bytes(usize::MAX)
    }
}
