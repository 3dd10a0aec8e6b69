use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE_MAX_CHARS: usize = 22;
pub const DEFAULT_BODY_MAX_CHARS: usize = 60;

/// Character budgets, counted in Unicode scalar values.
///
/// `body_max_chars` applies to the generated body only; the compliance
/// prefix and suffix are added on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextLimits {
    pub title_max_chars: usize,
    pub body_max_chars: usize,
}

impl Default for TextLimits {
    fn default() -> Self {
        Self {
            title_max_chars: DEFAULT_TITLE_MAX_CHARS,
            body_max_chars: DEFAULT_BODY_MAX_CHARS,
        }
    }
}
