//! Suffix edits between two renderings.

use serde::Serialize;

/// Remove `delete_count` chars from the end of the caller's buffer, then
/// append `insert_text`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypingDiff {
    pub delete_count: usize,
    pub insert_text: String,
}

impl TypingDiff {
    pub fn is_noop(&self) -> bool {
        self.delete_count == 0 && self.insert_text.is_empty()
    }

    /// Apply the edit to `buf`. Deleting past the start empties it.
    pub fn apply(&self, buf: &mut String) {
        let keep = buf.chars().count().saturating_sub(self.delete_count);
        let cut = buf.char_indices().nth(keep).map_or(buf.len(), |(i, _)| i);
        buf.truncate(cut);
        buf.push_str(&self.insert_text);
    }
}

/// Smallest suffix edit turning `old` into `new`, counted in chars.
pub fn compute_diff(old: &str, new: &str) -> TypingDiff {
    let mut common_bytes = 0;
    let mut common_chars = 0;
    for (a, b) in old.chars().zip(new.chars()) {
        if a != b {
            break;
        }
        common_bytes += a.len_utf8();
        common_chars += 1;
    }
    TypingDiff {
        delete_count: old.chars().count() - common_chars,
        insert_text: new[common_bytes..].to_string(),
    }
}
