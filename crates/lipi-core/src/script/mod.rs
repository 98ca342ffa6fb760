//! Script definitions, name resolution and the lazily filled registry.

mod data;
mod index;
mod registry;

pub use registry::ScriptRegistry;

pub(crate) use data::parse_script_toml;
pub(crate) use index::ScriptIndex;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::krama::{Category, KramaEntry};
use crate::trie::Trie;

/// Name of the baseline script written with the typing keys themselves.
pub const NORMAL: &str = "Normal";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScriptKind {
    Brahmic,
    Other,
}

/// A glyph that exists only in one script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecificChar {
    pub text: String,
    pub category: Category,
    /// Dependent form, for a svara that combines with a consonant.
    pub matra: Option<String>,
    pub inputs: Vec<String>,
}

/// What a trie key resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    Krama(usize),
    Shortcut(usize),
    Specific(usize),
    /// Dependent form of a specific svara.
    SpecificMatra(usize),
}

/// Every name the index resolves, grouped by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptListData {
    /// Canonical script names and their position in the index.
    pub scripts: BTreeMap<String, usize>,
    /// Language names and their position in the language list.
    pub langs: BTreeMap<String, usize>,
    pub lang_script_map: BTreeMap<String, String>,
    /// Lowercase aliases to script names.
    pub script_alternates_map: BTreeMap<String, String>,
}

/// Immutable, fully parsed data for one script.
pub struct ScriptDefinition {
    pub(crate) name: String,
    pub(crate) kind: ScriptKind,
    pub(crate) schwa_deletion: Option<bool>,
    pub(crate) schwa: Option<String>,
    pub(crate) input_keys: bool,
    pub(crate) trailing_marks: Vec<char>,
    /// Sorted.
    pub(crate) sign_chars: Vec<char>,
    pub(crate) krama: Vec<KramaEntry>,
    pub(crate) specific: Vec<SpecificChar>,
    /// Tokenizes text written in this script.
    pub(crate) text_trie: Trie<Symbol>,
    /// Tokenizes typed keys aimed at this script.
    pub(crate) typing_trie: Trie<Symbol>,
}

impl ScriptDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    pub fn is_brahmic(&self) -> bool {
        self.kind == ScriptKind::Brahmic
    }

    /// `Some` for Brahmic scripts, `None` otherwise.
    pub fn schwa_deletion(&self) -> Option<bool> {
        self.schwa_deletion
    }

    /// True when text in this script is spelled with the typing keys, which
    /// leaves it without a glyph inventory of its own.
    pub fn writes_input_keys(&self) -> bool {
        self.input_keys
    }

    pub fn krama(&self) -> &[KramaEntry] {
        &self.krama
    }

    pub fn specific(&self) -> &[SpecificChar] {
        &self.specific
    }

    pub(crate) fn text(&self, index: usize) -> &str {
        &self.krama[index].text
    }

    /// Inherent vowel written after a bare consonant. Empty for Brahmic scripts.
    pub(crate) fn schwa(&self) -> &str {
        self.schwa.as_deref().unwrap_or("")
    }

    /// True for a superscript that follows a consonant's vowel sign, halant
    /// or accent in writing (`கா²` is `க²` with `ா`).
    pub(crate) fn is_trailing_mark(&self, c: char) -> bool {
        self.trailing_marks.contains(&c)
    }

    /// Put each trailing mark back right after its consonant, ahead of the
    /// signs written between them, so the text tokenizes slot by slot.
    pub(crate) fn lift_trailing_marks(&self, chars: &mut [char]) {
        if self.trailing_marks.is_empty() {
            return;
        }
        let is_sign = |c: &char| self.sign_chars.binary_search(c).is_ok();
        for i in 1..chars.len() {
            if !self.is_trailing_mark(chars[i]) || !is_sign(&chars[i - 1]) {
                continue;
            }
            let mut start = i - 1;
            while start > 0 && is_sign(&chars[start - 1]) {
                start -= 1;
            }
            if start == 0 {
                continue;
            }
            let pair = [chars[start - 1], chars[i]];
            if matches!(self.text_trie.longest_match(&pair).matched, Some((2, _))) {
                chars[start..=i].rotate_right(1);
            }
        }
    }

    /// Longest key sequence accepted when typing into this script.
    pub fn max_typing_input_chars(&self) -> usize {
        self.typing_trie.max_key_chars()
    }
}

impl std::fmt::Debug for ScriptDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScriptDefinition")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("schwa_deletion", &self.schwa_deletion)
            .field("krama", &self.krama.len())
            .field("specific", &self.specific.len())
            .finish()
    }
}

/// Resolve a script, language or alias name to its canonical script name.
pub fn normalize_script_name(name: &str) -> crate::Result<String> {
    ScriptIndex::global()
        .normalize(name)
        .map(str::to_string)
        .ok_or_else(|| crate::LipiError::NotFound(name.to_string()))
}
