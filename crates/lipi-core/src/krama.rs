//! The krama: one ordered list of phonetic slots shared by every script.
//!
//! Each script fills the same slots with its own glyphs, so index `i` in one
//! script corresponds to index `i` in every other. Conversion between two
//! scripts is a walk over aligned indices.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{LipiError, Result};

pub(crate) const KRAMA_TOML: &str = include_str!("../data/krama.toml");

const SOURCE_NAME: &str = "krama.toml";

/// Character class of a krama slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Signs, marks, digits and punctuation.
    Anya,
    /// Consonant.
    Vyanjana,
    /// Dependent vowel sign.
    Matra,
    /// Independent vowel.
    Svara,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Anya => "anya",
            Category::Vyanjana => "vyanjana",
            Category::Matra => "matra",
            Category::Svara => "svara",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot of a script's krama array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KramaEntry {
    /// Glyph text in the owning script; empty when the script lacks it.
    pub text: String,
    pub category: Category,
    /// Key sequences that type this slot. `inputs[0]` is canonical.
    pub inputs: Vec<String>,
}

/// A slot of the canonical model.
#[derive(Debug, Clone)]
pub struct KramaKey {
    pub key: String,
    pub category: Category,
    pub inputs: Vec<String>,
    /// The svara of a matra, or the matra of a svara.
    pub partner: Option<usize>,
    /// Vedic pitch mark.
    pub accent: bool,
}

/// A single typed sequence that expands to several slots (`x` -> `k`, `Sh`).
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub input: String,
    pub keys: Vec<usize>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct KramaFile {
    entry: Vec<RawKey>,
    #[serde(default)]
    shortcut: Vec<RawShortcut>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawKey {
    key: String,
    category: Category,
    #[serde(default)]
    inputs: Vec<String>,
    partner: Option<String>,
    #[serde(default)]
    accent: bool,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawShortcut {
    input: String,
    keys: Vec<String>,
}

pub struct KramaModel {
    keys: Vec<KramaKey>,
    index: HashMap<String, usize>,
    shortcuts: Vec<Shortcut>,
    halant: usize,
    nuqta: usize,
    a_svara: usize,
}

impl KramaModel {
    /// Get or initialize the global model from the embedded table.
    pub fn global() -> &'static KramaModel {
        static INSTANCE: OnceLock<KramaModel> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            parse_krama_toml(KRAMA_TOML).expect("embedded krama table must be valid")
        })
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[KramaKey] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> &KramaKey {
        &self.keys[index]
    }

    pub fn index_of(&self, key: &str) -> Option<usize> {
        self.index.get(key).copied()
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn halant(&self) -> usize {
        self.halant
    }

    pub fn nuqta(&self) -> usize {
        self.nuqta
    }

    /// The independent `a`, whose text doubles as the schwa marker.
    pub fn a_svara(&self) -> usize {
        self.a_svara
    }

    pub fn is_accent(&self, index: usize) -> bool {
        self.keys[index].accent
    }

    pub fn is_digit(&self, index: usize) -> bool {
        let key = &self.keys[index].key;
        !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit())
    }

    /// Inputs that type slot `index`; a matra is typed through its svara.
    pub fn typing_inputs(&self, index: usize) -> &[String] {
        let key = &self.keys[index];
        match (key.category, key.partner) {
            (Category::Matra, Some(svara)) => &self.keys[svara].inputs,
            _ => &key.inputs,
        }
    }
}

/// Parse and validate a krama table.
pub(crate) fn parse_krama_toml(toml_str: &str) -> Result<KramaModel> {
    let file: KramaFile =
        toml::from_str(toml_str).map_err(|e| LipiError::data(SOURCE_NAME, e.to_string()))?;
    if file.entry.is_empty() {
        return Err(LipiError::data(SOURCE_NAME, "[[entry]] list is empty"));
    }

    let mut index = HashMap::with_capacity(file.entry.len());
    for (i, raw) in file.entry.iter().enumerate() {
        if index.insert(raw.key.clone(), i).is_some() {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("duplicate key: {}", raw.key),
            ));
        }
    }

    let mut keys = Vec::with_capacity(file.entry.len());
    for raw in &file.entry {
        if raw.inputs.iter().any(|s| s.is_empty()) {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("empty input for key: {}", raw.key),
            ));
        }
        let partner = match &raw.partner {
            Some(p) => Some(*index.get(p).ok_or_else(|| {
                LipiError::data(SOURCE_NAME, format!("unknown partner {p} for {}", raw.key))
            })?),
            None => None,
        };
        if raw.category == Category::Matra && !raw.inputs.is_empty() {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("matra {} must be typed through its svara", raw.key),
            ));
        }
        keys.push(KramaKey {
            key: raw.key.clone(),
            category: raw.category,
            inputs: raw.inputs.clone(),
            partner,
            accent: raw.accent,
        });
    }

    for (i, key) in keys.iter().enumerate() {
        let expected = match key.category {
            Category::Svara => Some(Category::Matra),
            Category::Matra => Some(Category::Svara),
            _ => None,
        };
        match (expected, key.partner) {
            (Some(want), Some(p)) => {
                if keys[p].category != want || keys[p].partner != Some(i) {
                    return Err(LipiError::data(
                        SOURCE_NAME,
                        format!("partner of {} is not reciprocal", key.key),
                    ));
                }
            }
            (Some(_), None) => {
                return Err(LipiError::data(
                    SOURCE_NAME,
                    format!("{} needs a partner", key.key),
                ));
            }
            (None, Some(_)) => {
                return Err(LipiError::data(
                    SOURCE_NAME,
                    format!("{} cannot have a partner", key.key),
                ));
            }
            (None, None) => {}
        }
    }

    let mut shortcuts = Vec::with_capacity(file.shortcut.len());
    for raw in file.shortcut {
        if raw.input.is_empty() || raw.keys.is_empty() {
            return Err(LipiError::data(SOURCE_NAME, "shortcut needs input and keys"));
        }
        let keys = raw
            .keys
            .iter()
            .map(|k| {
                index.get(k).copied().ok_or_else(|| {
                    LipiError::data(SOURCE_NAME, format!("unknown key {k} in shortcut"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        shortcuts.push(Shortcut {
            input: raw.input,
            keys,
        });
    }

    let required = |name: &str| {
        index
            .get(name)
            .copied()
            .ok_or_else(|| LipiError::data(SOURCE_NAME, format!("missing key: {name}")))
    };
    let halant = required("halant")?;
    let nuqta = required("nuqta")?;
    let a_svara = required("a-svara")?;

    Ok(KramaModel {
        keys,
        index,
        shortcuts,
        halant,
        nuqta,
        a_svara,
    })
}
