use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

use serde::Deserialize;

use super::ScriptListData;
use crate::error::{LipiError, Result};

pub(crate) const SCRIPTS_TOML: &str = include_str!("../../data/scripts.toml");

/// Embedded script tables, keyed by the `file` field of the index.
const SCRIPT_SOURCES: &[(&str, &str)] = &[
    ("normal.toml", include_str!("../../data/scripts/normal.toml")),
    ("romanized.toml", include_str!("../../data/scripts/romanized.toml")),
    ("devanagari.toml", include_str!("../../data/scripts/devanagari.toml")),
    ("bengali.toml", include_str!("../../data/scripts/bengali.toml")),
    ("gurumukhi.toml", include_str!("../../data/scripts/gurumukhi.toml")),
    ("gujarati.toml", include_str!("../../data/scripts/gujarati.toml")),
    ("odia.toml", include_str!("../../data/scripts/odia.toml")),
    ("tamil.toml", include_str!("../../data/scripts/tamil.toml")),
    (
        "tamil_extended.toml",
        include_str!("../../data/scripts/tamil_extended.toml"),
    ),
    ("telugu.toml", include_str!("../../data/scripts/telugu.toml")),
    ("kannada.toml", include_str!("../../data/scripts/kannada.toml")),
    ("malayalam.toml", include_str!("../../data/scripts/malayalam.toml")),
    ("sinhala.toml", include_str!("../../data/scripts/sinhala.toml")),
];

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct IndexFile {
    script: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct IndexEntry {
    pub name: String,
    pub file: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

/// Name table: canonical script names, language names and aliases.
pub(crate) struct ScriptIndex {
    entries: Vec<IndexEntry>,
    by_name: HashMap<String, usize>,
    by_language: HashMap<String, usize>,
    by_alias: HashMap<String, usize>,
}

impl ScriptIndex {
    pub fn global() -> &'static ScriptIndex {
        static INSTANCE: OnceLock<ScriptIndex> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            parse_index_toml(SCRIPTS_TOML).expect("embedded script index must be valid")
        })
    }

    /// Canonical names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Language names in index order, each listed once.
    pub fn languages(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for lang in self.entries.iter().flat_map(|e| &e.languages) {
            if !out.contains(&lang.as_str()) {
                out.push(lang.as_str());
            }
        }
        out
    }

    pub fn list_data(&self) -> ScriptListData {
        let scripts = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.name.clone(), i))
            .collect();
        let langs = self
            .languages()
            .into_iter()
            .enumerate()
            .map(|(i, l)| (l.to_string(), i))
            .collect();
        let mut lang_script_map = BTreeMap::new();
        let mut script_alternates_map = BTreeMap::new();
        for entry in &self.entries {
            for lang in &entry.languages {
                lang_script_map
                    .entry(lang.clone())
                    .or_insert_with(|| entry.name.clone());
            }
            for alias in &entry.aliases {
                script_alternates_map.insert(alias.to_lowercase(), entry.name.clone());
            }
        }
        ScriptListData {
            scripts,
            langs,
            lang_script_map,
            script_alternates_map,
        }
    }

    /// Case-insensitive lookup: canonical name, then language, then alias.
    pub fn normalize(&self, name: &str) -> Option<&str> {
        let titled = title_case(name);
        let idx = self
            .by_name
            .get(&titled)
            .or_else(|| self.by_language.get(&titled))
            .or_else(|| self.by_alias.get(&name.trim().to_lowercase()))?;
        Some(self.entries[*idx].name.as_str())
    }

    /// Embedded TOML source for a canonical script name.
    pub fn source(&self, canonical: &str) -> Option<(&str, &'static str)> {
        let entry = &self.entries[*self.by_name.get(canonical)?];
        SCRIPT_SOURCES
            .iter()
            .find(|(file, _)| *file == entry.file)
            .map(|(file, src)| (*file, *src))
    }
}

/// Uppercase the first letter and every letter after `-`, lowercase the rest.
fn title_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = true;
    for c in name.trim().chars() {
        if upper_next {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        upper_next = c == '-';
    }
    out
}

pub(crate) fn parse_index_toml(toml_str: &str) -> Result<ScriptIndex> {
    const SOURCE_NAME: &str = "scripts.toml";
    let file: IndexFile =
        toml::from_str(toml_str).map_err(|e| LipiError::data(SOURCE_NAME, e.to_string()))?;

    let mut by_name = HashMap::new();
    let mut by_language = HashMap::new();
    let mut by_alias = HashMap::new();
    for (i, entry) in file.script.iter().enumerate() {
        if title_case(&entry.name) != entry.name {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("script name must be title case: {}", entry.name),
            ));
        }
        if by_name.insert(entry.name.clone(), i).is_some() {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("duplicate script: {}", entry.name),
            ));
        }
        for lang in &entry.languages {
            by_language.insert(title_case(lang), i);
        }
        for alias in &entry.aliases {
            if by_alias.insert(alias.to_lowercase(), i).is_some() {
                return Err(LipiError::data(
                    SOURCE_NAME,
                    format!("alias used twice: {alias}"),
                ));
            }
        }
    }

    Ok(ScriptIndex {
        entries: file.script,
        by_name,
        by_language,
        by_alias,
    })
}
