//! Per-script views of the krama: aligned data, the typing key map and the
//! schwa status.

use serde::Serialize;

use crate::error::{LipiError, Result};
use crate::krama::Category;
use crate::script::{ScriptDefinition, ScriptRegistry};

/// One glyph and the key sequences that type it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypingDataMapItem {
    pub text: String,
    pub category: Category,
    pub mappings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScriptTypingDataMap {
    pub common_krama_map: Vec<TypingDataMapItem>,
    pub script_specific_krama_map: Vec<TypingDataMapItem>,
}

/// The script's full krama array as `(text, category)`, aligned with the
/// model. Unmapped slots have empty text.
pub fn get_script_krama_data(
    registry: &ScriptRegistry,
    name: &str,
) -> Result<Vec<(String, Category)>> {
    let def = glyph_script(registry, name)?;
    Ok(def
        .krama()
        .iter()
        .map(|e| (e.text.clone(), e.category))
        .collect())
}

/// Which keys produce which glyphs when typing into the script.
pub fn get_script_typing_data_map(
    registry: &ScriptRegistry,
    name: &str,
) -> Result<ScriptTypingDataMap> {
    let def = glyph_script(registry, name)?;

    let mut common: Vec<TypingDataMapItem> = Vec::new();
    for entry in def.krama() {
        if entry.text.is_empty() || entry.inputs.is_empty() {
            continue;
        }
        match common
            .iter_mut()
            .find(|item| item.text == entry.text && item.category == entry.category)
        {
            Some(item) => {
                for input in &entry.inputs {
                    if !item.mappings.contains(input) {
                        item.mappings.push(input.clone());
                    }
                }
            }
            None => common.push(TypingDataMapItem {
                text: entry.text.clone(),
                category: entry.category,
                mappings: entry.inputs.clone(),
            }),
        }
    }

    let specific = def
        .specific()
        .iter()
        .filter(|ch| !ch.inputs.is_empty())
        .map(|ch| TypingDataMapItem {
            text: ch.text.clone(),
            category: ch.category,
            mappings: ch.inputs.clone(),
        })
        .collect();

    Ok(ScriptTypingDataMap {
        common_krama_map: common,
        script_specific_krama_map: specific,
    })
}

/// `Some(deletes_schwa)` for Brahmic scripts, `None` otherwise.
pub fn get_schwa_status_for_script(registry: &ScriptRegistry, name: &str) -> Result<Option<bool>> {
    Ok(registry.get(name)?.schwa_deletion())
}

/// Resolve a script that has a glyph inventory of its own.
fn glyph_script(
    registry: &ScriptRegistry,
    name: &str,
) -> Result<std::sync::Arc<ScriptDefinition>> {
    let def = registry.get(name)?;
    if def.writes_input_keys() {
        return Err(LipiError::UnsupportedScript(def.name().to_string()));
    }
    Ok(def)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::krama::KramaModel;

    #[test]
    fn krama_data_is_aligned_across_scripts() {
        let registry = ScriptRegistry::global();
        let model = KramaModel::global();
        let dev = get_script_krama_data(registry, "Devanagari").unwrap();
        for name in ["Telugu", "Tamil", "Bengali", "Malayalam", "Romanized"] {
            let other = get_script_krama_data(registry, name).unwrap();
            assert_eq!(other.len(), model.len());
            for (a, b) in dev.iter().zip(&other) {
                assert_eq!(a.1, b.1, "{name}");
            }
        }
        let k = model.index_of("k").unwrap();
        assert_eq!(dev[k], ("क".to_string(), Category::Vyanjana));
    }

    #[test]
    fn normal_has_no_glyph_inventory() {
        let registry = ScriptRegistry::global();
        assert_eq!(
            get_script_krama_data(registry, "Normal").unwrap_err(),
            LipiError::UnsupportedScript("Normal".into())
        );
        assert!(matches!(
            get_script_typing_data_map(registry, "english"),
            Err(LipiError::UnsupportedScript(_))
        ));
        assert!(matches!(
            get_script_krama_data(registry, "Klingon"),
            Err(LipiError::NotFound(_))
        ));
    }

    #[test]
    fn typing_map_merges_shared_glyphs() {
        let map = get_script_typing_data_map(ScriptRegistry::global(), "Devanagari").unwrap();
        let e: Vec<_> = map
            .common_krama_map
            .iter()
            .filter(|item| item.text == "ए")
            .collect();
        assert_eq!(e.len(), 1);
        assert_eq!(e[0].mappings, ["E", "e"]);

        let matra = map
            .common_krama_map
            .iter()
            .find(|item| item.text == "ा")
            .unwrap();
        assert_eq!(matra.category, Category::Matra);
        assert_eq!(matra.mappings, ["A", "aa"]);

        // The inherent-vowel matra has no glyph.
        assert!(map.common_krama_map.iter().all(|item| !item.text.is_empty()));
    }

    #[test]
    fn typing_map_lists_specific_chars_with_inputs() {
        let registry = ScriptRegistry::global();
        let dev = get_script_typing_data_map(registry, "Devanagari").unwrap();
        let texts: Vec<&str> = dev
            .script_specific_krama_map
            .iter()
            .map(|item| item.text.as_str())
            .collect();
        assert_eq!(texts, ["ऑ", "ऍ", "॰"]);

        // Tamil's number signs cannot be typed.
        let tamil = get_script_typing_data_map(registry, "Tamil").unwrap();
        assert!(tamil.script_specific_krama_map.iter().all(|i| !i.mappings.is_empty()));
    }

    #[test]
    fn schwa_status() {
        let registry = ScriptRegistry::global();
        assert_eq!(get_schwa_status_for_script(registry, "hi").unwrap(), Some(false));
        assert_eq!(get_schwa_status_for_script(registry, "Bengali").unwrap(), Some(true));
        assert_eq!(get_schwa_status_for_script(registry, "Normal").unwrap(), None);
        assert!(get_schwa_status_for_script(registry, "nope").is_err());
    }
}
