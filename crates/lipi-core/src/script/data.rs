use std::collections::HashMap;

use serde::Deserialize;

use super::{ScriptDefinition, ScriptKind, SpecificChar, Symbol};
use crate::error::{LipiError, Result};
use crate::krama::{Category, KramaEntry, KramaModel};
use crate::trie::TrieBuilder;

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScriptFile {
    name: String,
    kind: ScriptKind,
    schwa_deletion: Option<bool>,
    halant: Option<String>,
    nuqta: Option<String>,
    schwa: Option<String>,
    #[serde(default)]
    input_keys: bool,
    /// Slots typed into this script but never read back from its text.
    #[serde(default)]
    typing_only: Vec<String>,
    /// Marks written after a consonant's vowel sign, halant or accent.
    #[serde(default)]
    trailing_marks: Vec<String>,
    krama: HashMap<String, String>,
    /// Alternate spellings that read as the slot.
    #[serde(default)]
    duplicates: HashMap<String, Vec<String>>,
    #[serde(default)]
    specific: Vec<RawSpecific>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSpecific {
    text: String,
    category: Category,
    matra: Option<String>,
    #[serde(default)]
    inputs: Vec<String>,
}

/// Parse one script table against the krama model.
pub(crate) fn parse_script_toml(
    source_name: &str,
    toml_str: &str,
    model: &KramaModel,
) -> Result<ScriptDefinition> {
    let file: ScriptFile =
        toml::from_str(toml_str).map_err(|e| LipiError::data(source_name, e.to_string()))?;
    let err = |reason: String| LipiError::data(source_name, reason);

    for key in file
        .krama
        .keys()
        .chain(file.duplicates.keys())
        .chain(&file.typing_only)
    {
        if model.index_of(key).is_none() {
            return Err(err(format!("unknown krama key: {key}")));
        }
    }
    for (key, texts) in &file.duplicates {
        if texts.iter().any(|t| t.is_empty()) {
            return Err(err(format!("empty duplicate for {key}")));
        }
        if file.typing_only.contains(key) {
            return Err(err(format!("typing-only slot {key} cannot have duplicates")));
        }
    }
    let mut trailing_marks = Vec::with_capacity(file.trailing_marks.len());
    for mark in &file.trailing_marks {
        let mut it = mark.chars();
        match (it.next(), it.next()) {
            (Some(c), None) => trailing_marks.push(c),
            _ => return Err(err(format!("trailing mark must be one char: {mark:?}"))),
        }
    }
    if !trailing_marks.is_empty() && file.kind != ScriptKind::Brahmic {
        return Err(err("trailing_marks apply to brahmic scripts".into()));
    }

    match file.kind {
        ScriptKind::Brahmic => {
            if file.schwa_deletion.is_none() {
                return Err(err("brahmic script needs schwa_deletion".into()));
            }
            if file.schwa.is_some() || file.input_keys {
                return Err(err("schwa and input_keys apply to non-brahmic scripts".into()));
            }
            let halant = file.krama.get("halant");
            if halant.is_none() || halant != file.halant.as_ref() {
                return Err(err("halant must be set and match [krama].halant".into()));
            }
            if file.nuqta.is_some() && file.nuqta.as_ref() != file.krama.get("nuqta") {
                return Err(err("nuqta must match [krama].nuqta".into()));
            }
        }
        ScriptKind::Other => {
            if file.schwa_deletion.is_some() || file.halant.is_some() || file.nuqta.is_some() {
                return Err(err(
                    "schwa_deletion, halant and nuqta apply to brahmic scripts".into(),
                ));
            }
            if file.schwa.as_deref().map_or(true, str::is_empty) {
                return Err(err("non-brahmic script needs a schwa".into()));
            }
        }
    }

    let mut krama = Vec::with_capacity(model.len());
    for (i, key) in model.keys().iter().enumerate() {
        let text = match (file.kind, key.category, key.partner) {
            // Non-brahmic scripts write a vowel the same way in either position.
            (ScriptKind::Other, Category::Matra, Some(svara)) => file
                .krama
                .get(&model.key(svara).key)
                .cloned()
                .unwrap_or_default(),
            _ => file.krama.get(&key.key).cloned().unwrap_or_default(),
        };
        krama.push(KramaEntry {
            text,
            category: key.category,
            inputs: model.typing_inputs(i).to_vec(),
        });
    }

    let mut specific = Vec::with_capacity(file.specific.len());
    for raw in file.specific {
        if raw.text.is_empty() || raw.inputs.iter().any(|s| s.is_empty()) {
            return Err(err(format!("empty text or input in specific char {:?}", raw.text)));
        }
        if raw.matra.is_some() && raw.category != Category::Svara {
            return Err(err(format!("only a svara may carry a matra: {}", raw.text)));
        }
        specific.push(SpecificChar {
            text: raw.text,
            category: raw.category,
            matra: raw.matra,
            inputs: raw.inputs,
        });
    }

    let typing_only: Vec<usize> = file
        .typing_only
        .iter()
        .filter_map(|k| model.index_of(k))
        .collect();
    // Duplicates keyed by slot, in krama order so the first slot keeps a shared spelling.
    let mut duplicates: Vec<(usize, &Vec<String>)> = file
        .duplicates
        .iter()
        .filter_map(|(k, texts)| Some((model.index_of(k)?, texts)))
        .collect();
    duplicates.sort_by_key(|(i, _)| *i);

    let mut text_trie = TrieBuilder::new();
    for (i, entry) in krama.iter().enumerate() {
        if !typing_only.contains(&i) {
            text_trie.insert(&entry.text, Symbol::Krama(i));
        }
    }
    for (i, ch) in specific.iter().enumerate() {
        text_trie.insert(&ch.text, Symbol::Specific(i));
        if let Some(matra) = &ch.matra {
            text_trie.insert(matra, Symbol::SpecificMatra(i));
        }
    }
    for (i, texts) in &duplicates {
        for text in texts.iter() {
            text_trie.insert(text, Symbol::Krama(*i));
        }
    }
    if file.input_keys {
        insert_krama_inputs(&mut text_trie, model);
    }

    let sign_chars = if trailing_marks.is_empty() {
        Vec::new()
    } else {
        sign_chars(&krama, &duplicates, model)
    };

    let mut typing_trie = TrieBuilder::new();
    insert_krama_inputs(&mut typing_trie, model);
    for (i, shortcut) in model.shortcuts().iter().enumerate() {
        typing_trie.insert(&shortcut.input, Symbol::Shortcut(i));
    }
    for (i, ch) in specific.iter().enumerate() {
        for input in &ch.inputs {
            typing_trie.insert(input, Symbol::Specific(i));
        }
    }

    Ok(ScriptDefinition {
        name: file.name,
        kind: file.kind,
        schwa_deletion: file.schwa_deletion,
        schwa: file.schwa,
        input_keys: file.input_keys,
        trailing_marks,
        sign_chars,
        krama,
        specific,
        text_trie: text_trie.build(),
        typing_trie: typing_trie.build(),
    })
}

/// Chars that can stand between a consonant and its trailing mark: the
/// halant, single-char vowel signs, accents and the parts of split signs.
fn sign_chars(
    krama: &[KramaEntry],
    duplicates: &[(usize, &Vec<String>)],
    model: &KramaModel,
) -> Vec<char> {
    let is_sign = |i: usize| {
        i == model.halant() || model.key(i).category == Category::Matra || model.is_accent(i)
    };
    let mut chars: Vec<char> = krama
        .iter()
        .enumerate()
        .filter(|(i, e)| is_sign(*i) && e.text.chars().count() == 1)
        .flat_map(|(_, e)| e.text.chars())
        .collect();
    for (i, texts) in duplicates {
        if is_sign(*i) {
            chars.extend(texts.iter().flat_map(|t| t.chars()));
        }
    }
    chars.sort_unstable();
    chars.dedup();
    chars
}

fn insert_krama_inputs(trie: &mut TrieBuilder<Symbol>, model: &KramaModel) {
    for (i, key) in model.keys().iter().enumerate() {
        if key.category == Category::Matra {
            continue;
        }
        for input in &key.inputs {
            trie.insert(input, Symbol::Krama(i));
        }
    }
}
