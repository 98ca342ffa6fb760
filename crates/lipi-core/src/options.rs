//! Transliteration options: named, pair-scoped switches backed by rules.
//!
//! An option is valid for a (from, to) pair only when both scripts match its
//! filters. Rules rewrite the source token stream (`check_in = "input"`) or
//! the rendered pieces (`check_in = "output"`); options without rules are
//! flags the engine reads directly.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::Deserialize;

use crate::error::{LipiError, Result};
use crate::krama::KramaModel;
use crate::script::{ScriptDefinition, ScriptKind};

pub(crate) const OPTIONS_TOML: &str = include_str!("../data/options.toml");

const SOURCE_NAME: &str = "options.toml";

/// Caller-supplied option switches, keyed by option name.
pub type TransliterationOptions = HashMap<String, bool>;

/// Use the target script's typing keys (shortcuts, script-specific inputs)
/// when reading `Normal` text.
pub const USE_TYPING_CHARS: &str = "normal_to_all:use_typing_chars";
/// Write a source script's specific characters as their typing keys.
pub const PRESERVE_SPECIFIC_CHARS: &str = "all_to_normal:preserve_specific_chars";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum KindFilter {
    Brahmic,
    Other,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum CheckIn {
    #[default]
    Input,
    Output,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct OptionsFile {
    option: Vec<RawOption>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOption {
    name: String,
    /// Other spellings accepted for `name`.
    #[serde(default)]
    aliases: Vec<String>,
    from_kind: Option<KindFilter>,
    #[serde(default)]
    from_scripts: Vec<String>,
    to_kind: Option<KindFilter>,
    #[serde(default)]
    to_scripts: Vec<String>,
    #[serde(default)]
    check_in: CheckIn,
    #[serde(default, rename = "rule")]
    rules: Vec<RawRule>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
enum RawRule {
    ReplacePrev {
        prev: Vec<String>,
        following: Vec<String>,
        replace_with: Vec<String>,
    },
    DirectReplace {
        to_replace: Vec<Vec<String>>,
        replace_with: Vec<String>,
        #[serde(default)]
        append_text: String,
    },
}

/// A rewrite over krama indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Rule {
    /// Replace `prev` with `replace_with` when the next slot is in `following`.
    ReplacePrev {
        prev: Vec<usize>,
        following: Vec<usize>,
        replace_with: Vec<usize>,
    },
    /// Replace any of the `to_replace` runs with `replace_with`, followed
    /// by `append_text` when set. Text can only be appended to output.
    DirectReplace {
        to_replace: Vec<Vec<usize>>,
        replace_with: Vec<usize>,
        append_text: String,
    },
}

impl Rule {
    /// Length of the run matched at `i` and its replacement keys.
    pub fn match_at(&self, keys: &[Option<usize>], i: usize) -> Option<(usize, &[usize])> {
        let run_matches = |run: &[usize]| {
            keys.get(i..i + run.len())
                .is_some_and(|w| w.iter().zip(run).all(|(k, r)| *k == Some(*r)))
        };
        match self {
            Rule::ReplacePrev {
                prev,
                following,
                replace_with,
            } => {
                let next = keys.get(i + prev.len()).copied().flatten()?;
                (run_matches(prev) && following.contains(&next))
                    .then_some((prev.len(), replace_with.as_slice()))
            }
            Rule::DirectReplace {
                to_replace,
                replace_with,
                ..
            } => to_replace
                .iter()
                .find(|run| run_matches(run))
                .map(|run| (run.len(), replace_with.as_slice())),
        }
    }

    /// Literal text written after the replacement slots.
    pub fn append_text(&self) -> &str {
        match self {
            Rule::DirectReplace { append_text, .. } => append_text,
            Rule::ReplacePrev { .. } => "",
        }
    }
}

#[derive(Debug)]
struct ScriptFilter {
    kind: Option<KindFilter>,
    scripts: Vec<String>,
}

impl ScriptFilter {
    fn matches(&self, def: &ScriptDefinition) -> bool {
        if self.kind.is_none() && self.scripts.is_empty() {
            return true;
        }
        let by_kind = match self.kind {
            Some(KindFilter::All) => true,
            Some(KindFilter::Brahmic) => def.kind() == ScriptKind::Brahmic,
            Some(KindFilter::Other) => def.kind() == ScriptKind::Other,
            None => false,
        };
        by_kind || self.scripts.iter().any(|s| s == def.name())
    }
}

#[derive(Debug)]
pub(crate) struct OptionDef {
    pub name: String,
    aliases: Vec<String>,
    from: ScriptFilter,
    to: ScriptFilter,
    pub check_in: CheckIn,
    pub rules: Vec<Rule>,
}

impl OptionDef {
    fn applies(&self, from: &ScriptDefinition, to: &ScriptDefinition) -> bool {
        self.from.matches(from) && self.to.matches(to)
    }

    fn answers_to(&self, name: &str) -> bool {
        self.name == name || self.aliases.iter().any(|a| a == name)
    }

    /// The caller's switch for this option. The canonical name wins over
    /// an alias.
    fn switch(&self, options: &TransliterationOptions) -> bool {
        options
            .get(&self.name)
            .or_else(|| self.aliases.iter().find_map(|a| options.get(a)))
            .copied()
            .unwrap_or(false)
    }
}

pub(crate) struct OptionTable {
    options: Vec<OptionDef>,
}

impl OptionTable {
    pub fn global() -> &'static OptionTable {
        static INSTANCE: OnceLock<OptionTable> = OnceLock::new();
        INSTANCE.get_or_init(|| {
            parse_options_toml(OPTIONS_TOML, KramaModel::global())
                .expect("embedded option table must be valid")
        })
    }

    /// Sorted option names valid for the pair.
    pub fn names_for(&self, from: &ScriptDefinition, to: &ScriptDefinition) -> Vec<String> {
        let mut names: Vec<String> = self
            .options
            .iter()
            .filter(|o| o.applies(from, to))
            .map(|o| o.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Validate caller options for the pair and collect the enabled ones.
    pub fn resolve(
        &self,
        from: &ScriptDefinition,
        to: &ScriptDefinition,
        options: &TransliterationOptions,
    ) -> Result<ResolvedOptions<'_>> {
        for name in options.keys() {
            let known = self
                .options
                .iter()
                .any(|o| o.answers_to(name) && o.applies(from, to));
            if !known {
                return Err(LipiError::InvalidOption {
                    option: name.clone(),
                    from: from.name().to_string(),
                    to: to.name().to_string(),
                });
            }
        }

        let mut resolved = ResolvedOptions::default();
        for option in &self.options {
            if !option.switch(options) {
                continue;
            }
            match option.name.as_str() {
                USE_TYPING_CHARS => resolved.use_typing_chars = true,
                PRESERVE_SPECIFIC_CHARS => resolved.preserve_specific_chars = true,
                _ => {}
            }
            let target = match option.check_in {
                CheckIn::Input => &mut resolved.input_rules,
                CheckIn::Output => &mut resolved.output_rules,
            };
            target.extend(option.rules.iter());
        }
        Ok(resolved)
    }
}

/// Enabled options for one call, in table order.
#[derive(Debug, Default)]
pub(crate) struct ResolvedOptions<'a> {
    pub input_rules: Vec<&'a Rule>,
    pub output_rules: Vec<&'a Rule>,
    pub use_typing_chars: bool,
    pub preserve_specific_chars: bool,
}

pub(crate) fn parse_options_toml(toml_str: &str, model: &KramaModel) -> Result<OptionTable> {
    let file: OptionsFile =
        toml::from_str(toml_str).map_err(|e| LipiError::data(SOURCE_NAME, e.to_string()))?;

    let keys = |names: &[String]| -> Result<Vec<usize>> {
        names
            .iter()
            .map(|k| {
                model
                    .index_of(k)
                    .ok_or_else(|| LipiError::data(SOURCE_NAME, format!("unknown krama key: {k}")))
            })
            .collect()
    };

    let mut options: Vec<OptionDef> = Vec::with_capacity(file.option.len());
    for raw in file.option {
        if !raw.name.contains(':') {
            return Err(LipiError::data(
                SOURCE_NAME,
                format!("option name must be `scope:name`: {}", raw.name),
            ));
        }
        for name in std::iter::once(&raw.name).chain(&raw.aliases) {
            if options.iter().any(|o| o.answers_to(name)) {
                return Err(LipiError::data(
                    SOURCE_NAME,
                    format!("duplicate option: {name}"),
                ));
            }
        }
        let mut rules = Vec::with_capacity(raw.rules.len());
        for rule in &raw.rules {
            rules.push(match rule {
                RawRule::ReplacePrev {
                    prev,
                    following,
                    replace_with,
                } => {
                    if prev.is_empty() || following.is_empty() {
                        return Err(LipiError::data(
                            SOURCE_NAME,
                            format!("empty replace_prev rule in {}", raw.name),
                        ));
                    }
                    Rule::ReplacePrev {
                        prev: keys(prev)?,
                        following: keys(following)?,
                        replace_with: keys(replace_with)?,
                    }
                }
                RawRule::DirectReplace {
                    to_replace,
                    replace_with,
                    append_text,
                } => {
                    if to_replace.iter().any(|run| run.is_empty()) {
                        return Err(LipiError::data(
                            SOURCE_NAME,
                            format!("empty run in direct_replace rule of {}", raw.name),
                        ));
                    }
                    if !append_text.is_empty() && raw.check_in != CheckIn::Output {
                        return Err(LipiError::data(
                            SOURCE_NAME,
                            format!("append_text needs check_in = \"output\" in {}", raw.name),
                        ));
                    }
                    Rule::DirectReplace {
                        to_replace: to_replace
                            .iter()
                            .map(|run| keys(run))
                            .collect::<Result<_>>()?,
                        replace_with: keys(replace_with)?,
                        append_text: append_text.clone(),
                    }
                }
            });
        }
        options.push(OptionDef {
            name: raw.name,
            aliases: raw.aliases,
            from: ScriptFilter {
                kind: raw.from_kind,
                scripts: raw.from_scripts,
            },
            to: ScriptFilter {
                kind: raw.to_kind,
                scripts: raw.to_scripts,
            },
            check_in: raw.check_in,
            rules,
        });
    }
    Ok(OptionTable { options })
}
