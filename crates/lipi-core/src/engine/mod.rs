//! Whole-text transliteration and the typing-mode renderer.
//!
//! Source text is tokenized against a trie, input rules rewrite the token
//! stream, a renderer walks the tokens emitting target pieces, and output
//! rules rewrite the pieces before they are joined.

mod render;
mod tokenize;

pub use render::{Rendering, Segment};

use tracing::{debug, debug_span};

use crate::error::Result;
use crate::options::{OptionTable, TransliterationOptions};
use crate::script::{ScriptDefinition, ScriptRegistry, Symbol};
use crate::trie::Trie;
use render::{apply_output_rules, join, Flags, Renderer};
use tokenize::{apply_input_rules, tokenize};

/// Rendering switches that are not pair-scoped options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Write digits in the target script's own numerals.
    pub use_native_numerals: bool,
    /// Leave a trailing consonant with its inherent vowel instead of adding
    /// a halant.
    pub include_inherent_vowel: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            use_native_numerals: true,
            include_inherent_vowel: false,
        }
    }
}

/// Convert `text` from one script to another.
pub fn transliterate(
    registry: &ScriptRegistry,
    text: &str,
    from: &str,
    to: &str,
    options: &TransliterationOptions,
) -> Result<String> {
    transliterate_with(registry, text, from, to, options, RenderOptions::default())
}

/// [`transliterate`] with explicit rendering switches.
pub fn transliterate_with(
    registry: &ScriptRegistry,
    text: &str,
    from: &str,
    to: &str,
    options: &TransliterationOptions,
    render: RenderOptions,
) -> Result<String> {
    let from = registry.get(from)?;
    let to = registry.get(to)?;
    let resolved = OptionTable::global().resolve(&from, &to, options)?;

    let _span = debug_span!(
        "transliterate",
        from = from.name(),
        to = to.name(),
        chars = text.len()
    )
    .entered();

    if from.name() == to.name() {
        return Ok(text.to_string());
    }

    let mut chars: Vec<char> = text.chars().collect();
    from.lift_trailing_marks(&mut chars);
    let (trie, owner) = source_trie(&from, &to, resolved.use_typing_chars);
    let tokens = apply_input_rules(tokenize(&chars, trie), &resolved.input_rules);
    let flags = Flags {
        include_inherent_vowel: render.include_inherent_vowel,
        use_native_numerals: render.use_native_numerals,
        preserve_specific_chars: resolved.preserve_specific_chars,
        typing: false,
    };
    let output = Renderer::new(&from, &to, owner, flags, &chars).run(&tokens);
    let pieces = apply_output_rules(output.pieces, &resolved.output_rules, &to);

    debug!(
        tokens = tokens.len(),
        input_rules = resolved.input_rules.len(),
        output_rules = resolved.output_rules.len()
    );
    Ok(join(&pieces))
}

/// Option names valid for the pair, sorted.
pub fn get_all_options(registry: &ScriptRegistry, from: &str, to: &str) -> Result<Vec<String>> {
    let from = registry.get(from)?;
    let to = registry.get(to)?;
    Ok(OptionTable::global().names_for(&from, &to))
}

/// Render typed keys for `to`, recording where each key sequence landed in
/// the output. Typing into the source script itself copies the keys.
pub fn render_for_typing(
    from: &ScriptDefinition,
    to: &ScriptDefinition,
    raw: &[char],
    options: RenderOptions,
) -> Rendering {
    if from.name() == to.name() {
        return Rendering::identity(raw);
    }
    let (trie, owner) = source_trie(from, to, true);
    let tokens = tokenize(raw, trie);
    let flags = Flags {
        include_inherent_vowel: options.include_inherent_vowel,
        use_native_numerals: options.use_native_numerals,
        preserve_specific_chars: false,
        typing: true,
    };
    let output = Renderer::new(from, to, owner, flags, raw).run(&tokens);
    Rendering {
        text: join(&output.pieces),
        segments: output.segments,
        pending_at_end: output.pending_at_end,
    }
}

/// Trie that reads the source and the script owning its specific-char
/// indices. Typing keys resolve against the target's key map.
fn source_trie<'a>(
    from: &'a ScriptDefinition,
    to: &'a ScriptDefinition,
    typing: bool,
) -> (&'a Trie<Symbol>, &'a ScriptDefinition) {
    if typing && from.writes_input_keys() {
        (&to.typing_trie, to)
    } else {
        (&from.text_trie, from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LipiError;
    use crate::options::{PRESERVE_SPECIFIC_CHARS, USE_TYPING_CHARS};

    fn tr(text: &str, from: &str, to: &str) -> String {
        transliterate(
            ScriptRegistry::global(),
            text,
            from,
            to,
            &TransliterationOptions::new(),
        )
        .unwrap()
    }

    fn tr_opts(text: &str, from: &str, to: &str, opts: &[(&str, bool)]) -> String {
        let options: TransliterationOptions =
            opts.iter().map(|(k, v)| (k.to_string(), *v)).collect();
        transliterate(ScriptRegistry::global(), text, from, to, &options).unwrap()
    }

    #[test]
    fn normal_to_devanagari() {
        assert_eq!(tr("namaste", "Normal", "Devanagari"), "नमस्ते");
        assert_eq!(tr("bhArata", "Normal", "Devanagari"), "भारत");
        assert_eq!(tr("rAm", "Normal", "Devanagari"), "राम्");
    }

    #[test]
    fn alternate_inputs_read_as_the_same_slot() {
        assert_eq!(
            tr("bhaarata", "Normal", "Devanagari"),
            tr("bhArata", "Normal", "Devanagari")
        );
    }

    #[test]
    fn devanagari_to_normal_and_romanized() {
        assert_eq!(tr("नमस्ते", "Devanagari", "Normal"), "namastE");
        assert_eq!(tr("नमस्ते", "Devanagari", "Romanized"), "namastē");
        assert_eq!(tr("राम्", "Devanagari", "Normal"), "rAm");
    }

    #[test]
    fn brahmic_scripts_map_slot_for_slot() {
        assert_eq!(tr("नमस्ते", "Devanagari", "Telugu"), "నమస్తే");
        assert_eq!(tr("నమస్తే", "Telugu", "Devanagari"), "नमस्ते");
    }

    #[test]
    fn normal_round_trip_through_brahmic() {
        for word in ["namastE", "saMskRtam", "kRShNa", "gaNEsha"] {
            let dev = tr(word, "Normal", "Devanagari");
            assert_eq!(tr(&dev, "Devanagari", "Normal"), word, "via {dev}");
        }
    }

    #[test]
    fn unknown_chars_pass_through() {
        assert_eq!(tr("नमस्ते, दुनिया!", "Devanagari", "Telugu"), "నమస్తే, దునియా!");
        assert_eq!(tr("ka 42", "Normal", "Devanagari"), "क ४२");
    }

    #[test]
    fn same_script_is_identity() {
        assert_eq!(tr("अ ब क", "Devanagari", "hindi"), "अ ब क");
    }

    #[test]
    fn script_lacking_a_slot_keeps_source_text() {
        // Devanagari has no short e distinct from long E; Tamil keeps both.
        let tamil = tr("kempu", "Normal", "Tamil");
        assert_eq!(tr(&tamil, "Tamil", "Normal"), "kempu");
        // Tamil has no avagraha and no candrabindu.
        assert_eq!(tr("सोऽहम्", "Devanagari", "Tamil"), "ஸோऽஹம்");
        assert_eq!(tr("kaMM", "Normal", "Tamil"), "கMM");
    }

    #[test]
    fn tamil_ru_reads_as_consonant_and_u() {
        assert_eq!(tr("कुरु", "Devanagari", "Tamil"), "குரு");
        assert_eq!(tr("குரு", "Tamil", "Devanagari"), "कुरु");
        assert_eq!(tr("குரு", "Tamil", "Normal"), "kuru");
        // Written but never read back.
        assert_eq!(tr("kR", "Normal", "Tamil"), "கிரு");
        assert_eq!(tr("கிரு", "Tamil", "Normal"), "kiru");
    }

    #[test]
    fn decomposed_and_nukta_forms_read_as_one_slot() {
        let cases = [
            ("Tamil", "\u{0B95}\u{0BC6}\u{0BBE}", "\u{0B95}\u{0BCA}"),
            ("Tamil", "\u{0B95}\u{0BC6}\u{0BD7}", "\u{0B95}\u{0BCC}"),
            ("Malayalam", "\u{0D15}\u{0D47}\u{0D3E}", "\u{0D15}\u{0D4B}"),
            ("Malayalam", "\u{0D15}\u{0D57}", "\u{0D15}\u{0D4C}"),
            ("Bengali", "\u{0995}\u{09C7}\u{09BE}", "\u{0995}\u{09CB}"),
            ("Bengali", "\u{09DC}", "\u{09A1}\u{09BC}"),
            ("Odia", "\u{0B5C}", "\u{0B21}\u{0B3C}"),
            ("Kannada", "\u{0C95}\u{0CC6}\u{0CC2}", "\u{0C95}\u{0CCA}"),
            ("Kannada", "\u{0C95}\u{0CC6}\u{0CD6}", "\u{0C95}\u{0CC8}"),
            ("Telugu", "\u{0C15}\u{0C46}\u{0C56}", "\u{0C15}\u{0C48}"),
            ("Gurumukhi", "\u{0A59}", "\u{0A16}\u{0A3C}"),
            ("Devanagari", "\u{0958}", "\u{0915}\u{093C}"),
            ("Sinhala", "\u{0D9A}\u{0DD9}\u{0DCF}", "\u{0D9A}\u{0DDC}"),
        ];
        for (script, variant, canonical) in cases {
            assert_eq!(
                tr(variant, script, "Normal"),
                tr(canonical, script, "Normal"),
                "{script} {variant:?}"
            );
        }
        assert_eq!(tr("\u{0B95}\u{0BC6}\u{0BBE}", "Tamil", "Normal"), "ko");
        assert_eq!(tr("\u{0958}", "Devanagari", "Telugu"), "క఼");
    }

    #[test]
    fn tamil_extended_places_signs_before_superscripts() {
        assert_eq!(tr("kha", "Normal", "Tamil-Extended"), "க²");
        assert_eq!(tr("khA", "Normal", "Tamil-Extended"), "கா²");
        assert_eq!(tr("ghO", "Normal", "Tamil-Extended"), "கோ⁴");
        assert_eq!(tr("kh", "Normal", "Tamil-Extended"), "க்²");
        assert_eq!(tr("dharma", "Normal", "Tamil-Extended"), "த⁴ர்ம");
        assert_eq!(tr("gR", "Normal", "Tamil-Extended"), "கிரு²³");
        assert_eq!(tr("kha'", "Normal", "Tamil-Extended"), "க॑²");
    }

    #[test]
    fn tamil_extended_reads_superscripts_back() {
        assert_eq!(tr("கா²", "Tamil-Extended", "Devanagari"), "खा");
        assert_eq!(tr("க॑²", "Tamil-Extended", "Devanagari"), "ख॑");
        assert_eq!(tr("அம்²", "Tamil-Extended", "Devanagari"), "अं");
        // Decomposed vowel sign between consonant and superscript.
        assert_eq!(
            tr("\u{0B95}\u{0BC7}\u{0BBE}\u{2074}", "Tamil-Extended", "Devanagari"),
            "घो"
        );
        let text = tr("saMskRtam", "Normal", "Tamil-Extended");
        assert_eq!(text, "ஸம்²ஸ்கிரு²தம்");
        assert_eq!(tr(&text, "Tamil-Extended", "Normal"), "saMskRtam");
    }

    #[test]
    fn sinhala_basics_and_conjunct_joiner() {
        assert_eq!(tr("namastE", "Normal", "Sinhala"), "නමස්තේ");
        let opt = "all_to_sinhala:use_conjuct_enabling_halant";
        assert_eq!(tr("kSha", "Normal", "Sinhala"), "ක්ෂ");
        assert_eq!(tr_opts("kSha", "Normal", "Sinhala", &[(opt, true)]), "ක්\u{200D}ෂ");
        assert_eq!(
            tr_opts(
                "kSha",
                "Normal",
                "Sinhala",
                &[("all_to_sinhala:use_conjunct_enabling_halant", true)]
            ),
            "ක්\u{200D}ෂ"
        );
    }

    #[test]
    fn option_aliases_switch_the_same_rules() {
        let alias = "brahmic_to_brahmic:replace_pancham_varga_varna_with_anuvsvAra";
        assert_eq!(tr_opts("गङ्गा", "Devanagari", "Telugu", &[(alias, true)]), "గంగా");
        let alias = "all_to_normal:remove_virAma_and_double_virAma";
        assert_eq!(tr_opts("राम्।", "Devanagari", "Normal", &[(alias, true)]), "rAm");
    }

    #[test]
    fn pancham_varna_to_anusvara() {
        let opt = "brahmic_to_brahmic:replace_pancham_varga_varna_with_anusvara";
        assert_eq!(tr("गङ्गा", "Devanagari", "Telugu"), "గఙ్గా");
        assert_eq!(tr_opts("गङ्गा", "Devanagari", "Telugu", &[(opt, true)]), "గంగా");
        assert_eq!(tr_opts("गङ्गा", "Devanagari", "Telugu", &[(opt, false)]), "గఙ్గా");
    }

    #[test]
    fn pancham_varna_to_n() {
        let opt = "all_to_normal:replace_pancham_varga_varna_with_n";
        assert_eq!(tr("गङ्गा", "Devanagari", "Normal"), "gaGgA");
        assert_eq!(tr_opts("गङ्गा", "Devanagari", "Normal", &[(opt, true)]), "gangA");
    }

    #[test]
    fn virama_and_avagraha_options() {
        let text = "सोऽहम्।";
        assert_eq!(tr(text, "Devanagari", "Normal"), "sO.aham.");
        assert_eq!(
            tr_opts(
                text,
                "Devanagari",
                "Normal",
                &[
                    ("all_to_normal:remove_virama_and_double_virama", true),
                    ("all_to_normal:replace_avagraha_with_a", true),
                ]
            ),
            "sOaham"
        );
    }

    #[test]
    fn typing_chars_enable_shortcuts() {
        assert_eq!(tr("x", "Normal", "Devanagari"), "x");
        assert_eq!(
            tr_opts("x", "Normal", "Devanagari", &[(USE_TYPING_CHARS, true)]),
            "क्ष्"
        );
        assert_eq!(
            tr_opts("kO~phI", "Normal", "Devanagari", &[(USE_TYPING_CHARS, true)]),
            "कॉफी"
        );
    }

    #[test]
    fn specific_chars_preserved_as_keys() {
        assert_eq!(tr("कॉफी", "Devanagari", "Normal"), "kॉphI");
        assert_eq!(
            tr_opts("कॉफी", "Devanagari", "Normal", &[(PRESERVE_SPECIFIC_CHARS, true)]),
            "kO~phI"
        );
        let back = tr_opts("kO~phI", "Normal", "Devanagari", &[(USE_TYPING_CHARS, true)]);
        assert_eq!(back, "कॉफी");
    }

    #[test]
    fn inherent_vowel_and_numerals() {
        let registry = ScriptRegistry::global();
        let opts = TransliterationOptions::new();
        let keep = RenderOptions {
            use_native_numerals: false,
            include_inherent_vowel: true,
        };
        let out = transliterate_with(registry, "rAm 12", "Normal", "Devanagari", &opts, keep);
        assert_eq!(out.unwrap(), "राम 12");
    }

    #[test]
    fn errors() {
        let registry = ScriptRegistry::global();
        let opts = TransliterationOptions::new();
        assert_eq!(
            transliterate(registry, "x", "Klingon", "Devanagari", &opts).unwrap_err(),
            LipiError::NotFound("Klingon".into())
        );

        let mut bad = TransliterationOptions::new();
        bad.insert(USE_TYPING_CHARS.into(), true);
        let err = transliterate(registry, "x", "Devanagari", "Telugu", &bad).unwrap_err();
        assert!(matches!(err, LipiError::InvalidOption { .. }));

        // Options are checked even when no conversion happens.
        let err = transliterate(registry, "x", "Telugu", "Telugu", &bad).unwrap_err();
        assert!(matches!(err, LipiError::InvalidOption { .. }));
    }

    #[test]
    fn option_lists_per_pair() {
        let registry = ScriptRegistry::global();
        assert_eq!(
            get_all_options(registry, "Normal", "Telugu").unwrap(),
            [USE_TYPING_CHARS]
        );
        assert!(get_all_options(registry, "Tamil", "nope").is_err());
    }

    #[test]
    fn typing_render_records_segments() {
        let registry = ScriptRegistry::global();
        let normal = registry.get("Normal").unwrap();
        let dev = registry.get("Devanagari").unwrap();
        let raw: Vec<char> = "kak".chars().collect();
        let r = render_for_typing(&normal, &dev, &raw, RenderOptions::default());
        assert_eq!(r.text, "कक्");
        assert!(r.pending_at_end);
        assert_eq!(r.segments.len(), 3);
        assert!(r.segments[0].starts_with_consonant);
        assert!(!r.segments[1].neutral_before);
        assert_eq!(r.segments[2].output_start, 1);
    }

    #[test]
    fn typing_render_into_normal_copies_keys() {
        let registry = ScriptRegistry::global();
        let normal = registry.get("Normal").unwrap();
        let raw: Vec<char> = "ka".chars().collect();
        let r = render_for_typing(&normal, &normal, &raw, RenderOptions::default());
        assert_eq!(r.text, "ka");
        assert_eq!(r.segments.len(), 2);
    }
}
