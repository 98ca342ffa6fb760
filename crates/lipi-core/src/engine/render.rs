use super::tokenize::{Token, TokenKind};
use crate::krama::{Category, KramaModel};
use crate::options::Rule;
use crate::script::{ScriptDefinition, Symbol};

/// How consonants interact with their neighbours for a script pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Slot-for-slot copy.
    Direct,
    /// A consonant waits for the next slot to pick a matra or a halant.
    ToBrahmic,
    /// A consonant waits for the next slot to decide whether the schwa is
    /// written out.
    FromBrahmic,
}

impl Mode {
    pub fn for_pair(from: &ScriptDefinition, to: &ScriptDefinition) -> Self {
        match (from.is_brahmic(), to.is_brahmic()) {
            (false, true) => Mode::ToBrahmic,
            (true, false) => Mode::FromBrahmic,
            _ => Mode::Direct,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Flags {
    pub include_inherent_vowel: bool,
    pub use_native_numerals: bool,
    pub preserve_specific_chars: bool,
    /// Output feeds a typing window. A sign typed after a finished syllable
    /// stays where it was typed instead of moving ahead of a trailing mark.
    pub typing: bool,
}

/// A run of emitted text and the target slot it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Piece {
    pub krama: Option<usize>,
    pub text: String,
}

/// Output attributed to one source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    /// Source char span of the token.
    pub raw_start: usize,
    pub raw_end: usize,
    /// Output char offset where this token's text begins. A halant or
    /// schwa that closes the previous consonant lies before it.
    pub output_start: usize,
    /// No consonant was waiting on this token.
    pub neutral_before: bool,
    pub starts_with_consonant: bool,
    /// More input could still change this token.
    pub open: bool,
}

/// Typing-mode output with per-token bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendering {
    pub text: String,
    pub segments: Vec<Segment>,
    /// The last token left a consonant waiting on the next key.
    pub pending_at_end: bool,
}

impl Rendering {
    /// Each source char copied to the output unchanged.
    pub(crate) fn identity(raw: &[char]) -> Self {
        Rendering {
            text: raw.iter().collect(),
            segments: (0..raw.len())
                .map(|i| Segment {
                    raw_start: i,
                    raw_end: i + 1,
                    output_start: i,
                    neutral_before: true,
                    starts_with_consonant: false,
                    open: false,
                })
                .collect(),
            pending_at_end: false,
        }
    }
}

pub(crate) struct Output {
    pub pieces: Vec<Piece>,
    pub segments: Vec<Segment>,
    pub pending_at_end: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Krama(usize),
    Specific(usize),
    SpecificMatra(usize),
    Literal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Svara,
    Matra,
    Vyanjana,
    Halant,
    Nuqta,
    Other,
}

pub(crate) struct Renderer<'a> {
    model: &'a KramaModel,
    from: &'a ScriptDefinition,
    to: &'a ScriptDefinition,
    /// Owner of `Symbol::Specific` indices in the token stream.
    specific_owner: &'a ScriptDefinition,
    mode: Mode,
    flags: Flags,
    chars: &'a [char],
    pieces: Vec<Piece>,
    out_chars: usize,
    pending: bool,
}

impl<'a> Renderer<'a> {
    pub fn new(
        from: &'a ScriptDefinition,
        to: &'a ScriptDefinition,
        specific_owner: &'a ScriptDefinition,
        flags: Flags,
        chars: &'a [char],
    ) -> Self {
        Self {
            model: KramaModel::global(),
            from,
            to,
            specific_owner,
            mode: Mode::for_pair(from, to),
            flags,
            chars,
            pieces: Vec::new(),
            out_chars: 0,
            pending: false,
        }
    }

    pub fn run(mut self, tokens: &[Token]) -> Output {
        let mut segments = Vec::with_capacity(tokens.len());
        for token in tokens {
            let (first, rest) = self.units(token);
            let single = rest.is_empty();

            let neutral_before = !self.pending;
            let class = self.class(first);
            let absorbed = self.resolve_pending(class);
            segments.push(Segment {
                raw_start: token.start,
                raw_end: token.end,
                output_start: self.out_chars,
                neutral_before,
                starts_with_consonant: class == Class::Vyanjana,
                open: token.open,
            });
            self.emit(first, token, absorbed, single);

            for &key in rest {
                let unit = Unit::Krama(key);
                let absorbed = self.resolve_pending(self.class(unit));
                self.emit(unit, token, absorbed, false);
            }
        }

        let pending_at_end = self.pending;
        self.finish();
        Output {
            pieces: self.pieces,
            segments,
            pending_at_end,
        }
    }

    /// First unit of a token plus any further slots of a shortcut.
    fn units(&self, token: &Token) -> (Unit, &'a [usize]) {
        let model = self.model;
        match token.kind {
            TokenKind::Symbol(Symbol::Krama(i)) => (Unit::Krama(i), &[]),
            TokenKind::Symbol(Symbol::Shortcut(s)) => {
                let keys = &model.shortcuts()[s].keys;
                (Unit::Krama(keys[0]), &keys[1..])
            }
            TokenKind::Symbol(Symbol::Specific(j)) => (Unit::Specific(j), &[]),
            TokenKind::Symbol(Symbol::SpecificMatra(j)) => (Unit::SpecificMatra(j), &[]),
            TokenKind::Literal => (Unit::Literal, &[]),
        }
    }

    fn class(&self, unit: Unit) -> Class {
        match unit {
            Unit::Krama(i) if i == self.model.halant() => Class::Halant,
            Unit::Krama(i) if i == self.model.nuqta() => Class::Nuqta,
            Unit::Krama(i) => match self.model.key(i).category {
                Category::Svara => Class::Svara,
                Category::Matra => Class::Matra,
                Category::Vyanjana => Class::Vyanjana,
                Category::Anya => Class::Other,
            },
            Unit::Specific(j) => {
                let ch = &self.specific_owner.specific[j];
                match ch.category {
                    Category::Svara if ch.matra.is_some() => Class::Svara,
                    Category::Matra => Class::Matra,
                    Category::Vyanjana => Class::Vyanjana,
                    _ => Class::Other,
                }
            }
            Unit::SpecificMatra(_) => Class::Matra,
            Unit::Literal => Class::Other,
        }
    }

    /// Close a waiting consonant before a unit of class `next`. Returns true
    /// when the unit belongs to the consonant (it becomes a vowel sign or is
    /// swallowed).
    fn resolve_pending(&mut self, next: Class) -> bool {
        if !self.pending {
            return false;
        }
        match self.mode {
            Mode::ToBrahmic => {
                self.pending = false;
                match next {
                    Class::Svara | Class::Matra | Class::Halant => true,
                    Class::Vyanjana => {
                        self.push_halant();
                        false
                    }
                    _ => {
                        if !self.flags.include_inherent_vowel {
                            self.push_halant();
                        }
                        false
                    }
                }
            }
            Mode::FromBrahmic => match next {
                Class::Matra | Class::Halant => {
                    self.pending = false;
                    true
                }
                Class::Nuqta => true,
                _ => {
                    self.pending = false;
                    self.push_schwa();
                    false
                }
            },
            Mode::Direct => {
                self.pending = false;
                false
            }
        }
    }

    fn finish(&mut self) {
        if !self.pending {
            return;
        }
        self.pending = false;
        match self.mode {
            Mode::ToBrahmic if !self.flags.include_inherent_vowel => self.push_halant(),
            Mode::FromBrahmic => self.push_schwa(),
            _ => {}
        }
    }

    fn emit(&mut self, unit: Unit, token: &Token, absorbed: bool, single: bool) {
        match unit {
            Unit::Krama(i) => self.emit_krama(i, token, absorbed, single),
            Unit::Specific(j) => {
                let owner = self.specific_owner;
                let ch = &owner.specific[j];
                let text = if std::ptr::eq(owner, self.to) {
                    match (&ch.matra, absorbed) {
                        (Some(matra), true) => matra.as_str(),
                        _ => ch.text.as_str(),
                    }
                } else {
                    self.preserved_or(ch, &ch.text)
                };
                self.push(None, text);
                if ch.category == Category::Vyanjana && self.mode != Mode::Direct {
                    self.pending = true;
                }
            }
            Unit::SpecificMatra(j) => {
                let owner = self.specific_owner;
                let ch = &owner.specific[j];
                let matra = ch.matra.as_deref().unwrap_or(&ch.text);
                let text = self.preserved_or(ch, matra);
                self.push(None, text);
            }
            Unit::Literal => {
                let raw = self.raw(token);
                self.push(None, &raw);
            }
        }
    }

    fn emit_krama(&mut self, i: usize, token: &Token, absorbed: bool, single: bool) {
        let model = self.model;
        let to = self.to;
        let category = model.key(i).category;

        if absorbed {
            match self.mode {
                Mode::ToBrahmic => {
                    let matra = match category {
                        Category::Svara => model.key(i).partner.unwrap_or(i),
                        _ => i,
                    };
                    let text = to.text(matra);
                    if !text.is_empty() {
                        self.push_attached(matra, text);
                    } else if model.key(matra).partner != Some(model.a_svara()) {
                        // No vowel sign for it in this script: write the
                        // consonant dead and the vowel in full.
                        self.push_halant();
                        let svara = model.key(matra).partner.unwrap_or(matra);
                        self.emit_text(svara, token, single);
                    }
                }
                Mode::FromBrahmic => {
                    if category == Category::Matra {
                        self.push(Some(i), to.text(i));
                    }
                }
                Mode::Direct => self.emit_text(i, token, single),
            }
            return;
        }

        if model.is_digit(i) && !self.flags.use_native_numerals {
            let raw = self.source_text(i, token, single);
            self.push(Some(i), &raw);
            return;
        }
        self.emit_text(i, token, single);
        if category == Category::Vyanjana && self.mode != Mode::Direct {
            self.pending = true;
        }
    }

    /// Target text of slot `i`, or the source text when the target lacks it.
    fn emit_text(&mut self, i: usize, token: &Token, single: bool) {
        let to = self.to;
        let text = to.text(i);
        if !text.is_empty() {
            self.push(Some(i), text);
            return;
        }
        if self.model.key(i).partner == Some(self.model.a_svara()) {
            return;
        }
        let raw = self.source_text(i, token, single);
        self.push(Some(i), &raw);
    }

    fn preserved_or<'s>(&self, ch: &'s crate::script::SpecificChar, text: &'s str) -> &'s str {
        if self.flags.preserve_specific_chars && !self.to.is_brahmic() {
            ch.inputs.first().map_or(text, String::as_str)
        } else {
            text
        }
    }

    fn source_text(&self, i: usize, token: &Token, single: bool) -> String {
        if single {
            self.raw(token)
        } else {
            self.from.text(i).to_string()
        }
    }

    fn raw(&self, token: &Token) -> String {
        self.chars[token.start..token.end].iter().collect()
    }

    fn push_halant(&mut self) {
        let (to, halant) = (self.to, self.model.halant());
        self.push_attached(halant, to.text(halant));
    }

    fn push_schwa(&mut self) {
        let to = self.to;
        self.push(Some(self.model.a_svara()), to.schwa());
    }

    fn push(&mut self, krama: Option<usize>, text: &str) {
        self.place(krama, text, false);
    }

    /// Push a sign that belongs to the consonant just written.
    fn push_attached(&mut self, krama: usize, text: &str) {
        self.place(Some(krama), text, true);
    }

    fn place(&mut self, krama: Option<usize>, text: &str, attached: bool) {
        if text.is_empty() {
            return;
        }
        self.out_chars += text.chars().count();
        let mark = match krama {
            Some(k) if (attached || !self.flags.typing) && self.is_sign(k) => {
                self.take_trailing_mark()
            }
            _ => None,
        };
        let text = match mark {
            None => text.to_string(),
            Some(mark) => {
                // Only the halant of a halant-led sign goes before the mark.
                let halant = self.to.text(self.model.halant());
                let (before, after) = match text.strip_prefix(halant) {
                    Some(rest) if !halant.is_empty() && !rest.is_empty() => (halant, rest),
                    _ => (text, ""),
                };
                let mut placed = String::with_capacity(text.len() + mark.len_utf8());
                placed.push_str(before);
                placed.push(mark);
                placed.push_str(after);
                placed
            }
        };
        self.pieces.push(Piece { krama, text });
    }

    fn is_sign(&self, k: usize) -> bool {
        k == self.model.halant()
            || self.model.key(k).category == Category::Matra
            || self.model.is_accent(k)
    }

    /// Detach a trailing mark ending the output so a sign can go before it.
    fn take_trailing_mark(&mut self) -> Option<char> {
        let to = self.to;
        let last = self.pieces.last_mut()?;
        let mark = last.text.chars().next_back()?;
        if !to.is_trailing_mark(mark) {
            return None;
        }
        last.text.pop();
        if last.text.is_empty() {
            self.pieces.pop();
        }
        Some(mark)
    }
}

/// Apply output-side rules in order.
pub(crate) fn apply_output_rules(
    mut pieces: Vec<Piece>,
    rules: &[&Rule],
    to: &ScriptDefinition,
) -> Vec<Piece> {
    for rule in rules {
        let keys: Vec<Option<usize>> = pieces.iter().map(|p| p.krama).collect();
        let mut out = Vec::with_capacity(pieces.len());
        let mut i = 0;
        while i < pieces.len() {
            match rule.match_at(&keys, i) {
                Some((len, with)) => {
                    out.extend(with.iter().filter_map(|&k| {
                        let text = to.text(k);
                        (!text.is_empty()).then(|| Piece {
                            krama: Some(k),
                            text: text.to_string(),
                        })
                    }));
                    let append = rule.append_text();
                    if !append.is_empty() {
                        out.push(Piece {
                            krama: None,
                            text: append.to_string(),
                        });
                    }
                    i += len;
                }
                None => {
                    out.push(std::mem::replace(
                        &mut pieces[i],
                        Piece {
                            krama: None,
                            text: String::new(),
                        },
                    ));
                    i += 1;
                }
            }
        }
        pieces = out;
    }
    pieces
}

pub(crate) fn join(pieces: &[Piece]) -> String {
    pieces.iter().map(|p| p.text.as_str()).collect()
}
