use crate::options::Rule;
use crate::script::Symbol;
use crate::trie::Trie;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Symbol(Symbol),
    /// A char the source trie does not know; passed through as is.
    Literal,
}

/// A run of source chars `start..end` and what it resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// More input could still extend or change this token.
    pub open: bool,
}

impl Token {
    pub fn krama(&self) -> Option<usize> {
        match self.kind {
            TokenKind::Symbol(Symbol::Krama(i)) => Some(i),
            _ => None,
        }
    }
}

/// Greedy longest-match tokenization.
pub(crate) fn tokenize(chars: &[char], trie: &Trie<Symbol>) -> Vec<Token> {
    let mut tokens = Vec::with_capacity(chars.len());
    let mut pos = 0;
    while pos < chars.len() {
        let m = trie.longest_match(&chars[pos..]);
        let (len, kind) = match m.matched {
            Some((len, symbol)) => (len, TokenKind::Symbol(symbol)),
            None => (1, TokenKind::Literal),
        };
        tokens.push(Token {
            kind,
            start: pos,
            end: pos + len,
            open: m.open,
        });
        pos += len;
    }
    tokens
}

/// Apply input-side rules in order. Replacement tokens cover the span of
/// the run they replace.
pub(crate) fn apply_input_rules(mut tokens: Vec<Token>, rules: &[&Rule]) -> Vec<Token> {
    for rule in rules {
        let keys: Vec<Option<usize>> = tokens.iter().map(Token::krama).collect();
        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match rule.match_at(&keys, i) {
                Some((len, with)) => {
                    let start = tokens[i].start;
                    let end = tokens[i + len - 1].end;
                    out.extend(with.iter().enumerate().map(|(n, &k)| Token {
                        kind: TokenKind::Symbol(Symbol::Krama(k)),
                        start: if n == 0 { start } else { end },
                        end,
                        open: false,
                    }));
                    i += len;
                }
                None => {
                    out.push(tokens[i]);
                    i += 1;
                }
            }
        }
        tokens = out;
    }
    tokens
}
