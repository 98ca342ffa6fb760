use std::collections::BTreeMap;

use lexime_trie::{DoubleArray, TrieSearch};

/// Result of a longest-match walk from the start of a char slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct LongestMatch<V> {
    /// Length in chars and value of the longest stored key found.
    pub matched: Option<(usize, V)>,
    /// The walk consumed the whole slice and could still continue, so
    /// more input may change the match.
    pub open: bool,
}

/// Collects keys before the double array is built.
pub(crate) struct TrieBuilder<V> {
    // String order is byte order, which is what the double array wants.
    entries: BTreeMap<String, V>,
}

impl<V: Copy> TrieBuilder<V> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `key`. The first value stored for a key is kept.
    pub fn insert(&mut self, key: &str, value: V) {
        if key.is_empty() {
            return;
        }
        self.entries.entry(key.to_string()).or_insert(value);
    }

    pub fn build(self) -> Trie<V> {
        let max_key_chars = self
            .entries
            .keys()
            .map(|k| k.chars().count())
            .max()
            .unwrap_or(0);
        let keys: Vec<&[u8]> = self.entries.keys().map(|k| k.as_bytes()).collect();
        let da = DoubleArray::<u8>::build(&keys);
        let values = self.entries.values().copied().collect();
        Trie {
            da,
            values,
            max_key_chars,
        }
    }
}

/// UTF-8 keyed double array used for longest-match tokenization.
/// Value ids are positions in key order.
pub(crate) struct Trie<V> {
    da: DoubleArray<u8>,
    values: Vec<V>,
    max_key_chars: usize,
}

impl<V: Copy> Trie<V> {
    pub fn longest_match(&self, chars: &[char]) -> LongestMatch<V> {
        let mut key = String::new();
        let mut matched = None;
        for (i, c) in chars.iter().enumerate() {
            key.push(*c);
            let pr = self.da.probe(key.as_bytes());
            if let Some(id) = pr.value {
                matched = Some((i + 1, self.values[id as usize]));
            }
            if !pr.has_children {
                return LongestMatch { matched, open: false };
            }
        }
        LongestMatch {
            matched,
            open: !chars.is_empty(),
        }
    }

    /// Length in chars of the longest stored key.
    pub fn max_key_chars(&self) -> usize {
        self.max_key_chars
    }
}
