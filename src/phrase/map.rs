//! Phrase → offsets mapping
//!
//! [`PhraseOffsets`] is the extractors' output. Keys keep first-insertion
//! order so repeated runs over the same claim serialize identically.

use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Ordered mapping from phrase text to the anchor offsets it was seen at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhraseOffsets {
    entries: Vec<(String, Vec<usize>)>,
    index: FxHashMap<String, usize>,
}

impl PhraseOffsets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `offset` to `phrase`'s list, creating the entry if needed.
    pub fn record(&mut self, phrase: impl Into<String>, offset: usize) {
        let phrase = phrase.into();
        match self.index.get(&phrase) {
            Some(&i) => self.entries[i].1.push(offset),
            None => {
                self.index.insert(phrase.clone(), self.entries.len());
                self.entries.push((phrase, vec![offset]));
            }
        }
    }

    pub fn get(&self, phrase: &str) -> Option<&[usize]> {
        self.index
            .get(phrase)
            .map(|&i| self.entries[i].1.as_slice())
    }

    pub fn contains(&self, phrase: &str) -> bool {
        self.index.contains_key(phrase)
    }

    /// Phrases in first-seen order.
    pub fn phrases(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(p, _)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.entries
            .iter()
            .map(|(p, offsets)| (p.as_str(), offsets.as_slice()))
    }

    /// Number of distinct phrases.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded occurrences across all phrases.
    pub fn occurrences(&self) -> usize {
        self.entries.iter().map(|(_, o)| o.len()).sum()
    }
}

impl<'a> IntoIterator for &'a PhraseOffsets {
    type Item = (&'a str, &'a [usize]);
    type IntoIter = Box<dyn Iterator<Item = Self::Item> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

impl Serialize for PhraseOffsets {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (phrase, offsets) in &self.entries {
            map.serialize_entry(phrase, offsets)?;
        }
        map.end()
    }
}
