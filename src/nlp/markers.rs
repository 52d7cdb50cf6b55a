//! Reference markers and noun-continuing tags
//!
//! Both sets are small closed classes tested by exact string equality.
//! Defaults follow Chinese patent drafting conventions and the CTB tagset.

use rustc_hash::FxHashSet;

/// Reference words that point back to a previously introduced feature.
pub const DEFAULT_MARKERS: &[&str] = &["所述的", "所述", "上述", "上述的", "前述", "前述的", "该"];

/// CTB codes that may continue a noun phrase: common noun, proper noun,
/// temporal noun, cardinal, measure word, adjective, determiner, pronoun.
pub const DEFAULT_NOUN_TAGS: &[&str] = &["NN", "NR", "NT", "CD", "M", "JJ", "DT", "PN"];

/// A set of reference-marker words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    markers: FxHashSet<String>,
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::from_list(DEFAULT_MARKERS)
    }
}

impl MarkerSet {
    /// Create an empty marker set (nothing triggers extraction)
    pub fn empty() -> Self {
        Self {
            markers: FxHashSet::default(),
        }
    }

    /// Create a marker set from a custom list
    pub fn from_list<S: AsRef<str>>(words: &[S]) -> Self {
        let markers = words
            .iter()
            .map(|w| w.as_ref())
            .filter(|w| !w.is_empty())
            .map(str::to_string)
            .collect();
        Self { markers }
    }

    /// Add additional markers
    pub fn add_markers<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            let word = word.as_ref();
            if !word.is_empty() {
                self.markers.insert(word.to_string());
            }
        }
    }

    /// Remove markers
    pub fn remove_markers<S: AsRef<str>>(&mut self, words: &[S]) {
        for word in words {
            self.markers.remove(word.as_ref());
        }
    }

    /// Exact membership test
    pub fn contains(&self, word: &str) -> bool {
        self.markers.contains(word)
    }

    /// Whether `text` contains any marker as a substring
    pub fn occurs_in(&self, text: &str) -> bool {
        self.markers.iter().any(|m| text.contains(m.as_str()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(String::as_str)
    }

    /// Markers in lexicographic order, for stable output
    pub fn sorted(&self) -> Vec<&str> {
        let mut words: Vec<&str> = self.iter().collect();
        words.sort_unstable();
        words
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }
}

/// A set of POS codes that keep a noun phrase going
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NounTagSet {
    tags: FxHashSet<String>,
}

impl Default for NounTagSet {
    fn default() -> Self {
        Self::from_list(DEFAULT_NOUN_TAGS)
    }
}

impl NounTagSet {
    pub fn from_list<S: AsRef<str>>(tags: &[S]) -> Self {
        Self {
            tags: tags.iter().map(|t| t.as_ref().to_string()).collect(),
        }
    }

    pub fn add_tags<S: AsRef<str>>(&mut self, tags: &[S]) {
        for tag in tags {
            self.tags.insert(tag.as_ref().to_string());
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn sorted(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
