//! Supplementary dictionary combining
//!
//! Statistical tokenizers tend to split reference words such as "所述的"
//! into "所述" + "的". [`DictionaryCombiner`] re-joins runs of adjacent
//! tokens whose concatenation is a dictionary term, preferring the longest
//! match at each position.

use rustc_hash::FxHashSet;

use crate::nlp::markers::MarkerSet;
use crate::types::Token;

/// Merges adjacent tokens into dictionary terms.
#[derive(Debug, Clone, Default)]
pub struct DictionaryCombiner {
    terms: FxHashSet<String>,
    /// Longest term length in characters; bounds the lookahead.
    max_chars: usize,
}

impl DictionaryCombiner {
    pub fn new<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut combiner = Self::default();
        combiner.add_terms(terms);
        combiner
    }

    /// Dictionary made of the marker words themselves.
    pub fn from_markers(markers: &MarkerSet) -> Self {
        let terms: Vec<&str> = markers.iter().collect();
        Self::new(&terms)
    }

    pub fn add_terms<S: AsRef<str>>(&mut self, terms: &[S]) {
        for term in terms {
            let term = term.as_ref();
            if term.is_empty() {
                continue;
            }
            self.max_chars = self.max_chars.max(term.chars().count());
            self.terms.insert(term.to_string());
        }
    }

    pub fn contains(&self, term: &str) -> bool {
        self.terms.contains(term)
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Combine tokens in place.
    ///
    /// Only gapless runs (each token starting where the previous one ended)
    /// are merged, so offsets stay valid for the combined token.
    pub fn combine(&self, tokens: &mut Vec<Token>) {
        if self.terms.is_empty() || tokens.len() < 2 {
            return;
        }

        let mut out = Vec::with_capacity(tokens.len());
        let mut i = 0;
        while i < tokens.len() {
            match self.longest_match(&tokens[i..]) {
                Some(len) if len > 1 => {
                    let run = &tokens[i..i + len];
                    let text: String = run.iter().map(|t| t.text.as_str()).collect();
                    out.push(Token::new(text, run[0].start, run[len - 1].end));
                    i += len;
                }
                _ => {
                    out.push(tokens[i].clone());
                    i += 1;
                }
            }
        }
        *tokens = out;
    }

    /// Length (in tokens) of the longest dictionary term starting at
    /// `tokens[0]`.
    fn longest_match(&self, tokens: &[Token]) -> Option<usize> {
        let mut text = String::new();
        let mut chars = 0;
        let mut best = None;

        for (n, token) in tokens.iter().enumerate() {
            if n > 0 && token.start != tokens[n - 1].end {
                break;
            }
            chars += token.char_len();
            if chars > self.max_chars {
                break;
            }
            text.push_str(&token.text);
            if self.terms.contains(&text) {
                best = Some(n + 1);
            }
        }

        best
    }
}
