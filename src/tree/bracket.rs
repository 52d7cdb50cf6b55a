//! Labeled bracketing
//!
//! Reads and writes trees in the Penn Treebank bracket notation that
//! constituency parsers print, e.g. `(IP (NP (_ 所述) (_ 基底)) (VP (_ 设有)))`.
//! Literal parentheses inside leaf words travel as `-LRB-` / `-RRB-`.

use std::fmt;
use std::str::FromStr;

use crate::error::{ExtractError, Result};
use crate::tree::node::{Child, ParseTree};

const LRB: &str = "-LRB-";
const RRB: &str = "-RRB-";

/// Deepest bracket nesting the reader accepts.
pub const MAX_DEPTH: usize = 512;

impl ParseTree {
    /// Parse a single bracketed tree.
    ///
    /// A root written without a label (`( (IP ...))`) gets the empty label.
    /// Trees nested deeper than [`MAX_DEPTH`] are rejected.
    pub fn from_bracketed(input: &str) -> Result<Self> {
        let mut reader = Reader::new(input);
        reader.skip_ws();
        let tree = reader.tree()?;
        reader.skip_ws();
        if let Some(pos) = reader.peek_pos() {
            return Err(reader.error_at(pos, "trailing input after tree"));
        }
        Ok(tree)
    }
}

impl FromStr for ParseTree {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        ParseTree::from_bracketed(s)
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}", self.label())?;
        for child in self.children() {
            match child {
                Child::Tree(t) => write!(f, " {t}")?,
                Child::Leaf(w) => write!(f, " {}", escape_leaf(w))?,
            }
        }
        f.write_str(")")
    }
}

fn escape_leaf(word: &str) -> String {
    word.replace('(', LRB).replace(')', RRB)
}

fn unescape_leaf(atom: &str) -> String {
    atom.replace(LRB, "(").replace(RRB, ")")
}

struct Reader<'a> {
    input: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            depth: 0,
        }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn peek_pos(&self) -> Option<usize> {
        self.peek().map(|_| self.pos)
    }

    fn skip_ws(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    fn error_at(&self, position: usize, message: impl Into<String>) -> ExtractError {
        ExtractError::TreeSyntax {
            position,
            message: message.into(),
        }
    }

    fn expect(&mut self, c: char) -> Result<()> {
        match self.peek() {
            Some(found) if found == c => {
                self.pos += c.len_utf8();
                Ok(())
            }
            Some(found) => Err(self.error_at(self.pos, format!("expected '{c}', found '{found}'"))),
            None => Err(self.error_at(self.pos, format!("expected '{c}', found end of input"))),
        }
    }

    /// A run of characters that are neither whitespace nor parentheses.
    fn atom(&mut self) -> &'a str {
        let rest = self.rest();
        let len = rest
            .find(|c: char| c.is_whitespace() || c == '(' || c == ')')
            .unwrap_or(rest.len());
        self.pos += len;
        &rest[..len]
    }

    fn tree(&mut self) -> Result<ParseTree> {
        if self.depth == MAX_DEPTH {
            return Err(self.error_at(self.pos, "tree nested too deeply"));
        }
        self.expect('(')?;
        self.depth += 1;
        self.skip_ws();
        let label = match self.peek() {
            Some('(') => "",
            _ => self.atom(),
        };

        let mut children = Vec::new();
        loop {
            self.skip_ws();
            match self.peek() {
                Some(')') => {
                    self.pos += 1;
                    break;
                }
                Some('(') => children.push(Child::Tree(self.tree()?)),
                Some(_) => children.push(Child::Leaf(unescape_leaf(self.atom()))),
                None => return Err(self.error_at(self.pos, "unclosed bracket")),
            }
        }

        self.depth -= 1;
        Ok(ParseTree::new(label, children))
    }
}
