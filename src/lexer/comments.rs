//! Comment boundary tracking.
//!
//! The tracker remembers which comment is open and how much of its closing
//! sequence has been seen, so a block comment can stay open across lines.

use std::collections::HashMap;

use log::trace;

/// Closing sequence that marks a comment running to the end of the line.
pub const LINE_TERMINATOR: &str = "\n";

#[derive(Debug, Clone, Default)]
pub struct CommentTracker {
    delimiters: HashMap<String, String>,
    start: String,
    end: Vec<char>,
    matched: usize,
}

impl CommentTracker {
    pub fn new(delimiters: HashMap<String, String>) -> Self {
        CommentTracker {
            delimiters,
            ..Default::default()
        }
    }

    pub fn is_in_comment(&self) -> bool {
        !self.start.is_empty() && !self.end.is_empty()
    }

    /// Opens a comment when `candidate` is exactly a registered start sequence.
    pub fn try_start(&mut self, candidate: &str) -> bool {
        if self.is_in_comment() {
            return false;
        }

        match self.delimiters.get(candidate) {
            Some(end) if !end.is_empty() => {
                trace!("comment opened by {:?}, closes on {:?}", candidate, end);
                self.start = candidate.to_string();
                self.end = end.chars().collect();
                self.matched = 0;
                true
            }
            _ => false,
        }
    }

    /// Feeds one character of comment body to the closing-sequence matcher.
    ///
    /// Returns true only on the character that completes the closing sequence.
    /// A mismatch discards the partial match without re-examining the
    /// mismatching character against the start of the sequence.
    pub fn advance_end_match(&mut self, c: char) -> bool {
        if !self.is_in_comment() {
            return false;
        }

        if self.end[self.matched] != c {
            self.matched = 0;
            return false;
        }

        self.matched += 1;
        if self.matched < self.end.len() {
            return false;
        }

        trace!("comment opened by {:?} closed", self.start);
        self.reset();
        true
    }

    pub fn is_line_comment(&self) -> bool {
        self.end.len() == 1 && self.end[0] == '\n'
    }

    /// Characters of the closing sequence matched so far.
    pub fn matched(&self) -> usize {
        self.matched
    }

    pub fn reset(&mut self) {
        self.start.clear();
        self.end.clear();
        self.matched = 0;
    }
}
