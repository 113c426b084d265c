//! Resumable sub-tokenizers.
//!
//! A sub-tokenizer receives one character at a time until it can emit a
//! complete token. The self-contained ones live here and implement
//! [`Tokenizer`], the same contract caller-supplied tokenizers implement.
//! Tokenizers that need the language tables (numbers, identifiers, symbols)
//! are driven by the engine directly.

use crate::{errors::errors::ErrorImpl, MK_TOKEN};

use super::{
    conversions::{binary_to_value, hex_to_value},
    tokens::{Token, TokenId, TokenValue},
};

/// Result of feeding one character to a [`Tokenizer`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The character was consumed and the tokenizer wants more.
    Pending,
    /// The tokenizer is finished. `overflow` hands back a character that
    /// belongs to whatever comes next.
    Complete {
        tokens: Vec<Token>,
        overflow: Option<char>,
    },
}

impl Step {
    pub fn emit(token: Token, overflow: Option<char>) -> Self {
        Step::Complete {
            tokens: vec![token],
            overflow,
        }
    }
}

pub trait Tokenizer {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl>;

    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl> {
        (**self).advance(c)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Splits a trigger such as `%0` into its prefix and the digits it already
/// contributes, where `is_digit` decides which trailing characters count.
fn split_trigger(trigger: &str, is_digit: impl Fn(char) -> bool) -> (String, String) {
    match trigger.char_indices().filter(|(_, c)| !is_digit(*c)).last() {
        Some((index, c)) => {
            let split = index + c.len_utf8();
            (trigger[..split].to_string(), trigger[split..].to_string())
        }
        None => (String::new(), trigger.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct HexTokenizer {
    prefix: String,
    digits: String,
}

impl HexTokenizer {
    pub fn new(trigger: &str) -> Self {
        let (prefix, digits) = split_trigger(trigger, |c| c.is_ascii_hexdigit());
        HexTokenizer { prefix, digits }
    }
}

impl Tokenizer for HexTokenizer {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl> {
        if c.is_ascii_hexdigit() {
            self.digits.push(c);
            return Ok(Step::Pending);
        }

        let value = hex_to_value(&self.digits)?;
        let literal = format!("{}{}", self.prefix, self.digits);
        Ok(Step::emit(MK_TOKEN!(TokenId::HEX_LITERAL, literal, value), Some(c)))
    }

    fn name(&self) -> &'static str {
        "hex"
    }
}

#[derive(Debug, Clone)]
pub struct BinaryTokenizer {
    prefix: String,
    digits: String,
}

impl BinaryTokenizer {
    pub fn new(trigger: &str) -> Self {
        let (prefix, digits) = split_trigger(trigger, |c| c == '0' || c == '1');
        BinaryTokenizer { prefix, digits }
    }
}

impl Tokenizer for BinaryTokenizer {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl> {
        if c == '0' || c == '1' {
            self.digits.push(c);
            return Ok(Step::Pending);
        }

        let value = binary_to_value(&self.digits)?;
        let literal = format!("{}{}", self.prefix, self.digits);
        Ok(Step::emit(MK_TOKEN!(TokenId::INTEGER_LITERAL, literal, value), Some(c)))
    }

    fn name(&self) -> &'static str {
        "binary"
    }
}

pub fn is_string_quote(c: char) -> bool {
    matches!(c, '"' | '\'' | '`')
}

/// Collects everything up to the matching closing quote verbatim. There is
/// no escape processing.
#[derive(Debug, Clone)]
pub struct StringTokenizer {
    delimiter: char,
    text: String,
}

impl StringTokenizer {
    pub fn new(delimiter: char) -> Self {
        StringTokenizer {
            delimiter,
            text: String::new(),
        }
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Tokenizer for StringTokenizer {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl> {
        if c != self.delimiter {
            self.text.push(c);
            return Ok(Step::Pending);
        }

        let text = std::mem::take(&mut self.text);
        Ok(Step::emit(
            MK_TOKEN!(TokenId::STRING_LITERAL, "", TokenValue::Text(text)),
            None,
        ))
    }

    fn name(&self) -> &'static str {
        "string"
    }
}
