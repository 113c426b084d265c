//! Language configuration.
//!
//! A [`LanguageConfig`] describes the lexical rules of one language. It is
//! assembled once through [`LanguageConfigBuilder`] and then shared read-only,
//! behind an `Arc`, by every lexer for that language.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use log::{debug, warn};

use super::{
    comments::LINE_TERMINATOR,
    tokenizers::Tokenizer,
    tokens::{Token, TokenId},
};

/// Turns a fully accumulated identifier into a token, or declines with `None`.
pub type Specialization = Arc<dyn Fn(&str) -> Option<Token> + Send + Sync>;

/// Builds a caller-defined tokenizer. Receives the trigger text that selected it.
pub type TokenizerFactory = Arc<dyn Fn(&str) -> Box<dyn Tokenizer> + Send + Sync>;

/// Tokenizer started when its trigger text is recognised.
#[derive(Clone)]
pub enum CustomTokenizer {
    /// Hexadecimal literal, e.g. after `$` or `0x`.
    Hex,
    /// Binary literal, e.g. after `%0` or `%1`.
    Binary,
    External(TokenizerFactory),
}

impl CustomTokenizer {
    pub fn external<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Box<dyn Tokenizer> + Send + Sync + 'static,
    {
        CustomTokenizer::External(Arc::new(factory))
    }
}

impl Debug for CustomTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomTokenizer::Hex => write!(f, "Hex"),
            CustomTokenizer::Binary => write!(f, "Binary"),
            CustomTokenizer::External(_) => write!(f, "External"),
        }
    }
}

#[derive(Default)]
pub struct LanguageConfig {
    keywords: HashMap<String, TokenId>,
    operators: HashMap<String, TokenId>,
    symbols: HashMap<char, TokenId>,
    comments: HashMap<String, String>,
    custom_tokenizers: HashMap<String, CustomTokenizer>,
    specializations: Vec<Specialization>,
    extended_identifier_chars: String,
    identifier_termination: String,
    strict_identifiers: bool,
    longest_operator: usize,
    longest_comment: usize,
    longest_trigger: usize,
}

impl LanguageConfig {
    pub fn builder() -> LanguageConfigBuilder {
        LanguageConfigBuilder::default()
    }

    pub fn keyword(&self, text: &str) -> Option<TokenId> {
        self.keywords.get(text).copied()
    }

    pub fn operator(&self, text: &str) -> Option<TokenId> {
        self.operators.get(text).copied()
    }

    pub fn symbol(&self, c: char) -> Option<TokenId> {
        self.symbols.get(&c).copied()
    }

    pub fn is_symbol(&self, c: char) -> bool {
        self.symbols.contains_key(&c)
    }

    pub fn comment_end(&self, start: &str) -> Option<&str> {
        self.comments.get(start).map(String::as_str)
    }

    pub fn comments(&self) -> &HashMap<String, String> {
        &self.comments
    }

    /// Whether `text` is the beginning, but not the whole, of some comment
    /// start sequence.
    pub fn is_comment_prefix(&self, text: &str) -> bool {
        self.comments
            .iter()
            .any(|(start, end)| !end.is_empty() && start.len() > text.len() && start.starts_with(text))
    }

    pub fn custom_tokenizer(&self, trigger: &str) -> Option<&CustomTokenizer> {
        self.custom_tokenizers.get(trigger)
    }

    /// Looks up a trigger consisting of the single character `c`.
    pub fn char_trigger(&self, c: char) -> Option<&CustomTokenizer> {
        let mut buffer = [0; 4];
        self.custom_tokenizers.get(&*c.encode_utf8(&mut buffer))
    }

    pub fn is_extended_identifier_char(&self, c: char) -> bool {
        self.extended_identifier_chars.contains(c)
    }

    pub fn is_identifier_terminator(&self, c: char) -> bool {
        self.identifier_termination.contains(c)
    }

    /// Whether `c` may appear at character offset `position` of an identifier.
    pub fn is_identifier_char(&self, c: char, position: usize) -> bool {
        if c.is_alphabetic() || self.is_extended_identifier_char(c) {
            return true;
        }

        position > 0 && (c.is_ascii_digit() || self.is_identifier_terminator(c))
    }

    pub fn is_strict(&self) -> bool {
        self.strict_identifiers
    }

    /// Length in characters of the longest multi-character operator.
    pub fn longest_operator(&self) -> usize {
        self.longest_operator
    }

    /// Length in characters of the longest comment start sequence.
    pub fn longest_comment(&self) -> usize {
        self.longest_comment
    }

    /// Length in characters of the longest custom tokenizer trigger.
    pub fn longest_trigger(&self) -> usize {
        self.longest_trigger
    }

    /// Resolves identifier text: exact keyword first, then each
    /// specialization in registration order.
    pub fn token_from_identifier(&self, text: &str) -> Option<Token> {
        if let Some(id) = self.keyword(text) {
            return Some(Token::simple(id, text));
        }

        self.specializations.iter().find_map(|specialize| specialize(text))
    }
}

/// Ordered configuration steps for a [`LanguageConfig`].
///
/// Each table setter replaces what an earlier call for the same table set.
#[derive(Default)]
pub struct LanguageConfigBuilder {
    config: LanguageConfig,
}

impl LanguageConfigBuilder {
    pub fn keywords<I, K>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = (K, TokenId)>,
        K: Into<String>,
    {
        self.config.keywords = keywords.into_iter().map(|(k, id)| (k.into(), id)).collect();
        self
    }

    pub fn operators<I, K>(mut self, operators: I) -> Self
    where
        I: IntoIterator<Item = (K, TokenId)>,
        K: Into<String>,
    {
        self.config.operators = operators.into_iter().map(|(k, id)| (k.into(), id)).collect();
        self
    }

    pub fn symbols<I>(mut self, symbols: I) -> Self
    where
        I: IntoIterator<Item = (char, TokenId)>,
    {
        self.config.symbols = symbols.into_iter().collect();
        self
    }

    /// Maps comment start sequences to their closing sequence. A closing
    /// sequence of `"\n"` makes a line comment.
    pub fn comments<I, S, E>(mut self, comments: I) -> Self
    where
        I: IntoIterator<Item = (S, E)>,
        S: Into<String>,
        E: Into<String>,
    {
        self.config.comments = comments
            .into_iter()
            .map(|(start, end)| (start.into(), end.into()))
            .collect();
        self
    }

    /// Custom tokenizers pre-empt symbol and number handling when their
    /// trigger text is seen.
    pub fn custom_tokenizers<I, K>(mut self, tokenizers: I) -> Self
    where
        I: IntoIterator<Item = (K, CustomTokenizer)>,
        K: Into<String>,
    {
        self.config.custom_tokenizers = tokenizers
            .into_iter()
            .map(|(trigger, tokenizer)| (trigger.into(), tokenizer))
            .collect();
        self
    }

    pub fn specializations(mut self, specializations: Vec<Specialization>) -> Self {
        self.config.specializations = specializations;
        self
    }

    /// Appends one specialization after those already registered.
    pub fn specialization<F>(mut self, specialize: F) -> Self
    where
        F: Fn(&str) -> Option<Token> + Send + Sync + 'static,
    {
        self.config.specializations.push(Arc::new(specialize));
        self
    }

    pub fn extended_identifier_chars(mut self, chars: &str) -> Self {
        self.config.extended_identifier_chars = chars.to_string();
        self
    }

    /// Characters that end an identifier and stay part of its literal, e.g.
    /// the colon of a label.
    pub fn identifier_termination(mut self, chars: &str) -> Self {
        self.config.identifier_termination = chars.to_string();
        self
    }

    /// Reject identifiers that no keyword or specialization accepts instead
    /// of dropping them.
    pub fn strict_identifiers(mut self, strict: bool) -> Self {
        self.config.strict_identifiers = strict;
        self
    }

    pub fn build(self) -> Arc<LanguageConfig> {
        let mut config = self.config;

        // Single-character operators resolve through the symbol table.
        for (operator, id) in config.operators.iter() {
            let mut chars = operator.chars();
            if let (Some(c), None) = (chars.next(), chars.next()) {
                config.symbols.entry(c).or_insert(*id);
            }
        }

        config.longest_operator = longest(config.operators.keys());
        config.longest_comment = longest(config.comments.keys());
        config.longest_trigger = longest(config.custom_tokenizers.keys());

        for operator in config.operators.keys() {
            if !operator.chars().all(|c| config.symbols.contains_key(&c)) {
                warn!("operator {:?} contains unregistered symbols and will never match", operator);
            }
        }

        for trigger in config.custom_tokenizers.keys() {
            let mut chars = trigger.chars();
            if let (Some(first), Some(_)) = (chars.next(), chars.next()) {
                if !config.symbols.contains_key(&first) && first != '0' {
                    warn!("custom tokenizer trigger {:?} does not start with a symbol", trigger);
                }
            }
        }

        for (start, end) in config.comments.iter() {
            if start.is_empty() || end.is_empty() {
                warn!("comment delimiter {:?} -> {:?} is empty and is ignored", start, end);
            } else if end == LINE_TERMINATOR {
                debug!("line comment {:?} registered", start);
            }
        }

        debug!(
            "language configured: {} keywords, {} operators, {} symbols, {} comments, {} custom tokenizers, {} specializations",
            config.keywords.len(),
            config.operators.len(),
            config.symbols.len(),
            config.comments.len(),
            config.custom_tokenizers.len(),
            config.specializations.len()
        );

        Arc::new(config)
    }
}

fn longest<'a>(keys: impl Iterator<Item = &'a String>) -> usize {
    keys.map(|key| key.chars().count()).max().unwrap_or(0)
}
