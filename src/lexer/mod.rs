//! Configurable lexical analysis.
//!
//! A language is described once by a [`config::LanguageConfig`]: keywords,
//! operators, symbols, comment delimiters, custom literal tokenizers and
//! identifier specializations. A [`lexer::Lexer`] then turns source lines
//! into tokens, one character at a time:
//!
//! - The [`engine::TokenCreator`] picks a sub-tokenizer for each new token
//! - Sub-tokenizers hand back characters that belong to the next token
//! - The [`comments::CommentTracker`] keeps block comments open across lines
//! - Tokens carry the line and column of their first character

pub mod comments;
pub mod config;
pub mod conversions;
pub mod engine;
pub mod lexer;
pub mod specializations;
pub mod tokenizers;
pub mod tokens;
