use std::fmt::Display;

use thiserror::Error;

use crate::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    internal_error: ErrorImpl,
    position: Position,
}

impl Error {
    pub fn new(error_impl: ErrorImpl, position: Position) -> Self {
        Error {
            internal_error: error_impl,
            position,
        }
    }

    pub fn get_position(&self) -> &Position {
        &self.position
    }

    pub fn kind(&self) -> &ErrorImpl {
        &self.internal_error
    }

    pub fn into_kind(self) -> ErrorImpl {
        self.internal_error
    }

    pub fn get_error_name(&self) -> &str {
        self.internal_error.name()
    }

    pub fn get_tip(&self) -> ErrorTip {
        match &self.internal_error {
            ErrorImpl::UnrecognisedCharacter { character } => ErrorTip::Suggestion(format!(
                "`{}` matches no symbol, digit, quote, identifier or comment rule",
                character
            )),
            ErrorImpl::UnknownSymbol { sequence } => ErrorTip::Suggestion(format!(
                "`{}` is not a registered symbol or operator",
                sequence
            )),
            ErrorImpl::NumberParseError { literal, .. } => ErrorTip::Suggestion(format!(
                "Invalid number: `{}`, is it above the integer limit?",
                literal
            )),
            ErrorImpl::StreamReadError { .. } => ErrorTip::None,
            ErrorImpl::UnterminatedString { delimiter } => ErrorTip::Suggestion(format!(
                "Add a closing `{}` to the string literal",
                delimiter
            )),
            ErrorImpl::UnrecognisedIdentifier { identifier } => ErrorTip::Suggestion(format!(
                "`{}` is neither a keyword nor accepted by any specialization",
                identifier
            )),
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.position.file, self.position.line, self.position.column, self.internal_error
        )
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.internal_error)
    }
}

pub enum ErrorTip {
    None,
    Suggestion(String),
}

impl Display for ErrorTip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorTip::None => write!(f, ""),
            ErrorTip::Suggestion(suggestion) => write!(f, "{}", suggestion),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ErrorImpl {
    #[error("unrecognised character: {character:?}")]
    UnrecognisedCharacter { character: char },
    #[error("unknown symbol: {sequence:?}")]
    UnknownSymbol { sequence: String },
    #[error("{tokenizer} tokenizer could not convert {literal:?}: {reason}")]
    NumberParseError {
        tokenizer: &'static str,
        literal: String,
        reason: String,
    },
    #[error("error reading input: {message}")]
    StreamReadError { message: String },
    #[error("unterminated string literal, expected closing {delimiter:?}")]
    UnterminatedString { delimiter: char },
    #[error("unrecognised identifier: {identifier:?}")]
    UnrecognisedIdentifier { identifier: String },
}

impl ErrorImpl {
    pub fn name(&self) -> &'static str {
        match self {
            ErrorImpl::UnrecognisedCharacter { .. } => "UnrecognisedCharacter",
            ErrorImpl::UnknownSymbol { .. } => "UnknownSymbol",
            ErrorImpl::NumberParseError { .. } => "NumberParseError",
            ErrorImpl::StreamReadError { .. } => "StreamReadError",
            ErrorImpl::UnterminatedString { .. } => "UnterminatedString",
            ErrorImpl::UnrecognisedIdentifier { .. } => "UnrecognisedIdentifier",
        }
    }

    pub(crate) fn number(tokenizer: &'static str, literal: &str, reason: impl Display) -> Self {
        ErrorImpl::NumberParseError {
            tokenizer,
            literal: literal.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<std::io::Error> for ErrorImpl {
    fn from(error: std::io::Error) -> Self {
        ErrorImpl::StreamReadError {
            message: error.to_string(),
        }
    }
}
