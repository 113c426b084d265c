use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display, rc::Rc};

use crate::Position;

lazy_static! {
    pub static ref BUILTIN_NAMES: HashMap<TokenId, &'static str> = {
        let mut map = HashMap::new();
        map.insert(TokenId::NONE, "None");
        map.insert(TokenId::EOF, "EOF");
        map.insert(TokenId::END_OF_LINE, "EndOfLine");
        map.insert(TokenId::INTEGER_LITERAL, "IntegerLiteral");
        map.insert(TokenId::NUMBER_LITERAL, "NumberLiteral");
        map.insert(TokenId::HEX_LITERAL, "HexLiteral");
        map.insert(TokenId::STRING_LITERAL, "StringLiteral");
        map.insert(TokenId::LAST_STD_LITERAL, "LastStdLiteral");
        map
    };
}

/// Integer category code of a token.
///
/// Codes up to and including [`TokenId::LAST_STD_LITERAL`] belong to the
/// lexer. Languages number their own categories above it.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Hash)]
pub struct TokenId(pub u16);

impl TokenId {
    pub const NONE: TokenId = TokenId(0);
    pub const EOF: TokenId = TokenId(1);
    pub const END_OF_LINE: TokenId = TokenId(2);
    pub const INTEGER_LITERAL: TokenId = TokenId(3);
    pub const NUMBER_LITERAL: TokenId = TokenId(4);
    pub const HEX_LITERAL: TokenId = TokenId(5);
    pub const STRING_LITERAL: TokenId = TokenId(6);
    pub const LAST_STD_LITERAL: TokenId = TokenId(7);

    pub fn is_builtin(&self) -> bool {
        *self <= TokenId::LAST_STD_LITERAL
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match BUILTIN_NAMES.get(self) {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "{:#x}", self.0),
        }
    }
}

/// Typed payload carried by literal tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenValue {
    Integer(i64),
    Float(f64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Text(String),
}

impl TokenValue {
    /// Narrows an unsigned value to the smallest width that holds it.
    pub fn narrowest_unsigned(value: u64) -> TokenValue {
        if value <= u8::MAX as u64 {
            TokenValue::U8(value as u8)
        } else if value <= u16::MAX as u64 {
            TokenValue::U16(value as u16)
        } else if value <= u32::MAX as u64 {
            TokenValue::U32(value as u32)
        } else {
            TokenValue::U64(value)
        }
    }

    /// Widens any unsigned variant back to `u64`.
    pub fn as_unsigned(&self) -> Option<u64> {
        match self {
            TokenValue::U8(v) => Some(*v as u64),
            TokenValue::U16(v) => Some(*v as u64),
            TokenValue::U32(v) => Some(*v as u64),
            TokenValue::U64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl Display for TokenValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenValue::Integer(v) => write!(f, "{}", v),
            TokenValue::Float(v) => write!(f, "{}", v),
            TokenValue::U8(v) => write!(f, "{}", v),
            TokenValue::U16(v) => write!(f, "{}", v),
            TokenValue::U32(v) => write!(f, "{}", v),
            TokenValue::U64(v) => write!(f, "{}", v),
            TokenValue::Text(v) => write!(f, "{}", v),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub id: TokenId,
    pub literal: String,
    pub value: Option<TokenValue>,
    pub position: Position,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {}: {}", self.id, self.literal, value),
            None => write!(f, "{}: {}: <nil>", self.id, self.literal),
        }
    }
}

impl Token {
    /// Creates an unpositioned token. The lexer fills in the position once
    /// the token has been emitted.
    pub fn new(id: TokenId, literal: impl Into<String>, value: Option<TokenValue>) -> Self {
        Token {
            id,
            literal: literal.into(),
            value,
            position: Position::null(),
        }
    }

    pub fn simple(id: TokenId, literal: impl Into<String>) -> Self {
        Token::new(id, literal, None)
    }

    pub fn is(&self, id: TokenId) -> bool {
        self.id == id
    }

    pub fn is_one_of_many(&self, ids: &[TokenId]) -> bool {
        ids.iter().any(|id| *id == self.id)
    }

    pub fn line(&self) -> u32 {
        self.position.line
    }

    pub fn column(&self) -> u32 {
        self.position.column
    }

    pub fn filename(&self) -> &str {
        &self.position.file
    }

    pub(crate) fn positioned(mut self, line: u32, column: u32, file: &Rc<String>) -> Self {
        self.position = Position::new(line, column, Rc::clone(file));
        self
    }
}
