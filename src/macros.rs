//! Utility macros for the lexer.
//!
//! - `MK_TOKEN!` - Creates an unpositioned Token instance

/// Creates an unpositioned Token instance.
///
/// # Arguments
///
/// * `$id` - The TokenId
/// * `$literal` - The token's literal text
/// * `$value` - Optional typed TokenValue
///
/// # Example
///
/// ```ignore
/// let token = MK_TOKEN!(TokenId::INTEGER_LITERAL, "42", TokenValue::Integer(42));
/// ```
#[macro_export]
macro_rules! MK_TOKEN {
    ($id:expr, $literal:expr) => {
        $crate::lexer::tokens::Token::new($id, $literal, None)
    };
    ($id:expr, $literal:expr, $value:expr) => {
        $crate::lexer::tokens::Token::new($id, $literal, Some($value))
    };
}
