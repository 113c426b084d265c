//! Numeric literal conversions.

use crate::errors::errors::ErrorImpl;

use super::tokens::TokenValue;

/// Decimal text: a float when it contains `.`, otherwise a signed 64-bit integer.
pub fn decimal_to_value(text: &str) -> Result<TokenValue, ErrorImpl> {
    if text.contains('.') {
        return text
            .parse::<f64>()
            .map(TokenValue::Float)
            .map_err(|e| ErrorImpl::number("number", text, e));
    }

    text.parse::<i64>()
        .map(TokenValue::Integer)
        .map_err(|e| ErrorImpl::number("number", text, e))
}

/// Hex digits without prefix. The width follows the digit count:
/// 1-2 digits u8, 3-4 u16, 5-8 u32, anything longer u64.
pub fn hex_to_value(digits: &str) -> Result<TokenValue, ErrorImpl> {
    let value = u64::from_str_radix(digits, 16).map_err(|e| ErrorImpl::number("hex", digits, e))?;

    Ok(match digits.len() {
        0..=2 => TokenValue::U8(value as u8),
        3..=4 => TokenValue::U16(value as u16),
        5..=8 => TokenValue::U32(value as u32),
        _ => TokenValue::U64(value),
    })
}

/// Binary digits without prefix, narrowed to the smallest width holding the value.
pub fn binary_to_value(digits: &str) -> Result<TokenValue, ErrorImpl> {
    u64::from_str_radix(digits, 2)
        .map(TokenValue::narrowest_unsigned)
        .map_err(|e| ErrorImpl::number("binary", digits, e))
}
