//! Ready-made specialization functions.
//!
//! Specializations run after keyword lookup fails, in registration order,
//! and the first one returning a token wins.

use std::{collections::HashMap, sync::Arc};

use regex::Regex;

use super::{
    config::Specialization,
    tokens::{Token, TokenId},
};

/// Accepts every identifier. Register it last.
pub fn catch_all(id: TokenId) -> Specialization {
    Arc::new(move |identifier: &str| Some(Token::simple(id, identifier)))
}

/// Accepts identifiers ending in `suffix`, e.g. `A$` or `loop:`.
pub fn with_suffix(suffix: &str, id: TokenId) -> Specialization {
    let suffix = suffix.to_string();
    Arc::new(move |identifier: &str| {
        if identifier.len() > suffix.len() && identifier.ends_with(&suffix) {
            Some(Token::simple(id, identifier))
        } else {
            None
        }
    })
}

/// Accepts identifiers matching `pattern` in full.
pub fn matching(pattern: &str, id: TokenId) -> Result<Specialization, regex::Error> {
    let regex = Regex::new(&format!("^(?:{})$", pattern))?;
    Ok(Arc::new(move |identifier: &str| {
        regex
            .is_match(identifier)
            .then(|| Token::simple(id, identifier))
    }))
}

/// Keyword lookup that ignores ASCII case, for languages like BASIC where
/// `LET` and `let` are the same keyword.
pub fn keyword_case_insensitive<I, K>(keywords: I) -> Specialization
where
    I: IntoIterator<Item = (K, TokenId)>,
    K: AsRef<str>,
{
    let keywords: HashMap<String, TokenId> = keywords
        .into_iter()
        .map(|(keyword, id)| (keyword.as_ref().to_ascii_lowercase(), id))
        .collect();

    Arc::new(move |identifier: &str| {
        keywords
            .get(&identifier.to_ascii_lowercase())
            .map(|id| Token::simple(*id, identifier))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LABEL: TokenId = TokenId(0x20);
    const VARIABLE: TokenId = TokenId(0x21);

    #[test]
    fn test_catch_all() {
        let specialize = catch_all(VARIABLE);
        let token = specialize("anything").unwrap();
        assert_eq!(token.id, VARIABLE);
        assert_eq!(token.literal, "anything");
    }

    #[test]
    fn test_with_suffix() {
        let specialize = with_suffix(":", LABEL);
        assert_eq!(specialize("loop:").unwrap().id, LABEL);
        assert!(specialize("loop").is_none());
        assert!(specialize(":").is_none());
    }

    #[test]
    fn test_matching_is_anchored() {
        let specialize = matching("[A-Z][A-Z0-9]?", VARIABLE).unwrap();
        assert!(specialize("A1").is_some());
        assert!(specialize("A12").is_none());
        assert!(specialize("xA1").is_none());
        assert!(matching("(", VARIABLE).is_err());
    }

    #[test]
    fn test_keyword_case_insensitive() {
        let specialize = keyword_case_insensitive([("print", TokenId(0x99))]);
        let token = specialize("PRINT").unwrap();
        assert_eq!(token.id, TokenId(0x99));
        assert_eq!(token.literal, "PRINT");
        assert!(specialize("prin").is_none());
    }
}
