//! Error types and error handling for the lexer.
//!
//! This module defines the error types produced while tokenizing:
//!
//! - Error structures with source position information
//! - Specific error variants for each sub-tokenizer failure
//! - Helpful error messages and suggestions

pub mod errors;
