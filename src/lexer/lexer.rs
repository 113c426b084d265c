use std::{io::BufRead, rc::Rc, sync::Arc};

use log::debug;

use crate::{
    errors::errors::{Error, ErrorImpl},
    Position, MK_TOKEN,
};

use super::{config::LanguageConfig, engine::TokenCreator, tokens::{Token, TokenId}};

/// Character fed after the last character of every line.
const END_OF_LINE: char = '\n';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexerState {
    LineStart,
    MidLine,
    InBlockComment,
}

/// Feeds lines of source through a [`TokenCreator`].
///
/// One lexer per input stream. Block comments and multi-line strings stay
/// open from one `tokenize_line` call to the next.
pub struct Lexer {
    creator: TokenCreator,
    file: Rc<String>,
    mid_line: bool,
    token_line: u32,
}

impl Lexer {
    pub fn new(config: Arc<LanguageConfig>, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            creator: TokenCreator::new(config),
            file: file_name,
            mid_line: false,
            token_line: 1,
        }
    }

    pub fn file(&self) -> &Rc<String> {
        &self.file
    }

    /// `MidLine` also covers a token still open from a previous line, such as
    /// a string spanning lines.
    pub fn state(&self) -> LexerState {
        let comments = self.creator.comments();
        if comments.is_in_comment() && !comments.is_line_comment() {
            LexerState::InBlockComment
        } else if self.mid_line || !self.creator.is_idle() {
            LexerState::MidLine
        } else {
            LexerState::LineStart
        }
    }

    /// Tokenizes one line, without its terminator. Appends an end-of-line
    /// token when the line produced anything.
    ///
    /// After an error the rest of the line is dropped and the lexer is ready
    /// for the next line.
    pub fn tokenize_line(&mut self, line: &str, line_number: u32) -> Result<Vec<Token>, Error> {
        self.mid_line = true;
        let result = self.feed_line(line, line_number);
        self.mid_line = false;
        result
    }

    fn feed_line(&mut self, line: &str, line_number: u32) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let mut column = 0;

        for c in line.chars() {
            column += 1;
            if self.in_line_comment() {
                break;
            }
            self.feed(c, column, line_number, &mut tokens)?;
        }

        let end_column = line.chars().count() as u32 + 1;
        if !self.in_line_comment() {
            self.feed(END_OF_LINE, end_column, line_number, &mut tokens)?;
        }
        if self.in_line_comment() {
            self.creator.comments_mut().reset();
        }

        if !tokens.is_empty() {
            tokens.push(
                MK_TOKEN!(TokenId::END_OF_LINE, "").positioned(line_number, end_column, &self.file),
            );
        }

        Ok(tokens)
    }

    /// Tokenizes every line of `reader`, numbering lines from 1, and appends
    /// a final EOF token.
    pub fn tokenize_stream<R: BufRead>(&mut self, reader: R) -> Result<Vec<Token>, Error> {
        let mut tokens = Vec::new();
        let mut line_number = 0;

        debug!("tokenizing {}", self.file);

        for line in reader.lines() {
            line_number += 1;
            let line = line.map_err(|e| self.error(e.into(), line_number, 1))?;
            tokens.extend(self.tokenize_line(&line, line_number)?);
        }

        self.finish(line_number)?;

        tokens.push(MK_TOKEN!(TokenId::EOF, "EOF").positioned(line_number + 1, 1, &self.file));
        debug!("tokenized {}: {} lines, {} tokens", self.file, line_number, tokens.len());

        Ok(tokens)
    }

    /// Checks that nothing is left open at the end of input.
    pub fn finish(&mut self, last_line: u32) -> Result<(), Error> {
        match self.creator.open_string_delimiter() {
            Some(delimiter) => Err(self.error(
                ErrorImpl::UnterminatedString { delimiter },
                last_line,
                1,
            )),
            None => Ok(()),
        }
    }

    fn in_line_comment(&self) -> bool {
        let comments = self.creator.comments();
        comments.is_in_comment() && comments.is_line_comment()
    }

    /// Feeds one character, then replays overflow until none is left.
    /// Characters inside a comment only reach the comment tracker.
    fn feed(&mut self, c: char, column: u32, line_number: u32, tokens: &mut Vec<Token>) -> Result<(), Error> {
        let mut next = Some((c, column));

        while let Some((c, column)) = next {
            let comments = self.creator.comments_mut();
            if comments.is_in_comment() {
                if !comments.is_line_comment() {
                    comments.advance_end_match(c);
                }
            } else {
                // Tokens are reported on the line they started on.
                if self.creator.is_idle() {
                    self.token_line = line_number;
                }
                let token_line = self.token_line;
                let emitted = self
                    .creator
                    .tokenize(c, column)
                    .map_err(|e| self.error(e, line_number, column))?;
                tokens.extend(
                    emitted
                        .into_iter()
                        .map(|(start, token)| token.positioned(token_line, start, &self.file)),
                );
            }
            next = self.creator.take_overflow();
        }

        Ok(())
    }

    fn error(&self, error: ErrorImpl, line: u32, column: u32) -> Error {
        Error::new(error, Position::new(line, column, Rc::clone(&self.file)))
    }
}

/// Tokenizes a complete in-memory source.
pub fn tokenize(source: String, file: Option<String>, config: Arc<LanguageConfig>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(config, file);
    lex.tokenize_stream(source.as_bytes())
}
