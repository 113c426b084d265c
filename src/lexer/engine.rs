//! Token creation engine.
//!
//! [`TokenCreator`] owns the active sub-tokenizer, the overflow queue and the
//! comment tracker of one lexer, and dispatches input one character at a time.

use std::{collections::VecDeque, sync::Arc};

use log::{debug, trace};

use crate::{errors::errors::ErrorImpl, MK_TOKEN};

use super::{
    comments::CommentTracker,
    config::{CustomTokenizer, LanguageConfig},
    conversions::decimal_to_value,
    tokenizers::{is_string_quote, BinaryTokenizer, HexTokenizer, Step, StringTokenizer, Tokenizer},
    tokens::{Token, TokenId},
};

/// A token paired with the column of its first character.
pub type Emitted = (u32, Token);

/// Sub-tokenizer currently in progress, with the column it started at.
enum State {
    Selector,
    Number(String, u32),
    Hex(HexTokenizer, u32),
    Binary(BinaryTokenizer, u32),
    Str(StringTokenizer, u32),
    Identifier(String, u32),
    Symbol(String, u32),
    /// Leading characters of a comment start that no other rule accepts.
    CommentPrefix(String, u32),
    External(Box<dyn Tokenizer>, u32),
}

impl State {
    fn name(&self) -> &'static str {
        match self {
            State::Selector => "selector",
            State::Number(..) => "number",
            State::Hex(hex, _) => hex.name(),
            State::Binary(binary, _) => binary.name(),
            State::Str(string, _) => string.name(),
            State::Identifier(..) => "identifier",
            State::Symbol(..) => "symbol",
            State::CommentPrefix(..) => "comment prefix",
            State::External(tokenizer, _) => tokenizer.name(),
        }
    }
}

pub struct TokenCreator {
    config: Arc<LanguageConfig>,
    comments: CommentTracker,
    state: State,
    overflow: VecDeque<(char, u32)>,
}

impl TokenCreator {
    pub fn new(config: Arc<LanguageConfig>) -> Self {
        let comments = CommentTracker::new(config.comments().clone());
        TokenCreator {
            config,
            comments,
            state: State::Selector,
            overflow: VecDeque::new(),
        }
    }

    pub fn comments(&self) -> &CommentTracker {
        &self.comments
    }

    pub fn comments_mut(&mut self) -> &mut CommentTracker {
        &mut self.comments
    }

    /// True while a string literal is open. Comment starts are not
    /// recognised inside it.
    pub fn is_parsing_string(&self) -> bool {
        matches!(self.state, State::Str(..))
    }

    /// Closing quote of the string literal in progress, if any.
    pub fn open_string_delimiter(&self) -> Option<char> {
        match &self.state {
            State::Str(string, _) => Some(string.delimiter()),
            _ => None,
        }
    }

    /// True while no sub-tokenizer is mid-token.
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::Selector)
    }

    pub fn active_tokenizer(&self) -> &'static str {
        self.state.name()
    }

    pub fn has_overflow(&self) -> bool {
        !self.overflow.is_empty()
    }

    /// Next character to replay, with its column. Must be fed back before
    /// any new input.
    pub fn take_overflow(&mut self) -> Option<(char, u32)> {
        self.overflow.pop_front()
    }

    /// Queues characters ahead of anything already waiting, keeping their order.
    fn push_overflow(&mut self, chars: impl DoubleEndedIterator<Item = (char, u32)>) {
        for item in chars.rev() {
            self.overflow.push_front(item);
        }
    }

    /// Feeds one character at `column` to the active sub-tokenizer.
    ///
    /// On error the engine is back in the selector with nothing queued, so
    /// the caller can carry on with the next line.
    pub fn tokenize(&mut self, c: char, column: u32) -> Result<Vec<Emitted>, ErrorImpl> {
        let mut emitted = Vec::new();
        let state = std::mem::replace(&mut self.state, State::Selector);
        let previous = state.name();

        match self.advance(state, c, column, &mut emitted) {
            Ok(next) => self.state = next,
            Err(e) => {
                debug!("{} tokenizer failed on {:?}, pending input discarded", previous, c);
                self.overflow.clear();
                return Err(e);
            }
        }

        if previous != self.state.name() {
            trace!("{} -> {} on {:?}", previous, self.state.name(), c);
        }

        Ok(emitted)
    }

    fn advance(
        &mut self,
        state: State,
        c: char,
        column: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<State, ErrorImpl> {
        Ok(match state {
            State::Selector => self.select(c, column)?,
            State::Number(text, start) => self.number(text, start, c, column, emitted)?,
            State::Hex(hex, start) => self
                .drive(hex, start, c, column, emitted)?
                .map_or(State::Selector, |hex| State::Hex(hex, start)),
            State::Binary(binary, start) => self
                .drive(binary, start, c, column, emitted)?
                .map_or(State::Selector, |binary| State::Binary(binary, start)),
            State::Str(string, start) => self
                .drive(string, start, c, column, emitted)?
                .map_or(State::Selector, |string| State::Str(string, start)),
            State::Identifier(text, start) => self.identifier(text, start, c, column, emitted)?,
            State::Symbol(text, start) => self.symbol(text, start, c, column, emitted)?,
            State::CommentPrefix(text, start) => self.comment_prefix(text, start, c, column)?,
            State::External(tokenizer, start) => self
                .drive(tokenizer, start, c, column, emitted)?
                .map_or(State::Selector, |tokenizer| State::External(tokenizer, start)),
        })
    }

    /// Resting state: decides which sub-tokenizer the character starts.
    fn select(&mut self, c: char, column: u32) -> Result<State, ErrorImpl> {
        if self.comments.is_in_comment() || c.is_whitespace() {
            return Ok(State::Selector);
        }

        if let Some(custom) = self.config.char_trigger(c).cloned() {
            return Ok(self.start_custom(&custom, &c.to_string(), column));
        }

        if self.config.is_symbol(c) {
            return Ok(State::Symbol(c.to_string(), column));
        }

        if c.is_ascii_digit() {
            return Ok(State::Number(c.to_string(), column));
        }

        if is_string_quote(c) {
            return Ok(State::Str(StringTokenizer::new(c), column));
        }

        if self.config.is_identifier_char(c, 0) {
            return Ok(State::Identifier(c.to_string(), column));
        }

        let candidate = c.to_string();
        if self.comments.try_start(&candidate) {
            return Ok(State::Selector);
        }

        if self.config.is_comment_prefix(&candidate) {
            return Ok(State::CommentPrefix(candidate, column));
        }

        Err(ErrorImpl::UnrecognisedCharacter { character: c })
    }

    /// Extends a partial comment start. Fails on its first character once
    /// no registered start can match any more.
    fn comment_prefix(&mut self, mut text: String, start: u32, c: char, column: u32) -> Result<State, ErrorImpl> {
        let candidate = format!("{}{}", text, c);
        if self.comments.try_start(&candidate) {
            return Ok(State::Selector);
        }

        if self.config.is_comment_prefix(&candidate) {
            text.push(c);
            return Ok(State::CommentPrefix(text, start));
        }

        if self.comments.try_start(&text) {
            self.push_overflow(std::iter::once((c, column)));
            return Ok(State::Selector);
        }

        match text.chars().next() {
            Some(character) => Err(ErrorImpl::UnrecognisedCharacter { character }),
            None => Err(ErrorImpl::UnrecognisedCharacter { character: c }),
        }
    }

    fn start_custom(&mut self, custom: &CustomTokenizer, trigger: &str, column: u32) -> State {
        trace!("custom tokenizer {:?} triggered by {:?}", custom, trigger);
        match custom {
            CustomTokenizer::Hex => State::Hex(HexTokenizer::new(trigger), column),
            CustomTokenizer::Binary => State::Binary(BinaryTokenizer::new(trigger), column),
            CustomTokenizer::External(factory) => State::External(factory(trigger), column),
        }
    }

    /// Runs a self-contained tokenizer. Returns it back while it is pending,
    /// `None` once it has completed.
    fn drive<T: Tokenizer>(
        &mut self,
        mut tokenizer: T,
        start: u32,
        c: char,
        column: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<Option<T>, ErrorImpl> {
        match tokenizer.advance(c)? {
            Step::Pending => Ok(Some(tokenizer)),
            Step::Complete { tokens, overflow } => {
                emitted.extend(tokens.into_iter().map(|token| (start, token)));
                self.push_overflow(overflow.map(|o| (o, column)).into_iter());
                Ok(None)
            }
        }
    }

    /// Decimal digits with at most one decimal point. `0x` switches to hex,
    /// as does any registered trigger the digits run into.
    fn number(
        &mut self,
        mut text: String,
        start: u32,
        c: char,
        column: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<State, ErrorImpl> {
        if c.is_ascii_digit() || (c == '.' && !text.contains('.')) {
            text.push(c);
            return Ok(State::Number(text, start));
        }

        let candidate = format!("{}{}", text, c);
        if let Some(custom) = self.config.custom_tokenizer(&candidate).cloned() {
            return Ok(self.start_custom(&custom, &candidate, start));
        }

        if text == "0" && c == 'x' {
            return Ok(State::Hex(HexTokenizer::new(&candidate), start));
        }

        let value = decimal_to_value(&text)?;
        self.push_overflow(std::iter::once((c, column)));
        let id = if text.contains('.') {
            TokenId::NUMBER_LITERAL
        } else {
            TokenId::INTEGER_LITERAL
        };
        emitted.push((start, MK_TOKEN!(id, text, value)));
        Ok(State::Selector)
    }

    fn identifier(
        &mut self,
        mut text: String,
        start: u32,
        c: char,
        column: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<State, ErrorImpl> {
        let position = text.chars().count();

        if !self.config.is_identifier_char(c, position) {
            if !self.comments.try_start(&text) {
                emitted.extend(self.resolve_identifier(text)?.map(|token| (start, token)));
            }
            self.push_overflow(std::iter::once((c, column)));
            return Ok(State::Selector);
        }

        text.push(c);

        if self.config.is_identifier_terminator(c) {
            emitted.extend(self.resolve_identifier(text)?.map(|token| (start, token)));
            return Ok(State::Selector);
        }

        Ok(State::Identifier(text, start))
    }

    fn resolve_identifier(&self, text: String) -> Result<Option<Token>, ErrorImpl> {
        match self.config.token_from_identifier(&text) {
            Some(token) => Ok(Some(token)),
            None if self.config.is_strict() => Err(ErrorImpl::UnrecognisedIdentifier { identifier: text }),
            None => {
                debug!("identifier {:?} matched no keyword or specialization, dropped", text);
                Ok(None)
            }
        }
    }

    /// Greedily collects symbol characters, then resolves the run once a
    /// character ends it.
    fn symbol(
        &mut self,
        mut text: String,
        start: u32,
        c: char,
        column: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<State, ErrorImpl> {
        if self.config.char_trigger(c).is_none() && self.config.is_symbol(c) {
            text.push(c);
            return Ok(State::Symbol(text, start));
        }

        let chars: Vec<char> = text.chars().collect();

        // Trailing symbols that form a trigger together with `c` go to the
        // custom tokenizer instead of being resolved.
        let mut peeled = 0;
        let reach = self.config.longest_trigger().saturating_sub(1).min(chars.len());
        for take in (1..=reach).rev() {
            let candidate: String = chars[chars.len() - take..].iter().chain([c].iter()).collect();
            if self.config.custom_tokenizer(&candidate).is_some() {
                peeled = take;
                break;
            }
        }

        // Likewise for a comment start whose last character is not a symbol.
        let mut comment = None;
        if peeled == 0 {
            let reach = self.config.longest_comment().saturating_sub(1).min(chars.len());
            for take in (1..=reach).rev() {
                let candidate: String = chars[chars.len() - take..].iter().chain([c].iter()).collect();
                if self.config.comment_end(&candidate).is_some_and(|end| !end.is_empty()) {
                    comment = Some((take, candidate));
                    break;
                }
            }
        }

        if let Some((take, candidate)) = comment {
            let resolved = chars.len() - take;
            match self.resolve_symbols(&chars[..resolved], start, emitted)? {
                Some(rest) => self.push_comment_tail(&chars, rest, start, c, column),
                None => {
                    self.comments.try_start(&candidate);
                }
            }
            return Ok(State::Selector);
        }

        let resolved = chars.len() - peeled;
        if let Some(rest) = self.resolve_symbols(&chars[..resolved], start, emitted)? {
            self.push_comment_tail(&chars, rest, start, c, column);
            return Ok(State::Selector);
        }

        if peeled > 0 {
            let trigger: String = chars[resolved..].iter().chain([c].iter()).collect();
            if let Some(custom) = self.config.custom_tokenizer(&trigger).cloned() {
                return Ok(self.start_custom(&custom, &trigger, start + resolved as u32));
            }
        }

        self.push_overflow(std::iter::once((c, column)));
        Ok(State::Selector)
    }

    /// A comment opened inside a symbol run; what follows its start sequence
    /// belongs to the comment.
    fn push_comment_tail(&mut self, chars: &[char], rest: usize, start: u32, c: char, column: u32) {
        let tail = chars[rest..]
            .iter()
            .enumerate()
            .map(|(i, ch)| (*ch, start + (rest + i) as u32))
            .chain(std::iter::once((c, column)))
            .collect::<Vec<_>>();
        self.push_overflow(tail.into_iter());
    }

    /// Longest-match resolution of a symbol run: at each position the longest
    /// registered operator wins, otherwise a single symbol. A comment start
    /// longer than any operator at that position opens a comment and stops
    /// resolution, returning the index just past the start sequence.
    fn resolve_symbols(
        &mut self,
        chars: &[char],
        start: u32,
        emitted: &mut Vec<Emitted>,
    ) -> Result<Option<usize>, ErrorImpl> {
        let mut i = 0;

        while i < chars.len() {
            let remaining = chars.len() - i;

            let mut operator = None;
            for len in (2..=self.config.longest_operator().min(remaining)).rev() {
                let candidate: String = chars[i..i + len].iter().collect();
                if let Some(id) = self.config.operator(&candidate) {
                    operator = Some((len, id, candidate));
                    break;
                }
            }
            let operator_len = operator.as_ref().map_or(0, |(len, _, _)| *len);

            for len in (operator_len + 1..=self.config.longest_comment().min(remaining)).rev() {
                if len < 2 {
                    break;
                }
                let candidate: String = chars[i..i + len].iter().collect();
                if self.comments.try_start(&candidate) {
                    return Ok(Some(i + len));
                }
            }

            if let Some((len, id, literal)) = operator {
                emitted.push((start + i as u32, Token::simple(id, literal)));
                i += len;
                continue;
            }

            match self.config.symbol(chars[i]) {
                Some(id) => {
                    emitted.push((start + i as u32, Token::simple(id, chars[i].to_string())));
                    i += 1;
                }
                None => {
                    return Err(ErrorImpl::UnknownSymbol {
                        sequence: chars[i].to_string(),
                    })
                }
            }
        }

        Ok(None)
    }
}
