//! Integration tests for end-to-end tokenization.
//!
//! These tests build complete language configurations (a BASIC dialect and a
//! 6502-style assembler) and run whole sources through the public API.

use std::{io::Cursor, sync::Arc, thread};

use langlex::{
    errors::errors::ErrorImpl,
    lexer::{
        specializations::{catch_all, keyword_case_insensitive, matching, with_suffix},
        tokenizers::{Step, Tokenizer},
    },
    render_error, tokenize, CustomTokenizer, LanguageConfig, Lexer, Token, TokenId, TokenValue,
};

const LET: TokenId = TokenId(0x88);
const PRINT: TokenId = TokenId(0x99);
const PLUS: TokenId = TokenId(0xAA);
const ASSIGN: TokenId = TokenId(0xB2);
const LESS: TokenId = TokenId(0x10A);
const LESS_EQUAL: TokenId = TokenId(0x10D);
const INCREMENT: TokenId = TokenId(0x10F);
const LABEL: TokenId = TokenId(0xF2);
const VARIABLE: TokenId = TokenId(0xF5);

const LDA: TokenId = TokenId(0x100);
const STA: TokenId = TokenId(0x101);
const REGISTER: TokenId = TokenId(0x102);
const SYMBOL_NAME: TokenId = TokenId(0x103);
const OPEN_PAREN: TokenId = TokenId(0x110);
const CLOSE_PAREN: TokenId = TokenId(0x111);
const COMMA: TokenId = TokenId(0x112);
const IMMEDIATE: TokenId = TokenId(0x113);
const DATE: TokenId = TokenId(0x200);

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn basic() -> Arc<LanguageConfig> {
    LanguageConfig::builder()
        .keywords([("let", LET), ("print", PRINT)])
        .operators([("<=", LESS_EQUAL), ("++", INCREMENT)])
        .symbols([('+', PLUS), ('=', ASSIGN), ('<', LESS)])
        .comments([("//", "\n"), ("/*", "*/")])
        .custom_tokenizers([("0x", CustomTokenizer::Hex)])
        .specializations(vec![with_suffix(":", LABEL), catch_all(VARIABLE)])
        .identifier_termination(":")
        .build()
}

/// `@2024-01-31` style date literals.
#[derive(Default)]
struct DateTokenizer {
    text: String,
}

impl Tokenizer for DateTokenizer {
    fn advance(&mut self, c: char) -> Result<Step, ErrorImpl> {
        if c.is_ascii_digit() || c == '-' {
            self.text.push(c);
            return Ok(Step::Pending);
        }

        let value = TokenValue::Text(std::mem::take(&mut self.text));
        let token = Token::new(DATE, format!("@{}", value), Some(value));
        Ok(Step::emit(token, Some(c)))
    }

    fn name(&self) -> &'static str {
        "date"
    }
}

fn assembler() -> Arc<LanguageConfig> {
    let register = matching("[AXY]", REGISTER).unwrap();

    LanguageConfig::builder()
        .keywords([("LDA", LDA), ("STA", STA)])
        .symbols([('(', OPEN_PAREN), (')', CLOSE_PAREN), (',', COMMA), ('#', IMMEDIATE)])
        .comments([(";", "\n")])
        .custom_tokenizers([
            ("$", CustomTokenizer::Hex),
            (
                "@",
                CustomTokenizer::external(|_trigger: &str| {
                    Box::new(DateTokenizer::default()) as Box<dyn Tokenizer>
                }),
            ),
        ])
        .specializations(vec![register, catch_all(SYMBOL_NAME)])
        .build()
}

fn ids(tokens: &[Token]) -> Vec<TokenId> {
    tokens.iter().map(|token| token.id).collect()
}

fn single_line(config: Arc<LanguageConfig>, text: &str) -> Vec<Token> {
    Lexer::new(config, None).tokenize_line(text, 1).unwrap()
}

#[test]
fn test_single_symbols() {
    init_logging();

    for (text, id) in [("+", PLUS), ("=", ASSIGN), ("<", LESS)] {
        let tokens = single_line(basic(), text);
        assert_eq!(ids(&tokens), vec![id, TokenId::END_OF_LINE], "{}", text);
        assert_eq!(tokens[0].literal, text);
    }
}

#[test]
fn test_longest_match_precedence() {
    let tokens = single_line(basic(), "<=");
    assert_eq!(ids(&tokens), vec![LESS_EQUAL, TokenId::END_OF_LINE]);
    assert_eq!(tokens[0].literal, "<=");
}

#[test]
fn test_greedy_increment() {
    let tokens = single_line(basic(), "+++");
    assert_eq!(ids(&tokens), vec![INCREMENT, PLUS, TokenId::END_OF_LINE]);
}

#[test]
fn test_integer_round_trip() {
    for value in [0u64, 7, 42, 255, 65536, 4294967296, i64::MAX as u64] {
        let text = value.to_string();
        let tokens = single_line(basic(), &text);

        assert_eq!(tokens[0].id, TokenId::INTEGER_LITERAL);
        assert_eq!(tokens[0].value.as_ref().unwrap().to_string(), text);
    }

    let tokens = single_line(basic(), "007");
    assert_eq!(tokens[0].value, Some(TokenValue::Integer(7)));
}

#[test]
fn test_hex_width_selection() {
    assert_eq!(single_line(basic(), "0xFF")[0].value, Some(TokenValue::U8(255)));
    assert_eq!(single_line(basic(), "0x1234")[0].value, Some(TokenValue::U16(0x1234)));
    assert_eq!(
        single_line(basic(), "0x12345678")[0].value,
        Some(TokenValue::U32(0x12345678))
    );
}

#[test]
fn test_comment_suppression() {
    let tokens = single_line(basic(), "abc // comment let print 0x12 §");
    assert_eq!(ids(&tokens), vec![VARIABLE, TokenId::END_OF_LINE]);
    assert_eq!(tokens[0].literal, "abc");
}

#[test]
fn test_cross_line_block_comment() {
    let mut lexer = Lexer::new(basic(), None);

    let first = lexer.tokenize_line("abc /* multi", 1).unwrap();
    let second = lexer.tokenize_line("line */ def", 2).unwrap();

    assert_eq!(ids(&first), vec![VARIABLE, TokenId::END_OF_LINE]);
    assert_eq!(ids(&second), vec![VARIABLE, TokenId::END_OF_LINE]);
    assert_eq!(second[0].literal, "def");
}

#[test]
fn test_string_is_verbatim() {
    let tokens = single_line(basic(), "\"'hello'\"");
    assert_eq!(tokens[0].id, TokenId::STRING_LITERAL);
    assert_eq!(tokens[0].value, Some(TokenValue::Text("'hello'".to_string())));
}

#[test]
fn test_independent_lexers_agree() {
    let config = basic();
    let text = "loop: let a = a + 0x10 <= 3 // done";

    let first = Lexer::new(Arc::clone(&config), None).tokenize_line(text, 5).unwrap();
    let second = Lexer::new(Arc::clone(&config), None).tokenize_line(text, 5).unwrap();

    assert_eq!(first, second);
    assert_eq!(
        ids(&first),
        vec![
            LABEL,
            LET,
            VARIABLE,
            ASSIGN,
            VARIABLE,
            PLUS,
            TokenId::HEX_LITERAL,
            LESS_EQUAL,
            TokenId::INTEGER_LITERAL,
            TokenId::END_OF_LINE
        ]
    );
}

#[test]
fn test_shared_config_across_threads() {
    init_logging();

    let config = basic();
    let source = "let a = 1\nprint a ++ 2 /* note\n end */ print a\n";

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let config = Arc::clone(&config);
            let source = source.to_string();
            thread::spawn(move || {
                tokenize(source, Some("shared.bas".to_string()), config)
                    .unwrap()
                    .iter()
                    .map(|token| format!("{}:{} {}", token.line(), token.column(), token))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let results: Vec<Vec<String>> = handles.into_iter().map(|handle| handle.join().unwrap()).collect();
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(results[0].len(), 14);
    assert_eq!(results[0].last().unwrap(), "4:1 EOF: EOF: <nil>");
}

#[test]
fn test_unrecognised_character() {
    let mut lexer = Lexer::new(basic(), None);
    let error = lexer.tokenize_line("let a = §", 1).unwrap_err();

    assert_eq!(error.kind(), &ErrorImpl::UnrecognisedCharacter { character: '§' });
    assert_eq!(error.to_string(), "shell:1:9: unrecognised character: '§'");

    let rendered = render_error(&error, "let a = §");
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[1], "-> shell");
    assert_eq!(lines[3], "1 | let a = §");
    assert_eq!(lines[4], "  | --------^");
}

#[test]
fn test_assembler_addressing() {
    let tokens = single_line(assembler(), "LDA ($FF),X");

    assert_eq!(
        ids(&tokens),
        vec![
            LDA,
            OPEN_PAREN,
            TokenId::HEX_LITERAL,
            CLOSE_PAREN,
            COMMA,
            REGISTER,
            TokenId::END_OF_LINE
        ]
    );
    assert_eq!(tokens[2].literal, "$FF");
    assert_eq!(tokens[2].value, Some(TokenValue::U8(0xFF)));
    assert_eq!(tokens[2].column(), 6);
}

#[test]
fn test_assembler_stream() {
    let source = "  LDA #$01\n  STA $0200,X ; store\nloop\n";
    let mut lexer = Lexer::new(assembler(), Some("prog.asm".to_string()));
    let tokens = lexer.tokenize_stream(Cursor::new(source)).unwrap();

    assert_eq!(
        ids(&tokens),
        vec![
            LDA,
            IMMEDIATE,
            TokenId::HEX_LITERAL,
            TokenId::END_OF_LINE,
            STA,
            TokenId::HEX_LITERAL,
            COMMA,
            REGISTER,
            TokenId::END_OF_LINE,
            SYMBOL_NAME,
            TokenId::END_OF_LINE,
            TokenId::EOF
        ]
    );
    assert_eq!(tokens[5].value, Some(TokenValue::U16(0x0200)));
    assert_eq!((tokens[5].line(), tokens[5].column()), (2, 7));
    assert_eq!(tokens[9].literal, "loop");
    assert_eq!((tokens[11].line(), tokens[11].column()), (4, 1));
    assert!(tokens.iter().all(|token| token.filename() == "prog.asm"));
}

#[test]
fn test_external_tokenizer() {
    let tokens = single_line(assembler(), "STA @2024-01-31,Y");

    assert_eq!(
        ids(&tokens),
        vec![STA, DATE, COMMA, REGISTER, TokenId::END_OF_LINE]
    );
    assert_eq!(tokens[1].literal, "@2024-01-31");
    assert_eq!(tokens[1].value, Some(TokenValue::Text("2024-01-31".to_string())));
    assert_eq!(tokens[1].column(), 5);
}

#[test]
fn test_case_insensitive_keywords() {
    let config = LanguageConfig::builder()
        .specializations(vec![
            keyword_case_insensitive([("print", PRINT), ("let", LET)]),
            catch_all(VARIABLE),
        ])
        .symbols([('=', ASSIGN), (':', TokenId(0x300))])
        .build();

    let tokens = single_line(config, "LET x = 1: PRINT x");
    assert_eq!(
        ids(&tokens),
        vec![
            LET,
            VARIABLE,
            ASSIGN,
            TokenId::INTEGER_LITERAL,
            TokenId(0x300),
            PRINT,
            VARIABLE,
            TokenId::END_OF_LINE
        ]
    );
}

#[test]
fn test_strict_mode_and_unterminated_string() {
    let strict = LanguageConfig::builder()
        .keywords([("print", PRINT)])
        .strict_identifiers(true)
        .build();

    let error = tokenize("print\nprint what".to_string(), None, strict).unwrap_err();
    assert_eq!(error.get_error_name(), "UnrecognisedIdentifier");
    assert_eq!(error.get_position().line, 2);

    let error = tokenize("print \"never closed\nstill open".to_string(), None, basic()).unwrap_err();
    assert_eq!(error.kind(), &ErrorImpl::UnterminatedString { delimiter: '"' });
}
