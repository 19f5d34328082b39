#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;
use crate::{parse, parse_pipelined, parse_tokens};
use io_lexer::ReaderSource;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn parse_ok(source: &str, interner: &StringInterner) -> ChainRef {
    match parse(source, interner) {
        Ok(Some(chain)) => chain,
        other => panic!("expected a chain for {source:?}, got {other:?}"),
    }
}

/// Parse and re-serialize.
fn render(source: &str) -> String {
    let interner = StringInterner::new();
    parse_ok(source, &interner).to_source(&interner)
}

fn error_kind(source: &str) -> ParseErrorKind {
    let interner = StringInterner::new();
    match parse(source, &interner) {
        Err(err) => err.kind,
        Ok(chain) => panic!("expected an error for {source:?}, got {chain:?}"),
    }
}

fn arg_count(source: &str) -> usize {
    let interner = StringInterner::new();
    parse_ok(source, &interner).messages()[0].args.len()
}

// ─── Chains ────────────────────────────────────────────────────────

#[test]
fn empty_input_is_no_chain() {
    let interner = StringInterner::new();
    assert!(matches!(parse("", &interner), Ok(None)));
    assert!(matches!(parse("  \t ", &interner), Ok(None)));
    assert!(matches!(parse(";\n;", &interner), Ok(None)));
}

#[test]
fn sends_form_one_chain() {
    let interner = StringInterner::new();
    let chain = parse_ok("a b c", &interner);
    let names: Vec<&str> = chain
        .messages()
        .iter()
        .filter_map(Message::name)
        .map(|n| interner.lookup(n))
        .collect();
    assert_eq!(names, ["a", "b", "c"]);
}

#[test]
fn separators_become_messages() {
    let interner = StringInterner::new();
    let chain = parse_ok("a;b\nc", &interner);
    let symbols: Vec<&Symbol> = chain.messages().iter().map(|m| &m.symbol).collect();
    assert_eq!(symbols, [
        &Symbol::Ident(interner.intern("a")),
        &Symbol::Separator(Separator::Semicolon),
        &Symbol::Ident(interner.intern("b")),
        &Symbol::Separator(Separator::Newline),
        &Symbol::Ident(interner.intern("c")),
    ]);
}

#[test]
fn leading_and_repeated_separators_are_absorbed() {
    let interner = StringInterner::new();
    assert_eq!(parse_ok(";\n;a", &interner).len(), 1);
    assert_eq!(parse_ok("a;;\n;b", &interner).len(), 3);
    assert_eq!(parse_ok("f(\na\n)", &interner).messages()[0].args[0].len(), 2);
}

#[test]
fn operators_are_plain_sends() {
    assert_eq!(render("a := 1 + 2"), "a := 1 + 2");
}

#[test]
fn spans_cover_arguments() {
    let interner = StringInterner::new();
    let chain = parse_ok("foo(1, 2) x", &interner);
    assert_eq!(chain.messages()[0].span, Span::new(0, 9));
    assert_eq!(chain.messages()[1].span, Span::new(10, 11));
}

// ─── Brackets ──────────────────────────────────────────────────────

#[test]
fn matching_brackets() {
    assert_eq!(render("f(x)"), "f(x)");
    assert_eq!(render("[1, 2]"), "[1, 2]");
    assert_eq!(render("{a b}"), "{a b}");
}

#[test]
fn square_and_curly_are_synthetic_sends() {
    let interner = StringInterner::new();
    let chain = parse_ok("[1] {2}", &interner);
    let names: Vec<&str> = chain
        .messages()
        .iter()
        .filter_map(Message::name)
        .map(|n| interner.lookup(n))
        .collect();
    assert_eq!(names, ["squareBrackets", "curlyBrackets"]);
}

#[test]
fn mismatched_brackets() {
    for (source, expected, found) in [
        ("(]", ')', ']'),
        ("(}", ')', '}'),
        ("[)", ']', ')'),
        ("[}", ']', '}'),
        ("{)", '}', ')'),
        ("{]", '}', ']'),
    ] {
        assert_eq!(
            error_kind(source),
            ParseErrorKind::MismatchedBracket { expected, found },
            "{source}"
        );
    }
}

#[test]
fn unexpected_closers() {
    for found in [')', ']', '}'] {
        assert_eq!(
            error_kind(&format!("a {found}")),
            ParseErrorKind::UnexpectedClose { found }
        );
    }
}

#[test]
fn unclosed_bracket_at_end_of_input() {
    let interner = StringInterner::new();
    let Err(err) = parse("f(1, [2", &interner) else {
        panic!("expected an error");
    };
    assert_eq!(err.kind, ParseErrorKind::UnclosedBracket { expected: ']' });
    assert_eq!(err.span, Span::point(7));
}

#[test]
fn comma_outside_brackets() {
    assert_eq!(error_kind("a, b"), ParseErrorKind::TopLevelComma);
}

#[test]
fn paren_at_statement_start_has_empty_name() {
    let interner = StringInterner::new();
    let chain = parse_ok("(1) x", &interner);
    assert_eq!(chain.messages()[0].name(), Some(Name::EMPTY));
    assert_eq!(chain.messages()[0].args.len(), 1);
    let chain = parse_ok("a; (1)", &interner);
    assert_eq!(chain.messages()[2].name(), Some(Name::EMPTY));
}

#[test]
fn paren_attaches_only_to_bare_identifier() {
    let interner = StringInterner::new();
    assert_eq!(parse_ok("f (x)", &interner).len(), 1);
    assert_eq!(parse_ok("f()(x)", &interner).len(), 2);
    assert_eq!(parse_ok("f(1)(2)", &interner).len(), 2);
    assert_eq!(parse_ok("1(2)", &interner).len(), 2);
    assert_eq!(parse_ok("[1](2)", &interner).len(), 2);
}

// ─── Arity ─────────────────────────────────────────────────────────

#[test]
fn empty_group_has_no_arguments() {
    assert_eq!(arg_count("f()"), 0);
    assert_eq!(arg_count("f(;)"), 0);
    assert_eq!(arg_count("[]"), 0);
}

#[test]
fn one_argument_per_comma() {
    assert_eq!(arg_count("f(1)"), 1);
    assert_eq!(arg_count("f(1, 2)"), 2);
    assert_eq!(arg_count("f(a b, c(d, e), [f])"), 3);
}

#[test]
fn empty_arguments_are_errors() {
    assert_eq!(error_kind("f(,)"), ParseErrorKind::EmptyArgument);
    assert_eq!(error_kind("f(1,)"), ParseErrorKind::EmptyArgument);
    assert_eq!(error_kind("f(1,,2)"), ParseErrorKind::EmptyArgument);
    assert_eq!(error_kind("f(,1)"), ParseErrorKind::EmptyArgument);
}

// ─── Literals ──────────────────────────────────────────────────────

fn first_symbol(source: &str) -> Symbol {
    let interner = StringInterner::new();
    parse_ok(source, &interner).messages()[0].symbol.clone()
}

#[test]
fn numbers_are_decoded() {
    assert_eq!(first_symbol("3.14"), Symbol::Number(3.14));
    assert_eq!(first_symbol("0x1F"), Symbol::Number(31.0));
    assert_eq!(first_symbol("1e999"), Symbol::Number(f64::INFINITY));
    assert_eq!(first_symbol("0xFFFFFFFFFFFFFFFFF"), Symbol::Number(f64::INFINITY));
}

#[test]
fn strings_are_decoded() {
    assert_eq!(first_symbol(r#""a\"b""#), Symbol::Str("a\"b".into()));
    assert_eq!(
        first_symbol(r#""""he said "hi" twice""""#),
        Symbol::Str("he said \"hi\" twice".into())
    );
}

#[test]
fn invalid_escape_is_a_decode_error() {
    let interner = StringInterner::new();
    let Err(err) = parse(r#"x "\q""#, &interner) else {
        panic!("expected an error");
    };
    assert_eq!(err.kind, ParseErrorKind::InvalidEscape {
        sequence: r"\q".to_string()
    });
    assert_eq!(err.span, Span::new(2, 6));
}

#[test]
fn lexical_errors_abort_the_parse() {
    assert!(matches!(error_kind("a # b"), ParseErrorKind::Lex(_)));
    assert!(matches!(error_kind("f(1."), ParseErrorKind::Lex(_)));
    assert!(matches!(error_kind("\"open"), ParseErrorKind::Lex(_)));
}

#[test]
fn malformed_token_without_error() {
    let interner = StringInterner::new();
    let tokens = vec![Token::new(TokenKind::Malformed, "#", Span::new(0, 1))];
    let Err(err) = parse_tokens(tokens, &interner) else {
        panic!("expected an error");
    };
    assert_eq!(err.span, Span::new(0, 1));
}

// ─── Sources ───────────────────────────────────────────────────────

#[test]
fn pipelined_parse_matches_inline() {
    let source = "Account := Object clone\nAccount deposit := method(v, balance = balance + v)\n";
    let interner = StringInterner::new();
    let inline = parse_ok(source, &interner);
    let reader = ReaderSource::new(std::io::Cursor::new(source.as_bytes().to_vec()));
    let piped = parse_pipelined(reader, &interner).unwrap().unwrap();
    assert!(inline.structurally_eq(&piped));
}

#[test]
fn pipelined_parse_reports_errors() {
    let interner = StringInterner::new();
    let reader = ReaderSource::new(std::io::Cursor::new(b"a ) b c d e".to_vec()));
    let err = parse_pipelined(reader, &interner).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::UnexpectedClose { found: ')' });
}

#[test]
fn nested_groups_parse() {
    let depth = 1_000;
    let source = format!("{}x{}", "f(".repeat(depth), ")".repeat(depth));
    let interner = StringInterner::new();
    let chain = parse_ok(&source, &interner);
    assert_eq!(chain.len(), 1);
}

// ─── Round trip ────────────────────────────────────────────────────

fn round_trips(source: &str) -> bool {
    let interner = StringInterner::new();
    let first = parse_ok(source, &interner);
    let text = first.to_source(&interner);
    let second = parse_ok(&text, &interner);
    first.structurally_eq(&second)
}

#[test]
fn sample_programs_round_trip() {
    for source in [
        "a b c",
        "f(1, \"two\\n\", [3, {4}])",
        "x := method(a, b, a + b)\nx(1, 2) println",
        "(1 + 2) * 3; f()(y)",
        "\"\"\"raw \"text\" here\"\"\" size",
        "0x10 1e999 .5",
    ] {
        assert!(round_trips(source), "{source}");
    }
}

fn ident() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,4}"
}

fn program() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        ident(),
        (0u32..100_000).prop_map(|n| n.to_string()),
        "[a-z \\\\\"]{0,6}".prop_map(|s| format!("{s:?}")),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            (ident(), prop::collection::vec(inner.clone(), 1..4))
                .prop_map(|(name, args)| format!("{name}({})", args.join(", "))),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|args| format!("[{}]", args.join(", "))),
            prop::collection::vec(inner.clone(), 2..4).prop_map(|parts| parts.join(" ")),
            prop::collection::vec(inner, 2..4).prop_map(|parts| parts.join(";\n")),
        ]
    })
}

proptest! {
    #[test]
    fn parse_render_parse_is_stable(source in program()) {
        prop_assert!(round_trips(&source), "{}", source);
    }
}
