//! Lexical scanner (spec §4.1): byte-level primitives for the grammar
//! recognizer. Single-character punctuation is classified inline at the
//! point of use in [`crate::grammar`] (there's nothing to decode), so
//! this module covers only the productions with actual structure: the
//! token field, identifiers, and C-escaped strings.

use nom::branch::alt;
use nom::bytes::complete::{is_not, tag, take_while1, take_while_m_n};
use nom::character::complete::char;
use nom::combinator::{cut, map, map_opt, map_res, opt, value, verify};
use nom::multi::fold;
use nom::sequence::preceded;
use nom::{IResult, Parser};

use crate::error::{recategorize, ErrorCategory, GrammarError};

pub(crate) type PResult<'a, T> = IResult<&'a str, T, GrammarError<'a>>;

/// `token := DIGITS`, the decimal token field correlating a reply with
/// the command that produced it.
pub(crate) fn token(input: &str) -> PResult<'_, u64> {
    map_res(nom::character::complete::digit1, str::parse::<u64>).parse(input)
}

/// `variable := IDENT`, also used for result-class and async-class
/// names: a run of letters, digits, hyphens, and underscores.
pub(crate) fn identifier(input: &str) -> PResult<'_, &str> {
    take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-' || c == '_').parse(input)
}

/// `(gdb)` optionally followed by a single trailing space — the prompt
/// marker. Both forms are accepted (spec §9, "Open question — prompt
/// line bytes").
pub(crate) fn prompt_marker(input: &str) -> PResult<'_, ()> {
    value((), (tag("(gdb)"), opt(char(' ')))).parse(input)
}

/// An escaped character: `\\ \" \n \t \r \a \b \f \v` or a three-digit
/// octal escape `\DDD` (spec §4.1). Anything else after a backslash is a
/// lexical error.
fn escaped_char(input: &str) -> PResult<'_, char> {
    preceded(
        char('\\'),
        cut(alt((
            value('\\', char('\\')),
            value('"', char('"')),
            value('\n', char('n')),
            value('\t', char('t')),
            value('\r', char('r')),
            value('\u{07}', char('a')),
            value('\u{08}', char('b')),
            value('\u{0C}', char('f')),
            value('\u{0B}', char('v')),
            octal_escape,
        ))),
    )
    .parse(input)
}

/// `\DDD`: three octal digits naming a byte value.
fn octal_escape(input: &str) -> PResult<'_, char> {
    map_opt(
        take_while_m_n(3, 3, |c: char| ('0'..='7').contains(&c)),
        |digits: &str| u32::from_str_radix(digits, 8).ok().and_then(char::from_u32),
    )
    .parse(input)
}

/// A non-empty run of characters containing neither a backslash nor a
/// double quote.
fn literal(input: &str) -> PResult<'_, &str> {
    verify(is_not("\"\\"), |s: &str| !s.is_empty()).parse(input)
}

enum Fragment<'a> {
    Literal(&'a str),
    Escaped(char),
}

fn fragment(input: &str) -> PResult<'_, Fragment<'_>> {
    alt((map(literal, Fragment::Literal), map(escaped_char, Fragment::Escaped))).parse(input)
}

/// `cstring := '"' ... '"'`, decoded to the bytes it represents. An
/// unterminated string, or a backslash followed by an unrecognized
/// escape, is a lexical error — both commit via `cut` once the opening
/// quote has been matched, so they abort the whole line rather than
/// letting the grammar try to interpret it as a tuple or list instead.
pub(crate) fn cstring(input: &str) -> PResult<'_, String> {
    let (input, _) = char('"').parse(input)?;

    let decode_body = fold(0.., fragment, String::new, |mut out, frag| {
        match frag {
            Fragment::Literal(lit) => out.push_str(lit),
            Fragment::Escaped(c) => out.push(c),
        }
        out
    });

    let (input, (decoded, _)) = cut((decode_body, char('"')))
        .parse(input)
        .map_err(|e| recategorize(e, ErrorCategory::Lexical))?;
    Ok((input, decoded))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn decodes_plain_text() {
        assert_eq!(cstring("\"hello\"rest").unwrap(), ("rest", "hello".to_string()));
    }

    #[test]
    fn decodes_standard_escapes() {
        let (rest, decoded) = cstring(r#""a\nb\tc\\d\"e""#).unwrap();
        assert_eq!(rest, "");
        assert_eq!(decoded, "a\nb\tc\\d\"e");
    }

    #[test]
    fn decodes_octal_escape() {
        let (_, decoded) = cstring(r#""\101\102""#).unwrap();
        assert_eq!(decoded, "AB");
    }

    #[test]
    fn unterminated_string_is_lexical_error() {
        let err = cstring("\"unterminated").unwrap_err();
        match err {
            nom::Err::Failure(e) => assert_eq!(e.category, ErrorCategory::Lexical),
            other => panic!("expected a hard lexical failure, got {other:?}"),
        }
    }

    #[test]
    fn identifier_accepts_hyphenated_names() {
        assert_eq!(identifier("breakpoint-hit,x").unwrap().1, "breakpoint-hit");
    }

    #[test]
    fn prompt_accepts_with_and_without_trailing_space() {
        assert_eq!(prompt_marker("(gdb) ").unwrap().0, "");
        assert_eq!(prompt_marker("(gdb)").unwrap().0, "");
    }
}
