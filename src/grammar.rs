//! Grammar recognizer (spec §4.2): builds the parse tree (spec §3) from a
//! single complete line of input, following the EBNF in spec §4.2.
//!
//! Lines never carry their terminating newline here — [`crate::driver`]
//! delimits lines and strips the line ending (and any trailing `\r`)
//! before calling into this module, so none of these parsers need to
//! consume `NL` themselves.

use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, space0};
use nom::combinator::{all_consuming, cut, map, opt, value};
use nom::multi::{many0, separated_list0};
use nom::sequence::{delimited, preceded, separated_pair};
use nom::{IResult, Parser};

use crate::error::{recategorize, ErrorCategory, GrammarError, ParseError, Position};
use crate::scanner::{cstring, identifier, prompt_marker, token};
use crate::tree::{
    AsyncClass, AsyncKind, MiResult, MiValue, OobRecord, ResultClass, ResultRecord, StreamKind,
};

type PResult<'a, T> = IResult<&'a str, T, GrammarError<'a>>;

/// What a single line reduces to.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Line {
    Result(ResultRecord),
    Oob(OobRecord),
    Prompt,
}

/// `result-class := "done" | "running" | "connected" | "error" | "exit"`
/// (spec §4.2). Closed set; any other identifier is retagged as a
/// classification error by its caller via `cut`, since by the time this
/// runs the line has already committed to being a result record.
fn result_class(input: &str) -> PResult<'_, ResultClass> {
    alt((
        value(ResultClass::Done, tag("done")),
        value(ResultClass::Running, tag("running")),
        value(ResultClass::Connected, tag("connected")),
        value(ResultClass::Error, tag("error")),
        value(ResultClass::Exit, tag("exit")),
    ))
    .parse(input)
    .map_err(|e| recategorize(e, ErrorCategory::Classification))
}

/// `async-class := IDENT`, mapped onto the closed set recovered from
/// `gdbmi_pt.h`'s `gdbmi_async_class` enum, with an explicit
/// [`AsyncClass::Unsupported`] fallback (spec §4.2). This production can
/// never fail: any identifier that isn't one of the known tags still
/// matches as unsupported, which is what keeps the parser
/// forward-compatible with newer debugger versions.
fn async_class(input: &str) -> PResult<'_, AsyncClass> {
    alt((
        alt((
            value(AsyncClass::Download, tag("download")),
            value(AsyncClass::Stopped, tag("stopped")),
            value(AsyncClass::Running, tag("running")),
            value(AsyncClass::ThreadGroupAdded, tag("thread-group-added")),
            value(AsyncClass::ThreadGroupRemoved, tag("thread-group-removed")),
            value(AsyncClass::ThreadGroupStarted, tag("thread-group-started")),
            value(AsyncClass::ThreadGroupExited, tag("thread-group-exited")),
            value(AsyncClass::ThreadCreated, tag("thread-created")),
            value(AsyncClass::ThreadExited, tag("thread-exited")),
            value(AsyncClass::ThreadSelected, tag("thread-selected")),
        )),
        alt((
            value(AsyncClass::LibraryLoaded, tag("library-loaded")),
            value(AsyncClass::LibraryUnloaded, tag("library-unloaded")),
            value(AsyncClass::TraceframeChanged, tag("traceframe-changed")),
            value(AsyncClass::TsvCreated, tag("tsv-created")),
            value(AsyncClass::TsvModified, tag("tsv-modified")),
            value(AsyncClass::TsvDeleted, tag("tsv-deleted")),
            value(AsyncClass::BreakpointCreated, tag("breakpoint-created")),
            value(AsyncClass::BreakpointModified, tag("breakpoint-modified")),
            value(AsyncClass::BreakpointDeleted, tag("breakpoint-deleted")),
        )),
        alt((
            value(AsyncClass::RecordStarted, tag("record-started")),
            value(AsyncClass::RecordStopped, tag("record-stopped")),
            value(AsyncClass::CmdParamChanged, tag("cmd-param-changed")),
            value(AsyncClass::MemoryChanged, tag("memory-changed")),
        )),
        map(identifier, |s: &str| AsyncClass::Unsupported(s.to_string())),
    ))
    .parse(input)
}

fn async_kind(input: &str) -> PResult<'_, AsyncKind> {
    alt((
        value(AsyncKind::Exec, char('*')),
        value(AsyncKind::Status, char('+')),
        value(AsyncKind::Notify, char('=')),
    ))
    .parse(input)
}

fn stream_kind(input: &str) -> PResult<'_, StreamKind> {
    alt((
        value(StreamKind::Console, char('~')),
        value(StreamKind::Target, char('@')),
        value(StreamKind::Log, char('&')),
    ))
    .parse(input)
}

/// Permit whitespace on both sides of a delimiter (spec §4.2: "whitespace
/// is permitted around `=` and between commas and following tokens").
fn ws<'a, O>(
    mut inner: impl Parser<&'a str, Output = O, Error = GrammarError<'a>>,
) -> impl FnMut(&'a str) -> PResult<'a, O> {
    move |input| {
        let (input, _) = space0(input)?;
        let (input, out) = inner.parse(input)?;
        let (input, _) = space0(input)?;
        Ok((input, out))
    }
}

/// `value := cstring | '{' ... '}' | '[' ... ']'`
fn mi_value(input: &str) -> PResult<'_, MiValue> {
    alt((map(cstring, MiValue::CString), map(tuple, MiValue::Tuple), map(list, MiValue::List)))
        .parse(input)
}

/// `'{' [ result (',' result)* ] '}'`. Every child here must carry a
/// `variable` — a keyless entry is a parse error (spec §4.2's tie-break:
/// "Tuple results must all carry variables; a keyless entry inside
/// `{...}` is a parse error").
fn tuple(input: &str) -> PResult<'_, Vec<MiResult>> {
    delimited(char('{'), separated_list0(ws(char(',')), named_result), cut(preceded(space0, char('}'))))
        .parse(input)
}

/// `'[' [ result (',' result)* ] ']'`. Children may freely omit their
/// `variable`.
fn list(input: &str) -> PResult<'_, Vec<MiResult>> {
    delimited(char('['), separated_list0(ws(char(',')), result_item), cut(preceded(space0, char(']'))))
        .parse(input)
}

fn named_result(input: &str) -> PResult<'_, MiResult> {
    map(separated_pair(identifier, ws(char('=')), mi_value), |(name, val)| MiResult::named(name, val))
        .parse(input)
}

/// `result := variable '=' value | value` — used only inside lists,
/// where a bare value without a key is allowed.
fn result_item(input: &str) -> PResult<'_, MiResult> {
    alt((named_result, map(mi_value, MiResult::unnamed))).parse(input)
}

/// The comma-separated results directly after a record's class/prefix.
/// At this level every entry carries a key (spec §3: "at the top level
/// of a record, entries have keys").
fn top_level_results(input: &str) -> PResult<'_, Vec<MiResult>> {
    many0(preceded(ws(char(',')), named_result)).parse(input)
}

/// `[token] '^' result-class (',' result)*` (spec §4.2).
fn result_record(input: &str) -> PResult<'_, ResultRecord> {
    map((opt(token), char('^'), cut(result_class), top_level_results), |(tok, _, class, results)| {
        ResultRecord { token: tok, class, results }
    })
    .parse(input)
}

/// `[token] async-kind async-class (',' result)*` (spec §4.2). The
/// manual reserves a leading token for async records even though GDB
/// does not currently emit one (spec §9); accepted here and surfaced on
/// the record, never relied upon.
fn async_record(input: &str) -> PResult<'_, OobRecord> {
    map((opt(token), async_kind, async_class, top_level_results), |(tok, kind, class, results)| {
        OobRecord::Async { token: tok, kind, class, results }
    })
    .parse(input)
}

/// `stream-kind cstring` (spec §4.2).
fn stream_record(input: &str) -> PResult<'_, OobRecord> {
    map((stream_kind, cstring), |(kind, text)| OobRecord::Stream { kind, text }).parse(input)
}

fn oob_record(input: &str) -> PResult<'_, OobRecord> {
    alt((stream_record, async_record)).parse(input)
}

fn prompt(input: &str) -> PResult<'_, ()> {
    prompt_marker(input)
}

/// Parse one complete logical line (already stripped of its line ending)
/// into a [`Line`]. `all_consuming` rejects trailing garbage after a
/// production that otherwise matched — the grammar in spec §4.2 admits
/// no extra bytes at the end of a line.
pub(crate) fn parse_line(line: &str) -> Result<Line, ParseError> {
    let parsed = all_consuming(alt((
        map(result_record, Line::Result),
        map(oob_record, Line::Oob),
        map(prompt, |_| Line::Prompt),
    )))
    .parse(line);

    match parsed {
        Ok((_, line_value)) => Ok(line_value),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(crate::error::build_parse_error(line, e))
        }
        Err(nom::Err::Incomplete(_)) => {
            let end = line.chars().count().max(1);
            Err(ParseError {
                line: line.to_string(),
                near_token: String::new(),
                position: Position { start_column: end, end_column: end },
                category: ErrorCategory::Syntax,
            })
        }
    }
}
