//! Error taxonomy and the parse-error callback payload (spec §7, §6.3).
//!
//! Category 1 of spec §7 ("allocation failure") has no idiomatic Rust
//! analogue here: the global allocator aborts the process on OOM rather
//! than returning a sentinel, so [`crate::driver::Driver::push`] is
//! infallible and categories 2-4 are the only ones this crate models.

use nom::error::ErrorKind;

/// Where inside a line a parse error occurred: 1-based start/end columns
/// (spec §6.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub start_column: usize,
    pub end_column: usize,
}

/// Which of spec §7's recovered-locally categories a parse error belongs
/// to. Async-class mismatches never produce a `Classification` error —
/// they degrade to [`crate::tree::AsyncClass::Unsupported`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unterminated string, bad escape sequence (spec §7 category 2).
    Lexical,
    /// Grammar mismatch on a line (spec §7 category 3).
    Syntax,
    /// Unrecognized result class (spec §7 category 4).
    Classification,
}

/// The payload delivered through the parse-error callback. The offending
/// line is discarded and parsing resumes at the next one; this value is
/// everything the host needs to log the failure and continue (spec §6.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub line: String,
    pub near_token: String,
    pub position: Position,
    pub category: ErrorCategory,
}

/// nom's error type for the grammar recognizer (spec §4.1/§4.2). Carries
/// a category plus the remaining input at the point of failure, which is
/// enough to compute a column and a "near token" once the full line is
/// back in scope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrammarError<'a> {
    pub category: ErrorCategory,
    pub at: &'a str,
}

impl<'a> GrammarError<'a> {
    pub fn new(category: ErrorCategory, at: &'a str) -> Self {
        GrammarError { category, at }
    }

    pub(crate) fn recategorize(self, category: ErrorCategory) -> Self {
        GrammarError { category, at: self.at }
    }
}

impl<'a> nom::error::ParseError<&'a str> for GrammarError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        GrammarError::new(ErrorCategory::Syntax, input)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }

    fn or(self, other: Self) -> Self {
        // `alt` keeps only the last branch's error by default; prefer
        // whichever branch consumed more of the line before failing,
        // since that's almost always the more informative one to report.
        if other.at.len() < self.at.len() {
            other
        } else {
            self
        }
    }
}

impl<'a> nom::error::FromExternalError<&'a str, std::num::ParseIntError> for GrammarError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, _e: std::num::ParseIntError) -> Self {
        GrammarError::new(ErrorCategory::Syntax, input)
    }
}

/// Retag a nom error's category, keeping its failed-at position. Used at
/// the points in the scanner/grammar where a branch is known, by
/// construction, to belong to a specific category once it's been
/// entered — e.g. anything that fails while inside an already-opened
/// quoted string is lexical, not a generic syntax error.
pub(crate) fn recategorize(
    err: nom::Err<GrammarError<'_>>,
    category: ErrorCategory,
) -> nom::Err<GrammarError<'_>> {
    match err {
        nom::Err::Error(e) => nom::Err::Error(e.recategorize(category)),
        nom::Err::Failure(e) => nom::Err::Failure(e.recategorize(category)),
        nom::Err::Incomplete(n) => nom::Err::Incomplete(n),
    }
}

/// Build the host-facing [`ParseError`] from the grammar's internal error
/// once the full line text is available.
pub(crate) fn build_parse_error(line: &str, err: GrammarError<'_>) -> ParseError {
    let consumed_bytes = line.len() - err.at.len();
    let consumed_chars = line[..consumed_bytes].chars().count();
    let near = nearby_token(err.at);
    let near_chars = near.chars().count();
    let start_column = consumed_chars + 1;
    let end_column = if near_chars == 0 { start_column } else { start_column + near_chars - 1 };

    ParseError {
        line: line.to_string(),
        near_token: near.to_string(),
        position: Position { start_column, end_column },
        category: err.category,
    }
}

/// The substring at the error cursor: a run up to the next structural
/// delimiter or whitespace, empty if the cursor sits at end-of-line
/// (spec §6.3).
fn nearby_token(at: &str) -> &str {
    let trimmed = at.trim_start();
    let end = trimmed
        .find(|c: char| matches!(c, ',' | '{' | '}' | '[' | ']') || c.is_whitespace())
        .unwrap_or(trimmed.len());
    &trimmed[..end]
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn nearby_token_stops_at_delimiter() {
        assert_eq!(nearby_token("foo,bar"), "foo");
        assert_eq!(nearby_token("  foo}"), "foo");
        assert_eq!(nearby_token(""), "");
        assert_eq!(nearby_token("   "), "");
    }

    #[test]
    fn build_parse_error_computes_1_based_columns() {
        let line = "^unknownclass";
        let err = GrammarError::new(ErrorCategory::Classification, &line[1..]);
        let parsed = build_parse_error(line, err);
        assert_eq!(parsed.position.start_column, 2);
        assert_eq!(parsed.near_token, "unknownclass");
        assert_eq!(parsed.category, ErrorCategory::Classification);
    }
}
