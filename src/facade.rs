//! High-level façade (spec §6): the convenience API most hosts reach
//! for instead of implementing [`RawSink`] directly. Splits a finalized
//! [`OutputCommand`] into its individual records and delivers each one
//! through its own callback, in the order it originally arrived in the
//! byte stream.

use crate::driver::{Driver, RawSink};
use crate::error::ParseError;
use crate::tree::{AsyncClass, AsyncKind, MiResult, OobRecord, ResultClass, StreamKind};

/// A borrowed view of one async record's fields, handed to
/// [`Callbacks::on_async`] (spec §6.2).
#[derive(Debug)]
pub struct AsyncRecordView<'a> {
    pub token: Option<u64>,
    pub kind: AsyncKind,
    pub class: &'a AsyncClass,
    pub results: &'a [MiResult],
}

/// A borrowed view of one stream record's fields, handed to
/// [`Callbacks::on_stream`] (spec §6.2).
#[derive(Debug)]
pub struct StreamRecordView<'a> {
    pub kind: StreamKind,
    pub text: &'a str,
}

/// A borrowed view of one result record's fields, handed to
/// [`Callbacks::on_result`] (spec §6.2).
#[derive(Debug)]
pub struct ResultRecordView<'a> {
    pub token: Option<u64>,
    pub class: ResultClass,
    pub results: &'a [MiResult],
}

/// The five optional callbacks making up the façade's event surface
/// (spec §6.1). Any callback left `None` simply drops that event; a
/// host interested only in stream text, for instance, sets `on_stream`
/// and nothing else.
#[derive(Default)]
pub struct Callbacks<'a> {
    pub on_result: Option<Box<dyn FnMut(ResultRecordView<'_>) + 'a>>,
    pub on_async: Option<Box<dyn FnMut(AsyncRecordView<'_>) + 'a>>,
    pub on_stream: Option<Box<dyn FnMut(StreamRecordView<'_>) + 'a>>,
    pub on_prompt: Option<Box<dyn FnMut(&str) + 'a>>,
    pub on_parse_error: Option<Box<dyn FnMut(ParseError) + 'a>>,
}

impl<'a> Callbacks<'a> {
    pub fn new() -> Self {
        Callbacks::default()
    }

    pub fn result(mut self, f: impl FnMut(ResultRecordView<'_>) + 'a) -> Self {
        self.on_result = Some(Box::new(f));
        self
    }

    pub fn async_record(mut self, f: impl FnMut(AsyncRecordView<'_>) + 'a) -> Self {
        self.on_async = Some(Box::new(f));
        self
    }

    pub fn stream(mut self, f: impl FnMut(StreamRecordView<'_>) + 'a) -> Self {
        self.on_stream = Some(Box::new(f));
        self
    }

    pub fn prompt(mut self, f: impl FnMut(&str) + 'a) -> Self {
        self.on_prompt = Some(Box::new(f));
        self
    }

    pub fn parse_error(mut self, f: impl FnMut(ParseError) + 'a) -> Self {
        self.on_parse_error = Some(Box::new(f));
        self
    }
}

struct FacadeSink<'a> {
    callbacks: Callbacks<'a>,
}

impl<'a> RawSink for FacadeSink<'a> {
    fn on_output(&mut self, output: crate::tree::OutputCommand) {
        for oob in output.oob {
            match oob {
                OobRecord::Async { token, kind, class, results } => {
                    if let Some(cb) = self.callbacks.on_async.as_mut() {
                        cb(AsyncRecordView { token, kind, class: &class, results: &results });
                    }
                }
                OobRecord::Stream { kind, text } => {
                    if let Some(cb) = self.callbacks.on_stream.as_mut() {
                        cb(StreamRecordView { kind, text: &text });
                    }
                }
            }
        }
        if let Some(record) = output.result {
            if let Some(cb) = self.callbacks.on_result.as_mut() {
                cb(ResultRecordView { token: record.token, class: record.class, results: &record.results });
            }
        }
    }

    fn on_prompt(&mut self, prompt_text: &str) {
        if let Some(cb) = self.callbacks.on_prompt.as_mut() {
            cb(prompt_text);
        }
    }

    fn on_parse_error(&mut self, error: ParseError) {
        if let Some(cb) = self.callbacks.on_parse_error.as_mut() {
            cb(error);
        }
    }
}

/// The high-level entry point (spec §6): wraps a [`Driver`] and a set of
/// [`Callbacks`], decomposing every finalized output command into
/// individual calls in arrival order (out-of-band records first, the
/// result record last if one was present, then the prompt callback).
pub struct Facade<'a> {
    driver: Driver<FacadeSink<'a>>,
}

impl<'a> Facade<'a> {
    pub fn new(callbacks: Callbacks<'a>) -> Self {
        Facade { driver: Driver::new(FacadeSink { callbacks }) }
    }

    /// Feed another chunk of bytes in from the wire. See
    /// [`Driver::push`] for fragmentation guarantees.
    pub fn push(&mut self, bytes: &[u8]) {
        self.driver.push(bytes);
    }

    /// See [`Driver::end_of_stream`].
    pub fn end_of_stream(&mut self) {
        self.driver.end_of_stream();
    }
}
