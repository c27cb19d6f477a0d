//! Incremental driver (spec §4.3): buffers bytes across `push` calls,
//! delimits complete lines, feeds each one through [`crate::grammar`],
//! and emits completed output commands, prompts, and parse errors
//! through a [`RawSink`].
//!
//! Scheduling is single-threaded, cooperative, and fully synchronous
//! (spec §5): `push` runs to completion, invoking zero or more sink
//! methods inline, and never yields except by returning. Callbacks must
//! not call back into the same driver instance — its internal buffers
//! are not reentrant.

use tracing::{debug, trace, warn};

use crate::error::ParseError;
use crate::grammar::{self, Line};
use crate::tree::OutputCommand;

/// The raw event surface C4 exposes: one callback per finalized output
/// command, one per prompt line, one per recovered parse error (spec
/// §6.1). [`crate::facade::Facade`] is the convenience layer built on
/// top of this that most hosts should reach for instead.
pub trait RawSink {
    /// A command's out-of-band records and optional result record,
    /// delivered the instant its terminating prompt is seen. Never
    /// called for a bare prompt with nothing accumulated ahead of it
    /// (spec §3).
    fn on_output(&mut self, output: OutputCommand);

    /// Fires for every `(gdb) ` line, including standalone ones.
    fn on_prompt(&mut self, prompt_text: &str);

    /// Fires once per line that failed to parse. The offending line has
    /// already been discarded and any command under construction
    /// dropped by the time this is called (spec §7).
    fn on_parse_error(&mut self, error: ParseError);
}

/// Maintains a line buffer across `push` calls and the output command
/// currently under construction.
pub struct Driver<S: RawSink> {
    buffer: Vec<u8>,
    pending: OutputCommand,
    sink: S,
}

impl<S: RawSink> Driver<S> {
    pub fn new(sink: S) -> Self {
        Driver { buffer: Vec::new(), pending: OutputCommand::default(), sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Append `bytes` to the internal line buffer and process every
    /// complete line it now contains. Tolerates arbitrary fragmentation,
    /// including a single byte per call (spec §4.3).
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
        while let Some(newline_at) = self.buffer.iter().position(|&b| b == b'\n') {
            let mut line_bytes: Vec<u8> = self.buffer.drain(..=newline_at).collect();
            line_bytes.pop(); // drop the '\n'
            if line_bytes.last() == Some(&b'\r') {
                line_bytes.pop(); // accept CRLF line endings (spec §9)
            }
            let line = String::from_utf8_lossy(&line_bytes).into_owned();
            self.process_line(&line);
        }
    }

    /// Signal that the host has reached end-of-stream (the debugger
    /// exited). Any command under construction, and any incomplete
    /// trailing line in the buffer, is discarded silently — this is the
    /// normal way a debugger session ends and is not reported as a
    /// parse error (spec §4.3 "Finalization").
    pub fn end_of_stream(&mut self) {
        if !self.pending.is_empty() {
            debug!("discarding unterminated output command at end of stream");
        }
        self.pending = OutputCommand::default();
        self.buffer.clear();
    }

    fn process_line(&mut self, line: &str) {
        match grammar::parse_line(line) {
            Ok(Line::Result(record)) => {
                trace!(class = %record.class, "parsed result record");
                self.pending.result = Some(record);
            }
            Ok(Line::Oob(record)) => {
                trace!("parsed out-of-band record");
                self.pending.oob.push(record);
            }
            Ok(Line::Prompt) => {
                let command = std::mem::take(&mut self.pending);
                if !command.is_empty() {
                    self.sink.on_output(command);
                }
                self.sink.on_prompt(line);
            }
            Err(error) => {
                warn!(line, category = ?error.category, "parse error, resynchronizing at next line");
                self.pending = OutputCommand::default();
                self.sink.on_parse_error(error);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tree::{AsyncClass, AsyncKind, OobRecord, ResultClass, StreamKind};

    #[derive(Default)]
    struct Recorder {
        outputs: Vec<OutputCommand>,
        prompts: Vec<String>,
        errors: Vec<ParseError>,
    }

    impl RawSink for Recorder {
        fn on_output(&mut self, output: OutputCommand) {
            self.outputs.push(output);
        }

        fn on_prompt(&mut self, prompt_text: &str) {
            self.prompts.push(prompt_text.to_string());
        }

        fn on_parse_error(&mut self, error: ParseError) {
            self.errors.push(error);
        }
    }

    #[test]
    fn single_push_produces_stream_then_prompt() {
        let mut driver = Driver::new(Recorder::default());
        driver.push(b"~\"Hello World console output\"\n(gdb) \n");
        let rec = driver.into_sink();
        assert_eq!(rec.outputs.len(), 1);
        assert_eq!(rec.prompts.len(), 1);
        match &rec.outputs[0].oob[0] {
            OobRecord::Stream { kind: StreamKind::Console, text } => {
                assert_eq!(text, "Hello World console output");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn byte_at_a_time_matches_whole_buffer_push() {
        let input = b"=breakpoint-created,bkpt={number=\"2\",type=\"breakpoint\",line=\"9\"}\n(gdb) \n";

        let mut whole = Driver::new(Recorder::default());
        whole.push(input);
        let whole = whole.into_sink();

        let mut fragmented = Driver::new(Recorder::default());
        for byte in input {
            fragmented.push(&[*byte]);
        }
        let fragmented = fragmented.into_sink();

        assert_eq!(whole.outputs, fragmented.outputs);
        assert_eq!(whole.prompts, fragmented.prompts);
        assert_eq!(whole.errors, fragmented.errors);
    }

    #[test]
    fn bare_prompt_emits_no_output_command() {
        let mut driver = Driver::new(Recorder::default());
        driver.push(b"(gdb) \n");
        let rec = driver.into_sink();
        assert!(rec.outputs.is_empty());
        assert_eq!(rec.prompts, vec!["(gdb) ".to_string()]);
    }

    #[test]
    fn parse_error_resyncs_at_next_line() {
        let mut driver = Driver::new(Recorder::default());
        driver.push(b"^bogus\n*running,thread-id=\"all\"\n(gdb) \n");
        let rec = driver.into_sink();
        assert_eq!(rec.errors.len(), 1);
        assert_eq!(rec.outputs.len(), 1);
        match &rec.outputs[0].oob[0] {
            OobRecord::Async { kind: AsyncKind::Exec, class: AsyncClass::Running, .. } => {}
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn unterminated_command_discarded_silently_at_end_of_stream() {
        let mut driver = Driver::new(Recorder::default());
        driver.push(b"~\"partial command, no prompt yet\"\n");
        driver.end_of_stream();
        let rec = driver.into_sink();
        assert!(rec.outputs.is_empty());
        assert!(rec.errors.is_empty());
    }

    #[test]
    fn result_record_precedes_prompt_result_class_display() {
        let mut driver = Driver::new(Recorder::default());
        driver.push(b"^done\n(gdb) \n");
        let rec = driver.into_sink();
        match rec.outputs[0].result.as_ref().unwrap().class {
            ResultClass::Done => {}
            other => panic!("unexpected: {other:?}"),
        }
    }
}
