//! Property: splitting a byte stream into arbitrary chunks before
//! pushing it must not change the sequence of events a sink observes.

use gdbmi::driver::{Driver, RawSink};
use gdbmi::error::ParseError;
use gdbmi::tree::OutputCommand;
use proptest::collection::vec as pvec;
use proptest::prelude::*;

#[derive(Default, Debug, PartialEq)]
struct Trace {
    outputs: Vec<OutputCommand>,
    prompts: Vec<String>,
    errors: Vec<ParseError>,
}

impl RawSink for Trace {
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

const LINES: &[&str] = &[
    "~\"Reading symbols from a.out...\"",
    "&\"warning: stale symbol table\\n\"",
    "*stopped,reason=\"breakpoint-hit\",bkptno=\"1\",thread-id=\"1\"",
    "=breakpoint-modified,bkpt={number=\"1\",enabled=\"y\"}",
    "+download,section=\".text\",section-size=\"1024\"",
    "512^done,value=\"42\"",
    "7^error,msg=\"No symbol \\\"foo\\\" in current context.\"",
    "(gdb) ",
    "^whatever-this-is-not-a-class",
    "@\"target stdout line\\n\"",
];

fn split_arbitrarily(bytes: &[u8], cut_points: &[usize]) -> Vec<Vec<u8>> {
    let mut cuts: Vec<usize> = cut_points.iter().map(|c| c % (bytes.len() + 1)).collect();
    cuts.sort_unstable();
    cuts.dedup();
    let mut chunks = Vec::new();
    let mut prev = 0;
    for &cut in &cuts {
        chunks.push(bytes[prev..cut].to_vec());
        prev = cut;
    }
    chunks.push(bytes[prev..].to_vec());
    chunks
}

fn run(bytes: &[u8], chunks: &[Vec<u8>]) -> Trace {
    let mut driver = Driver::new(Trace::default());
    for chunk in chunks {
        driver.push(chunk);
    }
    let whole = {
        let mut d = Driver::new(Trace::default());
        d.push(bytes);
        d.into_sink()
    };
    let fragmented = driver.into_sink();
    assert_eq!(whole, fragmented, "fragmented push diverged from a single whole push");
    fragmented
}

proptest! {
    #[test]
    fn push_fragmentation_is_invariant(
        line_indices in pvec(0..LINES.len(), 1..12),
        cut_points in pvec(any::<usize>(), 0..20),
    ) {
        let mut text = String::new();
        for &i in &line_indices {
            text.push_str(LINES[i]);
            text.push('\n');
        }
        let bytes = text.into_bytes();
        let chunks = split_arbitrarily(&bytes, &cut_points);
        run(&bytes, &chunks);
    }

    #[test]
    fn byte_at_a_time_matches_whole_buffer(
        line_indices in pvec(0..LINES.len(), 1..8),
    ) {
        let mut text = String::new();
        for &i in &line_indices {
            text.push_str(LINES[i]);
            text.push('\n');
        }
        let bytes = text.into_bytes();
        let byte_chunks: Vec<Vec<u8>> = bytes.iter().map(|b| vec![*b]).collect();
        run(&bytes, &byte_chunks);
    }
}
