//! The GDB/MI parse tree: output commands, records, and results (spec §3).
//!
//! Every value here is owned outright; there is no sharing and no cycles.
//! A tree is built during grammar reduction and handed to the host through
//! a callback — ownership transfers at that instant and the parser keeps
//! no reference to it afterwards.

use std::fmt;

/// The result class of a [`ResultRecord`] (`^done`, `^error`, ...).
///
/// Closed set: an identifier that doesn't match one of these five names is
/// a classification error (spec §7), not a new variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultClass {
    Done,
    Running,
    Connected,
    Error,
    Exit,
}

impl fmt::Display for ResultClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResultClass::Done => "done",
            ResultClass::Running => "running",
            ResultClass::Connected => "connected",
            ResultClass::Error => "error",
            ResultClass::Exit => "exit",
        };
        f.write_str(s)
    }
}

/// The documented async classes GDB emits, recovered in full from
/// `gdbmi_pt.h`'s `gdbmi_async_class` enumeration, plus the
/// forward-compatible escape hatch for anything newer (spec §4.2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsyncClass {
    Download,
    Stopped,
    Running,
    ThreadGroupAdded,
    ThreadGroupRemoved,
    ThreadGroupStarted,
    ThreadGroupExited,
    ThreadCreated,
    ThreadExited,
    ThreadSelected,
    LibraryLoaded,
    LibraryUnloaded,
    TraceframeChanged,
    TsvCreated,
    TsvModified,
    TsvDeleted,
    BreakpointCreated,
    BreakpointModified,
    BreakpointDeleted,
    RecordStarted,
    RecordStopped,
    CmdParamChanged,
    MemoryChanged,
    /// Anything outside the known set. Carries the raw identifier so a
    /// forward-compatible front end can still log or display it; parsing
    /// never fails because of it (spec §4.2's classification policy).
    Unsupported(String),
}

/// Which of the three async record prefixes (`*`, `+`, `=`) produced a
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AsyncKind {
    /// `*`: asynchronous state change regarding the target.
    Exec,
    /// `+`: ongoing status of a slow operation, safe to discard.
    Status,
    /// `=`: supplementary information the client should handle.
    Notify,
}

/// Which of the three stream record prefixes (`~`, `@`, `&`) produced a
/// record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamKind {
    /// `~`: textual response to a CLI command.
    Console,
    /// `@`: output produced by the target program.
    Target,
    /// `&`: GDB's own internal log output.
    Log,
}

/// A named (or, inside a list, possibly unnamed) value in the result tree.
#[derive(Debug, Clone, PartialEq)]
pub struct MiResult {
    /// `None` only ever occurs for entries inside a [`MiValue::List`] —
    /// tuple children always carry a variable (spec §3 invariants).
    pub variable: Option<String>,
    pub value: MiValue,
}

impl MiResult {
    pub fn named(variable: impl Into<String>, value: MiValue) -> Self {
        MiResult { variable: Some(variable.into()), value }
    }

    pub fn unnamed(value: MiValue) -> Self {
        MiResult { variable: None, value }
    }
}

/// The small JSON-like value language GDB/MI results are built from
/// (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub enum MiValue {
    CString(String),
    /// Every child must carry a `variable`; enforced at parse time by the
    /// grammar recognizer, not re-checked here.
    Tuple(Vec<MiResult>),
    /// Children may or may not carry a `variable`.
    List(Vec<MiResult>),
}

/// The reply to a command the front end previously issued.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRecord {
    /// Echoed back from the request so the front end can correlate a
    /// reply with the command that produced it. `None` when the token
    /// was omitted — front ends should avoid sending a literal token of
    /// zero, since it is indistinguishable from "absent" (spec §3).
    pub token: Option<u64>,
    pub class: ResultClass,
    pub results: Vec<MiResult>,
}

/// An unsolicited out-of-band notification: either an asynchronous state
/// change or a stream of text (spec §3).
#[derive(Debug, Clone, PartialEq)]
pub enum OobRecord {
    Async {
        /// Reserved by the grammar; GDB does not currently populate this
        /// on output, but the parser accepts and surfaces it if present
        /// (spec §9, "Open question — token on async records").
        token: Option<u64>,
        kind: AsyncKind,
        class: AsyncClass,
        results: Vec<MiResult>,
    },
    Stream { kind: StreamKind, text: String },
}

/// One complete output command: the out-of-band records and optional
/// result record that precede a single `(gdb) ` prompt line.
///
/// The grammar requires at least one of the two parts; a prompt with
/// nothing accumulated ahead of it is delivered as its own event by the
/// driver instead of as an empty `OutputCommand` (spec §3: "a bare prompt
/// is its own event").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutputCommand {
    pub oob: Vec<OobRecord>,
    pub result: Option<ResultRecord>,
}

impl OutputCommand {
    pub fn is_empty(&self) -> bool {
        self.oob.is_empty() && self.result.is_none()
    }
}
