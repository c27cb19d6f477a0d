//! An incremental, push-driven parser for the GDB/MI machine interface
//! protocol: the wire format GDB speaks to IDEs and other front ends
//! when invoked with `gdb --interpreter=mi`.
//!
//! Feed bytes in as they arrive from the debugger's stdout, in
//! whatever fragments your I/O layer happens to hand you, and get
//! fully-formed records back out through callbacks. Nothing here reads
//! from a socket or spawns a process — that's the host's job.
//!
//! ```
//! use gdbmi::facade::{Callbacks, Facade};
//!
//! let mut saw_prompt = false;
//! let callbacks = Callbacks::new()
//!     .stream(|view| println!("{}", view.text))
//!     .prompt(|_text| saw_prompt = true);
//!
//! let mut facade = Facade::new(callbacks);
//! facade.push(b"~\"Reading symbols...\"\n(gdb) \n");
//! ```
//!
//! Start with [`facade::Facade`] for the typical case of five
//! callbacks covering results, async records, stream text, prompts, and
//! parse errors. Implement [`driver::RawSink`] directly against
//! [`driver::Driver`] instead if you'd rather work with whole
//! [`tree::OutputCommand`] values than have them split apart for you.

pub mod driver;
pub mod error;
pub mod facade;
pub mod logging;
mod grammar;
mod scanner;
pub mod tree;

pub use driver::{Driver, RawSink};
pub use error::{ErrorCategory, ParseError};
pub use facade::{AsyncRecordView, Callbacks, Facade, ResultRecordView, StreamRecordView};
pub use tree::{
    AsyncClass, AsyncKind, MiResult, MiValue, OobRecord, OutputCommand, ResultClass, ResultRecord,
    StreamKind,
};
