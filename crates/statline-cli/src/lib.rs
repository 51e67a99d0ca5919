// statline renders one status line per invocation: the host pipes a JSON
// session payload on stdin, the CLI reads the referenced transcript through
// the metrics engine, and the configured widgets turn both into a single
// printed line. Rendering is a pure function of (payload, transcript,
// settings, now); nothing is cached between invocations.

mod args;
mod commands;
pub mod config;
pub mod context;
pub mod format;
pub mod render;
pub mod widgets;

pub use args::{Cli, Commands};
pub use commands::run;
