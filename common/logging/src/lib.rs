//! Terminal logger construction, mirroring the teacher's `environment`
//! crate's use of `slog-term` + `slog-async` (`SPEC_FULL.md` §B).

use slog::{Drain, Level, Logger};

/// Build the node's root logger: an async, non-blocking drain over a
/// decorated terminal writer, filtered at `level`.
pub fn root_logger(level: Level) -> Logger {
    let decorator = slog_term::TermDecorator::new().build();
    let drain = slog_term::FullFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();
    let drain = slog::LevelFilter::new(drain, level).fuse();
    Logger::root(drain, slog::o!())
}

/// A logger that discards everything, for tests that don't want to
/// assert on log output but still need to hand something to a
/// `Logger`-taking constructor.
pub fn test_logger() -> Logger {
    Logger::root(slog::Discard, slog::o!())
}
