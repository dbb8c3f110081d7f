//! # ConsoleWriter: build console sink
//!
//! Writes one line per [`Event`] to any [`io::Write`] sink: the host job's
//! console stream, stdout, or an in-memory buffer in tests.
//!
//! ## Example output
//! ```text
//! Start Performance Center test
//! Domain: PERF
//! Starting run (attempt 1)
//! Start attempt 1 failed: connection error: reset; retrying in 10s
//! Run 42 started; polling every 30s, deadline in 3600s
//! Run 42 status: Running
//! Run 42 status: Passed
//! Result: run passed
//! ```

use std::io::{self, Write};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::events::Event;
use crate::subscribers::Subscribe;

/// Line-per-event writer over an [`io::Write`] sink.
pub struct ConsoleWriter<W> {
    out: Mutex<W>,
}

impl<W: Write + Send + 'static> ConsoleWriter<W> {
    /// Wraps `out`.
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out: Mutex::new(out) }
    }

    /// Unwraps the sink.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(out, "{line}")?;
        out.flush()
    }
}

impl ConsoleWriter<io::Stdout> {
    /// Writer over the process stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

#[async_trait]
impl<W: Write + Send + 'static> Subscribe for ConsoleWriter<W> {
    async fn on_event(&self, e: &Event) {
        // A broken console must not fail the run.
        let _ = self.write_line(&e.message());
    }

    fn name(&self) -> &'static str {
        "ConsoleWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;

    #[tokio::test]
    async fn writes_one_line_per_event() {
        let console = ConsoleWriter::new(Vec::<u8>::new());
        console.on_event(&Event::new(EventKind::StepStarted)).await;
        console
            .on_event(&Event::new(EventKind::ParameterLogged).with_reason("Domain: PERF"))
            .await;

        let text = String::from_utf8(console.into_inner()).unwrap();
        assert_eq!(text, "Start Performance Center test\nDomain: PERF\n");
    }
}
