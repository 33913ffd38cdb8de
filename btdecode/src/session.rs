//! Session driver: feeds the transcript through a [`Decoder`]
//!
//! Reading is async so that every line read can be raced against the
//! interrupt future (Ctrl+C in the binary). The decoder itself stays
//! synchronous.

use log::{debug, info};
use std::borrow::Cow;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::domain::DecodeError;
use crate::symbolization::SymbolProvider;
use crate::terminal::{EchoControl, EchoGuard};
use crate::transcript::Decoder;

/// Exit status for a session ended by an interrupt (128 + SIGINT)
pub const EXIT_INTERRUPTED: i32 = 130;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// End of input, or the closing snip marker was seen
    Completed,
    /// The interrupt future fired before the transcript ended
    Interrupted,
}

impl SessionOutcome {
    #[must_use]
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Completed => 0,
            Self::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

/// Decode `reader` line by line into `out` until the input ends, the decoder
/// reaches its final state, or `interrupt` completes.
///
/// Output is flushed after every input line so decoded frames show up while
/// the transcript is still being pasted.
///
/// # Errors
/// I/O errors on either stream and symbol provider failures end the session.
pub async fn run_session<R, W, P, F>(
    mut reader: R,
    out: &mut W,
    decoder: &mut Decoder<P>,
    interrupt: F,
) -> Result<SessionOutcome, DecodeError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
    P: SymbolProvider,
    F: Future<Output = ()>,
{
    let mut buf = Vec::new();
    tokio::pin!(interrupt);

    loop {
        buf.clear();
        let read = tokio::select! {
            biased;
            () = &mut interrupt => {
                info!("Interrupted in state {:?}", decoder.state());
                return Ok(SessionOutcome::Interrupted);
            }
            read = reader.read_until(b'\n', &mut buf) => read?,
        };

        if read == 0 {
            info!("End of input in state {:?}", decoder.state());
            return Ok(SessionOutcome::Completed);
        }

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        if matches!(line, Cow::Owned(_)) {
            debug!("Replaced invalid UTF-8 in input line");
        }

        for decoded in decoder.process_line(&line)? {
            writeln!(out, "{decoded}")?;
        }
        out.flush()?;

        if decoder.is_done() {
            return Ok(SessionOutcome::Completed);
        }
    }
}

/// Strip a trailing `\n` or `\r\n`
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// [`run_session`] with terminal echo disabled for its duration.
///
/// Echo is restored exactly once whichever way the session ends.
///
/// # Errors
/// Fails if echo cannot be toggled, or with the session's own error.
pub async fn run_guarded<C, R, W, P, F>(
    echo: C,
    reader: R,
    out: &mut W,
    decoder: &mut Decoder<P>,
    interrupt: F,
) -> Result<SessionOutcome, DecodeError>
where
    C: EchoControl,
    R: AsyncBufRead + Unpin,
    W: Write,
    P: SymbolProvider,
    F: Future<Output = ()>,
{
    let mut guard = EchoGuard::new(echo)?;
    let outcome = run_session(reader, out, decoder, interrupt).await;
    guard.restore()?;
    outcome
}
