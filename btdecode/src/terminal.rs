//! Terminal echo suppression while a transcript is pasted
//!
//! Pasted panic output would otherwise be echoed back by the terminal and
//! interleave with the decoded lines. Only `ECHO` is cleared; canonical mode
//! stays on, so input still arrives line by line.

#![allow(unsafe_code)] // tcgetattr/tcsetattr require unsafe

use crossterm::tty::IsTty;
use log::{debug, warn};
use std::io;
use std::mem::MaybeUninit;
use std::os::unix::io::RawFd;

/// Switch terminal echo off and back on
pub trait EchoControl {
    /// Turn echo off, remembering the previous terminal settings
    ///
    /// # Errors
    /// Returns the OS error if the terminal attributes cannot be changed.
    fn disable(&mut self) -> io::Result<()>;

    /// Put back whatever [`EchoControl::disable`] changed
    ///
    /// # Errors
    /// Returns the OS error if the terminal attributes cannot be changed.
    fn restore(&mut self) -> io::Result<()>;
}

/// Echo control for stdin via termios
///
/// Does nothing when stdin is not a terminal (piped transcript files).
pub struct TermiosEcho {
    fd: RawFd,
    saved: Option<libc::termios>,
}

impl TermiosEcho {
    #[must_use]
    pub fn stdin() -> Self {
        Self {
            fd: libc::STDIN_FILENO,
            saved: None,
        }
    }
}

impl EchoControl for TermiosEcho {
    fn disable(&mut self) -> io::Result<()> {
        if !io::stdin().is_tty() {
            debug!("stdin is not a terminal, leaving echo alone");
            return Ok(());
        }

        let mut term = MaybeUninit::<libc::termios>::uninit();
        // SAFETY: fd is a valid terminal descriptor and term is a writable termios
        if unsafe { libc::tcgetattr(self.fd, term.as_mut_ptr()) } != 0 {
            return Err(io::Error::last_os_error());
        }
        // SAFETY: tcgetattr succeeded and initialized term
        let original = unsafe { term.assume_init() };

        let mut silent = original;
        silent.c_lflag &= !libc::ECHO;
        // SAFETY: silent is a fully initialized termios copied from the current settings
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &silent) } != 0 {
            return Err(io::Error::last_os_error());
        }

        debug!("Terminal echo disabled");
        self.saved = Some(original);
        Ok(())
    }

    fn restore(&mut self) -> io::Result<()> {
        let Some(original) = self.saved.take() else {
            return Ok(());
        };

        // SAFETY: original holds the settings read by tcgetattr in disable()
        if unsafe { libc::tcsetattr(self.fd, libc::TCSANOW, &original) } != 0 {
            return Err(io::Error::last_os_error());
        }
        debug!("Terminal echo restored");
        Ok(())
    }
}

/// Keeps echo disabled for its lifetime
///
/// Restores exactly once: through [`EchoGuard::restore`] on the normal path,
/// or on drop when the session ends early with an error or a panic.
pub struct EchoGuard<C: EchoControl> {
    control: C,
    active: bool,
}

impl<C: EchoControl> EchoGuard<C> {
    /// Disable echo and arm the guard
    ///
    /// # Errors
    /// Fails if echo cannot be disabled; nothing needs restoring then.
    pub fn new(mut control: C) -> io::Result<Self> {
        control.disable()?;
        Ok(Self {
            control,
            active: true,
        })
    }

    /// Restore echo now; later calls and the drop become no-ops
    ///
    /// # Errors
    /// Returns the error from the underlying [`EchoControl::restore`].
    pub fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.control.restore()
    }
}

impl<C: EchoControl> Drop for EchoGuard<C> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            warn!("Failed to restore terminal echo: {e}");
        }
    }
}
