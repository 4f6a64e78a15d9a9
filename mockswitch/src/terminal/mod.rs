//! Terminal boundary between the engine and a transport.
//!
//! Transports (SSH, Telnet, HTTP — out of scope here) own the sockets and
//! feed received input into a [`crate::engine::ShellSession`]; everything
//! the session emits goes out through a [`TerminalController`]. The
//! controller also carries the wire conventions the transport needs:
//! line-ending conversion and password echo replacement.

mod buffer;

pub use buffer::BufferedTerminal;

/// How the transport should echo the user's keystrokes for the current
/// input, read from the deepest active processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Echo input normally.
    #[default]
    Echo,
    /// Emit nothing (SSH password entry).
    Suppress,
    /// Emit this character per keystroke (Dell-over-Telnet `*`).
    EchoAs(char),
}

/// Byte sink toward the user session.
///
/// Implementations are transport adapters; the in-crate
/// [`BufferedTerminal`] captures output for tests and the eAPI adapter.
pub trait TerminalController: Send {
    /// Write raw bytes toward the user.
    fn send(&mut self, data: &[u8]);

    /// Write a string toward the user.
    fn send_str(&mut self, text: &str) {
        self.send(text.as_bytes());
    }
}

impl TerminalController for Box<dyn TerminalController> {
    fn send(&mut self, data: &[u8]) {
        (**self).send(data);
    }
}

/// Convert LF line endings to CRLF, as Telnet requires on the wire.
/// Already-correct CRLF sequences are left alone.
pub fn lf_to_crlf(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + data.len() / 16);
    let mut last = 0;
    for nl in memchr::memchr_iter(b'\n', data) {
        out.extend_from_slice(&data[last..nl]);
        if !out.ends_with(b"\r") {
            out.push(b'\r');
        }
        out.push(b'\n');
        last = nl + 1;
    }
    out.extend_from_slice(&data[last..]);
    out
}

/// A terminal wrapper that applies Telnet CRLF conversion to everything
/// written through it.
pub struct CrlfTerminal<T: TerminalController> {
    inner: T,
}

impl<T: TerminalController> CrlfTerminal<T> {
    /// Wrap a terminal.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap the inner terminal.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: TerminalController> TerminalController for CrlfTerminal<T> {
    fn send(&mut self, data: &[u8]) {
        let converted = lf_to_crlf(data);
        self.inner.send(&converted);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lf_to_crlf() {
        assert_eq!(lf_to_crlf(b"a\nb\n"), b"a\r\nb\r\n");
        assert_eq!(lf_to_crlf(b"no newline"), b"no newline");
        // Existing CRLF is not doubled.
        assert_eq!(lf_to_crlf(b"a\r\nb"), b"a\r\nb");
    }

    #[test]
    fn test_crlf_terminal() {
        let mut term = CrlfTerminal::new(BufferedTerminal::new());
        term.send_str("line one\nline two\n");
        assert_eq!(
            term.into_inner().take_string(),
            "line one\r\nline two\r\n"
        );
    }
}
