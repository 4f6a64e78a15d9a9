//! In-memory capture terminal.

use bytes::BytesMut;

use super::TerminalController;

/// A terminal that accumulates everything written to it.
///
/// Used by tests to assert on session output, and by the eAPI adapter to
/// capture one command's output before packaging it into a JSON-RPC
/// result.
#[derive(Debug, Default)]
pub struct BufferedTerminal {
    buffer: BytesMut,
}

impl BufferedTerminal {
    /// Create an empty capture terminal.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
        }
    }

    /// Everything written so far.
    pub fn contents(&self) -> &[u8] {
        &self.buffer
    }

    /// Everything written so far, as a string (lossy UTF-8).
    pub fn contents_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.buffer)
    }

    /// Take the captured output, resetting the buffer.
    pub fn take_string(&mut self) -> String {
        let bytes = self.buffer.split();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Number of captured bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Whether nothing has been captured.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl TerminalController for BufferedTerminal {
    fn send(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_and_take() {
        let mut term = BufferedTerminal::new();
        term.send_str("hello ");
        term.send(b"world");
        assert_eq!(term.contents(), b"hello world");
        assert_eq!(term.take_string(), "hello world");
        assert!(term.is_empty());
    }
}
