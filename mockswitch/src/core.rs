//! Per-switch cores: one [`SwitchCore`] owns one switch configuration
//! and assembles a fresh vendor processor stack for every session.

use async_trait::async_trait;

use crate::config::SharedConfig;
use crate::engine::ShellSession;
use crate::terminal::{CrlfTerminal, TerminalController};

/// Transport protocol a session arrived over. The core only uses it for
/// wire conventions (Telnet CRLF conversion); the transport servers
/// themselves live outside this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// SSH shell channel.
    Ssh,
    /// Telnet connection.
    Telnet,
    /// HTTP request (Arista eAPI).
    Http,
}

/// One emulated switch: shared configuration plus a session factory.
#[async_trait]
pub trait SwitchCore: Send + Sync {
    /// The model string this core was registered under.
    fn model(&self) -> &'static str;

    /// The switch configuration shared by all sessions.
    fn switch_configuration(&self) -> &SharedConfig;

    /// Assemble a fresh processor stack for a new session.
    async fn launch(
        &self,
        protocol: Protocol,
        terminal: Box<dyn TerminalController>,
    ) -> ShellSession;
}

/// Apply protocol wire conventions to a transport terminal.
pub fn wire_terminal(
    protocol: Protocol,
    terminal: Box<dyn TerminalController>,
) -> Box<dyn TerminalController> {
    match protocol {
        Protocol::Telnet => Box::new(CrlfTerminal::new(terminal)),
        Protocol::Ssh | Protocol::Http => terminal,
    }
}
