//! The interactive command-processor engine.
//!
//! A session is a pushdown automaton of modal shells: the unprivileged
//! shell, the enabled shell, global configuration, and the config
//! sub-modes (vlan, interface, vrf). Each mode is one
//! [`CommandProcessor`]; the [`ShellSession`] owns the stack and routes
//! every received line to the deepest processor, which parses it, mutates
//! the shared [`SwitchConfiguration`], emits output lines, and returns an
//! [`Action`] describing the stack effect.
//!
//! ```text
//!  UNPRIVILEGED ──enable+pw──▶ PRIVILEGED ──configure──▶ CONFIG
//!  UNPRIVILEGED ──exit/quit──▶ (terminate)      │
//!                                               ├──vlan N──▶ CONFIG-VLAN
//!                                               ├──interface X──▶ CONFIG-IF
//!                                               ├──ip vrf NAME──▶ CONFIG-VRF
//!                                               └──exit──▶ PRIVILEGED
//! ```

pub mod dispatch;
mod paging;
mod piping;
mod session;

pub use dispatch::{Args, Resolution, resolve};
pub use paging::{MoreStyle, Pager};
pub use piping::{PipeFilter, split_pipe};
pub use session::{ConfigApplier, ShellSession};

use std::time::Duration;

use crate::config::SwitchConfiguration;
use crate::terminal::EchoMode;

/// Stack effect returned by a processor for one command line.
pub enum Action {
    /// The line was handled; stay in this mode.
    Handled,
    /// The line matched nothing; the session emits the vendor's
    /// invalid-input banner.
    Unhandled,
    /// Enter a sub-mode.
    Push(Box<dyn CommandProcessor>),
    /// Leave this mode.
    Pop,
    /// Replace this mode, e.g. a password prompt replacing itself with
    /// the enabled shell on success.
    Replace(Box<dyn CommandProcessor>),
    /// Close the session.
    Terminate,
}

/// Per-session terminal and scheduling state.
#[derive(Debug, Default)]
pub struct SessionState {
    /// Page length; `None` disables paging.
    pub terminal_length: Option<usize>,

    /// Sleep to perform before the config lock is released, set by
    /// `write memory` and JunOS `commit`.
    pub pending_delay: Option<Duration>,

    /// TFTP fetch to perform after the lock is released: (host, path).
    pub pending_tftp: Option<(String, String)>,
}

/// Output lines accumulated by one command, filtered and paged by the
/// session before they reach the terminal.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    lines: Vec<String>,
}

impl OutputBuffer {
    /// Append one line.
    pub fn write_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Append a multi-line block, split on `\n`.
    pub fn write_block(&mut self, block: &str) {
        for line in block.split('\n') {
            self.lines.push(line.to_string());
        }
    }

    /// Append every line from an iterator.
    pub fn extend<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines.extend(lines.into_iter().map(Into::into));
    }

    /// Take the accumulated lines.
    pub fn take(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    /// Whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Everything a processor sees while handling one command: the locked
/// switch configuration, the output buffer, and the session state.
pub struct Context<'a> {
    /// The switch configuration, locked for this command's whole effect.
    pub config: &'a mut SwitchConfiguration,

    /// Output destination for this command.
    pub output: &'a mut OutputBuffer,

    /// Session-scoped terminal state.
    pub state: &'a mut SessionState,
}

impl Context<'_> {
    /// Append one output line.
    pub fn write_line(&mut self, line: impl Into<String>) {
        self.output.write_line(line);
    }

    /// Append a multi-line block.
    pub fn write_block(&mut self, block: &str) {
        self.output.write_block(block);
    }

    /// Schedule the switch's commit delay before the lock is released.
    pub fn apply_commit_delay(&mut self) {
        if !self.config.commit_delay.is_zero() {
            self.state.pending_delay = Some(self.config.commit_delay);
        }
    }
}

/// One node in the modal shell stack.
pub trait CommandProcessor: Send {
    /// The prompt for this mode, e.g. `my_switch(config-if)#`.
    fn prompt(&self, config: &SwitchConfiguration) -> String;

    /// Handle one command line.
    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action;

    /// How the transport should echo input while this mode is deepest.
    fn echo(&self) -> EchoMode {
        EchoMode::Echo
    }

    /// Emit this vendor's invalid-input banner for an unhandled line.
    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str);
}
