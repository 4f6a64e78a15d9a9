//! The outer session loop.

use std::sync::Arc;

use log::{debug, warn};

use super::paging::{MoreStyle, Pager};
use super::piping::split_pipe;
use super::{Action, CommandProcessor, Context, OutputBuffer, SessionState};
use crate::config::{SharedConfig, SwitchConfiguration};
use crate::terminal::{EchoMode, TerminalController};
use crate::tftp::TftpReader;

/// Hook that applies fetched running-config text to the switch, used by
/// `copy tftp://… system:/running-config`.
pub type ConfigApplier = Box<dyn Fn(&mut SwitchConfiguration, &str) + Send + Sync>;

/// One interactive session against a switch.
///
/// The session owns the processor stack. Each received line is routed to
/// the deepest processor while the per-switch config lock is held; the
/// resulting output is pipe-filtered, paged, and written to the terminal,
/// followed by the new top-of-stack prompt.
pub struct ShellSession {
    config: SharedConfig,
    terminal: Box<dyn TerminalController>,
    stack: Vec<Box<dyn CommandProcessor>>,
    state: SessionState,
    pager: Option<Pager>,
    more_style: MoreStyle,
    banner: Option<String>,
    tftp: Option<Arc<dyn TftpReader>>,
    tftp_apply: Option<ConfigApplier>,
    unhandled: bool,
    done: bool,
}

impl ShellSession {
    /// Create a session with the given root processor.
    pub fn new(
        config: SharedConfig,
        terminal: Box<dyn TerminalController>,
        root: Box<dyn CommandProcessor>,
    ) -> Self {
        Self {
            config,
            terminal,
            stack: vec![root],
            state: SessionState::default(),
            pager: None,
            more_style: MoreStyle::default(),
            banner: None,
            tftp: None,
            tftp_apply: None,
            unhandled: false,
            done: false,
        }
    }

    /// Set the vendor more-prompt style.
    pub fn with_more_style(mut self, style: MoreStyle) -> Self {
        self.more_style = style;
        self
    }

    /// Set the banner emitted by [`ShellSession::open`].
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = Some(banner.into());
        self
    }

    /// Wire in the external TFTP collaborator.
    pub fn with_tftp(mut self, reader: Arc<dyn TftpReader>) -> Self {
        self.tftp = Some(reader);
        self
    }

    /// Set the hook that applies TFTP-fetched config text.
    pub fn with_tftp_apply(mut self, apply: ConfigApplier) -> Self {
        self.tftp_apply = Some(apply);
        self
    }

    /// Push an additional processor, e.g. the enabled shell when the
    /// switch is auto-enabled.
    pub fn push_processor(&mut self, processor: Box<dyn CommandProcessor>) {
        self.stack.push(processor);
    }

    /// Emit the banner (if any) and the initial prompt.
    pub async fn open(&mut self) {
        if let Some(banner) = self.banner.take() {
            self.terminal.send_str(&banner);
        }
        let prompt = {
            let config = self.config.lock().await;
            self.stack
                .last()
                .map(|p| p.prompt(&config))
                .unwrap_or_default()
        };
        self.terminal.send_str(&prompt);
    }

    /// How the transport should echo input right now.
    pub fn echo_mode(&self) -> EchoMode {
        if self.pager.is_some() {
            return EchoMode::Suppress;
        }
        self.stack
            .last()
            .map(|p| p.echo())
            .unwrap_or(EchoMode::Echo)
    }

    /// Whether the session has terminated.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Whether the last received line fell through to the vendor
    /// invalid-input banner. Used by the eAPI adapter to detect failures.
    pub fn last_command_unhandled(&self) -> bool {
        self.unhandled
    }

    /// The capture terminal, if the session was built over one.
    pub fn terminal_mut(&mut self) -> &mut dyn TerminalController {
        self.terminal.as_mut()
    }

    /// Process one received line (or, at a paging prompt, one keypress).
    /// Returns `false` once the session is over and the transport should
    /// close the connection.
    pub async fn receive(&mut self, input: &str) -> bool {
        if self.done {
            return false;
        }

        if self.pager.is_some() {
            self.handle_more_key(input).await;
            return !self.done;
        }

        self.unhandled = false;
        let (command, filter) = split_pipe(input);

        let mut guard = self.config.lock().await;
        debug!("{}: received {:?}", guard.name, input);

        let mut output = OutputBuffer::default();

        if !command.trim().is_empty() {
            let action = {
                let mut ctx = Context {
                    config: &mut guard,
                    output: &mut output,
                    state: &mut self.state,
                };
                let top = self.stack.last_mut().expect("session stack is never empty");
                match top.process(&mut ctx, command) {
                    Action::Unhandled => {
                        warn!("unhandled command {:?}", command);
                        self.unhandled = true;
                        top.unknown_command(&mut ctx, command);
                        Action::Handled
                    }
                    action => action,
                }
            };
            match action {
                Action::Handled | Action::Unhandled => {}
                Action::Push(child) => self.stack.push(child),
                Action::Pop => {
                    self.stack.pop();
                    if self.stack.is_empty() {
                        self.done = true;
                    }
                }
                Action::Replace(successor) => {
                    self.stack.pop();
                    self.stack.push(successor);
                }
                Action::Terminate => self.done = true,
            }
        }

        // The commit delay is observed while the config lock is held, so
        // concurrent sessions serialize behind it.
        if let Some(delay) = self.state.pending_delay.take() {
            tokio::time::sleep(delay).await;
        }

        let mut lines = output.take();
        if let Some(filter) = filter {
            lines = filter.apply(lines);
        }

        // TFTP reads happen with the lock released.
        let prompt = if let Some((host, path)) = self.state.pending_tftp.take() {
            drop(guard);
            let fetched = match &self.tftp {
                Some(reader) => reader.read(&host, &path).await,
                None => Err(crate::error::TftpError::NotConfigured),
            };
            let mut guard = self.config.lock().await;
            match fetched {
                Ok(text) => {
                    if let Some(apply) = &self.tftp_apply {
                        apply(&mut guard, &text);
                    }
                    lines.push(format!("[OK - {} bytes]", text.len()));
                }
                Err(_) => {
                    lines.push(format!("Error opening tftp://{host}/{path} (Timed out)"));
                }
            }
            self.current_prompt(&guard)
        } else {
            let prompt = self.current_prompt(&guard);
            drop(guard);
            prompt
        };

        self.flush(lines, prompt);
        !self.done
    }

    fn current_prompt(&self, config: &SwitchConfiguration) -> String {
        if self.done {
            return String::new();
        }
        self.stack
            .last()
            .map(|p| p.prompt(config))
            .unwrap_or_default()
    }

    fn flush(&mut self, lines: Vec<String>, prompt: String) {
        match self.state.terminal_length {
            Some(page_len) if lines.len() > page_len => {
                let (first, pager) = Pager::start(lines, page_len, self.more_style);
                for line in first {
                    self.terminal.send_str(&line);
                    self.terminal.send_str("\n");
                }
                self.terminal.send_str(pager.more_prompt());
                self.pager = Some(pager);
            }
            _ => {
                for line in lines {
                    self.terminal.send_str(&line);
                    self.terminal.send_str("\n");
                }
                if !self.done {
                    self.terminal.send_str(&prompt);
                }
            }
        }
    }

    async fn handle_more_key(&mut self, input: &str) {
        let Some(mut pager) = self.pager.take() else {
            return;
        };

        self.terminal.send_str("\n");

        if input.trim_start().starts_with('q') {
            pager.abort();
        } else {
            for line in pager.next_page() {
                self.terminal.send_str(&line);
                self.terminal.send_str("\n");
            }
        }

        if pager.is_done() {
            let prompt = {
                let config = self.config.lock().await;
                self.current_prompt(&config)
            };
            self.terminal.send_str(&prompt);
        } else {
            self.terminal.send_str(pager.more_prompt());
            self.pager = Some(pager);
        }
    }
}
