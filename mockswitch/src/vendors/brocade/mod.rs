//! Brocade FastIron processor family.
//!
//! Brocade's CLI is VLAN-centric: port membership is configured from the
//! VLAN sub-mode (`untagged ethernet …`, `tagged ethernet …`) rather than
//! from the interface, and L3 lives on `ve` router interfaces with
//! CIDR-notation addresses.

mod modes;
mod show;

pub use modes::{
    BrocadeConfigInterface, BrocadeConfigMode, BrocadeConfigVlan, BrocadeDefault, BrocadeEnabled,
    BrocadePassword,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::{Context, ShellSession};
use crate::terminal::TerminalController;

/// Emit the Brocade invalid-input banner.
pub fn invalid_input(ctx: &mut Context<'_>, line: &str) {
    ctx.write_line(format!("Invalid input -> {}", line.trim()));
    ctx.write_line("Type ? for a list");
}

/// A Brocade switch core.
pub struct BrocadeCore {
    config: SharedConfig,
}

impl BrocadeCore {
    /// Generic Brocade with 24 `ethernet 1/N` ports.
    pub fn generic(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=24)
            .map(|n| Port::physical(format!("ethernet 1/{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self {
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }
}

#[async_trait]
impl SwitchCore for BrocadeCore {
    fn model(&self) -> &'static str {
        "brocade_generic"
    }

    fn switch_configuration(&self) -> &SharedConfig {
        &self.config
    }

    async fn launch(
        &self,
        protocol: Protocol,
        terminal: Box<dyn TerminalController>,
    ) -> ShellSession {
        let terminal = wire_terminal(protocol, terminal);
        let mut session = ShellSession::new(
            self.config.clone(),
            terminal,
            Box::new(BrocadeDefault),
        );

        if self.config.lock().await.auto_enabled {
            session.push_processor(Box::new(BrocadeEnabled));
        }

        session
    }
}
