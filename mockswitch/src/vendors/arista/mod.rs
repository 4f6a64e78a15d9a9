//! Arista EOS processor family.
//!
//! The CLI is IOS-flavored; the distinctive surface is eAPI, the
//! JSON-RPC 2.0 `runCmds` endpoint, which executes commands through the
//! same processors and packages per-command results (see [`eapi`]).

pub mod eapi;
mod modes;
mod show;

pub use eapi::{EapiAdapter, EapiParams, EapiRequest, EapiResponse};
pub use modes::{
    AristaConfigInterface, AristaConfigMode, AristaConfigVlan, AristaDefault, AristaEnabled,
    AristaPassword,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::{Context, ShellSession};
use crate::terminal::TerminalController;

/// Emit the EOS invalid-input banner.
pub fn invalid_input(ctx: &mut Context<'_>, token_index: usize, token: &str) {
    ctx.write_line(format!(
        "% Invalid input (at token {token_index}: '{token}')"
    ));
}

/// A parsed EOS interface reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AristaInterfaceRef {
    /// Physical port, canonical name (`Ethernet1`).
    Physical(String),
    /// SVI.
    Vlan(u16),
}

impl AristaInterfaceRef {
    /// The canonical port-table name.
    pub fn canonical(&self) -> String {
        match self {
            AristaInterfaceRef::Physical(name) => name.clone(),
            AristaInterfaceRef::Vlan(n) => format!("Vlan{n}"),
        }
    }
}

/// Parse `Ethernet1`, `Et1`, `ethernet 1`, `Vlan123`, `vlan 123`.
pub fn parse_interface(spec: &str) -> Option<AristaInterfaceRef> {
    let joined: String = spec.split_whitespace().collect();
    let split = joined
        .find(|c: char| c.is_ascii_digit())
        .filter(|&i| i > 0)?;
    let (kind, unit) = joined.split_at(split);

    if "ethernet".starts_with(&kind.to_ascii_lowercase()) {
        return Some(AristaInterfaceRef::Physical(format!("Ethernet{unit}")));
    }
    if "vlan".starts_with(&kind.to_ascii_lowercase()) {
        return unit.parse().ok().map(AristaInterfaceRef::Vlan);
    }
    None
}

/// An Arista EOS switch core.
pub struct AristaCore {
    config: SharedConfig,
}

impl AristaCore {
    /// Generic EOS switch with four `EthernetN` ports.
    pub fn generic(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=4)
            .map(|n| Port::physical(format!("Ethernet{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self {
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }

    /// Open an eAPI adapter against this switch.
    pub fn eapi(&self) -> EapiAdapter {
        EapiAdapter::new(self.config.clone())
    }
}

#[async_trait]
impl SwitchCore for AristaCore {
    fn model(&self) -> &'static str {
        "arista_generic"
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
        let mut session =
            ShellSession::new(self.config.clone(), terminal, Box::new(AristaDefault));

        if self.config.lock().await.auto_enabled {
            session.push_processor(Box::new(AristaEnabled));
        }

        session
    }
}
