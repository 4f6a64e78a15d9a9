//! Dell PowerConnect processor family.
//!
//! Two flavors share the processors: the classic PowerConnect, where
//! VLANs are created inside the `vlan database` sub-mode, and the 10G
//! line, where `vlan N` is a direct config-mode command that reports
//! range failures in the tabular "Failure Information" block.

mod modes;
mod show;

pub use modes::{
    DellConfigInterface, DellConfigMode, DellConfigVlan, DellDefault, DellEnabled, DellPassword,
    DellSaveConfirm, DellVlanDatabase,
};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::{Context, MoreStyle, ShellSession};
use crate::terminal::TerminalController;

/// Dell hardware flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DellVariant {
    /// Classic PowerConnect (vlan database mode).
    PowerConnect,
    /// PowerConnect 10G (direct `vlan N`, failure blocks).
    PowerConnect10G,
}

/// Maximum VLAN name length Dell accepts.
pub const VLAN_NAME_LIMIT: usize = 32;

/// Emit the Dell invalid-input banner.
pub fn invalid_input(ctx: &mut Context<'_>) {
    ctx.write_line("          ^");
    ctx.write_line("% Invalid input detected at '^' marker.");
    ctx.write_line("");
}

/// Emit the 10G "Failure Information" block for an out-of-range VLAN.
pub fn vlan_failure_block(ctx: &mut Context<'_>, number: i64) {
    ctx.write_line("Failure Information");
    ctx.write_line("---------------------------------------");
    ctx.write_line("   VLANs failed to be configured : 1");
    ctx.write_line("---------------------------------------");
    ctx.write_line("   VLAN             Error");
    ctx.write_line("---------------------------------------");
    ctx.write_line(format!("VLAN {number}  ERROR: VLAN ID is out of range"));
}

/// Canonical Dell interface naming. The classic models use
/// `ethernet 1/g1`; the 10G models use `tengigabitethernet 0/0/1`; SVIs
/// are `vlan N` on both.
pub fn parse_interface(variant: DellVariant, spec: &str) -> Option<DellInterfaceRef> {
    let mut words = spec.split_whitespace();
    let kind = words.next()?.to_ascii_lowercase();
    let unit = words.next()?;
    if words.next().is_some() {
        return None;
    }

    let physical = match variant {
        DellVariant::PowerConnect => "ethernet",
        DellVariant::PowerConnect10G => "tengigabitethernet",
    };

    if physical.starts_with(&kind) {
        return Some(DellInterfaceRef::Physical(format!("{physical} {unit}")));
    }
    if "vlan".starts_with(&kind) {
        return unit.parse().ok().map(DellInterfaceRef::Vlan);
    }
    None
}

/// A parsed Dell interface reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DellInterfaceRef {
    /// Physical port, canonical name.
    Physical(String),
    /// SVI.
    Vlan(u16),
}

impl DellInterfaceRef {
    /// The canonical port-table name.
    pub fn canonical(&self) -> String {
        match self {
            DellInterfaceRef::Physical(name) => name.clone(),
            DellInterfaceRef::Vlan(n) => format!("vlan {n}"),
        }
    }
}

/// A Dell PowerConnect switch core.
pub struct DellCore {
    model: &'static str,
    variant: DellVariant,
    config: SharedConfig,
}

impl DellCore {
    /// Classic PowerConnect with 24 `ethernet 1/gN` ports.
    pub fn powerconnect(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=24)
            .map(|n| Port::physical(format!("ethernet 1/g{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self {
            model: "dell_generic",
            variant: DellVariant::PowerConnect,
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }

    /// PowerConnect 10G with 24 `tengigabitethernet 0/0/N` ports.
    pub fn powerconnect_10g(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=24)
            .map(|n| Port::physical(format!("tengigabitethernet 0/0/{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self {
            model: "dell10g_generic",
            variant: DellVariant::PowerConnect10G,
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }
}

#[async_trait]
impl SwitchCore for DellCore {
    fn model(&self) -> &'static str {
        self.model
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
            Box::new(DellDefault::new(self.variant)),
        )
        .with_more_style(MoreStyle::Dell);

        if self.config.lock().await.auto_enabled {
            session.push_processor(Box::new(DellEnabled::new(self.variant)));
        }

        session
    }
}
