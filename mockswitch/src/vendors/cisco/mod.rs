//! Cisco IOS processor family.
//!
//! Supports the generic IOS switch, the Catalyst 2960 models, and the
//! Catalyst 6500 (which additionally accepts `ip verify unicast source
//! reachable-via rx` and `ntp disable` on interfaces).
//!
//! # Mode graph
//!
//! ```text
//! ┌──────────┐ enable+pw ┌─────────┐ configure ┌──────────┐
//! │ default  ├───────────► enabled ├───────────► config   │
//! │  name>   │           │  name#  │           │ (config)#│
//! └──────────┘           └─────────┘           └────┬─────┘
//!                                                   ├─ vlan N ──────► (config-vlan)#
//!                                                   ├─ interface X ─► (config-if)#
//!                                                   └─ ip vrf NAME ─► (config-vrf)#
//! ```

mod config;
mod config_interface;
mod default;
mod enabled;
mod show;

pub use config::{CiscoConfigMode, CiscoConfigVlan, CiscoConfigVrf};
pub use config_interface::CiscoConfigInterface;
pub use default::{CiscoDefault, CiscoPassword};
pub use enabled::CiscoEnabled;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, PortKind, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::{
    Action, Args, CommandProcessor, Context, MoreStyle, OutputBuffer, SessionState, ShellSession,
};
use crate::terminal::TerminalController;
use crate::tftp::TftpReader;

/// Hardware flavor, gating the handful of 6500-only interface commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiscoVariant {
    /// Generic IOS switch (includes the 2960 models).
    Generic,
    /// Catalyst 6500.
    Catalyst6500,
}

/// Canonical interface type names, longest-match-relevant order.
const PORT_TYPES: &[&str] = &[
    "FastEthernet",
    "GigabitEthernet",
    "TenGigabitEthernet",
    "Ethernet",
    "Vlan",
    "Port-channel",
];

/// A parsed interface reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceRef {
    /// A physical port, by canonical name.
    Physical(String),
    /// An SVI.
    Vlan(u16),
    /// An aggregated port.
    PortChannel(u16),
}

impl InterfaceRef {
    /// The canonical port-table name.
    pub fn canonical(&self) -> String {
        match self {
            InterfaceRef::Physical(name) => name.clone(),
            InterfaceRef::Vlan(n) => format!("Vlan{n}"),
            InterfaceRef::PortChannel(n) => format!("Port-channel{n}"),
        }
    }
}

/// Parse an interface reference the way IOS does: the type may be
/// abbreviated (`Fa`, `gi`, `vlan`) and the unit may be attached or a
/// separate token (`Fa0/3`, `FastEthernet 0/3`, `vlan 1000`).
pub fn parse_interface(spec: &str) -> Option<InterfaceRef> {
    let joined: String = spec.split_whitespace().collect();
    let split = joined
        .find(|c: char| c.is_ascii_digit())
        .filter(|&i| i > 0)?;
    let (type_part, unit) = joined.split_at(split);
    let type_part = type_part.trim_end_matches('-');

    let mut matched = None;
    for name in PORT_TYPES {
        if name.to_ascii_lowercase() == type_part.to_ascii_lowercase() {
            matched = Some(*name);
            break;
        }
        if name
            .to_ascii_lowercase()
            .starts_with(&type_part.to_ascii_lowercase())
        {
            if matched.is_some() {
                return None; // ambiguous abbreviation
            }
            matched = Some(*name);
        }
    }

    match matched? {
        "Vlan" => unit.parse().ok().map(InterfaceRef::Vlan),
        "Port-channel" => unit.parse().ok().map(InterfaceRef::PortChannel),
        name => Some(InterfaceRef::Physical(format!("{name}{unit}"))),
    }
}

/// Abbreviate a canonical interface name: `Vlan2999` becomes `Vl2999`.
pub fn short_name(canonical: &str) -> String {
    for (long, short) in [
        ("FastEthernet", "Fa"),
        ("GigabitEthernet", "Gi"),
        ("TenGigabitEthernet", "Te"),
        ("Ethernet", "Et"),
        ("Vlan", "Vl"),
        ("Port-channel", "Po"),
    ] {
        if let Some(unit) = canonical.strip_prefix(long) {
            return format!("{short}{unit}");
        }
    }
    canonical.to_string()
}

/// Emit the IOS invalid-input banner: a caret under the offending token
/// and the marker line.
pub fn invalid_input(ctx: &mut Context<'_>, offset: usize) {
    ctx.write_line(format!("{}^", " ".repeat(offset)));
    ctx.write_line("% Invalid input detected at '^' marker.");
    ctx.write_line("");
}

/// Emit the IOS ambiguous-command banner.
pub fn ambiguous_command(ctx: &mut Context<'_>, line: &str) {
    ctx.write_line(format!("% Ambiguous command:  \"{line}\""));
}

/// Emit the IOS incomplete-command banner.
pub fn incomplete_command(ctx: &mut Context<'_>) {
    ctx.write_line("% Incomplete command.");
    ctx.write_line("");
}

/// Replay running-config text through the config-mode processors, the
/// path `copy tftp://… system:/running-config` takes.
pub fn apply_running_config(
    variant: CiscoVariant,
    config: &mut SwitchConfiguration,
    text: &str,
) {
    let mut stack: Vec<Box<dyn CommandProcessor>> =
        vec![Box::new(CiscoConfigMode::new(variant))];
    let mut state = SessionState::default();

    for line in text.lines() {
        let line = line.trim_end();
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        // Rendered configs separate blocks with `!`; treat it as the end
        // of any open sub-mode so the next block lands in config mode.
        if trimmed == "!" {
            stack.truncate(1);
            continue;
        }
        if trimmed == "end" {
            break;
        }

        let mut output = OutputBuffer::default();
        let mut ctx = Context {
            config,
            output: &mut output,
            state: &mut state,
        };
        let action = stack
            .last_mut()
            .expect("replay stack is never empty")
            .process(&mut ctx, line);
        match action {
            Action::Push(child) => stack.push(child),
            Action::Pop | Action::Replace(_) | Action::Terminate => {
                stack.pop();
                if stack.is_empty() {
                    break;
                }
            }
            Action::Handled | Action::Unhandled => {}
        }
    }
}

/// A Cisco IOS switch core.
pub struct CiscoCore {
    model: &'static str,
    variant: CiscoVariant,
    config: SharedConfig,
    tftp: Option<Arc<dyn TftpReader>>,
}

impl CiscoCore {
    /// Generic IOS switch with twelve FastEthernet ports.
    pub fn generic(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        config.seed_ports(fastethernet_ports(12));
        Arc::new(Self::build("cisco_generic", CiscoVariant::Generic, config))
    }

    /// Generic IOS switch with the external TFTP collaborator wired in.
    pub fn generic_with_tftp(
        mut config: SwitchConfiguration,
        reader: Arc<dyn TftpReader>,
    ) -> Arc<dyn SwitchCore> {
        config.seed_ports(fastethernet_ports(12));
        Arc::new(Self::build("cisco_generic", CiscoVariant::Generic, config).with_tftp(reader))
    }

    /// Catalyst 2960 24TT-L: 24 FastEthernet plus 2 GigabitEthernet.
    pub fn model_2960_24tt(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let mut ports = fastethernet_ports(24);
        ports.push(Port::physical("GigabitEthernet0/1"));
        ports.push(Port::physical("GigabitEthernet0/2"));
        config.seed_ports(ports);
        Arc::new(Self::build(
            "cisco_2960_24TT_L",
            CiscoVariant::Generic,
            config,
        ))
    }

    /// Catalyst 2960 48TT-L: 48 FastEthernet plus 2 GigabitEthernet.
    pub fn model_2960_48tt(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let mut ports = fastethernet_ports(48);
        ports.push(Port::physical("GigabitEthernet0/1"));
        ports.push(Port::physical("GigabitEthernet0/2"));
        config.seed_ports(ports);
        Arc::new(Self::build(
            "cisco_2960_48TT_L",
            CiscoVariant::Generic,
            config,
        ))
    }

    /// Catalyst 6500 with eight GigabitEthernet ports.
    pub fn catalyst_6500(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=8)
            .map(|n| Port::physical(format!("GigabitEthernet1/{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self::build(
            "cisco_6500",
            CiscoVariant::Catalyst6500,
            config,
        ))
    }

    fn build(model: &'static str, variant: CiscoVariant, config: SwitchConfiguration) -> Self {
        Self {
            model,
            variant,
            config: Arc::new(tokio::sync::Mutex::new(config)),
            tftp: None,
        }
    }

    /// Wire in the external TFTP collaborator for `copy tftp://…`.
    pub fn with_tftp(mut self, reader: Arc<dyn TftpReader>) -> Self {
        self.tftp = Some(reader);
        self
    }
}

fn fastethernet_ports(count: u16) -> Vec<Port> {
    (1..=count)
        .map(|n| Port::physical(format!("FastEthernet0/{n}")))
        .collect()
}

#[async_trait]
impl SwitchCore for CiscoCore {
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
        let variant = self.variant;

        let mut session = ShellSession::new(
            self.config.clone(),
            terminal,
            Box::new(CiscoDefault::new(variant)),
        )
        .with_more_style(MoreStyle::Cisco)
        .with_tftp_apply(Box::new(move |config, text| {
            apply_running_config(variant, config, text)
        }));

        if let Some(reader) = &self.tftp {
            session = session.with_tftp(reader.clone());
        }

        if self.config.lock().await.auto_enabled {
            session.push_processor(Box::new(CiscoEnabled::new(variant)));
        }

        session
    }
}

/// Resolve a token list after `interface` against the port table,
/// creating SVIs and port-channels on demand. Returns the canonical name
/// or `None` for an unknown physical port.
pub(crate) fn resolve_or_create_interface(
    ctx: &mut Context<'_>,
    args: &Args<'_>,
    from: usize,
) -> Option<String> {
    let spec = args.rest_from(from)?;
    let iface = parse_interface(spec)?;
    match &iface {
        InterfaceRef::Physical(name) => {
            ctx.config.port(name)?;
        }
        InterfaceRef::Vlan(n) => {
            let name = iface.canonical();
            ctx.config.ensure_port(&name, PortKind::Vlan(*n));
        }
        InterfaceRef::PortChannel(_) => {
            let name = iface.canonical();
            ctx.config.ensure_port(&name, PortKind::Aggregated);
        }
    }
    Some(iface.canonical())
}
