//! Juniper JunOS processor family.
//!
//! JunOS has no enable tier: sessions land in operational mode and enter
//! configuration mode with `configure`, editing a per-session candidate
//! that only `commit` makes visible to other sessions.
//!
//! ```text
//! ┌─────────────┐  configure  ┌───────────────┐
//! │ operational ├─────────────► configuration │ set / delete / show
//! │  name>      │    exit     │     name#     │ commit / rollback
//! └─────────────┘◄────────────┴───────────────┘
//! ```

mod candidate;
mod modes;
pub mod netconf;
mod show;

pub use candidate::Candidate;
pub use modes::{JuniperEdit, JuniperOperational};
pub use netconf::{Datastore, NetconfSession, Rpc, RpcReply};

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::ShellSession;
use crate::terminal::TerminalController;

/// A Juniper JunOS switch core.
pub struct JuniperCore {
    config: SharedConfig,
}

impl JuniperCore {
    /// Generic JunOS switch with four `ge-0/0/N` ports.
    pub fn generic(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=4)
            .map(|n| Port::physical(format!("ge-0/0/{n}")))
            .collect();
        config.seed_ports(ports);
        Arc::new(Self {
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }

    /// Open a NETCONF session against this switch.
    pub fn netconf_session(&self) -> NetconfSession {
        NetconfSession::new(self.config.clone())
    }
}

#[async_trait]
impl SwitchCore for JuniperCore {
    fn model(&self) -> &'static str {
        "juniper_generic"
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
        ShellSession::new(
            self.config.clone(),
            terminal,
            Box::new(JuniperOperational),
        )
        .with_banner("--- JUNOS 12.3R7.7 built 2014-03-01 06:14:01 UTC\n")
    }
}
