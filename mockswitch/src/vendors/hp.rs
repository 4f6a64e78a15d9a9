//! HP ProCurve processor family.
//!
//! A compact surface: enable with password, global configuration,
//! VLAN contexts with names and untagged membership, and the ProCurve
//! running-config rendering.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Port, PortMode, SharedConfig, SwitchConfiguration};
use crate::core::{Protocol, SwitchCore, wire_terminal};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, ShellSession, resolve};
use crate::terminal::{EchoMode, TerminalController};

/// Emit the ProCurve invalid-input banner.
fn invalid_input(ctx: &mut Context<'_>, token: &str) {
    ctx.write_line(format!("Invalid input: {token}"));
}

/// An HP ProCurve switch core.
pub struct ProcurveCore {
    config: SharedConfig,
}

impl ProcurveCore {
    /// Generic ProCurve with 24 numbered ports.
    pub fn generic(mut config: SwitchConfiguration) -> Arc<dyn SwitchCore> {
        let ports = (1..=24).map(|n| Port::physical(format!("{n}"))).collect();
        config.seed_ports(ports);
        Arc::new(Self {
            config: Arc::new(tokio::sync::Mutex::new(config)),
        })
    }
}

#[async_trait]
impl SwitchCore for ProcurveCore {
    fn model(&self) -> &'static str {
        "hp_procurve_generic"
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
            ShellSession::new(self.config.clone(), terminal, Box::new(ProcurveDefault));

        if self.config.lock().await.auto_enabled {
            session.push_processor(Box::new(ProcurveEnabled));
        }

        session
    }
}

/// The unprivileged shell (`name>`).
struct ProcurveDefault;

impl CommandProcessor for ProcurveDefault {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}> ", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };
        match resolve(&["enable", "exit", "logout"], first) {
            Resolution::Match("enable") => Action::Push(Box::new(ProcurvePassword::default())),
            Resolution::Match("exit") | Resolution::Match("logout") => Action::Terminate,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.get(0).unwrap_or(""));
    }
}

/// The enable password continuation.
#[derive(Default)]
struct ProcurvePassword {
    attempts: u8,
}

impl CommandProcessor for ProcurvePassword {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Password: ".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if ctx.config.password_accepted(line) {
            return Action::Replace(Box::new(ProcurveEnabled));
        }
        ctx.write_line("Invalid password");
        self.attempts += 1;
        if self.attempts >= 3 {
            return Action::Pop;
        }
        Action::Handled
    }

    fn echo(&self) -> EchoMode {
        EchoMode::Suppress
    }

    fn unknown_command(&self, _ctx: &mut Context<'_>, _line: &str) {
        // Every input is a password attempt; process never falls through.
    }
}

/// The privileged shell (`name#`).
struct ProcurveEnabled;

impl CommandProcessor for ProcurveEnabled {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}# ", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["configure", "exit", "logout", "show", "write"], first) {
            Resolution::Match("configure") => Action::Push(Box::new(ProcurveConfigMode)),
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("logout") => Action::Terminate,
            Resolution::Match("show") => {
                let run = args.get(1).is_some_and(|t| {
                    matches!(resolve(&["running-config"], t), Resolution::Match(_))
                });
                if run {
                    ctx.output.extend(running_config(ctx.config));
                } else {
                    invalid_input(ctx, args.get(1).unwrap_or(""));
                }
                Action::Handled
            }
            Resolution::Match("write") => {
                let memory = match args.get(1) {
                    None => true,
                    Some(t) => matches!(resolve(&["memory"], t), Resolution::Match(_)),
                };
                if memory {
                    ctx.apply_commit_delay();
                } else {
                    invalid_input(ctx, args.get(1).unwrap_or(""));
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.get(0).unwrap_or(""));
    }
}

/// Global configuration context (`name(config)#`).
struct ProcurveConfigMode;

impl CommandProcessor for ProcurveConfigMode {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config)# ", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "hostname", "no", "vlan"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("hostname") => {
                match args.get(1) {
                    Some(name) => ctx.config.name = name.trim_matches('"').to_string(),
                    None => invalid_input(ctx, ""),
                }
                Action::Handled
            }
            Resolution::Match("vlan") => {
                let Some(number) = args.int(1) else {
                    invalid_input(ctx, args.get(1).unwrap_or(""));
                    return Action::Handled;
                };
                match ctx.config.ensure_vlan(number) {
                    Ok(vlan) => {
                        let number = vlan.number;
                        Action::Push(Box::new(ProcurveVlanContext { number }))
                    }
                    Err(_) => {
                        ctx.write_line(format!("Value {number} is out of range"));
                        Action::Handled
                    }
                }
            }
            Resolution::Match("no") => {
                let vlan_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                let number = args.int(2).and_then(|n| u16::try_from(n).ok());
                match (vlan_kw, number) {
                    (true, Some(1)) => {
                        ctx.write_line("The VLAN VLAN1 can't be deleted.");
                    }
                    (true, Some(number)) => {
                        if ctx.config.remove_vlan(number).is_err() {
                            ctx.write_line(format!("VLAN {number} does not exist."));
                        }
                    }
                    _ => invalid_input(ctx, args.get(1).unwrap_or("")),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.get(0).unwrap_or(""));
    }
}

/// VLAN context (`name(vlan-N)#`).
struct ProcurveVlanContext {
    number: u16,
}

impl CommandProcessor for ProcurveVlanContext {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(vlan-{})# ", config.name, self.number)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "name", "no", "untagged"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("name") => {
                match args.rest_from(1) {
                    Some(name) => {
                        let number = self.number;
                        if let Some(vlan) = ctx.config.vlan_mut(number) {
                            vlan.name = Some(name.trim_matches('"').to_string());
                        }
                    }
                    None => invalid_input(ctx, ""),
                }
                Action::Handled
            }
            Resolution::Match("no") => {
                let name_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["name"], t), Resolution::Match(_)));
                if name_kw {
                    if let Some(vlan) = ctx.config.vlan_mut(self.number) {
                        vlan.name = None;
                    }
                } else {
                    invalid_input(ctx, args.get(1).unwrap_or(""));
                }
                Action::Handled
            }
            Resolution::Match("untagged") => {
                match args.get(1) {
                    Some(port_name) if ctx.config.port(port_name).is_some() => {
                        let number = self.number;
                        let _ = ctx.config.set_access_vlan(port_name, number);
                        if let Some(port) = ctx.config.port_mut(port_name) {
                            port.mode = PortMode::Access;
                        }
                    }
                    _ => invalid_input(ctx, args.get(1).unwrap_or("")),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.get(0).unwrap_or(""));
    }
}

/// `show running-config` in ProCurve style.
fn running_config(config: &SwitchConfiguration) -> Vec<String> {
    let mut out = vec![
        "Running configuration:".to_string(),
        String::new(),
        "; J9019B Configuration Editor; Created on release #Q.11.17".to_string(),
        String::new(),
        format!("hostname \"{}\"", config.name),
    ];

    for vlan in config.vlans() {
        out.push(format!("vlan {}", vlan.number));
        out.push(format!("   name \"{}\"", vlan.display_name()));
        let untagged: Vec<&str> = config
            .ports()
            .filter(|p| p.access_vlan == Some(vlan.number))
            .map(|p| p.name.as_str())
            .collect();
        if !untagged.is_empty() {
            out.push(format!("   untagged {}", untagged.join(",")));
        }
        out.push("   exit".to_string());
    }

    out
}
