//! Brocade mode processors.

use super::{invalid_input, show};
use crate::config::ip::parse_addr;
use crate::config::{InterfaceIp, PortKind, PortMode, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::terminal::EchoMode;

/// The unprivileged shell (`SSH@name>`).
pub struct BrocadeDefault;

impl CommandProcessor for BrocadeDefault {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("SSH@{}>", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };
        match resolve(&["enable", "exit", "quit"], first) {
            Resolution::Match("enable") => Action::Push(Box::new(BrocadePassword::default())),
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        invalid_input(ctx, line);
    }
}

/// The enable password continuation.
#[derive(Default)]
pub struct BrocadePassword {
    attempts: u8,
}

impl CommandProcessor for BrocadePassword {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Password:".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if ctx.config.password_accepted(line) {
            return Action::Replace(Box::new(BrocadeEnabled));
        }
        ctx.write_line("Error - Incorrect username or password.");
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

/// The privileged shell (`SSH@name#`).
pub struct BrocadeEnabled;

impl CommandProcessor for BrocadeEnabled {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("SSH@{}#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["configure", "exit", "quit", "show", "write"], first) {
            Resolution::Match("configure") => {
                let terminal_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["terminal"], t), Resolution::Match(_)));
                if terminal_kw || args.get(1).is_none() {
                    Action::Push(Box::new(BrocadeConfigMode))
                } else {
                    invalid_input(ctx, line);
                    Action::Handled
                }
            }
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            Resolution::Match("show") => {
                match args.get(1).map(|t| resolve(&["running-config", "vlan"], t)) {
                    Some(Resolution::Match("running-config")) => {
                        let vlan_kw = args.get(2).is_some_and(|t| {
                            matches!(resolve(&["vlan"], t), Resolution::Match(_))
                        });
                        if vlan_kw {
                            match args.int(3).and_then(|n| u16::try_from(n).ok()) {
                                Some(number) if ctx.config.has_vlan(number) => {
                                    let lines = show::running_config_vlan(ctx.config, number);
                                    ctx.output.extend(lines);
                                }
                                _ => invalid_input(ctx, line),
                            }
                        } else {
                            ctx.output.extend(show::running_config(ctx.config));
                        }
                    }
                    Some(Resolution::Match("vlan")) => {
                        ctx.output.extend(show::vlan_brief(ctx.config));
                    }
                    _ => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("write") => {
                let memory_kw = match args.get(1) {
                    None => true,
                    Some(t) => matches!(resolve(&["memory"], t), Resolution::Match(_)),
                };
                if memory_kw {
                    ctx.write_line("Write startup-config done.");
                    ctx.apply_commit_delay();
                } else {
                    invalid_input(ctx, line);
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        invalid_input(ctx, line);
    }
}

/// Global configuration mode (`SSH@name(config)#`).
pub struct BrocadeConfigMode;

impl CommandProcessor for BrocadeConfigMode {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("SSH@{}(config)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "hostname", "interface", "no", "vlan"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("hostname") => {
                match args.get(1) {
                    Some(name) => ctx.config.name = name.to_string(),
                    None => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("vlan") => {
                let Some(number) = args.int(1) else {
                    invalid_input(ctx, line);
                    return Action::Handled;
                };
                match ctx.config.ensure_vlan(number) {
                    Ok(vlan) => {
                        let number = vlan.number;
                        // An inline `name WORD` may follow the number.
                        let name_kw = args.get(2).is_some_and(|t| {
                            matches!(resolve(&["name"], t), Resolution::Match(_))
                        });
                        if name_kw {
                            if let Some(name) = args.rest_from(3) {
                                vlan.name = Some(name.to_string());
                            }
                        }
                        Action::Push(Box::new(BrocadeConfigVlan::new(number)))
                    }
                    Err(_) => {
                        ctx.write_line(format!("Error: vlan id {number} is outside of allowed max of 4095"));
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
                    (true, Some(number)) => {
                        if number == 1 {
                            ctx.write_line("Error: cannot remove the default VLAN");
                        } else if ctx.config.remove_vlan(number).is_err() {
                            ctx.write_line(format!("Error: vlan {number} does not exist"));
                        }
                    }
                    _ => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("interface") => {
                let ve_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["ve"], t), Resolution::Match(_)));
                let number = args.int(2).and_then(|n| u16::try_from(n).ok());
                match (ve_kw, number) {
                    (true, Some(number)) => {
                        let name = format!("ve {number}");
                        if ctx.config.port(&name).is_none() {
                            ctx.write_line("Error - invalid virtual ethernet interface number.");
                            return Action::Handled;
                        }
                        Action::Push(Box::new(BrocadeConfigInterface::new(name)))
                    }
                    _ => match args.rest_from(1) {
                        Some(spec) if ctx.config.port(spec).is_some() => Action::Push(Box::new(
                            BrocadeConfigInterface::new(spec.to_string()),
                        )),
                        _ => {
                            invalid_input(ctx, line);
                            Action::Handled
                        }
                    },
                }
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        invalid_input(ctx, line);
    }
}

/// VLAN sub-mode (`SSH@name(config-vlan-N)#`). Port membership is
/// configured from here.
pub struct BrocadeConfigVlan {
    number: u16,
}

impl BrocadeConfigVlan {
    /// Create the vlan sub-mode for an existing VLAN.
    pub fn new(number: u16) -> Self {
        Self { number }
    }

    fn member_port(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Option<String> {
        let ethernet_kw = args
            .get(1)
            .is_some_and(|t| matches!(resolve(&["ethernet"], t), Resolution::Match(_)));
        if !ethernet_kw {
            return None;
        }
        let unit = args.get(2)?;
        let name = format!("ethernet {unit}");
        ctx.config.port(&name)?;
        Some(name)
    }
}

impl CommandProcessor for BrocadeConfigVlan {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("SSH@{}(config-vlan-{})#", config.name, self.number)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(
            &["exit", "no", "router-interface", "tagged", "untagged"],
            first,
        ) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("untagged") => {
                match self.member_port(ctx, &args) {
                    Some(name) => {
                        let number = self.number;
                        let _ = ctx.config.set_access_vlan(&name, number);
                        if let Some(port) = ctx.config.port_mut(&name) {
                            port.mode = PortMode::Access;
                        }
                    }
                    None => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("tagged") => {
                match self.member_port(ctx, &args) {
                    Some(name) => {
                        let number = self.number;
                        if let Some(port) = ctx.config.port_mut(&name) {
                            port.mode = PortMode::Trunk;
                            port.trunk_vlans.get_or_insert_with(Default::default).insert(number);
                        }
                    }
                    None => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("router-interface") => {
                let ve_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["ve"], t), Resolution::Match(_)));
                let number = args.int(2).and_then(|n| u16::try_from(n).ok());
                match (ve_kw, number) {
                    (true, Some(ve)) => {
                        let vlan = self.number;
                        ctx.config.ensure_port(&format!("ve {ve}"), PortKind::Vlan(vlan));
                    }
                    _ => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("no") => {
                // no untagged/tagged ethernet X
                let sub = args.get(1).map(|t| resolve(&["tagged", "untagged"], t));
                let unit = args.get(3);
                match (sub, unit) {
                    (Some(Resolution::Match("untagged")), Some(unit)) => {
                        let name = format!("ethernet {unit}");
                        if let Some(port) = ctx.config.port_mut(&name) {
                            port.access_vlan = None;
                            port.mode = PortMode::Unset;
                        }
                    }
                    (Some(Resolution::Match("tagged")), Some(unit)) => {
                        let name = format!("ethernet {unit}");
                        let number = self.number;
                        if let Some(port) = ctx.config.port_mut(&name) {
                            if let Some(vlans) = &mut port.trunk_vlans {
                                vlans.remove(&number);
                            }
                        }
                    }
                    _ => invalid_input(ctx, line),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        invalid_input(ctx, line);
    }
}

/// Interface sub-mode for physical and `ve` interfaces.
pub struct BrocadeConfigInterface {
    port: String,
}

impl BrocadeConfigInterface {
    /// Create the interface sub-mode for an existing port.
    pub fn new(port: impl Into<String>) -> Self {
        Self { port: port.into() }
    }
}

impl CommandProcessor for BrocadeConfigInterface {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        let suffix = self.port.replace("ethernet ", "e").replace("ve ", "vif-");
        format!("SSH@{}(config-if-{})#", config.name, suffix)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["disable", "enable", "exit", "ip", "no", "port-name"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("enable") => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = false;
                }
                Action::Handled
            }
            Resolution::Match("disable") => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = true;
                }
                Action::Handled
            }
            Resolution::Match("port-name") => {
                match args.rest_from(1) {
                    Some(name) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.description = Some(name.to_string());
                        }
                    }
                    None => invalid_input(ctx, line),
                }
                Action::Handled
            }
            Resolution::Match("ip") => {
                self.handle_ip(ctx, &args, line, false);
                Action::Handled
            }
            Resolution::Match("no") => {
                let ip_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["ip"], t), Resolution::Match(_)));
                if ip_kw {
                    self.handle_ip(ctx, &args, line, true);
                } else {
                    invalid_input(ctx, line);
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        invalid_input(ctx, line);
    }
}

impl BrocadeConfigInterface {
    /// `ip address A.B.C.D/L` in Brocade's CIDR notation.
    fn handle_ip(&self, ctx: &mut Context<'_>, args: &Args<'_>, line: &str, negate: bool) {
        let base = if negate { 1 } else { 0 };
        let address_kw = args
            .get(base + 1)
            .is_some_and(|t| matches!(resolve(&["address"], t), Resolution::Match(_)));
        let entry = args.get(base + 2).and_then(parse_cidr);
        match (address_kw, entry) {
            (true, Some(entry)) => {
                let result = if negate {
                    ctx.config.remove_port_ip(&self.port, Some(entry))
                } else {
                    ctx.config.add_port_ip(&self.port, entry)
                };
                if let Err(err) = result {
                    ctx.write_line(format!("Error: {err}"));
                }
            }
            _ => invalid_input(ctx, line),
        }
    }
}

/// Parse `A.B.C.D/L` into a primary interface address.
fn parse_cidr(spec: &str) -> Option<InterfaceIp> {
    let (address, len) = spec.split_once('/')?;
    let address = parse_addr(address).ok()?;
    let len: u8 = len.parse().ok()?;
    if len > 32 {
        return None;
    }
    let mask = if len == 0 { 0 } else { u32::MAX << (32 - len) };
    Some(InterfaceIp::primary(address, mask.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Port;
    use crate::engine::{OutputBuffer, SessionState};

    fn run(
        config: &mut SwitchConfiguration,
        processor: &mut dyn CommandProcessor,
        line: &str,
    ) -> (Action, Vec<String>) {
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let action = {
            let mut ctx = Context {
                config,
                output: &mut output,
                state: &mut state,
            };
            processor.process(&mut ctx, line)
        };
        (action, output.take())
    }

    fn setup() -> SwitchConfiguration {
        let mut config = SwitchConfiguration::new("my_switch");
        config.seed_ports(vec![
            Port::physical("ethernet 1/1"),
            Port::physical("ethernet 1/2"),
        ]);
        config
    }

    #[test]
    fn test_invalid_input_banner() {
        let mut config = setup();
        let mut enabled = BrocadeEnabled;
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let mut ctx = Context {
            config: &mut config,
            output: &mut output,
            state: &mut state,
        };
        enabled.unknown_command(&mut ctx, "frobnicate now");
        assert_eq!(
            output.take(),
            vec!["Invalid input -> frobnicate now", "Type ? for a list"]
        );
    }

    #[test]
    fn test_vlan_membership_from_vlan_mode() {
        let mut config = setup();
        let mut mode = BrocadeConfigMode;

        let (action, _) = run(&mut config, &mut mode, "vlan 123 name shizzle");
        assert!(matches!(action, Action::Push(_)));
        assert_eq!(config.vlan(123).unwrap().name.as_deref(), Some("shizzle"));

        let mut vlan = BrocadeConfigVlan::new(123);
        run(&mut config, &mut vlan, "untagged ethernet 1/1");
        assert_eq!(config.port("ethernet 1/1").unwrap().access_vlan, Some(123));

        run(&mut config, &mut vlan, "tagged ethernet 1/2");
        let tagged = config.port("ethernet 1/2").unwrap();
        assert!(tagged.trunk_vlans.as_ref().unwrap().contains(&123));

        run(&mut config, &mut vlan, "router-interface ve 123");
        assert!(config.port("ve 123").is_some());
    }

    #[test]
    fn test_ve_cidr_address() {
        let mut config = setup();
        config.ensure_vlan(123).unwrap();
        config.ensure_port("ve 123", PortKind::Vlan(123));

        let mut iface = BrocadeConfigInterface::new("ve 123");
        run(&mut config, &mut iface, "ip address 1.1.1.1/24");
        let port = config.port("ve 123").unwrap();
        assert_eq!(port.primary_ip().unwrap().to_string(), "1.1.1.1/24");

        run(&mut config, &mut iface, "no ip address 1.1.1.1/24");
        assert!(config.port("ve 123").unwrap().ips.is_empty());
    }

    #[test]
    fn test_default_vlan_protected() {
        let mut config = setup();
        let mut mode = BrocadeConfigMode;
        let (_, lines) = run(&mut config, &mut mode, "no vlan 1");
        assert_eq!(lines, vec!["Error: cannot remove the default VLAN"]);
        assert!(config.has_vlan(1));
    }
}
