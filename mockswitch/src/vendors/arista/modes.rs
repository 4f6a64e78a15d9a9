//! Arista EOS mode processors.

use super::{AristaInterfaceRef, invalid_input, parse_interface, show};
use crate::config::{PortKind, PortMode, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::terminal::EchoMode;

/// The unprivileged shell (`name>`).
pub struct AristaDefault;

impl CommandProcessor for AristaDefault {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}>", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };
        match resolve(&["enable", "exit", "quit"], first) {
            Resolution::Match("enable") => Action::Push(Box::new(AristaPassword::default())),
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, 0, args.get(0).unwrap_or(""));
    }
}

/// The enable password continuation.
#[derive(Default)]
pub struct AristaPassword {
    attempts: u8,
}

impl CommandProcessor for AristaPassword {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Password: ".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if ctx.config.password_accepted(line) {
            return Action::Replace(Box::new(AristaEnabled));
        }
        self.attempts += 1;
        if self.attempts >= 3 {
            ctx.write_line("% Access denied");
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
pub struct AristaEnabled;

impl CommandProcessor for AristaEnabled {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["configure", "disable", "enable", "exit", "show", "write"], first) {
            Resolution::Match("configure") => Action::Push(Box::new(AristaConfigMode)),
            Resolution::Match("disable") => Action::Pop,
            Resolution::Match("enable") => Action::Handled,
            Resolution::Match("exit") => Action::Terminate,
            Resolution::Match("show") => {
                match args.get(1).map(|t| resolve(&["running-config", "vlan"], t)) {
                    Some(Resolution::Match("running-config")) => {
                        ctx.output.extend(show::running_config(ctx.config));
                    }
                    Some(Resolution::Match("vlan")) => {
                        ctx.output.extend(show::vlan_table(ctx.config));
                    }
                    _ => invalid_input(ctx, 1, args.get(1).unwrap_or("")),
                }
                Action::Handled
            }
            Resolution::Match("write") => {
                ctx.write_line("Copy completed successfully.");
                ctx.apply_commit_delay();
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, 0, args.get(0).unwrap_or(""));
    }
}

/// Global configuration mode (`name(config)#`).
pub struct AristaConfigMode;

impl CommandProcessor for AristaConfigMode {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["end", "exit", "hostname", "interface", "no", "vlan"], first) {
            Resolution::Match("exit") | Resolution::Match("end") => Action::Pop,
            Resolution::Match("hostname") => {
                match args.get(1) {
                    Some(name) => ctx.config.name = name.to_string(),
                    None => invalid_input(ctx, 1, ""),
                }
                Action::Handled
            }
            Resolution::Match("vlan") => {
                let Some(number) = args.int(1) else {
                    invalid_input(ctx, 1, args.get(1).unwrap_or(""));
                    return Action::Handled;
                };
                match ctx.config.ensure_vlan(number) {
                    Ok(vlan) => {
                        let number = vlan.number;
                        Action::Push(Box::new(AristaConfigVlan::new(number)))
                    }
                    Err(_) => {
                        invalid_input(ctx, 1, args.get(1).unwrap_or(""));
                        Action::Handled
                    }
                }
            }
            Resolution::Match("interface") => {
                match args.rest_from(1).and_then(parse_interface) {
                    Some(AristaInterfaceRef::Physical(name)) => {
                        if ctx.config.port(&name).is_some() {
                            Action::Push(Box::new(AristaConfigInterface::new(name)))
                        } else {
                            invalid_input(ctx, 1, args.get(1).unwrap_or(""));
                            Action::Handled
                        }
                    }
                    Some(iface @ AristaInterfaceRef::Vlan(number)) => {
                        let name = iface.canonical();
                        ctx.config.ensure_port(&name, PortKind::Vlan(number));
                        Action::Push(Box::new(AristaConfigInterface::new(name)))
                    }
                    None => {
                        invalid_input(ctx, 1, args.get(1).unwrap_or(""));
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
                        if ctx.config.remove_vlan(number).is_err() {
                            invalid_input(ctx, 2, args.get(2).unwrap_or(""));
                        }
                    }
                    _ => invalid_input(ctx, 1, args.get(1).unwrap_or("")),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, 0, args.get(0).unwrap_or(""));
    }
}

/// VLAN sub-mode (`name(config-vlan-N)#`).
pub struct AristaConfigVlan {
    number: u16,
}

impl AristaConfigVlan {
    /// Create the vlan sub-mode for an existing VLAN.
    pub fn new(number: u16) -> Self {
        Self { number }
    }
}

impl CommandProcessor for AristaConfigVlan {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-vlan-{})#", config.name, self.number)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "name", "no"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("name") => {
                match args.rest_from(1) {
                    Some(name) => {
                        let number = self.number;
                        if let Some(vlan) = ctx.config.vlan_mut(number) {
                            vlan.name = Some(name.to_string());
                        }
                    }
                    None => invalid_input(ctx, 1, ""),
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
                    invalid_input(ctx, 1, args.get(1).unwrap_or(""));
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, 0, args.get(0).unwrap_or(""));
    }
}

/// Interface sub-mode (`name(config-if-X)#`).
pub struct AristaConfigInterface {
    port: String,
}

impl AristaConfigInterface {
    /// Create the interface sub-mode for an existing port.
    pub fn new(port: impl Into<String>) -> Self {
        Self { port: port.into() }
    }

    fn handle_switchport(&self, ctx: &mut Context<'_>, args: &Args<'_>, base: usize, negate: bool) {
        match args.get(base + 1).map(|t| resolve(&["access", "mode"], t)) {
            Some(Resolution::Match("mode")) => {
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.mode = PortMode::Unset;
                    }
                    return;
                }
                let mode = match args.get(base + 2).map(|t| resolve(&["access", "trunk"], t)) {
                    Some(Resolution::Match("access")) => PortMode::Access,
                    Some(Resolution::Match("trunk")) => PortMode::Trunk,
                    _ => return invalid_input(ctx, base + 2, args.get(base + 2).unwrap_or("")),
                };
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.mode = mode;
                }
            }
            Some(Resolution::Match("access")) => {
                let vlan_kw = args
                    .get(base + 2)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                if !vlan_kw {
                    return invalid_input(ctx, base + 2, args.get(base + 2).unwrap_or(""));
                }
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.access_vlan = None;
                    }
                    return;
                }
                let Some(vlan) = args.int(base + 3).and_then(|n| u16::try_from(n).ok()) else {
                    return invalid_input(ctx, base + 3, args.get(base + 3).unwrap_or(""));
                };
                if ctx.config.set_access_vlan(&self.port, vlan).is_err() {
                    ctx.write_line(format!("% VLAN {vlan} not found"));
                }
            }
            _ => invalid_input(ctx, base + 1, args.get(base + 1).unwrap_or("")),
        }
    }
}

impl CommandProcessor for AristaConfigInterface {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-if-{})#", config.name, self.port)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(
            &["description", "exit", "no", "shutdown", "switchport"],
            first,
        ) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("description") => {
                match args.rest_from(1) {
                    Some(description) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.description = Some(description.to_string());
                        }
                    }
                    None => invalid_input(ctx, 1, ""),
                }
                Action::Handled
            }
            Resolution::Match("shutdown") => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = true;
                }
                Action::Handled
            }
            Resolution::Match("switchport") => {
                self.handle_switchport(ctx, &args, 0, false);
                Action::Handled
            }
            Resolution::Match("no") => {
                match args
                    .get(1)
                    .map(|t| resolve(&["description", "shutdown", "switchport"], t))
                {
                    Some(Resolution::Match("description")) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.description = None;
                        }
                    }
                    Some(Resolution::Match("shutdown")) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.shutdown = false;
                        }
                    }
                    Some(Resolution::Match("switchport")) => {
                        self.handle_switchport(ctx, &args, 1, true);
                    }
                    _ => invalid_input(ctx, 1, args.get(1).unwrap_or("")),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, 0, args.get(0).unwrap_or(""));
    }
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

    #[test]
    fn test_vlan_and_interface_flow() {
        let mut config = SwitchConfiguration::new("eos");
        config.seed_ports(vec![Port::physical("Ethernet1")]);
        let mut mode = AristaConfigMode;

        let (action, _) = run(&mut config, &mut mode, "vlan 123");
        assert!(matches!(action, Action::Push(_)));

        let mut vlan = AristaConfigVlan::new(123);
        run(&mut config, &mut vlan, "name shizzle");
        assert_eq!(config.vlan(123).unwrap().name.as_deref(), Some("shizzle"));

        let mut iface = AristaConfigInterface::new("Ethernet1");
        run(&mut config, &mut iface, "switchport access vlan 123");
        assert_eq!(config.port("Ethernet1").unwrap().access_vlan, Some(123));
    }

    #[test]
    fn test_invalid_input_token_format() {
        let mut config = SwitchConfiguration::new("eos");
        let mut enabled = AristaEnabled;
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let mut ctx = Context {
            config: &mut config,
            output: &mut output,
            state: &mut state,
        };
        enabled.unknown_command(&mut ctx, "frobnicate");
        assert_eq!(
            output.take(),
            vec!["% Invalid input (at token 0: 'frobnicate')"]
        );
    }
}
