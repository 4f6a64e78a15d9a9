//! Cisco global configuration mode and its vlan/vrf sub-modes.

use super::config_interface::CiscoConfigInterface;
use super::{
    CiscoVariant, InterfaceRef, ambiguous_command, incomplete_command, invalid_input,
    parse_interface, resolve_or_create_interface,
};
use crate::config::ip::{StaticRoute, parse_addr, parse_mask};
use crate::config::{DEFAULT_VLAN, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::error::ConfigError;

const COMMANDS: &[&str] = &["end", "exit", "hostname", "interface", "ip", "no", "vlan"];

/// Global configuration mode (`name(config)#`).
pub struct CiscoConfigMode {
    variant: CiscoVariant,
}

impl CiscoConfigMode {
    /// Create the global configuration mode.
    pub fn new(variant: CiscoVariant) -> Self {
        Self { variant }
    }

    fn handle_vlan(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        let Some(number) = args.int(1) else {
            incomplete_command(ctx);
            return Action::Handled;
        };
        match ctx.config.ensure_vlan(number) {
            Ok(vlan) => {
                let number = vlan.number;
                Action::Push(Box::new(CiscoConfigVlan::new(number)))
            }
            Err(_) => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_interface(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match resolve_or_create_interface(ctx, args, 1) {
            Some(name) => Action::Push(Box::new(CiscoConfigInterface::new(name, self.variant))),
            None => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_ip(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match args.get(1).map(|t| resolve(&["route", "vrf"], t)) {
            Some(Resolution::Match("route")) => {
                let route = parse_route(args, 2);
                match route {
                    Ok(route) => ctx.config.add_route(route),
                    Err(offset) => invalid_input(ctx, args.offset(offset).unwrap_or(0)),
                }
                Action::Handled
            }
            Some(Resolution::Match("vrf")) => match args.get(2) {
                Some(name) => {
                    ctx.config.ensure_vrf(name);
                    Action::Push(Box::new(CiscoConfigVrf::new(name)))
                }
                None => {
                    incomplete_command(ctx);
                    Action::Handled
                }
            },
            _ => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_no(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match args.get(1).map(|t| resolve(&["interface", "ip", "vlan"], t)) {
            Some(Resolution::Match("vlan")) => {
                let Some(number) = args.int(2).and_then(|n| u16::try_from(n).ok()) else {
                    incomplete_command(ctx);
                    return Action::Handled;
                };
                match ctx.config.remove_vlan(number) {
                    Ok(_) => {}
                    Err(ConfigError::DefaultVlanImmutable) => {
                        ctx.write_line(format!("%Default VLAN {DEFAULT_VLAN} may not be deleted."));
                    }
                    Err(_) => {
                        ctx.write_line(format!(
                            "%VLAN {number} not found in current VLAN database"
                        ));
                    }
                }
                Action::Handled
            }
            Some(Resolution::Match("interface")) => {
                match args.rest_from(2).and_then(parse_interface) {
                    Some(iface @ (InterfaceRef::Vlan(_) | InterfaceRef::PortChannel(_))) => {
                        let _ = ctx.config.remove_port(&iface.canonical());
                    }
                    _ => invalid_input(ctx, args.offset(2).unwrap_or(0)),
                }
                Action::Handled
            }
            Some(Resolution::Match("ip")) => self.handle_no_ip(ctx, args),
            _ => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_no_ip(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match args.get(2).map(|t| resolve(&["route", "vrf"], t)) {
            Some(Resolution::Match("route")) => {
                match parse_route(args, 3) {
                    Ok(route) => {
                        if ctx
                            .config
                            .remove_route(route.destination, route.mask)
                            .is_err()
                        {
                            ctx.write_line("%No matching route to delete");
                        }
                    }
                    Err(offset) => invalid_input(ctx, args.offset(offset).unwrap_or(0)),
                }
                Action::Handled
            }
            Some(Resolution::Match("vrf")) => {
                match args.get(3) {
                    Some(name) => {
                        if ctx.config.remove_vrf(name).is_err() {
                            ctx.write_line(format!("% VRF {name} not configured."));
                        }
                    }
                    None => incomplete_command(ctx),
                }
                Action::Handled
            }
            _ => {
                invalid_input(ctx, args.offset(2).unwrap_or(0));
                Action::Handled
            }
        }
    }
}

/// Parse `DEST MASK NEXTHOP` starting at token `from`; the error is the
/// index of the offending token.
fn parse_route(args: &Args<'_>, from: usize) -> Result<StaticRoute, usize> {
    let destination = args
        .get(from)
        .and_then(|t| parse_addr(t).ok())
        .ok_or(from)?;
    let mask = args
        .get(from + 1)
        .and_then(|t| parse_mask(t).ok())
        .ok_or(from + 1)?;
    let next_hop = args
        .get(from + 2)
        .and_then(|t| parse_addr(t).ok())
        .ok_or(from + 2)?;
    Ok(StaticRoute {
        destination,
        mask,
        next_hop,
    })
}

impl CommandProcessor for CiscoConfigMode {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(COMMANDS, first) {
            Resolution::Match("exit") | Resolution::Match("end") => Action::Pop,
            Resolution::Match("hostname") => {
                match args.get(1) {
                    Some(name) => ctx.config.name = name.to_string(),
                    None => incomplete_command(ctx),
                }
                Action::Handled
            }
            Resolution::Match("vlan") => self.handle_vlan(ctx, &args),
            Resolution::Match("interface") => self.handle_interface(ctx, &args),
            Resolution::Match("ip") => self.handle_ip(ctx, &args),
            Resolution::Match("no") => self.handle_no(ctx, &args),
            Resolution::Ambiguous(_) => {
                ambiguous_command(ctx, line);
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.offset(0).unwrap_or(0));
    }
}

/// VLAN sub-mode (`name(config-vlan)#`).
pub struct CiscoConfigVlan {
    number: u16,
}

impl CiscoConfigVlan {
    /// Create the vlan sub-mode for an existing VLAN.
    pub fn new(number: u16) -> Self {
        Self { number }
    }
}

impl CommandProcessor for CiscoConfigVlan {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-vlan)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "name", "no"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("name") => {
                if self.number == DEFAULT_VLAN {
                    ctx.write_line(format!(
                        "%Default VLAN {DEFAULT_VLAN} may not have its name changed."
                    ));
                    return Action::Handled;
                }
                match args.rest_from(1) {
                    Some(name) => {
                        if let Some(vlan) = ctx.config.vlan_mut(self.number) {
                            vlan.name = Some(name.to_string());
                        }
                    }
                    None => incomplete_command(ctx),
                }
                Action::Handled
            }
            Resolution::Match("no") => {
                let is_name = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["name"], t), Resolution::Match(_)));
                if is_name {
                    if self.number == DEFAULT_VLAN {
                        ctx.write_line(format!(
                            "%Default VLAN {DEFAULT_VLAN} may not have its name changed."
                        ));
                    } else if let Some(vlan) = ctx.config.vlan_mut(self.number) {
                        vlan.name = None;
                    }
                } else {
                    invalid_input(ctx, args.offset(1).unwrap_or(0));
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.offset(0).unwrap_or(0));
    }
}

/// VRF sub-mode (`name(config-vrf)#`).
pub struct CiscoConfigVrf {
    _name: String,
}

impl CiscoConfigVrf {
    /// Create the vrf sub-mode.
    pub fn new(name: impl Into<String>) -> Self {
        Self { _name: name.into() }
    }
}

impl CommandProcessor for CiscoConfigVrf {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-vrf)#", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };
        match resolve(&["exit"], first) {
            Resolution::Match("exit") => Action::Pop,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.offset(0).unwrap_or(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Port;
    use crate::engine::{OutputBuffer, SessionState};

    fn process(
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
    fn test_vlan_boundaries() {
        let mut config = SwitchConfiguration::new("sw");
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);

        for rejected in ["vlan -1", "vlan 0", "vlan 4095"] {
            let (action, lines) = process(&mut config, &mut mode, rejected);
            assert!(matches!(action, Action::Handled), "{rejected}");
            assert!(lines.iter().any(|l| l.contains("% Invalid input")));
        }

        let (action, _) = process(&mut config, &mut mode, "vlan 4094");
        assert!(matches!(action, Action::Push(_)));
        assert!(config.has_vlan(4094));
    }

    #[test]
    fn test_no_vlan_1_rejected() {
        let mut config = SwitchConfiguration::new("sw");
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);
        let (_, lines) = process(&mut config, &mut mode, "no vlan 1");
        assert_eq!(lines, vec!["%Default VLAN 1 may not be deleted."]);
        assert!(config.has_vlan(1));
    }

    #[test]
    fn test_vlan_name() {
        let mut config = SwitchConfiguration::new("sw");
        config.ensure_vlan(123).unwrap();
        let mut mode = CiscoConfigVlan::new(123);

        process(&mut config, &mut mode, "name shizzle");
        assert_eq!(
            config.vlan(123).unwrap().name.as_deref(),
            Some("shizzle")
        );

        process(&mut config, &mut mode, "no name");
        assert_eq!(config.vlan(123).unwrap().name, None);
    }

    #[test]
    fn test_interface_vlan_autocreates_svi() {
        let mut config = SwitchConfiguration::new("sw");
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);

        let (action, _) = process(&mut config, &mut mode, "interface vlan 2999");
        assert!(matches!(action, Action::Push(_)));
        assert!(config.port("Vlan2999").is_some());

        process(&mut config, &mut mode, "no interface vlan 2999");
        assert!(config.port("Vlan2999").is_none());
    }

    #[test]
    fn test_unknown_physical_interface_rejected() {
        let mut config = SwitchConfiguration::new("sw");
        config.add_port(Port::physical("FastEthernet0/1"));
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);

        let (action, lines) = process(&mut config, &mut mode, "interface FastEthernet9/99");
        assert!(matches!(action, Action::Handled));
        assert!(lines.iter().any(|l| l.contains("% Invalid input")));
    }

    #[test]
    fn test_ip_route_add_remove() {
        let mut config = SwitchConfiguration::new("sw");
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);

        process(&mut config, &mut mode, "ip route 10.0.0.0 255.255.255.0 192.168.1.1");
        assert_eq!(config.static_routes.len(), 1);

        process(&mut config, &mut mode, "no ip route 10.0.0.0 255.255.255.0 192.168.1.1");
        assert!(config.static_routes.is_empty());

        let (_, lines) = process(
            &mut config,
            &mut mode,
            "no ip route 10.0.0.0 255.255.255.0 192.168.1.1",
        );
        assert_eq!(lines, vec!["%No matching route to delete"]);
    }

    #[test]
    fn test_hostname() {
        let mut config = SwitchConfiguration::new("sw");
        let mut mode = CiscoConfigMode::new(CiscoVariant::Generic);
        process(&mut config, &mut mode, "hostname renamed");
        assert_eq!(config.name, "renamed");
    }
}
