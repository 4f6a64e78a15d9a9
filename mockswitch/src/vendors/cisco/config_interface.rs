//! Cisco interface configuration sub-mode.

use super::{CiscoVariant, ambiguous_command, incomplete_command, invalid_input, short_name};
use crate::config::ip::{InterfaceIp, parse_addr, parse_mask};
use crate::config::port::parse_vlan_ranges;
use crate::config::{PortKind, PortMode, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::error::ConfigError;

const COMMANDS: &[&str] = &[
    "channel-group",
    "description",
    "exit",
    "ip",
    "no",
    "ntp",
    "shutdown",
    "standby",
    "switchport",
];

const NO_COMMANDS: &[&str] = &[
    "channel-group",
    "description",
    "ip",
    "ntp",
    "shutdown",
    "standby",
    "switchport",
];

const CHANNEL_MODES: &[&str] = &["active", "auto", "desirable", "on", "passive"];

/// Interface configuration sub-mode (`name(config-if)#`).
pub struct CiscoConfigInterface {
    port: String,
    variant: CiscoVariant,
}

impl CiscoConfigInterface {
    /// Create the sub-mode for an existing port.
    pub fn new(port: impl Into<String>, variant: CiscoVariant) -> Self {
        Self {
            port: port.into(),
            variant,
        }
    }

    fn handle_switchport(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        base: usize,
        negate: bool,
    ) -> Action {
        match args.get(base + 1).map(|t| resolve(&["access", "mode", "trunk"], t)) {
            Some(Resolution::Match("mode")) => {
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.mode = PortMode::Unset;
                    }
                    return Action::Handled;
                }
                match args.get(base + 2).map(|t| resolve(&["access", "trunk"], t)) {
                    Some(Resolution::Match("access")) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.mode = PortMode::Access;
                        }
                    }
                    Some(Resolution::Match("trunk")) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.mode = PortMode::Trunk;
                        }
                    }
                    _ => invalid_input(ctx, args.offset(base + 2).unwrap_or(0)),
                }
                Action::Handled
            }
            Some(Resolution::Match("access")) => {
                let vlan_kw = args
                    .get(base + 2)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                if !vlan_kw && !negate {
                    incomplete_command(ctx);
                    return Action::Handled;
                }

                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.access_vlan = None;
                    }
                    return Action::Handled;
                }

                let Some(vlan) = args.int(base + 3).and_then(|n| u16::try_from(n).ok()) else {
                    incomplete_command(ctx);
                    return Action::Handled;
                };
                if ctx.config.set_access_vlan(&self.port, vlan).is_err() {
                    ctx.write_line("% Access VLAN does not exist. Configure the VLAN first.");
                }
                Action::Handled
            }
            Some(Resolution::Match("trunk")) => self.handle_trunk(ctx, args, base + 2, negate),
            _ => {
                invalid_input(ctx, args.offset(base + 1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_trunk(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        at: usize,
        negate: bool,
    ) -> Action {
        match args
            .get(at)
            .map(|t| resolve(&["allowed", "encapsulation", "native"], t))
        {
            Some(Resolution::Match("encapsulation")) => {
                let Some(port) = ctx.config.port_mut(&self.port) else {
                    return Action::Handled;
                };
                if negate {
                    port.trunk_encapsulation = None;
                } else {
                    match args.get(at + 1) {
                        Some(encapsulation) => {
                            port.trunk_encapsulation = Some(encapsulation.to_string());
                        }
                        None => incomplete_command(ctx),
                    }
                }
                Action::Handled
            }
            Some(Resolution::Match("native")) => {
                let vlan_kw = args
                    .get(at + 1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                if !vlan_kw {
                    invalid_input(ctx, args.offset(at + 1).unwrap_or(0));
                    return Action::Handled;
                }
                let Some(port) = ctx.config.port_mut(&self.port) else {
                    return Action::Handled;
                };
                if negate {
                    port.trunk_native_vlan = None;
                } else {
                    match args.int(at + 2).and_then(|n| u16::try_from(n).ok()) {
                        Some(vlan) => port.trunk_native_vlan = Some(vlan),
                        None => incomplete_command(ctx),
                    }
                }
                Action::Handled
            }
            Some(Resolution::Match("allowed")) => {
                let vlan_kw = args
                    .get(at + 1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                if !vlan_kw {
                    invalid_input(ctx, args.offset(at + 1).unwrap_or(0));
                    return Action::Handled;
                }
                let Some(port) = ctx.config.port_mut(&self.port) else {
                    return Action::Handled;
                };

                if negate {
                    port.trunk_vlans = None;
                    return Action::Handled;
                }

                let spec = args.get(at + 2);
                match spec.map(|t| resolve(&["add", "all", "none", "remove"], t)) {
                    Some(Resolution::Match("all")) => port.trunk_vlans = None,
                    Some(Resolution::Match("none")) => {
                        port.trunk_vlans = Some(Default::default());
                    }
                    Some(Resolution::Match("add")) => {
                        match args.get(at + 3).and_then(|s| parse_vlan_ranges(s).ok()) {
                            Some(added) => match &mut port.trunk_vlans {
                                Some(current) => current.extend(added),
                                none => *none = Some(added),
                            },
                            None => incomplete_command(ctx),
                        }
                    }
                    Some(Resolution::Match("remove")) => {
                        match args.get(at + 3).and_then(|s| parse_vlan_ranges(s).ok()) {
                            Some(removed) => {
                                if let Some(current) = &mut port.trunk_vlans {
                                    for vlan in removed {
                                        current.remove(&vlan);
                                    }
                                }
                            }
                            None => incomplete_command(ctx),
                        }
                    }
                    _ => match spec.and_then(|s| parse_vlan_ranges(s).ok()) {
                        Some(exact) => port.trunk_vlans = Some(exact),
                        None => invalid_input(ctx, args.offset(at + 2).unwrap_or(0)),
                    },
                }
                Action::Handled
            }
            _ => {
                invalid_input(ctx, args.offset(at).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_ip(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        base: usize,
        negate: bool,
    ) -> Action {
        const IP_WORDS: &[&str] = &[
            "access-group",
            "address",
            "helper-address",
            "redirects",
            "verify",
            "vrf",
        ];

        match args.get(base + 1).map(|t| resolve(IP_WORDS, t)) {
            Some(Resolution::Match("address")) => self.handle_ip_address(ctx, args, base + 2, negate),
            Some(Resolution::Match("helper-address")) => {
                let Some(port) = ctx.config.port_mut(&self.port) else {
                    return Action::Handled;
                };
                match args.get(base + 2).map(parse_addr) {
                    Some(Ok(helper)) => {
                        if negate {
                            let _ = port.remove_ip_helper(helper);
                        } else {
                            port.add_ip_helper(helper);
                        }
                    }
                    Some(Err(_)) => invalid_input(ctx, args.offset(base + 2).unwrap_or(0)),
                    None if negate => port.ip_helpers.clear(),
                    None => incomplete_command(ctx),
                }
                Action::Handled
            }
            Some(Resolution::Match("access-group")) => {
                self.handle_access_group(ctx, args, base + 2, negate)
            }
            Some(Resolution::Match("redirects")) => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.ip_redirects = if negate { Some(false) } else { None };
                }
                Action::Handled
            }
            Some(Resolution::Match("verify")) => self.handle_ip_verify(ctx, args, base, negate),
            Some(Resolution::Match("vrf")) => {
                let forwarding = args
                    .get(base + 2)
                    .is_some_and(|t| matches!(resolve(&["forwarding"], t), Resolution::Match(_)));
                if !forwarding {
                    invalid_input(ctx, args.offset(base + 2).unwrap_or(0));
                    return Action::Handled;
                }
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.vrf = None;
                        port.clear_ips();
                    }
                    return Action::Handled;
                }
                let Some(vrf) = args.get(base + 3) else {
                    incomplete_command(ctx);
                    return Action::Handled;
                };
                if ctx.config.bind_port_vrf(&self.port, vrf).is_err() {
                    ctx.write_line(format!("% VRF {vrf} not configured."));
                }
                Action::Handled
            }
            _ => {
                invalid_input(ctx, args.offset(base + 1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_ip_address(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        at: usize,
        negate: bool,
    ) -> Action {
        // `no ip address` with no operands wipes every address.
        if negate && args.get(at).is_none() {
            let _ = ctx.config.remove_port_ip(&self.port, None);
            return Action::Handled;
        }

        let address = match args.get(at).map(parse_addr) {
            Some(Ok(address)) => address,
            _ => {
                if negate {
                    invalid_input(ctx, args.offset(at).unwrap_or(0));
                } else {
                    incomplete_command(ctx);
                }
                return Action::Handled;
            }
        };
        let mask = match args.get(at + 1).map(parse_mask) {
            Some(Ok(mask)) => mask,
            _ => {
                incomplete_command(ctx);
                return Action::Handled;
            }
        };
        let secondary = args
            .get(at + 2)
            .is_some_and(|t| matches!(resolve(&["secondary"], t), Resolution::Match(_)));

        let entry = InterfaceIp {
            address,
            mask,
            secondary,
        };

        let result = if negate {
            ctx.config.remove_port_ip(&self.port, Some(entry))
        } else {
            ctx.config.add_port_ip(&self.port, entry)
        };

        match result {
            Ok(()) => {}
            Err(ConfigError::SecondariesPresent) => {
                ctx.write_line("Must delete secondary before deleting primary");
            }
            Err(ConfigError::AddressOverlap {
                network,
                owner,
                secondary: true,
            }) => {
                ctx.write_line(format!(
                    "% {network} overlaps with secondary address on {owner}"
                ));
            }
            Err(ConfigError::AddressOverlap {
                network,
                owner,
                secondary: false,
            }) => {
                ctx.write_line(format!("% {network} overlaps with {owner}"));
            }
            Err(ConfigError::SecondaryIsPrimary(_)) => {
                ctx.write_line("% Secondary cannot be the same as primary");
            }
            Err(_) => {
                ctx.write_line("% Invalid address");
            }
        }
        Action::Handled
    }

    fn handle_access_group(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        at: usize,
        negate: bool,
    ) -> Action {
        // The direction is always the last operand; the group name before
        // it is optional on the `no` form.
        let last = args.len().checked_sub(1).filter(|&i| i >= at);
        let direction = last
            .and_then(|i| args.get(i))
            .map(|t| resolve(&["in", "out"], t));

        let Some(Resolution::Match(direction)) = direction else {
            incomplete_command(ctx);
            return Action::Handled;
        };
        let name = (last.unwrap() > at).then(|| args.get(at).unwrap().to_string());

        let Some(port) = ctx.config.port_mut(&self.port) else {
            return Action::Handled;
        };

        if negate {
            match direction {
                "in" => port.access_group_in = None,
                _ => port.access_group_out = None,
            }
        } else {
            let Some(name) = name else {
                incomplete_command(ctx);
                return Action::Handled;
            };
            match direction {
                "in" => port.access_group_in = Some(name),
                _ => port.access_group_out = Some(name),
            }
        }
        Action::Handled
    }

    fn handle_ip_verify(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        base: usize,
        negate: bool,
    ) -> Action {
        // ip verify unicast source reachable-via rx
        let tail = ["unicast", "source", "reachable-via", "rx"];
        for (i, word) in tail.iter().enumerate() {
            let ok = args
                .get(base + 2 + i)
                .is_some_and(|t| matches!(resolve(&[*word], t), Resolution::Match(_)));
            if !ok {
                invalid_input(ctx, args.offset(base + 2 + i).unwrap_or(0));
                return Action::Handled;
            }
        }

        match self.variant {
            CiscoVariant::Catalyst6500 => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.unicast_rpf = !negate;
                }
            }
            CiscoVariant::Generic if !negate => {
                let short = short_name(&self.port);
                for _ in 0..2 {
                    ctx.write_line(format!(
                        "% ip verify configuration not supported on interface {short}"
                    ));
                    ctx.write_line(" - verification not supported by hardware");
                }
                ctx.write_line(format!(
                    "%Restoring the original configuration failed on {} - Interface Support Failure",
                    self.port
                ));
            }
            CiscoVariant::Generic => {}
        }
        Action::Handled
    }

    fn handle_channel_group(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        base: usize,
        negate: bool,
    ) -> Action {
        if negate {
            if let Some(port) = ctx.config.port_mut(&self.port) {
                port.channel_group = None;
            }
            return Action::Handled;
        }

        let Some(id) = args.int(base).and_then(|n| u16::try_from(n).ok()) else {
            incomplete_command(ctx);
            return Action::Handled;
        };
        let mode_kw = args
            .get(base + 1)
            .is_some_and(|t| matches!(resolve(&["mode"], t), Resolution::Match(_)));
        let mode = args
            .get(base + 2)
            .map(|t| resolve(CHANNEL_MODES, t));
        let (true, Some(Resolution::Match(mode))) = (mode_kw, mode) else {
            invalid_input(ctx, args.offset(base + 1).unwrap_or(0));
            return Action::Handled;
        };

        let aggregate = format!("Port-channel{id}");
        if ctx.config.port(&aggregate).is_none() {
            ctx.config.ensure_port(&aggregate, PortKind::Aggregated);
            ctx.write_line(format!(
                "Creating a port-channel interface Port-channel {id}"
            ));
        }
        if let Some(port) = ctx.config.port_mut(&self.port) {
            port.channel_group = Some((id, mode.to_string()));
        }
        Action::Handled
    }

    fn handle_standby(
        &self,
        ctx: &mut Context<'_>,
        args: &Args<'_>,
        base: usize,
        negate: bool,
    ) -> Action {
        let Some(group) = args.int(base).and_then(|n| u16::try_from(n).ok()) else {
            incomplete_command(ctx);
            return Action::Handled;
        };

        // Parse fully before touching the port so the error banners never
        // fight the config borrow.
        let op = match parse_standby_op(args, base + 1, negate) {
            Ok(op) => op,
            Err(StandbyParseError::Incomplete) => {
                incomplete_command(ctx);
                return Action::Handled;
            }
            Err(StandbyParseError::Invalid(index)) => {
                invalid_input(ctx, args.offset(index).unwrap_or(0));
                return Action::Handled;
            }
        };

        let Some(port) = ctx.config.port_mut(&self.port) else {
            return Action::Handled;
        };

        match op {
            StandbyOp::RemoveGroup => {
                port.standby.remove(&group);
            }
            StandbyOp::SetIp(address) => port.standby_group(group).ip = Some(address),
            StandbyOp::ClearIp => port.standby_group(group).ip = None,
            StandbyOp::AddSecondary(address) => {
                port.standby_group(group).secondaries.insert(address);
            }
            StandbyOp::RemoveSecondary(address) => {
                port.standby_group(group).secondaries.remove(&address);
            }
            StandbyOp::SetTimers(hello, hold) => {
                port.standby_group(group).timers = Some((hello, hold));
            }
            StandbyOp::ClearTimers => port.standby_group(group).timers = None,
            StandbyOp::SetPriority(priority) => {
                port.standby_group(group).priority = Some(priority);
            }
            StandbyOp::ClearPriority => port.standby_group(group).priority = None,
            StandbyOp::SetPreempt(delay) => {
                let standby = port.standby_group(group);
                standby.preempt = true;
                if delay.is_some() {
                    standby.preempt_delay_minimum = delay;
                }
            }
            StandbyOp::ClearPreempt => {
                let standby = port.standby_group(group);
                standby.preempt = false;
                standby.preempt_delay_minimum = None;
            }
            StandbyOp::SetAuthentication(secret) => {
                port.standby_group(group).authentication = Some(secret);
            }
            StandbyOp::ClearAuthentication => {
                port.standby_group(group).authentication = None;
            }
            StandbyOp::SetTrack(object, decrement) => {
                port.standby_group(group).tracks.insert(object, decrement);
            }
            StandbyOp::ClearTrack(object) => {
                port.standby_group(group).tracks.remove(&object);
            }
        }

        if negate {
            port.prune_standby_group(group);
        }
        Action::Handled
    }
}

/// One standby mutation, parsed before the port is borrowed.
enum StandbyOp {
    RemoveGroup,
    SetIp(std::net::Ipv4Addr),
    ClearIp,
    AddSecondary(std::net::Ipv4Addr),
    RemoveSecondary(std::net::Ipv4Addr),
    SetTimers(u32, u32),
    ClearTimers,
    SetPriority(u16),
    ClearPriority,
    SetPreempt(Option<u32>),
    ClearPreempt,
    SetAuthentication(String),
    ClearAuthentication,
    SetTrack(String, u16),
    ClearTrack(String),
}

enum StandbyParseError {
    Incomplete,
    /// Index of the offending token.
    Invalid(usize),
}

fn parse_standby_op(
    args: &Args<'_>,
    at: usize,
    negate: bool,
) -> Result<StandbyOp, StandbyParseError> {
    const STANDBY_WORDS: &[&str] = &[
        "authentication",
        "ip",
        "preempt",
        "priority",
        "timers",
        "track",
    ];

    let sub = match args.get(at) {
        None if negate => return Ok(StandbyOp::RemoveGroup),
        None => return Err(StandbyParseError::Incomplete),
        Some(token) => resolve(STANDBY_WORDS, token),
    };

    match sub {
        Resolution::Match("ip") => {
            let address = args.get(at + 1).and_then(|t| parse_addr(t).ok());
            let secondary = args
                .get(at + 2)
                .is_some_and(|t| matches!(resolve(&["secondary"], t), Resolution::Match(_)));
            match (negate, address, secondary) {
                (false, Some(address), true) => Ok(StandbyOp::AddSecondary(address)),
                (false, Some(address), false) => Ok(StandbyOp::SetIp(address)),
                (true, Some(address), true) => Ok(StandbyOp::RemoveSecondary(address)),
                (true, _, false) => Ok(StandbyOp::ClearIp),
                _ => Err(StandbyParseError::Incomplete),
            }
        }
        Resolution::Match("timers") if negate => Ok(StandbyOp::ClearTimers),
        Resolution::Match("timers") => match (args.int(at + 1), args.int(at + 2)) {
            (Some(hello), Some(hold)) if hello > 0 && hold > 0 => {
                Ok(StandbyOp::SetTimers(hello as u32, hold as u32))
            }
            _ => Err(StandbyParseError::Incomplete),
        },
        Resolution::Match("priority") if negate => Ok(StandbyOp::ClearPriority),
        Resolution::Match("priority") => args
            .int(at + 1)
            .and_then(|n| u16::try_from(n).ok())
            .map(StandbyOp::SetPriority)
            .ok_or(StandbyParseError::Incomplete),
        Resolution::Match("preempt") if negate => Ok(StandbyOp::ClearPreempt),
        Resolution::Match("preempt") => {
            let delay_kw = args
                .get(at + 1)
                .is_some_and(|t| matches!(resolve(&["delay"], t), Resolution::Match(_)));
            let minimum_kw = args
                .get(at + 2)
                .is_some_and(|t| matches!(resolve(&["minimum"], t), Resolution::Match(_)));
            if !delay_kw {
                return Ok(StandbyOp::SetPreempt(None));
            }
            match (minimum_kw, args.int(at + 3)) {
                (true, Some(delay)) if delay >= 0 => Ok(StandbyOp::SetPreempt(Some(delay as u32))),
                _ => Err(StandbyParseError::Incomplete),
            }
        }
        Resolution::Match("authentication") if negate => Ok(StandbyOp::ClearAuthentication),
        Resolution::Match("authentication") => args
            .rest_from(at + 1)
            .map(|secret| StandbyOp::SetAuthentication(secret.to_string()))
            .ok_or(StandbyParseError::Incomplete),
        Resolution::Match("track") => {
            let object = args
                .get(at + 1)
                .ok_or(StandbyParseError::Incomplete)?
                .to_string();
            if negate {
                return Ok(StandbyOp::ClearTrack(object));
            }
            let decrement_kw = args
                .get(at + 2)
                .is_some_and(|t| matches!(resolve(&["decrement"], t), Resolution::Match(_)));
            match (
                decrement_kw,
                args.int(at + 3).and_then(|n| u16::try_from(n).ok()),
            ) {
                (true, Some(decrement)) => Ok(StandbyOp::SetTrack(object, decrement)),
                _ => Err(StandbyParseError::Incomplete),
            }
        }
        _ => Err(StandbyParseError::Invalid(at)),
    }
}

impl CommandProcessor for CiscoConfigInterface {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-if)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(COMMANDS, first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("description") => {
                match args.rest_from(1) {
                    Some(description) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.description = Some(description.to_string());
                        }
                    }
                    None => incomplete_command(ctx),
                }
                Action::Handled
            }
            Resolution::Match("shutdown") => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = true;
                }
                Action::Handled
            }
            Resolution::Match("switchport") => self.handle_switchport(ctx, &args, 0, false),
            Resolution::Match("channel-group") => self.handle_channel_group(ctx, &args, 1, false),
            Resolution::Match("ip") => self.handle_ip(ctx, &args, 0, false),
            Resolution::Match("ntp") => self.handle_ntp(ctx, &args, false),
            Resolution::Match("standby") => self.handle_standby(ctx, &args, 1, false),
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

impl CiscoConfigInterface {
    fn handle_ntp(&self, ctx: &mut Context<'_>, args: &Args<'_>, negate: bool) -> Action {
        let base = if negate { 1 } else { 0 };
        let disable = args
            .get(base + 1)
            .is_some_and(|t| matches!(resolve(&["disable"], t), Resolution::Match(_)));
        if !disable || self.variant != CiscoVariant::Catalyst6500 {
            invalid_input(ctx, args.offset(base).unwrap_or(0));
            return Action::Handled;
        }
        if let Some(port) = ctx.config.port_mut(&self.port) {
            port.ntp_disable = !negate;
        }
        Action::Handled
    }

    fn handle_no(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match args.get(1).map(|t| resolve(NO_COMMANDS, t)) {
            Some(Resolution::Match("description")) => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.description = None;
                }
                Action::Handled
            }
            Some(Resolution::Match("shutdown")) => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = false;
                }
                Action::Handled
            }
            Some(Resolution::Match("switchport")) => self.handle_switchport(ctx, args, 1, true),
            Some(Resolution::Match("channel-group")) => {
                self.handle_channel_group(ctx, args, 2, true)
            }
            Some(Resolution::Match("ip")) => self.handle_ip(ctx, args, 1, true),
            Some(Resolution::Match("ntp")) => self.handle_ntp(ctx, args, true),
            Some(Resolution::Match("standby")) => self.handle_standby(ctx, args, 2, true),
            _ => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Port;
    use crate::engine::{OutputBuffer, SessionState};

    fn setup() -> SwitchConfiguration {
        let mut config = SwitchConfiguration::new("my_switch");
        config.add_port(Port::physical("FastEthernet0/3"));
        config.ensure_vlan(123).unwrap();
        config
    }

    fn run(
        config: &mut SwitchConfiguration,
        processor: &mut CiscoConfigInterface,
        line: &str,
    ) -> Vec<String> {
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        {
            let mut ctx = Context {
                config,
                output: &mut output,
                state: &mut state,
            };
            processor.process(&mut ctx, line);
        }
        output.take()
    }

    #[test]
    fn test_access_vlan_requires_existing_vlan() {
        let mut config = setup();
        let mut iface = CiscoConfigInterface::new("FastEthernet0/3", CiscoVariant::Generic);

        let out = run(&mut config, &mut iface, "switchport access vlan 123");
        assert!(out.is_empty());
        assert_eq!(config.port("FastEthernet0/3").unwrap().access_vlan, Some(123));

        let out = run(&mut config, &mut iface, "switchport access vlan 999");
        assert_eq!(
            out,
            vec!["% Access VLAN does not exist. Configure the VLAN first."]
        );
        // Warned and left alone.
        assert_eq!(config.port("FastEthernet0/3").unwrap().access_vlan, Some(123));

        run(&mut config, &mut iface, "no switchport access vlan");
        assert_eq!(config.port("FastEthernet0/3").unwrap().access_vlan, None);
    }

    #[test]
    fn test_trunk_allowed_vlan_coalescing() {
        let mut config = setup();
        let mut iface = CiscoConfigInterface::new("FastEthernet0/3", CiscoVariant::Generic);

        run(&mut config, &mut iface, "switchport mode trunk");
        run(&mut config, &mut iface, "switchport trunk allowed vlan add 123");
        run(
            &mut config,
            &mut iface,
            "switchport trunk allowed vlan add 124,126-128",
        );

        let port = config.port("FastEthernet0/3").unwrap();
        assert_eq!(port.mode, PortMode::Trunk);
        assert_eq!(
            crate::config::port::render_vlan_ranges(port.trunk_vlans.as_ref().unwrap()),
            "123,124,126-128"
        );

        run(
            &mut config,
            &mut iface,
            "switchport trunk allowed vlan remove 127",
        );
        let port = config.port("FastEthernet0/3").unwrap();
        assert_eq!(
            crate::config::port::render_vlan_ranges(port.trunk_vlans.as_ref().unwrap()),
            "123,124,126,128"
        );
    }

    #[test]
    fn test_channel_group_autocreates_aggregate() {
        let mut config = setup();
        let mut iface = CiscoConfigInterface::new("FastEthernet0/3", CiscoVariant::Generic);

        let out = run(&mut config, &mut iface, "channel-group 1 mode active");
        assert_eq!(out, vec!["Creating a port-channel interface Port-channel 1"]);
        assert!(config.port("Port-channel1").is_some());
        assert_eq!(
            config.port("FastEthernet0/3").unwrap().channel_group,
            Some((1, "active".to_string()))
        );

        // Second member joins silently.
        let out = run(&mut config, &mut iface, "channel-group 1 mode active");
        assert!(out.is_empty());
    }

    #[test]
    fn test_urpf_is_hardware_gated() {
        let mut config = setup();
        config.ensure_vlan(2999).unwrap();
        config.ensure_port("Vlan2999", PortKind::Vlan(2999));

        // Catalyst 6500 accepts.
        let mut iface = CiscoConfigInterface::new("Vlan2999", CiscoVariant::Catalyst6500);
        let out = run(
            &mut config,
            &mut iface,
            "ip verify unicast source reachable-via rx",
        );
        assert!(out.is_empty());
        assert!(config.port("Vlan2999").unwrap().unicast_rpf);
        run(
            &mut config,
            &mut iface,
            "no ip verify unicast source reachable-via rx",
        );
        assert!(!config.port("Vlan2999").unwrap().unicast_rpf);

        // Generic hardware refuses twice and restores.
        let mut iface = CiscoConfigInterface::new("Vlan2999", CiscoVariant::Generic);
        let out = run(
            &mut config,
            &mut iface,
            "ip verify unicast source reachable-via rx",
        );
        assert_eq!(
            out,
            vec![
                "% ip verify configuration not supported on interface Vl2999",
                " - verification not supported by hardware",
                "% ip verify configuration not supported on interface Vl2999",
                " - verification not supported by hardware",
                "%Restoring the original configuration failed on Vlan2999 - Interface Support Failure",
            ]
        );
        assert!(!config.port("Vlan2999").unwrap().unicast_rpf);
    }

    #[test]
    fn test_standby_group_lifecycle() {
        let mut config = setup();
        config.ensure_vlan(1000).unwrap();
        config.ensure_port("Vlan1000", PortKind::Vlan(1000));
        let mut iface = CiscoConfigInterface::new("Vlan1000", CiscoVariant::Generic);

        run(&mut config, &mut iface, "standby 1 ip 1.1.1.2");
        run(&mut config, &mut iface, "standby 1 ip 1.1.1.3 secondary");
        run(&mut config, &mut iface, "standby 1 timers 5 15");
        run(&mut config, &mut iface, "standby 1 priority 110");
        run(&mut config, &mut iface, "standby 1 preempt delay minimum 60");
        run(&mut config, &mut iface, "standby 1 authentication VLAN1000");
        run(&mut config, &mut iface, "standby 1 track 10 decrement 50");

        let port = config.port("Vlan1000").unwrap();
        let standby = port.standby.get(&1).unwrap();
        assert_eq!(standby.ip, Some("1.1.1.2".parse().unwrap()));
        assert!(standby.secondaries.contains(&"1.1.1.3".parse().unwrap()));
        assert_eq!(standby.timers, Some((5, 15)));
        assert_eq!(standby.priority, Some(110));
        assert!(standby.preempt);
        assert_eq!(standby.preempt_delay_minimum, Some(60));
        assert_eq!(standby.authentication.as_deref(), Some("VLAN1000"));
        assert_eq!(standby.tracks.get("10"), Some(&50));

        run(&mut config, &mut iface, "no standby 1");
        assert!(config.port("Vlan1000").unwrap().standby.is_empty());
    }

    #[test]
    fn test_vrf_forwarding_wipes_addresses() {
        let mut config = setup();
        config.ensure_vrf("SOME-LAN");
        config.ensure_vlan(1000).unwrap();
        config.ensure_port("Vlan1000", PortKind::Vlan(1000));
        let mut iface = CiscoConfigInterface::new("Vlan1000", CiscoVariant::Generic);

        run(&mut config, &mut iface, "ip address 1.1.1.1 255.255.255.0");
        run(&mut config, &mut iface, "ip vrf forwarding SOME-LAN");
        let port = config.port("Vlan1000").unwrap();
        assert!(port.ips.is_empty());
        assert_eq!(port.vrf.as_deref(), Some("SOME-LAN"));

        let out = run(&mut config, &mut iface, "ip vrf forwarding NONEXISTENT");
        assert_eq!(out, vec!["% VRF NONEXISTENT not configured."]);
    }

    #[test]
    fn test_overlap_error_text() {
        let mut config = setup();
        for vlan in [1000u16, 2000] {
            config.ensure_vlan(vlan.into()).unwrap();
            config.ensure_port(&format!("Vlan{vlan}"), PortKind::Vlan(vlan));
        }

        let mut iface = CiscoConfigInterface::new("Vlan1000", CiscoVariant::Generic);
        run(&mut config, &mut iface, "ip address 1.1.1.1 255.255.255.0");
        run(&mut config, &mut iface, "ip address 2.2.2.2 255.255.255.0 secondary");

        let mut iface = CiscoConfigInterface::new("Vlan2000", CiscoVariant::Generic);
        let out = run(
            &mut config,
            &mut iface,
            "ip address 2.2.2.75 255.255.255.128",
        );
        assert_eq!(
            out,
            vec!["% 2.2.2.0 overlaps with secondary address on Vlan1000"]
        );

        let out = run(&mut config, &mut iface, "ip address 1.1.1.5 255.255.255.0");
        assert_eq!(out, vec!["% 1.1.1.0 overlaps with Vlan1000"]);
    }

    #[test]
    fn test_primary_removal_guard_text() {
        let mut config = setup();
        config.ensure_vlan(1000).unwrap();
        config.ensure_port("Vlan1000", PortKind::Vlan(1000));
        let mut iface = CiscoConfigInterface::new("Vlan1000", CiscoVariant::Generic);

        run(&mut config, &mut iface, "ip address 1.1.1.1 255.255.255.0");
        run(&mut config, &mut iface, "ip address 2.2.2.2 255.255.255.0 secondary");

        let out = run(&mut config, &mut iface, "no ip address 1.1.1.1 255.255.255.0");
        assert_eq!(out, vec!["Must delete secondary before deleting primary"]);
        assert_eq!(config.port("Vlan1000").unwrap().ips.len(), 2);
    }

    #[test]
    fn test_ntp_disable_is_6500_only() {
        let mut config = setup();
        let mut iface = CiscoConfigInterface::new("FastEthernet0/3", CiscoVariant::Catalyst6500);
        let out = run(&mut config, &mut iface, "ntp disable");
        assert!(out.is_empty());
        assert!(config.port("FastEthernet0/3").unwrap().ntp_disable);

        let mut iface = CiscoConfigInterface::new("FastEthernet0/3", CiscoVariant::Generic);
        let out = run(&mut config, &mut iface, "ntp disable");
        assert!(out.iter().any(|l| l.contains("% Invalid input")));
    }
}
