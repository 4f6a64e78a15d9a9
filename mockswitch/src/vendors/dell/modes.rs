//! Dell PowerConnect mode processors.

use super::show;
use super::{
    DellInterfaceRef, DellVariant, VLAN_NAME_LIMIT, invalid_input, parse_interface,
    vlan_failure_block,
};
use crate::config::port::parse_vlan_ranges;
use crate::config::{PortKind, PortMode, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::terminal::EchoMode;

/// The unprivileged shell (`name>`).
pub struct DellDefault {
    variant: DellVariant,
}

impl DellDefault {
    /// Create the unprivileged shell.
    pub fn new(variant: DellVariant) -> Self {
        Self { variant }
    }
}

impl CommandProcessor for DellDefault {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}>", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };
        match resolve(&["enable", "exit", "quit"], first) {
            Resolution::Match("enable") => Action::Push(Box::new(DellPassword::new(self.variant))),
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

/// The enable password continuation. Telnet transports echo `*` per
/// keystroke while this is the deepest mode.
pub struct DellPassword {
    variant: DellVariant,
    attempts: u8,
}

impl DellPassword {
    /// Create the password prompt.
    pub fn new(variant: DellVariant) -> Self {
        Self {
            variant,
            attempts: 0,
        }
    }
}

impl CommandProcessor for DellPassword {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Password:".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if ctx.config.password_accepted(line) {
            return Action::Replace(Box::new(DellEnabled::new(self.variant)));
        }
        ctx.write_line("Incorrect Password!");
        self.attempts += 1;
        if self.attempts >= 3 {
            return Action::Pop;
        }
        Action::Handled
    }

    fn echo(&self) -> EchoMode {
        EchoMode::EchoAs('*')
    }

    fn unknown_command(&self, _ctx: &mut Context<'_>, _line: &str) {
        // Every input is a password attempt; process never falls through.
    }
}

/// The privileged shell (`name#`).
pub struct DellEnabled {
    variant: DellVariant,
}

impl DellEnabled {
    /// Create the privileged shell.
    pub fn new(variant: DellVariant) -> Self {
        Self { variant }
    }
}

impl CommandProcessor for DellEnabled {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(
            &["configure", "copy", "exit", "quit", "show", "terminal"],
            first,
        ) {
            Resolution::Match("configure") => {
                Action::Push(Box::new(DellConfigMode::new(self.variant)))
            }
            Resolution::Match("copy") => {
                let save = args
                    .get(1)
                    .is_some_and(|t| {
                        matches!(resolve(&["running-config"], t), Resolution::Match(_))
                    })
                    && args.get(2).is_some_and(|t| {
                        matches!(resolve(&["startup-config"], t), Resolution::Match(_))
                    });
                if save {
                    ctx.write_line("This operation may take a few minutes.");
                    ctx.write_line("Management interfaces will not be available during this time.");
                    ctx.write_line("");
                    Action::Push(Box::new(DellSaveConfirm))
                } else {
                    invalid_input(ctx);
                    Action::Handled
                }
            }
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Pop,
            Resolution::Match("show") => {
                let what = args.get(1).map(|t| resolve(&["running-config", "vlan"], t));
                match what {
                    Some(Resolution::Match("running-config")) => {
                        ctx.output.extend(show::running_config(self.variant, ctx.config));
                    }
                    Some(Resolution::Match("vlan")) => {
                        ctx.output.extend(show::vlan_table(ctx.config));
                    }
                    _ => invalid_input(ctx),
                }
                Action::Handled
            }
            Resolution::Match("terminal") => {
                let length_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["length"], t), Resolution::Match(_)));
                match (length_kw, args.int(2)) {
                    (true, Some(n)) if (0..=512).contains(&n) => {
                        ctx.state.terminal_length = if n == 0 { None } else { Some(n as usize) };
                    }
                    _ => invalid_input(ctx),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

/// The `y/n` continuation after `copy running-config startup-config`.
pub struct DellSaveConfirm;

impl CommandProcessor for DellSaveConfirm {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Are you sure you want to save? (y/n) ".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if line.trim().eq_ignore_ascii_case("y") {
            ctx.write_line("");
            ctx.write_line("Configuration Saved!");
            ctx.apply_commit_delay();
        } else {
            ctx.write_line("");
            ctx.write_line("Configuration Not Saved!");
        }
        Action::Pop
    }

    fn unknown_command(&self, _ctx: &mut Context<'_>, _line: &str) {
        // Any input is an answer; process never falls through.
    }
}

/// Global configuration mode (`name(config)#`).
pub struct DellConfigMode {
    variant: DellVariant,
}

impl DellConfigMode {
    /// Create the global configuration mode.
    pub fn new(variant: DellVariant) -> Self {
        Self { variant }
    }

    fn handle_vlan(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match self.variant {
            DellVariant::PowerConnect => {
                // Classic models create VLANs inside `vlan database`.
                let database = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["database"], t), Resolution::Match(_)));
                if database {
                    Action::Push(Box::new(DellVlanDatabase))
                } else {
                    invalid_input(ctx);
                    Action::Handled
                }
            }
            DellVariant::PowerConnect10G => {
                let Some(number) = args.int(1) else {
                    invalid_input(ctx);
                    return Action::Handled;
                };
                match ctx.config.ensure_vlan(number) {
                    Ok(vlan) => {
                        let number = vlan.number;
                        Action::Push(Box::new(DellConfigVlan::new(number)))
                    }
                    Err(_) => {
                        vlan_failure_block(ctx, number);
                        Action::Handled
                    }
                }
            }
        }
    }

    fn handle_interface(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        let iface = args.rest_from(1).and_then(|s| parse_interface(self.variant, s));
        match iface {
            Some(DellInterfaceRef::Physical(name)) => {
                if ctx.config.port(&name).is_some() {
                    Action::Push(Box::new(DellConfigInterface::new(name)))
                } else {
                    invalid_input(ctx);
                    Action::Handled
                }
            }
            Some(DellInterfaceRef::Vlan(number)) => {
                if !ctx.config.has_vlan(number) {
                    ctx.write_line("VLAN ID not found.");
                    return Action::Handled;
                }
                let name = format!("vlan {number}");
                ctx.config.ensure_port(&name, PortKind::Vlan(number));
                Action::Push(Box::new(DellConfigInterface::new(name)))
            }
            None => {
                invalid_input(ctx);
                Action::Handled
            }
        }
    }
}

impl CommandProcessor for DellConfigMode {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config)#", config.name)
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
                    Some(name) => ctx.config.name = name.trim_matches('"').to_string(),
                    None => invalid_input(ctx),
                }
                Action::Handled
            }
            Resolution::Match("vlan") => self.handle_vlan(ctx, &args),
            Resolution::Match("interface") => self.handle_interface(ctx, &args),
            Resolution::Match("no") => {
                let vlan_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                let number = args.int(2).and_then(|n| u16::try_from(n).ok());
                match (self.variant, vlan_kw, number) {
                    (DellVariant::PowerConnect10G, true, Some(number)) => {
                        if ctx.config.remove_vlan(number).is_err() {
                            ctx.write_line("VLAN ID not found.");
                        }
                    }
                    _ => invalid_input(ctx),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

/// Classic PowerConnect `vlan database` sub-mode.
pub struct DellVlanDatabase;

impl CommandProcessor for DellVlanDatabase {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-vlan)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "no", "vlan"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("vlan") => {
                let Some(ranges) = args.get(1).and_then(|s| parse_vlan_ranges(s).ok()) else {
                    invalid_input(ctx);
                    return Action::Handled;
                };
                for number in ranges {
                    if ctx.config.ensure_vlan(i64::from(number)).is_err() {
                        ctx.write_line(format!("VLAN {number}  ERROR: VLAN ID is out of range"));
                    }
                }
                Action::Handled
            }
            Resolution::Match("no") => {
                let vlan_kw = args
                    .get(1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                let ranges = args.get(2).and_then(|s| parse_vlan_ranges(s).ok());
                match (vlan_kw, ranges) {
                    (true, Some(ranges)) => {
                        for number in ranges {
                            if ctx.config.remove_vlan(number).is_err() {
                                ctx.write_line(format!("These VLANs do not exist:  {number}."));
                            }
                        }
                    }
                    _ => invalid_input(ctx),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

/// 10G VLAN sub-mode (`name(config-vlan5)#`).
pub struct DellConfigVlan {
    number: u16,
}

impl DellConfigVlan {
    /// Create the vlan sub-mode for an existing VLAN.
    pub fn new(number: u16) -> Self {
        Self { number }
    }
}

impl CommandProcessor for DellConfigVlan {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-vlan{})#", config.name, self.number)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["exit", "name", "no"], first) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("name") => {
                set_vlan_name(ctx, self.number, args.rest_from(1));
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
                    invalid_input(ctx);
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

/// Set a VLAN name, enforcing the Dell length limit.
fn set_vlan_name(ctx: &mut Context<'_>, number: u16, name: Option<&str>) {
    let Some(name) = name else {
        invalid_input(ctx);
        return;
    };
    if name.len() > VLAN_NAME_LIMIT {
        ctx.write_line(format!(
            "Name must be up to {VLAN_NAME_LIMIT} characters."
        ));
        return;
    }
    if let Some(vlan) = ctx.config.vlan_mut(number) {
        vlan.name = Some(name.to_string());
    }
}

/// Interface sub-mode (`name(config-if)#`).
pub struct DellConfigInterface {
    port: String,
}

impl DellConfigInterface {
    /// Create the interface sub-mode for an existing port.
    pub fn new(port: impl Into<String>) -> Self {
        Self { port: port.into() }
    }

    fn handle_switchport(&self, ctx: &mut Context<'_>, args: &Args<'_>, base: usize, negate: bool) {
        const WORDS: &[&str] = &["access", "general", "mode"];

        match args.get(base + 1).map(|t| resolve(WORDS, t)) {
            Some(Resolution::Match("mode")) => {
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.mode = PortMode::Unset;
                    }
                    return;
                }
                let mode = args
                    .get(base + 2)
                    .map(|t| resolve(&["access", "general", "trunk"], t));
                let mode = match mode {
                    Some(Resolution::Match("access")) => PortMode::Access,
                    Some(Resolution::Match("general")) => PortMode::General,
                    Some(Resolution::Match("trunk")) => PortMode::Trunk,
                    _ => return invalid_input(ctx),
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
                    return invalid_input(ctx);
                }
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.access_vlan = None;
                    }
                    return;
                }
                let Some(vlan) = args.int(base + 3).and_then(|n| u16::try_from(n).ok()) else {
                    return invalid_input(ctx);
                };
                if ctx.config.set_access_vlan(&self.port, vlan).is_err() {
                    ctx.write_line("VLAN ID not found.");
                }
            }
            Some(Resolution::Match("general")) => {
                self.handle_general(ctx, args, base + 2, negate);
            }
            _ => invalid_input(ctx),
        }
    }

    fn handle_general(&self, ctx: &mut Context<'_>, args: &Args<'_>, at: usize, negate: bool) {
        match args.get(at).map(|t| resolve(&["allowed", "pvid"], t)) {
            Some(Resolution::Match("pvid")) => {
                if negate {
                    if let Some(port) = ctx.config.port_mut(&self.port) {
                        port.general_pvid = None;
                    }
                    return;
                }
                let pvid = args.int(at + 1).and_then(|n| u16::try_from(n).ok());
                let Some(pvid) = pvid else {
                    return invalid_input(ctx);
                };
                if !ctx.config.has_vlan(pvid) {
                    ctx.write_line("VLAN ID not found.");
                    return;
                }
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.general_pvid = Some(pvid);
                }
            }
            Some(Resolution::Match("allowed")) => {
                let vlan_kw = args
                    .get(at + 1)
                    .is_some_and(|t| matches!(resolve(&["vlan"], t), Resolution::Match(_)));
                if !vlan_kw {
                    return invalid_input(ctx);
                }
                let op = args.get(at + 2).map(|t| resolve(&["add", "remove"], t));
                let ranges = args.get(at + 3).and_then(|s| parse_vlan_ranges(s).ok());
                let (op, ranges) = match (op, ranges) {
                    (Some(Resolution::Match(op)), Some(ranges)) => (op, ranges),
                    _ => return invalid_input(ctx),
                };
                // Only existing VLANs may be added to the membership.
                let missing: Vec<u16> = ranges
                    .iter()
                    .copied()
                    .filter(|v| !ctx.config.has_vlan(*v))
                    .collect();
                if op == "add" && !missing.is_empty() {
                    ctx.write_line("VLAN ID not found.");
                    return;
                }
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    match op {
                        "add" => port.general_vlans.extend(ranges),
                        _ => {
                            for vlan in ranges {
                                port.general_vlans.remove(&vlan);
                            }
                        }
                    }
                }
            }
            _ => invalid_input(ctx),
        }
    }
}

impl CommandProcessor for DellConfigInterface {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}(config-if)#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(
            &["description", "exit", "name", "no", "shutdown", "switchport"],
            first,
        ) {
            Resolution::Match("exit") => Action::Pop,
            Resolution::Match("description") => {
                match args.rest_from(1) {
                    Some(description) => {
                        if let Some(port) = ctx.config.port_mut(&self.port) {
                            port.description = Some(description.trim_matches('"').to_string());
                        }
                    }
                    None => invalid_input(ctx),
                }
                Action::Handled
            }
            Resolution::Match("shutdown") => {
                if let Some(port) = ctx.config.port_mut(&self.port) {
                    port.shutdown = true;
                }
                Action::Handled
            }
            Resolution::Match("name") => {
                // On an SVI, `name` renames the underlying VLAN.
                match ctx.config.port(&self.port).map(|p| p.kind) {
                    Some(PortKind::Vlan(number)) => {
                        set_vlan_name(ctx, number, args.rest_from(1));
                    }
                    _ => invalid_input(ctx),
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
                    _ => invalid_input(ctx),
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        invalid_input(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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
    fn test_10g_vlan_out_of_range_failure_block() {
        let mut config = SwitchConfiguration::new("my_switch");
        let mut mode = DellConfigMode::new(DellVariant::PowerConnect10G);

        let (_, lines) = run(&mut config, &mut mode, "vlan 5000");
        assert!(lines.contains(&"Failure Information".to_string()));
        assert!(lines.contains(&"VLAN 5000  ERROR: VLAN ID is out of range".to_string()));
        assert!(!config.has_vlan(5000));
    }

    #[test]
    fn test_classic_vlan_database_flow() {
        let mut config = SwitchConfiguration::new("my_switch");
        let mut mode = DellConfigMode::new(DellVariant::PowerConnect);

        // Direct `vlan N` is not a classic config-mode command.
        let (_, lines) = run(&mut config, &mut mode, "vlan 1000");
        assert!(lines.iter().any(|l| l.contains("% Invalid input")));

        let (action, _) = run(&mut config, &mut mode, "vlan database");
        assert!(matches!(action, Action::Push(_)));

        let mut database = DellVlanDatabase;
        run(&mut config, &mut database, "vlan 1000,1001");
        assert!(config.has_vlan(1000));
        assert!(config.has_vlan(1001));

        run(&mut config, &mut database, "no vlan 1001");
        assert!(!config.has_vlan(1001));
    }

    #[test]
    fn test_vlan_name_length_limit() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.ensure_vlan(1000).unwrap();
        let mut vlan = DellConfigVlan::new(1000);

        let long_name = "a".repeat(33);
        let (_, lines) = run(&mut config, &mut vlan, &format!("name {long_name}"));
        assert_eq!(lines, vec!["Name must be up to 32 characters."]);
        assert_eq!(config.vlan(1000).unwrap().name, None);

        let ok_name = "a".repeat(32);
        run(&mut config, &mut vlan, &format!("name {ok_name}"));
        assert_eq!(config.vlan(1000).unwrap().name.as_deref(), Some(ok_name.as_str()));
    }

    #[test]
    fn test_general_mode_membership() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.seed_ports(vec![crate::config::Port::physical("ethernet 1/g1")]);
        config.ensure_vlan(1000).unwrap();
        let mut iface = DellConfigInterface::new("ethernet 1/g1");

        run(&mut config, &mut iface, "switchport mode general");
        run(&mut config, &mut iface, "switchport general pvid 1000");
        run(&mut config, &mut iface, "switchport general allowed vlan add 1000");

        let port = config.port("ethernet 1/g1").unwrap();
        assert_eq!(port.mode, PortMode::General);
        assert_eq!(port.general_pvid, Some(1000));
        assert!(port.general_vlans.contains(&1000));

        // Unknown VLANs are refused.
        let (_, lines) = run(
            &mut config,
            &mut iface,
            "switchport general allowed vlan add 2000",
        );
        assert_eq!(lines, vec!["VLAN ID not found."]);
    }

    #[test]
    fn test_save_confirmation() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.commit_delay = std::time::Duration::from_secs(1);

        let mut enabled = DellEnabled::new(DellVariant::PowerConnect);
        let (action, lines) = run(
            &mut config,
            &mut enabled,
            "copy running-config startup-config",
        );
        assert!(matches!(action, Action::Push(_)));
        assert!(lines[0].starts_with("This operation may take a few minutes."));

        let mut confirm = DellSaveConfirm;
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let action = {
            let mut ctx = Context {
                config: &mut config,
                output: &mut output,
                state: &mut state,
            };
            confirm.process(&mut ctx, "y")
        };
        assert!(matches!(action, Action::Pop));
        assert_eq!(state.pending_delay, Some(std::time::Duration::from_secs(1)));
        assert!(output.take().contains(&"Configuration Saved!".to_string()));
    }

    #[test]
    fn test_incorrect_password_text() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.privileged_passwords.push("s3cr3t".to_string());
        let mut password = DellPassword::new(DellVariant::PowerConnect);
        assert_eq!(password.echo(), EchoMode::EchoAs('*'));

        let (action, lines) = run(&mut config, &mut password, "nope");
        assert!(matches!(action, Action::Handled));
        assert_eq!(lines, vec!["Incorrect Password!"]);

        let (action, _) = run(&mut config, &mut password, "s3cr3t");
        assert!(matches!(action, Action::Replace(_)));
    }
}
