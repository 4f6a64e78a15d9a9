//! Cisco privileged shell.

use super::{
    CiscoConfigMode, CiscoVariant, ambiguous_command, incomplete_command, invalid_input,
    parse_interface, show,
};
use crate::config::SwitchConfiguration;
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};

const COMMANDS: &[&str] = &[
    "configure", "copy", "disable", "enable", "exit", "quit", "show", "terminal", "write",
];

const SHOW_WORDS: &[&str] = &["running-config", "version", "vlan"];

/// The privileged shell (`name#`).
pub struct CiscoEnabled {
    variant: CiscoVariant,
}

impl CiscoEnabled {
    /// Create the privileged shell.
    pub fn new(variant: CiscoVariant) -> Self {
        Self { variant }
    }

    fn handle_show(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        let Some(what) = args.get(1) else {
            incomplete_command(ctx);
            return Action::Handled;
        };

        match resolve(SHOW_WORDS, what) {
            Resolution::Match("running-config") => self.handle_show_running(ctx, args),
            Resolution::Match("version") => {
                ctx.output.extend(show::version(ctx.config));
                Action::Handled
            }
            Resolution::Match("vlan") => {
                ctx.output.extend(show::vlan_table(ctx.config));
                Action::Handled
            }
            Resolution::Ambiguous(_) => {
                ambiguous_command(ctx, args.line());
                Action::Handled
            }
            _ => {
                invalid_input(ctx, args.offset(1).unwrap_or(0));
                Action::Handled
            }
        }
    }

    fn handle_show_running(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        match args.get(2).map(|t| resolve(&["interface", "vlan"], t)) {
            None => {
                ctx.output.extend(show::running_config(ctx.config));
            }
            Some(Resolution::Match("vlan")) => {
                let Some(number) = args.int(3).and_then(|n| u16::try_from(n).ok()) else {
                    incomplete_command(ctx);
                    return Action::Handled;
                };
                match show::running_config_vlan(ctx.config, number) {
                    Some(lines) => ctx.output.extend(lines),
                    None => invalid_input(ctx, args.offset(3).unwrap_or(0)),
                }
            }
            Some(Resolution::Match("interface")) => {
                let resolved = args
                    .rest_from(3)
                    .and_then(parse_interface)
                    .and_then(|iface| {
                        show::running_config_interface(ctx.config, &iface.canonical())
                    });
                match resolved {
                    Some(lines) => ctx.output.extend(lines),
                    None => invalid_input(ctx, args.offset(3).unwrap_or(0)),
                }
            }
            Some(_) => invalid_input(ctx, args.offset(2).unwrap_or(0)),
        }
        Action::Handled
    }

    fn handle_copy(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        let Some(source) = args.get(1) else {
            incomplete_command(ctx);
            return Action::Handled;
        };

        if let Some(url) = source.strip_prefix("tftp://") {
            let (host, path) = url.split_once('/').unwrap_or((url, ""));
            ctx.write_line(format!("Accessing tftp://{host}/{path}..."));
            ctx.state.pending_tftp = Some((host.to_string(), path.to_string()));
            return Action::Handled;
        }

        // copy running-config startup-config
        let destination_ok = matches!(resolve(&["running-config"], source), Resolution::Match(_))
            && args
                .get(2)
                .is_some_and(|d| matches!(resolve(&["startup-config"], d), Resolution::Match(_)));
        if destination_ok {
            ctx.write_line("Building configuration...");
            ctx.write_line("[OK]");
            ctx.apply_commit_delay();
        } else {
            invalid_input(ctx, args.offset(1).unwrap_or(0));
        }
        Action::Handled
    }

    fn handle_terminal(&self, ctx: &mut Context<'_>, args: &Args<'_>) -> Action {
        let subcommand = args.get(1).map(|t| resolve(&["length"], t));
        if let Some(Resolution::Match("length")) = subcommand {
            match args.int(2) {
                Some(n) if (0..=512).contains(&n) => {
                    ctx.state.terminal_length = if n == 0 { None } else { Some(n as usize) };
                }
                _ => invalid_input(ctx, args.offset(2).unwrap_or(0)),
            }
        } else {
            invalid_input(ctx, args.offset(1).unwrap_or(0));
        }
        Action::Handled
    }
}

impl CommandProcessor for CiscoEnabled {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}#", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(COMMANDS, first) {
            Resolution::Match("configure") => {
                ctx.write_line("Enter configuration commands, one per line.  End with CNTL/Z.");
                Action::Push(Box::new(CiscoConfigMode::new(self.variant)))
            }
            Resolution::Match("copy") => self.handle_copy(ctx, &args),
            Resolution::Match("disable") => Action::Pop,
            Resolution::Match("enable") => Action::Handled,
            // A privileged exit closes the connection on Cisco.
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            Resolution::Match("show") => self.handle_show(ctx, &args),
            Resolution::Match("terminal") => self.handle_terminal(ctx, &args),
            Resolution::Match("write") => {
                let memory_ok = match args.get(1) {
                    None => true,
                    Some(t) => matches!(resolve(&["memory"], t), Resolution::Match(_)),
                };
                if memory_ok {
                    ctx.write_line("Building configuration...");
                    ctx.write_line("[OK]");
                    ctx.apply_commit_delay();
                } else {
                    invalid_input(ctx, args.offset(1).unwrap_or(0));
                }
                Action::Handled
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{OutputBuffer, SessionState};

    fn run(line: &str) -> (Vec<String>, SessionState) {
        let mut config = SwitchConfiguration::new("my_switch");
        config.ensure_vlan(123).unwrap().name = Some("shizzle".to_string());
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        {
            let mut ctx = Context {
                config: &mut config,
                output: &mut output,
                state: &mut state,
            };
            let mut shell = CiscoEnabled::new(CiscoVariant::Generic);
            shell.process(&mut ctx, line);
        }
        (output.take(), state)
    }

    #[test]
    fn test_show_run_vlan() {
        let (lines, _) = run("show run vlan 123");
        assert!(lines.contains(&"vlan 123".to_string()));
        assert!(lines.contains(&" name shizzle".to_string()));
        assert!(lines.contains(&"end".to_string()));
    }

    #[test]
    fn test_show_run_unknown_vlan_is_invalid() {
        let (lines, _) = run("show run vlan 999");
        assert!(lines.iter().any(|l| l.contains("% Invalid input")));
    }

    #[test]
    fn test_terminal_length() {
        let (_, state) = run("terminal length 30");
        assert_eq!(state.terminal_length, Some(30));

        let (_, state) = run("terminal length 0");
        assert_eq!(state.terminal_length, None);
    }

    #[test]
    fn test_copy_tftp_defers_fetch() {
        let (lines, state) = run("copy tftp://10.0.0.1/conf/sw.cfg system:/running-config");
        assert_eq!(
            state.pending_tftp,
            Some(("10.0.0.1".to_string(), "conf/sw.cfg".to_string()))
        );
        assert!(lines[0].starts_with("Accessing tftp://10.0.0.1/conf/sw.cfg"));
    }

    #[test]
    fn test_write_memory_requests_delay() {
        let mut config = SwitchConfiguration::new("my_switch");
        config.commit_delay = std::time::Duration::from_secs(1);
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let mut ctx = Context {
            config: &mut config,
            output: &mut output,
            state: &mut state,
        };
        let mut shell = CiscoEnabled::new(CiscoVariant::Generic);
        shell.process(&mut ctx, "write memory");
        assert_eq!(state.pending_delay, Some(std::time::Duration::from_secs(1)));
        let lines = output.take();
        assert_eq!(lines, vec!["Building configuration...", "[OK]"]);
    }
}
