//! JunOS operational and configuration modes.

use super::candidate::Candidate;
use super::show;
use crate::config::{PortMode, SwitchConfiguration};
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};

/// Emit the JunOS syntax-error banner.
fn syntax_error(ctx: &mut Context<'_>) {
    ctx.write_line("syntax error, expecting <command>.");
}

/// Operational mode (`root@name> `).
pub struct JuniperOperational;

impl CommandProcessor for JuniperOperational {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("root@{}> ", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(&["configure", "exit", "quit", "show"], first) {
            Resolution::Match("configure") => {
                ctx.write_line("Entering configuration mode");
                let candidate = Candidate::new(ctx.config);
                Action::Push(Box::new(JuniperEdit::new(candidate)))
            }
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            Resolution::Match("show") => {
                let configuration = args.get(1).is_some_and(|t| {
                    matches!(resolve(&["configuration"], t), Resolution::Match(_))
                });
                if configuration {
                    ctx.output.extend(show::render(ctx.config));
                } else {
                    syntax_error(ctx);
                }
                Action::Handled
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        syntax_error(ctx);
    }
}

/// Configuration (edit) mode over a per-session candidate
/// (`root@name# `).
pub struct JuniperEdit {
    candidate: Candidate,
}

impl JuniperEdit {
    /// Enter edit mode with a freshly taken candidate.
    pub fn new(candidate: Candidate) -> Self {
        Self { candidate }
    }

    fn handle_set(&mut self, ctx: &mut Context<'_>, args: &Args<'_>) {
        match args.get(1).map(|t| resolve(&["interfaces", "vlans"], t)) {
            Some(Resolution::Match("vlans")) => self.handle_set_vlans(ctx, args),
            Some(Resolution::Match("interfaces")) => self.handle_set_interfaces(ctx, args),
            _ => syntax_error(ctx),
        }
    }

    fn handle_set_vlans(&mut self, ctx: &mut Context<'_>, args: &Args<'_>) {
        let (Some(name), Some(keyword)) = (args.get(2), args.get(3)) else {
            syntax_error(ctx);
            return;
        };
        let vlan_id_kw = matches!(resolve(&["vlan-id"], keyword), Resolution::Match(_));
        let Some(number) = args.int(4) else {
            syntax_error(ctx);
            return;
        };
        if !vlan_id_kw {
            syntax_error(ctx);
            return;
        }

        match self.candidate.config.ensure_vlan(number) {
            Ok(vlan) => {
                vlan.name = Some(name.to_string());
                // Conflicts key on the vlan number: two sessions renaming
                // the same id collide even under different names.
                self.candidate.touch(format!("vlans/{number}"));
            }
            Err(_) => {
                ctx.write_line(format!(
                    "error: value {number} is not within range (1..4094)"
                ));
            }
        }
    }

    fn handle_set_interfaces(&mut self, ctx: &mut Context<'_>, args: &Args<'_>) {
        let Some(name) = args.get(2) else {
            syntax_error(ctx);
            return;
        };
        if self.candidate.config.port(name).is_none() {
            ctx.write_line(format!("error: device {name} not found"));
            return;
        }
        let name = name.to_string();

        match args.get(3).map(|t| resolve(&["description", "disable", "unit"], t)) {
            Some(Resolution::Match("disable")) => {
                self.candidate.config.port_mut(&name).unwrap().shutdown = true;
            }
            Some(Resolution::Match("description")) => match args.rest_from(4) {
                Some(description) => {
                    self.candidate.config.port_mut(&name).unwrap().description =
                        Some(description.trim_matches('"').to_string());
                }
                None => return syntax_error(ctx),
            },
            Some(Resolution::Match("unit")) => {
                if !self.handle_set_unit(ctx, args, &name) {
                    return;
                }
            }
            _ => return syntax_error(ctx),
        }

        self.candidate.touch(format!("interfaces/{name}"));
    }

    /// `set interfaces X unit 0 family ethernet-switching …`; returns
    /// whether the edit applied.
    fn handle_set_unit(&mut self, ctx: &mut Context<'_>, args: &Args<'_>, name: &str) -> bool {
        let shape_ok = args.get(4) == Some("0")
            && args
                .get(5)
                .is_some_and(|t| matches!(resolve(&["family"], t), Resolution::Match(_)))
            && args.get(6).is_some_and(|t| {
                matches!(resolve(&["ethernet-switching"], t), Resolution::Match(_))
            });
        if !shape_ok {
            syntax_error(ctx);
            return false;
        }

        match args.get(7).map(|t| resolve(&["port-mode", "vlan"], t)) {
            Some(Resolution::Match("port-mode")) => {
                let mode = match args.get(8).map(|t| resolve(&["access", "trunk"], t)) {
                    Some(Resolution::Match("access")) => PortMode::Access,
                    Some(Resolution::Match("trunk")) => PortMode::Trunk,
                    _ => {
                        syntax_error(ctx);
                        return false;
                    }
                };
                self.candidate.config.port_mut(name).unwrap().mode = mode;
                true
            }
            Some(Resolution::Match("vlan")) => {
                let members_kw = args
                    .get(8)
                    .is_some_and(|t| matches!(resolve(&["members"], t), Resolution::Match(_)));
                let Some(member) = args.get(9) else {
                    syntax_error(ctx);
                    return false;
                };
                if !members_kw {
                    syntax_error(ctx);
                    return false;
                }

                let Some(number) = self.resolve_vlan(member) else {
                    ctx.write_line(format!("error: vlan {member} not found"));
                    return false;
                };
                let port = self.candidate.config.port_mut(name).unwrap();
                if port.mode == PortMode::Trunk {
                    port.trunk_vlans
                        .get_or_insert_with(Default::default)
                        .insert(number);
                    true
                } else {
                    self.candidate
                        .config
                        .set_access_vlan(name, number)
                        .is_ok()
                }
            }
            _ => {
                syntax_error(ctx);
                false
            }
        }
    }

    /// A vlan member may be a number or a configured vlan name.
    fn resolve_vlan(&self, member: &str) -> Option<u16> {
        if let Ok(number) = member.parse::<u16>() {
            return self.candidate.config.has_vlan(number).then_some(number);
        }
        self.candidate
            .config
            .vlans()
            .find(|v| v.name.as_deref() == Some(member))
            .map(|v| v.number)
    }

    fn handle_delete(&mut self, ctx: &mut Context<'_>, args: &Args<'_>) {
        match args.get(1).map(|t| resolve(&["interfaces", "vlans"], t)) {
            Some(Resolution::Match("vlans")) => {
                let Some(name) = args.get(2) else {
                    syntax_error(ctx);
                    return;
                };
                let number = self.resolve_vlan(name);
                match number {
                    Some(number) if self.candidate.config.remove_vlan(number).is_ok() => {
                        self.candidate.touch(format!("vlans/{number}"));
                    }
                    _ => ctx.write_line("warning: statement not found"),
                }
            }
            Some(Resolution::Match("interfaces")) => {
                let Some(name) = args.get(2) else {
                    syntax_error(ctx);
                    return;
                };
                let name = name.to_string();
                let sub = args
                    .get(3)
                    .map(|t| resolve(&["description", "disable", "unit"], t));
                let Some(port) = self.candidate.config.port_mut(&name) else {
                    ctx.write_line("warning: statement not found");
                    return;
                };
                match sub {
                    None => {
                        port.description = None;
                        port.shutdown = false;
                        port.mode = PortMode::Unset;
                        port.access_vlan = None;
                        port.trunk_vlans = None;
                    }
                    Some(Resolution::Match("description")) => port.description = None,
                    Some(Resolution::Match("disable")) => port.shutdown = false,
                    Some(Resolution::Match("unit")) => {
                        port.mode = PortMode::Unset;
                        port.access_vlan = None;
                        port.trunk_vlans = None;
                    }
                    Some(_) => return syntax_error(ctx),
                }
                self.candidate.touch(format!("interfaces/{name}"));
            }
            _ => syntax_error(ctx),
        }
    }
}

impl CommandProcessor for JuniperEdit {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("root@{}# ", config.name)
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        // `show | compare` must reach this processor whole; the generic
        // pipe filters do not recognize `compare` and leave it intact.
        if line.split('|').count() == 2 {
            let (left, right) = line.split_once('|').unwrap();
            let show_kw = matches!(
                resolve(&["show"], left.trim()),
                Resolution::Match(_)
            );
            let compare_kw = matches!(
                resolve(&["compare"], right.trim()),
                Resolution::Match(_)
            );
            if show_kw && compare_kw {
                let diff = show::compare(ctx.config, &self.candidate.config);
                ctx.output.extend(diff);
                return Action::Handled;
            }
        }

        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(
            &["commit", "delete", "exit", "quit", "rollback", "set", "show"],
            first,
        ) {
            Resolution::Match("set") => {
                self.handle_set(ctx, &args);
                Action::Handled
            }
            Resolution::Match("delete") => {
                self.handle_delete(ctx, &args);
                Action::Handled
            }
            Resolution::Match("show") => {
                ctx.output.extend(show::render(&self.candidate.config));
                Action::Handled
            }
            Resolution::Match("commit") => {
                match self.candidate.commit(ctx.config) {
                    Ok(()) => {
                        ctx.write_line("commit complete");
                        ctx.apply_commit_delay();
                    }
                    Err(_) => {
                        ctx.write_line("error: configuration database modified");
                        ctx.write_line("commit failed");
                    }
                }
                Action::Handled
            }
            Resolution::Match("rollback") => {
                self.candidate.rebase(ctx.config);
                ctx.write_line("load complete");
                Action::Handled
            }
            Resolution::Match("exit") | Resolution::Match("quit") => {
                if self.candidate.is_dirty() {
                    ctx.write_line("warning: discarding uncommitted changes");
                }
                ctx.write_line("Exiting configuration mode");
                Action::Pop
            }
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, _line: &str) {
        syntax_error(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Port;
    use crate::engine::{OutputBuffer, SessionState};

    fn setup() -> SwitchConfiguration {
        let mut config = SwitchConfiguration::new("switch");
        config.seed_ports(vec![
            Port::physical("ge-0/0/1"),
            Port::physical("ge-0/0/2"),
        ]);
        config
    }

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
    fn test_edits_stay_in_candidate_until_commit() {
        let mut running = setup();
        let mut edit = JuniperEdit::new(Candidate::new(&running));

        run(&mut running, &mut edit, "set vlans shizzle vlan-id 123");
        assert!(!running.has_vlan(123));

        let (_, lines) = run(&mut running, &mut edit, "commit");
        assert_eq!(lines, vec!["commit complete"]);
        assert!(running.has_vlan(123));
        assert_eq!(running.vlan(123).unwrap().name.as_deref(), Some("shizzle"));
    }

    #[test]
    fn test_rollback_discards() {
        let mut running = setup();
        let mut edit = JuniperEdit::new(Candidate::new(&running));

        run(&mut running, &mut edit, "set vlans shizzle vlan-id 123");
        let (_, lines) = run(&mut running, &mut edit, "rollback");
        assert_eq!(lines, vec!["load complete"]);

        run(&mut running, &mut edit, "commit");
        assert!(!running.has_vlan(123));
    }

    #[test]
    fn test_show_compare_renders_pending_edits() {
        let mut running = setup();
        let mut edit = JuniperEdit::new(Candidate::new(&running));

        run(&mut running, &mut edit, "set vlans shizzle vlan-id 123");
        let (_, diff) = run(&mut running, &mut edit, "show | compare");
        assert!(diff.iter().any(|l| l.starts_with('+') && l.contains("vlan-id 123;")));
    }

    #[test]
    fn test_conflicting_sessions() {
        let mut running = setup();
        let mut first = JuniperEdit::new(Candidate::new(&running));
        let mut second = JuniperEdit::new(Candidate::new(&running));

        run(&mut running, &mut first, "set vlans first vlan-id 100");
        run(&mut running, &mut second, "set vlans second vlan-id 100");

        let (_, lines) = run(&mut running, &mut first, "commit");
        assert_eq!(lines, vec!["commit complete"]);

        let (_, lines) = run(&mut running, &mut second, "commit");
        assert_eq!(
            lines,
            vec!["error: configuration database modified", "commit failed"]
        );
        assert_eq!(running.vlan(100).unwrap().name.as_deref(), Some("first"));
    }

    #[test]
    fn test_interface_member_edits() {
        let mut running = setup();
        let mut edit = JuniperEdit::new(Candidate::new(&running));

        run(&mut running, &mut edit, "set vlans shizzle vlan-id 123");
        run(
            &mut running,
            &mut edit,
            "set interfaces ge-0/0/1 unit 0 family ethernet-switching port-mode access",
        );
        run(
            &mut running,
            &mut edit,
            "set interfaces ge-0/0/1 unit 0 family ethernet-switching vlan members shizzle",
        );
        run(&mut running, &mut edit, "commit");

        let port = running.port("ge-0/0/1").unwrap();
        assert_eq!(port.mode, PortMode::Access);
        assert_eq!(port.access_vlan, Some(123));
    }

    #[test]
    fn test_unknown_device() {
        let mut running = setup();
        let mut edit = JuniperEdit::new(Candidate::new(&running));
        let (_, lines) = run(&mut running, &mut edit, "set interfaces ge-9/9/9 disable");
        assert_eq!(lines, vec!["error: device ge-9/9/9 not found"]);
    }
}
