//! Cisco unprivileged shell and the enable password prompt.

use super::{CiscoEnabled, CiscoVariant, invalid_input};
use crate::config::SwitchConfiguration;
use crate::engine::{Action, Args, CommandProcessor, Context, Resolution, resolve};
use crate::terminal::EchoMode;

const COMMANDS: &[&str] = &["enable", "exit", "quit"];

/// The unprivileged shell (`name>`).
pub struct CiscoDefault {
    variant: CiscoVariant,
}

impl CiscoDefault {
    /// Create the unprivileged shell.
    pub fn new(variant: CiscoVariant) -> Self {
        Self { variant }
    }
}

impl CommandProcessor for CiscoDefault {
    fn prompt(&self, config: &SwitchConfiguration) -> String {
        format!("{}>", config.name)
    }

    fn process(&mut self, _ctx: &mut Context<'_>, line: &str) -> Action {
        let args = Args::parse(line);
        let Some(first) = args.get(0) else {
            return Action::Handled;
        };

        match resolve(COMMANDS, first) {
            Resolution::Match("enable") => Action::Push(Box::new(CiscoPassword::new(self.variant))),
            Resolution::Match("exit") | Resolution::Match("quit") => Action::Terminate,
            _ => Action::Unhandled,
        }
    }

    fn unknown_command(&self, ctx: &mut Context<'_>, line: &str) {
        let args = Args::parse(line);
        invalid_input(ctx, args.offset(0).unwrap_or(0));
    }
}

/// The enable password continuation. Replaces itself with the enabled
/// shell on success; three failures fall back to the unprivileged shell.
pub struct CiscoPassword {
    variant: CiscoVariant,
    attempts: u8,
}

impl CiscoPassword {
    /// Create the password prompt.
    pub fn new(variant: CiscoVariant) -> Self {
        Self {
            variant,
            attempts: 0,
        }
    }
}

impl CommandProcessor for CiscoPassword {
    fn prompt(&self, _config: &SwitchConfiguration) -> String {
        "Password: ".to_string()
    }

    fn process(&mut self, ctx: &mut Context<'_>, line: &str) -> Action {
        if ctx.config.password_accepted(line) {
            return Action::Replace(Box::new(CiscoEnabled::new(self.variant)));
        }

        self.attempts += 1;
        if self.attempts >= 3 {
            ctx.write_line("% Bad secrets");
            ctx.write_line("");
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{OutputBuffer, SessionState};

    fn context<'a>(
        config: &'a mut SwitchConfiguration,
        output: &'a mut OutputBuffer,
        state: &'a mut SessionState,
    ) -> Context<'a> {
        Context {
            config,
            output,
            state,
        }
    }

    #[test]
    fn test_prompt_uses_hostname() {
        let config = SwitchConfiguration::new("my_switch");
        assert_eq!(CiscoDefault::new(CiscoVariant::Generic).prompt(&config), "my_switch>");
    }

    #[test]
    fn test_enable_pushes_password_prompt() {
        let mut config = SwitchConfiguration::new("sw");
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let mut ctx = context(&mut config, &mut output, &mut state);

        let mut shell = CiscoDefault::new(CiscoVariant::Generic);
        assert!(matches!(shell.process(&mut ctx, "enable"), Action::Push(_)));
        // Unique prefix also resolves.
        assert!(matches!(shell.process(&mut ctx, "en"), Action::Push(_)));
    }

    #[test]
    fn test_password_accepted_and_rejected() {
        let mut config = SwitchConfiguration::new("sw");
        config.privileged_passwords.push("CiSc000".to_string());
        let mut output = OutputBuffer::default();
        let mut state = SessionState::default();
        let mut ctx = context(&mut config, &mut output, &mut state);

        let mut prompt = CiscoPassword::new(CiscoVariant::Generic);
        assert_eq!(prompt.echo(), EchoMode::Suppress);
        assert!(matches!(prompt.process(&mut ctx, "wrong"), Action::Handled));
        assert!(matches!(prompt.process(&mut ctx, "CiSc000"), Action::Replace(_)));

        // Three failures pop back to the unprivileged shell.
        let mut prompt = CiscoPassword::new(CiscoVariant::Generic);
        assert!(matches!(prompt.process(&mut ctx, "a"), Action::Handled));
        assert!(matches!(prompt.process(&mut ctx, "b"), Action::Handled));
        assert!(matches!(prompt.process(&mut ctx, "c"), Action::Pop));
    }
}
