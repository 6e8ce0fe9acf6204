//! Shared CLI plumbing: loop control, error types, dispatch and reporting.

use std::io;

use strsim::levenshtein;
use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::WizardError;
use crate::form::FieldKey;

use super::io as cli_io;
use super::shell_context::{CliMode, ShellContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown field `{0}`.")]
    UnknownField(String),
    #[error(transparent)]
    Wizard(#[from] WizardError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

/// Fatal errors that end the CLI with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

/// Closest candidate within an edit distance of three.
pub(crate) fn closest_match<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    input: &str,
) -> Option<&'a str> {
    let needle = input.to_lowercase();
    candidates
        .into_iter()
        .map(|candidate| (levenshtein(&candidate.to_lowercase(), &needle), candidate))
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, candidate)| candidate)
}

impl ShellContext {
    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_error(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));
        if let Some(best) = closest_match(self.registry.names(), input) {
            cli_io::print_hint(format!("Did you mean `{}`?", best));
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Discard this request and exit?", false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(&message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::UnknownField(name) => {
                cli_io::print_error(format!("Unknown field `{}`.", name));
                let names = FieldKey::ALL.iter().map(|key| key.wire_name());
                if let Some(best) = closest_match(names, &name) {
                    cli_io::print_hint(format!("Did you mean `{}`?", best));
                }
                Ok(())
            }
            CommandError::Wizard(err) => {
                self.report_wizard_error(&err);
                Ok(())
            }
            // Terminal I/O failing in interactive mode leaves nothing to talk to.
            CommandError::Dialoguer(err) => Err(CliError::Command(err.to_string())),
            other => {
                cli_io::print_error(other.to_string());
                Ok(())
            }
        }
    }

    fn report_wizard_error(&self, err: &WizardError) {
        match err {
            WizardError::Validation(errors) => {
                cli_io::print_error(format!(
                    "Please check the following fields: {}",
                    field_list(errors.fields())
                ));
                for error in errors.iter() {
                    cli_io::print_warning(format!("{}: {}", error.field, error.message));
                }
            }
            WizardError::Submission(_) => {
                if let Some(banner) = self.wizard.banner() {
                    cli_io::print_error(banner.message());
                }
                for (key, message) in self.wizard.field_errors() {
                    cli_io::print_warning(format!("{}: {}", key, message));
                }
            }
            other => match other.banner() {
                Some(banner) => cli_io::print_error(banner),
                None => cli_io::print_error(other.to_string()),
            },
        }
    }
}

fn field_list(fields: Vec<FieldKey>) -> String {
    fields
        .iter()
        .map(|key| key.wire_name())
        .collect::<Vec<_>>()
        .join(", ")
}
