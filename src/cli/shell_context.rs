use std::env;

use dialoguer::theme::ColorfulTheme;
use tracing::warn;

use crate::antispam::AntiSpamGuard;
use crate::config::{Config, ConfigManager};
use crate::submission::{DryRunCollaborator, FormspreeClient, SubmissionCollaborator};
use crate::wizard::{presets, QuoteWizard};

use super::commands;
use super::core::CliError;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};

pub const SCRIPT_ENV: &str = "QUOTE_WIZARD_CLI_SCRIPT";
pub const DRY_RUN_ENV: &str = "QUOTE_WIZARD_DRY_RUN";
pub const SEED_ENV: &str = "QUOTE_WIZARD_CHALLENGE_SEED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Startup switches gathered from arguments and the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliOptions {
    pub mode: CliMode,
    pub dry_run: bool,
    pub seed: Option<u64>,
}

impl CliOptions {
    pub fn from_env() -> Result<Self, CliError> {
        Self::parse(
            env::args().skip(1),
            env::var_os(SCRIPT_ENV).is_some(),
            env::var_os(DRY_RUN_ENV).is_some(),
            env::var(SEED_ENV).ok(),
        )
    }

    pub(crate) fn parse(
        args: impl IntoIterator<Item = String>,
        script: bool,
        dry_run: bool,
        seed: Option<String>,
    ) -> Result<Self, CliError> {
        let mut options = Self {
            mode: if script {
                CliMode::Script
            } else {
                CliMode::Interactive
            },
            dry_run,
            seed: None,
        };

        for arg in args {
            match arg.as_str() {
                "--dry-run" => options.dry_run = true,
                "--script" => options.mode = CliMode::Script,
                other => return Err(CliError::Input(format!("unrecognised argument `{other}`"))),
            }
        }

        if let Some(raw) = seed {
            let seed = raw.trim().parse::<u64>().map_err(|_| {
                CliError::Input(format!("{SEED_ENV} must be an unsigned integer, got `{raw}`"))
            })?;
            options.seed = Some(seed);
        }
        Ok(options)
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub theme: ColorfulTheme,
    pub config: Config,
    pub wizard: QuoteWizard,
    pub collaborator: Box<dyn SubmissionCollaborator>,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(options: &CliOptions) -> Result<Self, CliError> {
        let config = ConfigManager::new()?.load()?.with_env_overrides();
        Self::with_config(options, config)
    }

    pub fn with_config(options: &CliOptions, config: Config) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let guard = match options.seed {
            Some(seed) => AntiSpamGuard::with_seed(seed),
            None => AntiSpamGuard::new(),
        };
        let descriptor =
            presets::quote_request().map_err(|err| CliError::Command(err.to_string()))?;
        let wizard = QuoteWizard::with_guard(descriptor, config.submission_config(), guard);

        let collaborator: Box<dyn SubmissionCollaborator> = if options.dry_run {
            Box::new(DryRunCollaborator::stdout())
        } else {
            let client = FormspreeClient::from_config(&config)
                .map_err(|err| CliError::Command(err.to_string()))?;
            Box::new(client)
        };

        if !wizard.is_configured() {
            warn!("no form identifier configured");
            cli_io::print_warning(
                "No form identifier configured; submissions are disabled. \
                 Set QUOTE_WIZARD_FORM_ID or add `form_id` to the config file.",
            );
        }

        Ok(Self {
            mode: options.mode,
            registry,
            theme: ColorfulTheme::default(),
            config,
            wizard,
            collaborator,
            last_command: None,
            running: true,
        })
    }

    pub fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub fn prompt(&self) -> String {
        let nav = self.wizard.navigation();
        format!("quote[{}/{}]> ", nav.current, self.wizard.descriptor().len())
    }
}
