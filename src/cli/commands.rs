use crate::errors::WizardError;
use crate::form::{FieldKey, ValueKind};
use crate::utils::build_info;
use crate::wizard::SubmitOutcome;

use super::core::{CommandError, CommandResult};
use super::help;
use super::io as cli_io;
use super::output;
use super::registry::{CommandEntry, CommandRegistry};
use super::shell_context::ShellContext;

pub fn register_all(registry: &mut CommandRegistry) {
    for entry in definitions() {
        registry.register(entry);
    }
}

fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("set", "Set a field value", "set <field> <value>", cmd_set),
        CommandEntry::new("consent", "Give or withdraw consent", "consent yes|no", cmd_consent),
        CommandEntry::new("next", "Validate this step and continue", "next", cmd_next),
        CommandEntry::new("back", "Return to the previous step", "back", cmd_back),
        CommandEntry::new("goto", "Jump to a step", "goto <step>", cmd_goto),
        CommandEntry::new("answer", "Answer the security check", "answer <number>", cmd_answer),
        CommandEntry::new("honeypot", "Fill the hidden website field", "honeypot <text>", cmd_honeypot),
        CommandEntry::new("challenge", "Show the security check", "challenge", cmd_challenge),
        CommandEntry::new("refresh", "Draw a new security check", "refresh", cmd_refresh),
        CommandEntry::new("show", "Show the current step and values", "show", cmd_show),
        CommandEntry::new("submit", "Send the request", "submit", cmd_submit),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new("help", "Show available commands", "help [command]", cmd_help),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

pub(crate) fn parse_flag(input: &str) -> Result<bool, CommandError> {
    match input.trim().to_ascii_lowercase().as_str() {
        "yes" | "y" | "true" | "1" => Ok(true),
        "no" | "n" | "false" | "0" => Ok(false),
        other => Err(CommandError::InvalidArguments(format!(
            "expected `yes` or `no`, got `{other}`"
        ))),
    }
}

pub(crate) fn print_step(context: &ShellContext) {
    let nav = context.wizard.navigation();
    output::section(format!(
        "Step {} of {}: {}",
        nav.current,
        context.wizard.descriptor().len(),
        context.wizard.current_step().title()
    ));
}

/// Runs one submission against the configured collaborator. Returns whether
/// the request went through.
pub(crate) fn submit_current(context: &mut ShellContext) -> Result<bool, CommandError> {
    let ShellContext {
        wizard,
        collaborator,
        ..
    } = context;
    match wizard.submit(collaborator.as_mut())? {
        SubmitOutcome::Submitted(acknowledgment) => {
            cli_io::print_success(acknowledgment.title());
            cli_io::print_info(acknowledgment.message());
            Ok(true)
        }
        // Deliberately silent.
        SubmitOutcome::Discarded => Ok(false),
        SubmitOutcome::AlreadyPending => {
            cli_io::print_warning("A submission is already in progress.");
            Ok(false)
        }
    }
}

fn cmd_set(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((name, rest)) = args.split_first() else {
        return Err(CommandError::InvalidArguments(
            "usage: set <field> <value>".into(),
        ));
    };
    let key: FieldKey = name
        .parse()
        .map_err(|_| CommandError::UnknownField(name.to_string()))?;
    let value = rest.join(" ");
    match key.kind() {
        ValueKind::Flag => context.wizard.set_consent(parse_flag(&value)?),
        ValueKind::Text => context.wizard.set_text(key, &value)?,
    }
    cli_io::print_success(format!("{} updated.", key));
    Ok(())
}

fn cmd_consent(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let value = args.first().ok_or_else(|| {
        CommandError::InvalidArguments("usage: consent yes|no".into())
    })?;
    let consent = parse_flag(value)?;
    context.wizard.set_consent(consent);
    if consent {
        cli_io::print_success("Consent recorded.");
    } else {
        cli_io::print_info("Consent withdrawn.");
    }
    Ok(())
}

fn cmd_next(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.next()? {
        print_step(context);
    } else {
        cli_io::print_info("This is the last step. Use `submit` to send the request.");
    }
    Ok(())
}

fn cmd_back(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if context.wizard.previous() {
        print_step(context);
    } else {
        cli_io::print_info("Already on the first step.");
    }
    Ok(())
}

fn cmd_goto(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let raw = args
        .first()
        .ok_or_else(|| CommandError::InvalidArguments("usage: goto <step>".into()))?;
    let step: usize = raw.parse().map_err(|_| {
        CommandError::InvalidArguments(format!("`{raw}` is not a step number"))
    })?;
    context.wizard.jump_to(step)?;
    print_step(context);
    Ok(())
}

fn cmd_answer(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.wizard.set_challenge_answer(args.join(" "));
    cli_io::print_info("Answer recorded.");
    Ok(())
}

fn cmd_honeypot(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    context.wizard.set_honeypot(args.join(" "));
    Ok(())
}

fn cmd_challenge(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    cli_io::print_info(format!("Security check: {}", context.wizard.challenge().prompt()));
    Ok(())
}

fn cmd_refresh(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let prompt = context.wizard.refresh_challenge().prompt();
    cli_io::print_info(format!("Security check: {}", prompt));
    Ok(())
}

fn cmd_show(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    print_step(context);
    let step = context.wizard.current_step();
    for rule in step.fields() {
        let value = context.wizard.record().get(rule.key);
        let rendered = match value.as_flag() {
            Some(flag) => String::from(if flag { "yes" } else { "no" }),
            None => value.as_text().unwrap_or_default().to_string(),
        };
        let marker = if rule.required { "*" } else { " " };
        cli_io::print_info(format!("{marker} {:<20} {}", rule.key.wire_name(), rendered));
        if let Some(message) = context.wizard.field_error(rule.key) {
            cli_io::print_warning(format!("{}: {}", rule.key, message));
        }
    }
    cli_io::print_info(format!("Status: {}", context.wizard.status().label()));
    if let Some(banner) = context.wizard.banner() {
        cli_io::print_warning(banner.message());
    }
    Ok(())
}

fn cmd_submit(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    match submit_current(context) {
        Ok(_) => Ok(()),
        Err(CommandError::Wizard(WizardError::Challenge(err))) => {
            cli_io::print_error(err.to_string());
            cli_io::print_info(format!(
                "New security check: {}",
                context.wizard.challenge().prompt()
            ));
            Ok(())
        }
        Err(err) => Err(err),
    }
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Quote Wizard {}", meta.version));
    for (label, value) in meta.rows() {
        cli_io::print_info(format!("  {:<12} {}", label, value));
    }
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(entry) => help::print_command(entry),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
