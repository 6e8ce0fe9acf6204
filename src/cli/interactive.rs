//! Prompt-driven walk through the wizard for a human at a terminal.

use crate::form::catalog::CatalogOption;
use crate::form::ValueKind;
use crate::wizard::FieldRule;

use super::commands::{print_step, submit_current};
use super::core::{CliError, CommandError, LoopControl};
use super::io as cli_io;
use super::output;
use super::shell_context::ShellContext;

const SKIP_LABEL: &str = "(skip)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Next,
    Back,
    Jump,
    Submit,
    Quit,
}

impl Action {
    fn label(self) -> &'static str {
        match self {
            Action::Next => "Next step",
            Action::Back => "Previous step",
            Action::Jump => "Jump to step",
            Action::Submit => "Submit request",
            Action::Quit => "Quit",
        }
    }
}

pub(crate) fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    output::section(format!("{} quote request", context.config.site_name));
    while context.running {
        match round(context) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err)?,
        }
    }
    Ok(())
}

fn round(context: &mut ShellContext) -> Result<LoopControl, CommandError> {
    print_step(context);
    let rules = context.wizard.current_step().fields().to_vec();
    for rule in &rules {
        prompt_field(context, rule)?;
    }

    let actions = available_actions(context);
    let labels: Vec<String> = actions
        .iter()
        .map(|action| action.label().to_string())
        .collect();
    let choice = cli_io::select_index(&context.theme, "What next?", &labels, 0)?;

    match actions[choice] {
        Action::Next => {
            context.wizard.next()?;
        }
        Action::Back => {
            context.wizard.previous();
        }
        Action::Jump => {
            let titles: Vec<String> = context
                .wizard
                .descriptor()
                .steps()
                .iter()
                .map(|step| format!("{}. {}", step.position(), step.title()))
                .collect();
            let current = context.wizard.navigation().current - 1;
            let index = cli_io::select_index(&context.theme, "Go to step", &titles, current)?;
            context.wizard.jump_to(index + 1)?;
        }
        Action::Submit => return submit_round(context),
        Action::Quit => {
            if context.confirm_exit()? {
                context.wizard.teardown();
                return Ok(LoopControl::Exit);
            }
        }
    }
    Ok(LoopControl::Continue)
}

fn available_actions(context: &ShellContext) -> Vec<Action> {
    let controller = context.wizard.controller();
    let mut actions = Vec::new();
    if controller.is_last() {
        actions.push(Action::Submit);
    } else {
        actions.push(Action::Next);
    }
    if !controller.is_first() {
        actions.push(Action::Back);
    }
    if controller.total() > 1 {
        actions.push(Action::Jump);
    }
    actions.push(Action::Quit);
    actions
}

fn submit_round(context: &mut ShellContext) -> Result<LoopControl, CommandError> {
    let prompt = format!("Security check: {}", context.wizard.challenge().prompt());
    let answer = cli_io::prompt_text(&context.theme, &prompt, "")?;
    context.wizard.set_challenge_answer(answer);

    if submit_current(context)? {
        let again = cli_io::confirm_action(&context.theme, "Start another request?", false)?;
        if !again {
            return Ok(LoopControl::Exit);
        }
    }
    Ok(LoopControl::Continue)
}

fn prompt_field(context: &mut ShellContext, rule: &FieldRule) -> Result<(), CommandError> {
    if let Some(message) = context.wizard.field_error(rule.key) {
        cli_io::print_warning(format!("{}: {}", rule.label, message));
    }
    if let Some(help) = rule.help {
        cli_io::print_hint(help);
    }

    if rule.key.kind() == ValueKind::Flag {
        let current = context.wizard.record().consent();
        let consent = cli_io::confirm_action(&context.theme, rule.label, current)?;
        context.wizard.set_consent(consent);
        return Ok(());
    }

    let current = context
        .wizard
        .record()
        .text(rule.key)
        .unwrap_or_default()
        .to_string();

    let value = match rule.choices() {
        Some(options) => select_option(context, rule, options, &current)?,
        None => cli_io::prompt_text(&context.theme, &text_label(rule, &current), &current)?,
    };
    context.wizard.set_text(rule.key, &value)?;
    Ok(())
}

/// Marks required fields and shows a `used/limit` counter for capped ones.
fn text_label(rule: &FieldRule, current: &str) -> String {
    let mut label = rule.label.to_string();
    if rule.required {
        label.push_str(" *");
    }
    if let Some(max) = rule.max_length() {
        label.push_str(&format!(" ({}/{})", current.chars().count(), max));
    }
    label
}

fn select_option(
    context: &ShellContext,
    rule: &FieldRule,
    options: &[CatalogOption],
    current: &str,
) -> Result<String, CommandError> {
    let mut labels: Vec<String> = options
        .iter()
        .map(|option| option.label.to_string())
        .collect();
    if !rule.required {
        labels.push(SKIP_LABEL.to_string());
    }
    let default = options
        .iter()
        .position(|option| option.value == current)
        .unwrap_or(0);
    let index = cli_io::select_index(&context.theme, rule.label, &labels, default)?;
    Ok(options
        .get(index)
        .map(|option| option.value.to_string())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FieldKey, Validator};

    #[test]
    fn text_label_shows_required_marker_and_length_counter() {
        let description = FieldRule::new(FieldKey::ProjectDescription)
            .required()
            .with_validator(Validator::MinLength(10))
            .with_validator(Validator::MaxLength(1000));
        assert_eq!(
            text_label(&description, "Paint the hallway"),
            "Project description * (17/1000)"
        );

        let timeline = FieldRule::new(FieldKey::Timeline);
        assert_eq!(text_label(&timeline, ""), timeline.label);
    }
}
