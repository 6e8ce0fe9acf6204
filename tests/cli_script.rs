use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use quote_wizard::antispam::AntiSpamGuard;
use tempfile::TempDir;

const SEED: u64 = 42;

fn expected_answer() -> i64 {
    AntiSpamGuard::with_seed(SEED).challenge().answer()
}

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("quote_wizard_cli").unwrap();
    cmd.env("QUOTE_WIZARD_CLI_SCRIPT", "1")
        .env("QUOTE_WIZARD_HOME", home.path())
        .env("QUOTE_WIZARD_FORM_ID", "test-form")
        .env("QUOTE_WIZARD_DRY_RUN", "1")
        .env("QUOTE_WIZARD_CHALLENGE_SEED", SEED.to_string())
        .env_remove("RUST_LOG");
    cmd
}

fn filled_script(tail: &str) -> String {
    format!(
        "set firstName Jane\n\
         set lastName Doe\n\
         set email jane@example.com\n\
         set phone \"555-123-4567\"\n\
         set address \"12 Main St\"\n\
         next\n\
         set serviceType painting\n\
         set projectDescription \"Paint the living room and hallway.\"\n\
         next\n\
         consent yes\n\
         {tail}\n\
         exit\n"
    )
}

#[test]
fn script_mode_submits_a_complete_request() {
    let home = TempDir::new().unwrap();
    let script = filled_script(&format!("answer {}\nsubmit", expected_answer()));

    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Step 2 of 3: Project Details"))
        .stdout(contains("Step 3 of 3: Final Steps"))
        .stdout(contains("Dry run: would submit to form `test-form`"))
        .stdout(contains("\"serviceType\": \"painting\""))
        .stdout(contains("Request Submitted Successfully!"))
        .stdout(contains(
            "Thank you, Jane! We've received your interior and exterior painting request",
        ));
}

#[test]
fn honeypot_submission_prints_nothing_about_it() {
    let home = TempDir::new().unwrap();
    let script = filled_script(&format!(
        "honeypot http://spam.example\nanswer {}\nsubmit",
        expected_answer()
    ));

    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Dry run").not())
        .stdout(contains("Submitted").not())
        .stdout(contains("ERROR").not());
}

#[test]
fn wrong_answer_is_reported_with_a_new_challenge() {
    let home = TempDir::new().unwrap();
    let script = filled_script(&format!("answer {}\nsubmit", expected_answer() + 1));

    script_command(&home)
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("Incorrect answer to the math problem. Please try again."))
        .stdout(contains("New security check: What is"))
        .stdout(contains("Dry run").not());
}

#[test]
fn missing_form_id_disables_submission() {
    let home = TempDir::new().unwrap();
    let script = filled_script(&format!("answer {}\nsubmit", expected_answer()));

    script_command(&home)
        .env_remove("QUOTE_WIZARD_FORM_ID")
        .write_stdin(script)
        .assert()
        .success()
        .stdout(contains("No form identifier configured"))
        .stdout(contains("Unable to submit right now. Please contact us directly."))
        .stdout(contains("Dry run").not());
}

#[test]
fn incomplete_step_lists_missing_fields() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("set firstName Jane\nnext\nshow\nexit\n")
        .assert()
        .success()
        .stdout(contains(
            "Please check the following fields: lastName, email, phone, address",
        ))
        .stdout(contains("email: Email address is required"))
        .stdout(contains("Step 1 of 3: Contact Information"));
}

#[test]
fn typos_get_suggestions() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("sumbit\nset emial jane@example.com\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `sumbit`"))
        .stdout(contains("Did you mean `submit`?"))
        .stdout(contains("Unknown field `emial`."))
        .stdout(contains("Did you mean `email`?"));
}

#[test]
fn challenge_command_shows_the_seeded_prompt() {
    let home = TempDir::new().unwrap();
    let guard = AntiSpamGuard::with_seed(SEED);

    script_command(&home)
        .write_stdin("challenge\nexit\n")
        .assert()
        .success()
        .stdout(contains(guard.challenge().prompt()));
}

#[test]
fn version_prints_build_metadata() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .write_stdin("version\nexit\n")
        .assert()
        .success()
        .stdout(contains(format!("Quote Wizard {}", env!("CARGO_PKG_VERSION"))))
        .stdout(contains("Build hash"));
}

#[test]
fn invalid_seed_is_fatal() {
    let home = TempDir::new().unwrap();

    script_command(&home)
        .env("QUOTE_WIZARD_CHALLENGE_SEED", "not-a-number")
        .write_stdin("exit\n")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("QUOTE_WIZARD_CHALLENGE_SEED must be an unsigned integer"));
}
