use libris_cli::commands::{auth, CommandContext};
use libris_core::config::{ConfigOverrides, LoadOptions};
use libris_core::session::{Session, SessionStore};
use tempfile::TempDir;

fn context_with(dir: &TempDir) -> CommandContext {
    CommandContext::initialize(LoadOptions {
        overrides: ConfigOverrides {
            session_path: Some(dir.path().join("session.json")),
            ..ConfigOverrides::default()
        },
        ..LoadOptions::default()
    })
    .expect("context should initialize")
}

#[test]
fn whoami_reports_signed_out_when_no_session_exists() {
    let dir = TempDir::new().expect("temp dir");
    let context = context_with(&dir);

    let result = auth::whoami(&context);

    assert_eq!(result.exit_code, 0);
    assert_eq!(result.output, "Not signed in.");
}

#[test]
fn a_saved_session_flows_into_whoami_and_logout_clears_it() {
    let dir = TempDir::new().expect("temp dir");

    SessionStore::new(dir.path().join("session.json"))
        .save(&Session {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            is_admin: true,
            token: "jwt-abc".to_string().into(),
        })
        .expect("session should save");

    let context = context_with(&dir);
    let result = auth::whoami(&context);
    assert_eq!(result.output, "Jane <jane@example.com> (administrator)");

    let result = auth::logout(&context);
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.output, "Signed out.");

    let context = context_with(&dir);
    assert_eq!(auth::whoami(&context).output, "Not signed in.");
}
