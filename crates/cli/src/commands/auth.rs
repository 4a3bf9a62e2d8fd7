use std::io::{self, BufRead, Write};

use libris_core::session::Session;
use secrecy::SecretString;

use crate::commands::{api_failure, block_on, CommandContext, CommandResult};

pub fn login(context: &CommandContext, email: &str) -> CommandResult {
    let password = match prompt_password() {
        Ok(password) => password,
        Err(result) => return result,
    };

    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let outcome = match block_on(async { api.login(email, &password).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(session) => persist(context, session),
        Err(error) => api_failure(error, "Login failed. Please try again."),
    }
}

pub fn register(context: &CommandContext, name: &str, email: &str) -> CommandResult {
    let password = match prompt_password() {
        Ok(password) => password,
        Err(result) => return result,
    };

    let api = match context.api() {
        Ok(api) => api,
        Err(result) => return result,
    };

    let outcome = match block_on(async { api.register(name, email, &password).await }) {
        Ok(outcome) => outcome,
        Err(result) => return result,
    };

    match outcome {
        Ok(session) => persist(context, session),
        Err(error) => api_failure(error, "Registration failed. Please try again."),
    }
}

pub fn logout(context: &CommandContext) -> CommandResult {
    match context.store.clear() {
        Ok(()) => CommandResult::success("Signed out."),
        Err(error) => CommandResult::failure(format!("session issue: {error}"), 3),
    }
}

pub fn whoami(context: &CommandContext) -> CommandResult {
    match &context.session {
        Some(session) => CommandResult::success(render_profile(session)),
        None => CommandResult::success("Not signed in."),
    }
}

fn persist(context: &CommandContext, session: Session) -> CommandResult {
    let greeting = format!("Signed in as {} <{}>.", session.name, session.email);
    match context.store.save(&session) {
        Ok(()) => CommandResult::success(greeting),
        Err(error) => CommandResult::failure(format!("session issue: {error}"), 3),
    }
}

pub(crate) fn render_profile(session: &Session) -> String {
    let role = if session.is_admin { "administrator" } else { "member" };
    format!("{} <{}> ({role})", session.name, session.email)
}

fn prompt_password() -> Result<SecretString, CommandResult> {
    print!("Password: ");
    io::stdout()
        .flush()
        .map_err(|error| CommandResult::failure(format!("could not prompt: {error}"), 3))?;

    let mut stdin = io::stdin().lock();
    read_secret_line(&mut stdin)
        .map_err(|error| CommandResult::failure(format!("could not read password: {error}"), 3))
}

pub(crate) fn read_secret_line<R: BufRead>(reader: &mut R) -> io::Result<SecretString> {
    let mut line = String::new();
    reader.read_line(&mut line)?;
    let trimmed = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(trimmed.into())
}
