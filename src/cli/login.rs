use super::ui;
use crate::core::config::AuthConfig;
use crate::core::session::{Session, SessionStore};
use anyhow::{Result, bail};
use console::Term;

pub const MAX_ATTEMPTS: usize = 3;

/// Returns the active session, prompting for credentials on the terminal
/// when there is none. An unconfigured `auth` section leaves the desk open.
pub fn ensure_signed_in(auth: Option<&AuthConfig>, store: &SessionStore) -> Result<Option<Session>> {
    let term = Term::stderr();
    sign_in_with(auth, store, |label, secret| {
        term.write_str(label)?;
        let answer = if secret {
            term.read_secure_line()?
        } else {
            term.read_line()?
        };
        Ok(answer)
    })
}

pub fn sign_in_with<F>(
    auth: Option<&AuthConfig>,
    store: &SessionStore,
    mut prompt: F,
) -> Result<Option<Session>>
where
    F: FnMut(&str, bool) -> Result<String>,
{
    let Some(auth) = auth else {
        return Ok(None);
    };
    if let Some(session) = store.load_active() {
        return Ok(Some(session));
    }

    let credentials = auth.credentials();
    for _ in 0..MAX_ATTEMPTS {
        let username = prompt("Username: ", false)?;
        let password = prompt("Password: ", true)?;
        if let Some(session) = store.login(&credentials, &username, &password)? {
            return Ok(Some(session));
        }
        eprintln!(
            "{}",
            ui::style_text("Invalid credentials.", ui::StyleType::Error)
        );
    }
    bail!("Too many failed sign-in attempts")
}
