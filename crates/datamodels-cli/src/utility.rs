use crate::theme::dialoguer_theme;
use anyhow::{Context, Result};
use dialoguer::Password;

/// Password value that asks for the password interactively.
const PROMPT: &str = "*";

/// Redact the password portion of a database URL for safe display.
///
/// If the URL can be parsed and contains a password, replaces it with `***`.
/// If parsing fails, returns the original string unchanged.
pub(crate) fn redact_url_password(url: &str) -> String {
    match url::Url::parse(url) {
        Ok(mut parsed) => {
            if parsed.password().is_some() {
                let _ = parsed.set_password(Some("***"));
            }
            parsed.to_string()
        }
        Err(_) => url.to_string(),
    }
}

/// Resolves a `--pass` value, prompting with hidden input when it is `*`.
pub(crate) fn resolve_password(pass: Option<String>) -> Result<Option<String>> {
    match pass {
        Some(pass) if pass == PROMPT => {
            let password = Password::with_theme(&dialoguer_theme())
                .with_prompt("password")
                .allow_empty_password(true)
                .interact()
                .context("reading password")?;
            Ok(Some(password))
        }
        pass => Ok(pass),
    }
}

/// Sets the credentials of a connection URL. Absent values leave the URL's
/// own credentials in place.
pub(crate) fn with_credentials(
    url: &str,
    user: Option<&str>,
    password: Option<&str>,
) -> Result<String> {
    if user.is_none() && password.is_none() {
        return Ok(url.to_string());
    }

    let mut parsed = url::Url::parse(url).with_context(|| format!("invalid URL: {url}"))?;

    if let Some(user) = user {
        parsed
            .set_username(user)
            .map_err(|_| anyhow::anyhow!("URL cannot carry a username: {url}"))?;
    }

    if let Some(password) = password {
        parsed
            .set_password(Some(password))
            .map_err(|_| anyhow::anyhow!("URL cannot carry a password: {url}"))?;
    }

    Ok(parsed.to_string())
}
