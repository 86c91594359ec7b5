//! Input validation for identity data

use crate::contract::IdentityError;

const MAX_EMAIL_LEN: usize = 254;
const MAX_DISPLAY_NAME_LEN: usize = 80;
const MAX_TEAM_NAME_LEN: usize = 100;
const MAX_DESCRIPTION_LEN: usize = 2000;

/// Trim and lowercase an email, rejecting obviously malformed addresses
pub fn normalize_email(email: &str) -> Result<String, IdentityError> {
    let email = email.trim().to_lowercase();

    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return Err(IdentityError::validation("email must be 1-254 characters"));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(IdentityError::validation("email must not contain whitespace"));
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err(IdentityError::validation(format!("'{}' is not a valid email", email))),
    };

    let domain_ok = domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !domain.contains("..");
    if local.is_empty() || !domain_ok {
        return Err(IdentityError::validation(format!("'{}' is not a valid email", email)));
    }

    Ok(email)
}

pub fn validate_password(password: &str, min_len: usize) -> Result<(), IdentityError> {
    if password.chars().count() < min_len {
        return Err(IdentityError::validation(format!(
            "password must be at least {} characters",
            min_len
        )));
    }
    if password.trim().is_empty() {
        return Err(IdentityError::validation("password must not be blank"));
    }
    Ok(())
}

pub fn validate_display_name(name: &str) -> Result<String, IdentityError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_DISPLAY_NAME_LEN {
        return Err(IdentityError::validation(format!(
            "display name must be 1-{} characters",
            MAX_DISPLAY_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

pub fn validate_team_name(name: &str) -> Result<String, IdentityError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_TEAM_NAME_LEN {
        return Err(IdentityError::validation(format!(
            "team name must be 1-{} characters",
            MAX_TEAM_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

/// Empty descriptions are stored as `None`
pub fn normalize_description(description: Option<String>) -> Result<Option<String>, IdentityError> {
    match description.map(|d| d.trim().to_string()) {
        Some(d) if d.is_empty() => Ok(None),
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(IdentityError::validation(
            format!("description must be at most {} characters", MAX_DESCRIPTION_LEN),
        )),
        other => Ok(other),
    }
}

/// Avatar URLs must be absolute http(s) URLs
pub fn validate_avatar_url(raw: &str) -> Result<String, IdentityError> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| IdentityError::validation(format!("invalid avatar url: {}", e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed.to_string()),
        other => Err(IdentityError::validation(format!(
            "avatar url scheme '{}' is not allowed",
            other
        ))),
    }
}
