//! Field validators
//!
//! Name rules follow the limits the Event Hub service enforces. Each
//! validator returns the message shown to the user on failure.

use super::id::Identity;
use super::mapper::Rights;
use crate::error::{ProviderError, ProviderResult};

/// Name of the consumer group every Event Hub is created with
pub const DEFAULT_CONSUMER_GROUP: &str = "$Default";

/// Maximum length of `user_metadata`
pub const USER_METADATA_MAX_LEN: usize = 1024;

/// 1-50 chars of letters, digits, periods, hyphens and underscores,
/// starting and ending with a letter or digit
fn is_valid_child_name(value: &str) -> bool {
    if value.is_empty() || value.len() > 50 {
        return false;
    }

    let first = value.chars().next();
    let last = value.chars().last();
    let edge_ok = |c: Option<char>| c.map(|c| c.is_ascii_alphanumeric()).unwrap_or(false);
    if !edge_ok(first) || !edge_ok(last) {
        return false;
    }

    value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.' || c == '_')
}

pub fn consumer_group_name(value: &str) -> Result<(), String> {
    if is_valid_child_name(value) {
        return Ok(());
    }
    Err(format!(
        "consumer group name {:?} can contain only letters, numbers, periods, hyphens and underscores, must begin and end with a letter or number and be up to 50 characters long",
        value
    ))
}

/// Consumer group names accepted by lookups, which may target the built-in group
pub fn consumer_group_lookup_name(value: &str) -> Result<(), String> {
    if value == DEFAULT_CONSUMER_GROUP {
        return Ok(());
    }
    consumer_group_name(value)
}

pub fn eventhub_name(value: &str) -> Result<(), String> {
    if is_valid_child_name(value) {
        return Ok(());
    }
    Err(format!(
        "eventhub name {:?} can contain only letters, numbers, periods, hyphens and underscores, must begin and end with a letter or number and be up to 50 characters long",
        value
    ))
}

pub fn authorization_rule_name(value: &str) -> Result<(), String> {
    if is_valid_child_name(value) {
        return Ok(());
    }
    Err(format!(
        "authorization rule name {:?} can contain only letters, numbers, periods, hyphens and underscores, must begin and end with a letter or number and be up to 50 characters long",
        value
    ))
}

/// Namespace names are 6-50 chars, start with a letter, end with a letter or
/// digit and contain only letters, digits and hyphens
pub fn namespace_name(value: &str) -> Result<(), String> {
    let err = || {
        Err(format!(
            "namespace name {:?} must be 6-50 characters, start with a letter, end with a letter or number and contain only letters, numbers and hyphens",
            value
        ))
    };

    if value.len() < 6 || value.len() > 50 {
        return err();
    }

    let mut chars = value.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {},
        _ => return err(),
    }

    if value.ends_with('-') {
        return err();
    }

    if !value.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return err();
    }

    Ok(())
}

/// Resource group names are 1-90 chars of alphanumerics, underscores,
/// parentheses, hyphens and periods, and cannot end in a period
pub fn resource_group_name(value: &str) -> Result<(), String> {
    if value.is_empty() || value.len() > 90 {
        return Err(format!(
            "resource group name {:?} must be between 1 and 90 characters",
            value
        ));
    }

    if value.ends_with('.') {
        return Err(format!("resource group name {:?} cannot end with a period", value));
    }

    let valid = value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '(' | ')' | '-' | '.'));
    if !valid {
        return Err(format!(
            "resource group name {:?} can only contain alphanumeric characters, underscores, parentheses, hyphens and periods",
            value
        ));
    }

    Ok(())
}

pub fn user_metadata(value: &str) -> Result<(), String> {
    let len = value.chars().count();
    if len < 1 || len > USER_METADATA_MAX_LEN {
        return Err(format!(
            "user_metadata must be between 1 and {} characters, got {}",
            USER_METADATA_MAX_LEN, len
        ));
    }
    Ok(())
}

/// Cross-field check for authorization rule rights, run before any remote call
pub fn validate_rights(rights: &Rights) -> ProviderResult<()> {
    if !rights.listen && !rights.send && !rights.manage {
        return Err(ProviderError::validation(
            "One of the `listen`, `send` or `manage` properties needs to be set",
        ));
    }

    if rights.manage && !(rights.listen && rights.send) {
        return Err(ProviderError::validation(
            "if `manage` is set both `listen` and `send` must be set to true too",
        ));
    }

    Ok(())
}

/// Reject desired state whose identifying arguments differ from the ID
pub fn ensure_same_identity(current: &Identity<'_>, desired: &Identity<'_>) -> ProviderResult<()> {
    for ((field, current), (_, desired)) in current.iter().zip(desired.iter()) {
        if current != desired {
            return Err(ProviderError::validation(format!(
                "`{}` cannot be changed from {:?} to {:?} in place - the resource must be replaced",
                field, current, desired
            )));
        }
    }

    Ok(())
}

/// Run `check` against `value`, prefixing failures with the field name
pub fn field(name: &str, value: &str, check: fn(&str) -> Result<(), String>) -> ProviderResult<()> {
    check(value).map_err(|e| ProviderError::validation(format!("{}: {}", name, e)))
}
