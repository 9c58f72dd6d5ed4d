//! Rules applied when a user or channel is saved from a form.
//!
//! Imports and generated batches bypass these checks.

use thiserror::Error;

pub const NICKNAME_MIN_CHARS: usize = 3;
pub const NICKNAME_MAX_CHARS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Nickname is required.")]
    NicknameRequired,
    #[error("Nickname must be 3-20 characters.")]
    NicknameLength,
    #[error("Nickname cannot contain spaces.")]
    NicknameWhitespace,
    #[error("Nickname is already taken.")]
    NicknameTaken,
    #[error("Channel name is required.")]
    ChannelNameRequired,
    #[error("Channel name must start with #.")]
    ChannelNamePrefix,
}

/// Checks a nickname against the form rules.
///
/// `existing` holds every current nickname; `editing` is the current nickname
/// of the user being edited, which may be kept.
pub fn validate_nickname<'a, I>(
    nickname: &str,
    existing: I,
    editing: Option<&str>,
) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    if nickname.is_empty() {
        return Err(ValidationError::NicknameRequired);
    }
    let len = nickname.chars().count();
    if !(NICKNAME_MIN_CHARS..=NICKNAME_MAX_CHARS).contains(&len) {
        return Err(ValidationError::NicknameLength);
    }
    if nickname.chars().any(char::is_whitespace) {
        return Err(ValidationError::NicknameWhitespace);
    }

    let wanted = nickname.to_lowercase();
    if editing.is_some_and(|current| current.to_lowercase() == wanted) {
        return Ok(());
    }
    if existing.into_iter().any(|nick| nick.to_lowercase() == wanted) {
        return Err(ValidationError::NicknameTaken);
    }
    Ok(())
}

pub fn validate_channel_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::ChannelNameRequired);
    }
    if !name.starts_with('#') {
        return Err(ValidationError::ChannelNamePrefix);
    }
    Ok(())
}
