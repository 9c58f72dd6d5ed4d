use serde::Serialize;

use crate::models::User;

/// Bounds of the presence interval handed to the simulator, in seconds.
pub const PRESENCE_INTERVAL_MIN: u32 = 120;
pub const PRESENCE_INTERVAL_MAX: u32 = 600;

/// Export-only projection of a user for the simulator.
///
/// Carries every canonical field so the file can still be imported as a plain
/// user array, plus fields derived at export time. Never deserialized.
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorUser<'a> {
    #[serde(flatten)]
    pub user: &'a User,
    pub system_prompt: String,
    pub enabled: bool,
    pub presence_interval: u32,
}

impl<'a> SimulatorUser<'a> {
    pub fn new(user: &'a User, presence_interval: u32) -> Self {
        Self {
            user,
            system_prompt: system_prompt(user),
            enabled: true,
            presence_interval,
        }
    }
}

/// Builds the character prompt the simulator feeds its model for this user.
pub fn system_prompt(user: &User) -> String {
    let speech = user
        .language_skills
        .iter()
        .map(|skill| {
            let mut line = format!("You speak {} ({}).", skill.language, skill.fluency);
            if !skill.accent.is_empty() {
                line.push_str(&format!(" Your accent is {}.", skill.accent));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n");

    let style = &user.writing_style;
    format!(
        "You are an IRC user named {nickname}.

**Personality:**
{personality}

**Language & Speech:**
{speech}

**Writing Style:**
- Formality: {formality}
- Verbosity: {verbosity}
- Humor: {humor}
- Emoji Usage: {emoji}
- Punctuation: {punctuation}

Adhere strictly to these characteristics in all your responses. Do not break character.",
        nickname = user.nickname,
        personality = user.personality,
        formality = style.formality,
        verbosity = style.verbosity,
        humor = style.humor,
        emoji = style.emoji_usage,
        punctuation = style.punctuation,
    )
}
