//! Prompt, response schema and post-processing for AI-generated users.

use std::collections::HashSet;

use rand::Rng;
use serde_json::{Value, json};
use station_types::{EmojiUsage, Fluency, Formality, Humor, Punctuation, UserDraft, Verbosity};

use crate::random::random_nickname;
use crate::sanitize::sanitize_nickname;
use crate::service::ServiceError;

pub const NICKNAME_PROMPT: &str = "Generate a single, creative, and unique IRC-style nickname. \
It should be one word, alphanumeric, and may contain underscores or hyphens. \
Examples: \"CyberNinja\", \"Glitch_King\", \"EchoSphere\".";

pub fn user_list_prompt(count: usize, existing: &[String]) -> String {
    format!(
        "Generate {} unique virtual user profiles for an IRC simulation.\n\
         Each user must have a unique nickname that is not in this list: [{}].\n\
         Provide detailed and creative personalities.\n\
         Ensure the output is a valid JSON array where each object matches the provided schema.\n\
         Do not include markdown backticks in the response. Just the raw JSON.",
        count,
        existing.join(", ")
    )
}

fn labels<T: Copy>(all: &[T], label: fn(T) -> &'static str) -> Vec<&'static str> {
    all.iter().map(|v| label(*v)).collect()
}

/// Response schema for one user, in the provider's schema dialect.
pub fn user_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "nickname": {
                "type": "STRING",
                "description": "A creative and unique nickname. Should not contain spaces or special characters other than underscores or hyphens."
            },
            "personality": {
                "type": "STRING",
                "description": "A detailed description of the user's personality, quirks, and interests. Should be 2-3 sentences long."
            },
            "languageSkills": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": {
                        "language": { "type": "STRING", "description": "A language the user speaks." },
                        "fluency": {
                            "type": "STRING",
                            "enum": labels(Fluency::ALL, Fluency::label),
                            "description": "The user's fluency level in this language."
                        },
                        "accent": {
                            "type": "STRING",
                            "description": "An optional accent or dialect. e.g., \"British\", \"Southern American\"."
                        }
                    },
                    "required": ["language", "fluency"]
                }
            },
            "writingStyle": {
                "type": "OBJECT",
                "properties": {
                    "formality": { "type": "STRING", "enum": labels(Formality::ALL, Formality::label) },
                    "verbosity": { "type": "STRING", "enum": labels(Verbosity::ALL, Verbosity::label) },
                    "humor": { "type": "STRING", "enum": labels(Humor::ALL, Humor::label) },
                    "emojiUsage": { "type": "STRING", "enum": labels(EmojiUsage::ALL, EmojiUsage::label) },
                    "punctuation": { "type": "STRING", "enum": labels(Punctuation::ALL, Punctuation::label) }
                },
                "required": ["formality", "verbosity", "humor", "emojiUsage", "punctuation"]
            }
        },
        "required": ["nickname", "personality", "languageSkills", "writingStyle"]
    })
}

pub fn user_list_schema() -> Value {
    json!({ "type": "ARRAY", "items": user_schema() })
}

/// Reads the structured response as candidates. An unreadable answer is
/// reported as malformed, which the retry policy treats as transient.
pub fn parse_drafts(response: Value) -> Result<Vec<UserDraft>, ServiceError> {
    serde_json::from_value(response).map_err(|e| ServiceError::Malformed(e.to_string()))
}

/// Sanitizes every nickname and makes it unique against `existing` and the
/// candidates before it. Collisions get `_NN` appended until free; a nickname
/// with nothing usable left is replaced by a random one.
pub fn finalize_nicknames<R: Rng + ?Sized>(
    drafts: Vec<UserDraft>,
    existing: &[String],
    rng: &mut R,
) -> Vec<UserDraft> {
    let mut used: HashSet<String> = existing.iter().cloned().collect();

    drafts
        .into_iter()
        .map(|mut draft| {
            let mut nickname = sanitize_nickname(&draft.nickname);
            if nickname.is_empty() {
                nickname = random_nickname(rng);
            }
            while used.contains(&nickname) {
                nickname = format!("{}_{}", nickname, rng.random_range(0..100));
            }
            used.insert(nickname.clone());
            draft.nickname = nickname;
            draft
        })
        .collect()
}
