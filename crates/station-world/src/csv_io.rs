//! Denormalized CSV: one row per (user, language skill).
//!
//! A user without skills still gets one row, with the skill columns empty.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use station_types::{LanguageSkill, User, WritingStyle};

use crate::error::{ExportError, ImportError};

pub const CSV_HEADERS: [&str; 11] = [
    "id",
    "nickname",
    "personality",
    "language",
    "fluency",
    "accent",
    "formality",
    "verbosity",
    "humor",
    "emojiUsage",
    "punctuation",
];

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CsvRow {
    id: String,
    nickname: String,
    personality: String,
    language: String,
    fluency: String,
    accent: String,
    formality: String,
    verbosity: String,
    humor: String,
    emoji_usage: String,
    punctuation: String,
}

impl CsvRow {
    fn new(user: &User, skill: Option<&LanguageSkill>) -> Self {
        let style = &user.writing_style;
        Self {
            id: user.id.clone(),
            nickname: user.nickname.clone(),
            personality: user.personality.clone(),
            language: skill.map(|s| s.language.clone()).unwrap_or_default(),
            fluency: skill.map(|s| s.fluency.to_string()).unwrap_or_default(),
            accent: skill.map(|s| s.accent.clone()).unwrap_or_default(),
            formality: style.formality.to_string(),
            verbosity: style.verbosity.to_string(),
            humor: style.humor.to_string(),
            emoji_usage: style.emoji_usage.to_string(),
            punctuation: style.punctuation.to_string(),
        }
    }

    fn skill(&self, line: usize) -> Result<Option<LanguageSkill>, ImportError> {
        if self.language.is_empty() && self.fluency.is_empty() && self.accent.is_empty() {
            return Ok(None);
        }
        Ok(Some(LanguageSkill {
            language: self.language.clone(),
            fluency: parse_cell(&self.fluency, LanguageSkill::default().fluency, line)?,
            accent: self.accent.clone(),
        }))
    }

    fn writing_style(&self, line: usize) -> Result<WritingStyle, ImportError> {
        let default = WritingStyle::default();
        Ok(WritingStyle {
            formality: parse_cell(&self.formality, default.formality, line)?,
            verbosity: parse_cell(&self.verbosity, default.verbosity, line)?,
            humor: parse_cell(&self.humor, default.humor, line)?,
            emoji_usage: parse_cell(&self.emoji_usage, default.emoji_usage, line)?,
            punctuation: parse_cell(&self.punctuation, default.punctuation, line)?,
        })
    }
}

/// Empty cells take the default value.
fn parse_cell<T>(cell: &str, default: T, line: usize) -> Result<T, ImportError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    if cell.is_empty() {
        return Ok(default);
    }
    cell.parse().map_err(|e| invalid_row(line, e))
}

fn invalid_row(line: usize, reason: impl fmt::Display) -> ImportError {
    ImportError::Invalid(format!("CSV line {}: {}", line, reason))
}

/// Every field is quoted; embedded quotes are doubled.
pub fn users_to_csv(users: &[User]) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(CSV_HEADERS)?;
    for user in users {
        if user.language_skills.is_empty() {
            writer.serialize(CsvRow::new(user, None))?;
        }
        for skill in &user.language_skills {
            writer.serialize(CsvRow::new(user, Some(skill)))?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Regroups rows by `id`, in order of first appearance.
///
/// Skills follow row order. Nickname, personality and writing style come from
/// the first row of each id; later rows only contribute their skill.
pub fn parse_users_csv(text: &str) -> Result<Vec<User>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut users: Vec<User> = Vec::new();
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut rows = 0usize;

    for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
        // Header is line 1.
        let line = index + 2;
        let row = result.map_err(|e| invalid_row(line, e))?;
        rows += 1;

        if row.id.is_empty() || row.nickname.is_empty() {
            return Err(ImportError::Invalid(
                "CSV file is missing required fields (id, nickname).".into(),
            ));
        }

        let skill = row.skill(line)?;
        match by_id.get(&row.id) {
            Some(&pos) => users[pos].language_skills.extend(skill),
            None => {
                let writing_style = row.writing_style(line)?;
                by_id.insert(row.id.clone(), users.len());
                users.push(User {
                    id: row.id,
                    nickname: row.nickname,
                    personality: row.personality,
                    language_skills: skill.into_iter().collect(),
                    writing_style,
                });
            }
        }
    }

    if rows == 0 {
        return Err(ImportError::Invalid(
            "CSV file is empty or contains only a header.".into(),
        ));
    }

    Ok(users)
}
