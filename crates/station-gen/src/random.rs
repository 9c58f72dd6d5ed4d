use std::collections::HashSet;

use rand::Rng;
use station_types::{
    EmojiUsage, Fluency, Formality, Humor, LanguageSkill, Punctuation, UserDraft, Verbosity,
    WritingStyle,
};
use tracing::debug;

use crate::GenerationError;
use crate::catalog::{LANGUAGES, NICK_ADJECTIVES, NICK_NOUNS, PERSONALITY_TEMPLATES, pick};

/// Upper bound on nickname draws before giving up.
pub const MAX_NICKNAME_DRAWS: usize = 10_000;

/// Adjective + noun + a number in 100..=999, e.g. `CleverGhost417`.
pub fn random_nickname<R: Rng + ?Sized>(rng: &mut R) -> String {
    format!(
        "{}{}{}",
        pick(rng, &NICK_ADJECTIVES),
        pick(rng, &NICK_NOUNS),
        rng.random_range(100..=999)
    )
}

/// Draws nicknames until one is not in `taken`.
pub fn unused_nickname<R: Rng + ?Sized>(
    rng: &mut R,
    taken: &[String],
) -> Result<String, GenerationError> {
    let taken: HashSet<&str> = taken.iter().map(String::as_str).collect();
    for _ in 0..MAX_NICKNAME_DRAWS {
        let nickname = random_nickname(rng);
        if !taken.contains(nickname.as_str()) {
            return Ok(nickname);
        }
    }
    Err(GenerationError::NicknamesExhausted(MAX_NICKNAME_DRAWS))
}

pub fn random_writing_style<R: Rng + ?Sized>(rng: &mut R) -> WritingStyle {
    WritingStyle {
        formality: *pick(rng, Formality::ALL),
        verbosity: *pick(rng, Verbosity::ALL),
        humor: *pick(rng, Humor::ALL),
        emoji_usage: *pick(rng, EmojiUsage::ALL),
        punctuation: *pick(rng, Punctuation::ALL),
    }
}

/// A fully random candidate whose nickname avoids `existing`.
pub fn random_draft<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &[String],
) -> Result<UserDraft, GenerationError> {
    let nickname = unused_nickname(rng, existing)?;
    let template = pick(rng, &PERSONALITY_TEMPLATES);
    Ok(UserDraft {
        nickname,
        personality: template.description.to_string(),
        language_skills: vec![LanguageSkill {
            language: pick(rng, &LANGUAGES).to_string(),
            fluency: *pick(rng, Fluency::ALL),
            accent: String::new(),
        }],
        writing_style: random_writing_style(rng),
    })
}

/// A random candidate whose personality is re-drawn from the archetypes.
pub fn template_draft<R: Rng + ?Sized>(
    rng: &mut R,
    existing: &[String],
) -> Result<UserDraft, GenerationError> {
    let mut draft = random_draft(rng, existing)?;
    let template = pick(rng, &PERSONALITY_TEMPLATES);
    debug!(nickname = %draft.nickname, archetype = template.name, "Applied personality template");
    draft.personality = template.description.to_string();
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn nickname_follows_the_pattern() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..200 {
            let nick = random_nickname(&mut rng);
            let adjective = NICK_ADJECTIVES.iter().find(|a| nick.starts_with(*a)).unwrap();
            let rest = &nick[adjective.len()..];
            let noun = NICK_NOUNS.iter().find(|n| rest.starts_with(*n)).unwrap();
            let number: u32 = rest[noun.len()..].parse().unwrap();
            assert!((100..=999).contains(&number));
        }
    }

    #[test]
    fn existing_nicknames_are_avoided() {
        let mut rng = StdRng::seed_from_u64(7);
        let first = random_nickname(&mut StdRng::seed_from_u64(7));
        let nick = unused_nickname(&mut rng, &[first.clone()]).unwrap();
        assert_ne!(nick, first);
    }

    #[test]
    fn exhausted_pool_is_an_error() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut every = Vec::new();
        for a in NICK_ADJECTIVES {
            for n in NICK_NOUNS {
                for i in 100..=999 {
                    every.push(format!("{}{}{}", a, n, i));
                }
            }
        }
        assert_eq!(
            unused_nickname(&mut rng, &every),
            Err(GenerationError::NicknamesExhausted(MAX_NICKNAME_DRAWS))
        );
    }

    #[test]
    fn random_draft_has_one_skill_and_an_archetype() {
        let mut rng = StdRng::seed_from_u64(3);
        let draft = random_draft(&mut rng, &[]).unwrap();

        assert_eq!(draft.language_skills.len(), 1);
        assert!(draft.language_skills[0].accent.is_empty());
        assert!(LANGUAGES.contains(&draft.language_skills[0].language.as_str()));
        assert!(
            PERSONALITY_TEMPLATES
                .iter()
                .any(|t| t.description == draft.personality)
        );
    }
}
