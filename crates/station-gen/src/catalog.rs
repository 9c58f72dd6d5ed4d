//! Fixed vocabularies the random and template strategies draw from.

use rand::Rng;

/// A named personality archetype.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonalityTemplate {
    pub name: &'static str,
    pub description: &'static str,
}

pub const PERSONALITY_TEMPLATES: [PersonalityTemplate; 8] = [
    PersonalityTemplate {
        name: "Chatterbox",
        description: "Loves to talk, often about trivial things. Very friendly and uses a lot of emojis.",
    },
    PersonalityTemplate {
        name: "Polite Academic",
        description: "Speaks formally, uses complex words, and enjoys discussing intellectual topics.",
    },
    PersonalityTemplate {
        name: "Sarcastic Gamer",
        description: "Cynical, witty, and fluent in internet slang and gaming memes.",
    },
    PersonalityTemplate {
        name: "Mysterious Cypher",
        description: "Posts cryptic messages, rarely reveals personal information, enjoys puzzles and code.",
    },
    PersonalityTemplate {
        name: "Supportive Friend",
        description: "Always encouraging, positive, and quick to offer help or a kind word.",
    },
    PersonalityTemplate {
        name: "Grumpy Old-Timer",
        description: "Complains about modern technology, reminisces about the 'good old days' of the internet.",
    },
    PersonalityTemplate {
        name: "Creative Artist",
        description: "Shares their art, poetry, or music. Expressive and often uses descriptive language.",
    },
    PersonalityTemplate {
        name: "News Junkie",
        description: "Constantly posts links to articles and wants to debate current events.",
    },
];

pub const LANGUAGES: [&str; 11] = [
    "Arabic",
    "English",
    "Finnish",
    "French",
    "German",
    "Hindi",
    "Japanese",
    "Mandarin",
    "Portuguese",
    "Russian",
    "Spanish",
];

pub const NICK_ADJECTIVES: [&str; 6] = ["Cool", "Silly", "Clever", "Lazy", "Happy", "Angry"];
pub const NICK_NOUNS: [&str; 6] = ["Cat", "Dog", "Coder", "Ghost", "Ninja", "Rider"];

/// Uniform pick from a non-empty slice.
pub(crate) fn pick<'a, T, R: Rng + ?Sized>(rng: &mut R, items: &'a [T]) -> &'a T {
    &items[rng.random_range(0..items.len())]
}
