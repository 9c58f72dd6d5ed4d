pub mod export;
pub mod models;
pub mod validation;

pub use models::{
    Channel, EmojiUsage, Fluency, Formality, Humor, LanguageSkill, Punctuation, UnknownLabel, User,
    UserDraft, Verbosity, World, WritingStyle,
};
