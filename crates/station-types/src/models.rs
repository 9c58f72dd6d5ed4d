use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Returned when a label does not belong to a vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{value}' is not a valid {vocabulary}")]
pub struct UnknownLabel {
    pub vocabulary: &'static str,
    pub value: String,
}

/// Declares a fixed, ordered vocabulary whose wire form is its display label.
macro_rules! vocabulary {
    ($(#[$meta:meta])* $name:ident, $what:literal, default $default:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            /// All levels, in vocabulary order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn label(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = UnknownLabel;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($label => Ok($name::$variant),)+
                    _ => Err(UnknownLabel {
                        vocabulary: $what,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

vocabulary!(
    /// Command of a language, strongest first.
    Fluency, "fluency", default Native {
        Native => "Native",
        Fluent => "Fluent",
        Advanced => "Advanced",
        Intermediate => "Intermediate",
        Beginner => "Beginner",
    }
);

vocabulary!(Formality, "formality", default Neutral {
    VeryInformal => "Very Informal",
    Informal => "Informal",
    Neutral => "Neutral",
    Formal => "Formal",
    VeryFormal => "Very Formal",
});

vocabulary!(Verbosity, "verbosity", default Neutral {
    VeryTerse => "Very Terse",
    Terse => "Terse",
    Neutral => "Neutral",
    Verbose => "Verbose",
    VeryVerbose => "Very Verbose",
});

vocabulary!(Humor, "humor", default None {
    None => "None",
    Dry => "Dry",
    Sarcastic => "Sarcastic",
    Witty => "Witty",
    Slapstick => "Slapstick",
});

vocabulary!(EmojiUsage, "emoji usage", default Medium {
    None => "None",
    Low => "Low",
    Medium => "Medium",
    High => "High",
    Excessive => "Excessive",
});

vocabulary!(Punctuation, "punctuation", default Standard {
    Minimal => "Minimal",
    Standard => "Standard",
    Creative => "Creative",
    Excessive => "Excessive",
});

/// Reads `null` the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub language: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub fluency: Fluency,
    /// Empty means no particular accent.
    #[serde(default, deserialize_with = "null_as_default")]
    pub accent: String,
}

impl Default for LanguageSkill {
    fn default() -> Self {
        Self {
            language: "English".to_string(),
            fluency: Fluency::Native,
            accent: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WritingStyle {
    #[serde(deserialize_with = "null_as_default")]
    pub formality: Formality,
    #[serde(deserialize_with = "null_as_default")]
    pub verbosity: Verbosity,
    #[serde(deserialize_with = "null_as_default")]
    pub humor: Humor,
    #[serde(deserialize_with = "null_as_default")]
    pub emoji_usage: EmojiUsage,
    #[serde(deserialize_with = "null_as_default")]
    pub punctuation: Punctuation,
}

/// A user that has not been assigned an id yet: form input or a generated candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub nickname: String,
    #[serde(default)]
    pub personality: String,
    #[serde(default = "default_skills")]
    pub language_skills: Vec<LanguageSkill>,
    #[serde(default)]
    pub writing_style: WritingStyle,
}

impl UserDraft {
    pub fn new(nickname: impl Into<String>) -> Self {
        Self {
            nickname: nickname.into(),
            personality: String::new(),
            language_skills: default_skills(),
            writing_style: WritingStyle::default(),
        }
    }

    pub fn into_user(self, id: impl Into<String>) -> User {
        User {
            id: id.into(),
            nickname: self.nickname,
            personality: self.personality,
            language_skills: self.language_skills,
            writing_style: self.writing_style,
        }
    }
}

fn default_skills() -> Vec<LanguageSkill> {
    vec![LanguageSkill::default()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub nickname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub personality: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub language_skills: Vec<LanguageSkill>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub writing_style: WritingStyle,
}

impl User {
    pub fn into_draft(self) -> UserDraft {
        UserDraft {
            nickname: self.nickname,
            personality: self.personality,
            language_skills: self.language_skills,
            writing_style: self.writing_style,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub topic: String,
    /// Member user ids. Order carries no meaning.
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<String>,
}

impl Channel {
    pub fn has_member(&self, user_id: &str) -> bool {
        self.users.iter().any(|id| id == user_id)
    }
}

/// The full roster: every user and every channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    pub users: Vec<User>,
    pub channels: Vec<Channel>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_back() {
        for level in Formality::ALL {
            assert_eq!(level.label().parse::<Formality>().unwrap(), *level);
        }
        assert_eq!("Very Terse".parse::<Verbosity>().unwrap(), Verbosity::VeryTerse);
        assert!("very terse".parse::<Verbosity>().is_err());
    }

    #[test]
    fn fluency_is_ordered_strongest_first() {
        assert!(Fluency::Native < Fluency::Fluent);
        assert!(Fluency::Intermediate < Fluency::Beginner);
        assert_eq!(Fluency::ALL.len(), 5);
        assert_eq!(Punctuation::ALL.len(), 4);
    }

    #[test]
    fn user_uses_camel_case_wire_names() {
        let user = UserDraft::new("neo").into_user("1");
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["languageSkills"][0]["fluency"], "Native");
        assert_eq!(value["writingStyle"]["emojiUsage"], "Medium");
        assert_eq!(value["writingStyle"]["formality"], "Neutral");
    }

    #[test]
    fn minimal_user_takes_defaults() {
        let user: User = serde_json::from_str(r#"{"id":"7","nickname":"trinity"}"#).unwrap();
        assert_eq!(user.personality, "");
        assert!(user.language_skills.is_empty());
        assert_eq!(user.writing_style, WritingStyle::default());

        let channel: Channel = serde_json::from_str(r##"{"id":"c","name":"#zion"}"##).unwrap();
        assert_eq!(channel.topic, "");
        assert!(channel.users.is_empty());
    }

    #[test]
    fn partial_and_null_fields_take_defaults() {
        let user: User = serde_json::from_str(
            r#"{
                "id": "7",
                "nickname": "trinity",
                "personality": null,
                "languageSkills": [{"language": "Finnish"}, {"language": "Greek", "fluency": null}],
                "writingStyle": {"formality": "Formal", "humor": null}
            }"#,
        )
        .unwrap();
        assert_eq!(user.personality, "");
        assert!(user.language_skills.iter().all(|s| s.fluency == Fluency::Native));
        assert_eq!(user.writing_style, WritingStyle {
            formality: Formality::Formal,
            ..WritingStyle::default()
        });

        let user: User =
            serde_json::from_str(r#"{"id":"7","nickname":"trinity","writingStyle":null}"#).unwrap();
        assert_eq!(user.writing_style, WritingStyle::default());
    }

    #[test]
    fn unknown_label_is_rejected() {
        let err = "Expert".parse::<Fluency>().unwrap_err();
        assert_eq!(err.to_string(), "'Expert' is not a valid fluency");
    }
}
