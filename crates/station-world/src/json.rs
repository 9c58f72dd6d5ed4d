use rand::Rng;
use serde_json::Value;
use station_types::export::{PRESENCE_INTERVAL_MAX, PRESENCE_INTERVAL_MIN, SimulatorUser};
use station_types::{Channel, User, World};

use crate::error::ImportError;
use crate::import::ImportPayload;

pub fn world_to_json(users: &[User], channels: &[Channel]) -> serde_json::Result<String> {
    #[derive(serde::Serialize)]
    struct WorldRef<'a> {
        users: &'a [User],
        channels: &'a [Channel],
    }

    serde_json::to_string_pretty(&WorldRef { users, channels })
}

pub fn users_to_json(users: &[User]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(users)
}

pub fn channels_to_json(channels: &[Channel]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(channels)
}

/// User array for the simulator, each entry enriched with a system prompt,
/// `enabled: true` and a random presence interval.
pub fn simulator_users_to_json<R: Rng + ?Sized>(
    users: &[User],
    rng: &mut R,
) -> serde_json::Result<String> {
    let exported: Vec<SimulatorUser<'_>> = users
        .iter()
        .map(|user| {
            let interval = rng.random_range(PRESENCE_INTERVAL_MIN..=PRESENCE_INTERVAL_MAX);
            SimulatorUser::new(user, interval)
        })
        .collect();
    serde_json::to_string_pretty(&exported)
}

/// Reads either a world object or a plain user array.
pub fn parse_json(text: &str) -> Result<ImportPayload, ImportError> {
    let data: Value = serde_json::from_str(text)
        .map_err(|e| ImportError::Invalid(format!("Invalid JSON: {}", e)))?;

    let is_world = data.as_object().is_some_and(|map| {
        map.get("users").is_some_and(Value::is_array)
            && map.get("channels").is_some_and(Value::is_array)
    });

    if is_world {
        let users_ok = all_have(&data["users"], &["id", "nickname"]);
        let channels_ok = all_have(&data["channels"], &["id", "name"]);
        if !users_ok || !channels_ok {
            return Err(ImportError::Invalid(
                "Invalid world file. Users or channels are missing required fields.".into(),
            ));
        }
        let world: World = serde_json::from_value(data)
            .map_err(|e| ImportError::Invalid(format!("Invalid world file: {}", e)))?;
        Ok(ImportPayload::World(world))
    } else if data.is_array() {
        if !all_have(&data, &["id", "nickname"]) {
            return Err(ImportError::Invalid(
                "Invalid user file. Users are missing required fields.".into(),
            ));
        }
        let users: Vec<User> = serde_json::from_value(data)
            .map_err(|e| ImportError::Invalid(format!("Invalid user file: {}", e)))?;
        Ok(ImportPayload::Users(users))
    } else {
        Err(ImportError::UnsupportedFormat(
            "Unsupported JSON structure. Expected a world object or a user array.".into(),
        ))
    }
}

/// True when every element is an object carrying each field as a non-empty string.
fn all_have(array: &Value, fields: &[&str]) -> bool {
    array.as_array().is_some_and(|items| {
        items.iter().all(|item| {
            fields
                .iter()
                .all(|f| item.get(f).and_then(Value::as_str).is_some_and(|s| !s.is_empty()))
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use station_types::{EmojiUsage, Fluency, Formality, LanguageSkill, UserDraft};

    #[test]
    fn world_object_is_detected() {
        let text = r##"{
            "users": [{"id": "1", "nickname": "neo"}],
            "channels": [{"id": "c1", "name": "#matrix", "topic": "red pill", "users": ["1"]}]
        }"##;

        let ImportPayload::World(world) = parse_json(text).unwrap() else {
            panic!("expected a world");
        };
        assert_eq!(world.users[0].nickname, "neo");
        assert_eq!(world.channels[0].users, vec!["1".to_string()]);
    }

    #[test]
    fn bare_array_is_a_user_list() {
        let payload = parse_json(r#"[{"id": "1", "nickname": "neo", "enabled": true}]"#).unwrap();
        assert!(matches!(payload, ImportPayload::Users(ref users) if users.len() == 1));
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let err = parse_json(r##"{"users": [{"id": "1"}], "channels": []}"##).unwrap_err();
        assert_eq!(
            err,
            ImportError::Invalid("Invalid world file. Users or channels are missing required fields.".into())
        );

        let err = parse_json(r##"{"users": [], "channels": [{"id": "", "name": "#x"}]}"##).unwrap_err();
        assert!(matches!(err, ImportError::Invalid(_)));

        let err = parse_json(r#"[{"id": "1", "nickname": ""}]"#).unwrap_err();
        assert_eq!(
            err,
            ImportError::Invalid("Invalid user file. Users are missing required fields.".into())
        );
    }

    #[test]
    fn missing_fields_take_defaults() {
        let text = r#"[
            {"id": "1", "nickname": "neo", "writingStyle": {"formality": "Formal"}},
            {"id": "2", "nickname": "trinity", "personality": null,
             "languageSkills": [{"language": "Finnish"}], "writingStyle": null}
        ]"#;

        let ImportPayload::Users(users) = parse_json(text).unwrap() else {
            panic!("expected users");
        };
        assert_eq!(users[0].writing_style.formality, Formality::Formal);
        assert_eq!(users[0].writing_style.emoji_usage, EmojiUsage::Medium);
        assert_eq!(users[1], User {
            language_skills: vec![LanguageSkill {
                language: "Finnish".into(),
                fluency: Fluency::Native,
                accent: String::new(),
            }],
            ..UserDraft::new("trinity").into_user("2")
        });
    }

    #[test]
    fn other_shapes_are_unsupported() {
        for text in [r#"{"users": []}"#, r#""hello""#, "42"] {
            assert!(matches!(parse_json(text), Err(ImportError::UnsupportedFormat(_))));
        }
        assert!(matches!(parse_json("{not json"), Err(ImportError::Invalid(_))));
    }

    #[test]
    fn bad_vocabulary_is_a_validation_error() {
        let text = r#"[{"id": "1", "nickname": "neo", "languageSkills": [{"language": "English", "fluency": "Expert"}]}]"#;
        assert!(matches!(parse_json(text), Err(ImportError::Invalid(_))));
    }

    #[test]
    fn simulator_export_stays_importable() {
        let users = vec![UserDraft::new("neo").into_user("1")];
        let mut rng = StdRng::seed_from_u64(7);
        let text = simulator_users_to_json(&users, &mut rng).unwrap();

        let raw: Value = serde_json::from_str(&text).unwrap();
        let interval = raw[0]["presence_interval"].as_u64().unwrap();
        assert!((120..=600).contains(&interval));
        assert_eq!(raw[0]["enabled"], true);

        let ImportPayload::Users(back) = parse_json(&text).unwrap() else {
            panic!("expected users");
        };
        assert_eq!(back, users);
    }
}
