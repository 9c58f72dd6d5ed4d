use std::path::Path;

use station_types::{User, World};

use crate::csv_io::parse_users_csv;
use crate::error::ImportError;
use crate::json::parse_json;

/// Declared kind of an import file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Json,
    Csv,
}

impl ImportFormat {
    /// Picks the format from a file extension (`.json` or `.csv`).
    pub fn from_path(path: &Path) -> Result<Self, ImportError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(Self::Csv),
            _ => Err(ImportError::UnsupportedFormat(
                "Unsupported file type. Please use .json or .csv".into(),
            )),
        }
    }
}

/// A parsed import file, ready to be merged.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportPayload {
    World(World),
    Users(Vec<User>),
}

/// Parses raw file text in the declared format. Nothing is applied here, so a
/// failure can never leave a half-imported roster behind.
pub fn parse_import(text: &str, format: ImportFormat) -> Result<ImportPayload, ImportError> {
    match format {
        ImportFormat::Json => parse_json(text),
        ImportFormat::Csv => parse_users_csv(text).map(ImportPayload::Users),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_follows_extension() {
        assert_eq!(ImportFormat::from_path(Path::new("world.json")), Ok(ImportFormat::Json));
        assert_eq!(ImportFormat::from_path(Path::new("USERS.CSV")), Ok(ImportFormat::Csv));
        assert!(matches!(
            ImportFormat::from_path(Path::new("users.xlsx")),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(ImportFormat::from_path(Path::new("README")).is_err());
    }

    #[test]
    fn declared_format_wins_over_content() {
        let json_text = r#"[{"id": "1", "nickname": "neo"}]"#;
        assert!(parse_import(json_text, ImportFormat::Json).is_ok());
        assert!(parse_import(json_text, ImportFormat::Csv).is_err());
    }

    #[test]
    fn csv_yields_a_user_list() {
        let text = "id,nickname,formality,verbosity,humor,emojiUsage,punctuation\n1,neo,Neutral,Neutral,None,Medium,Standard\n";
        let payload = parse_import(text, ImportFormat::Csv).unwrap();
        assert!(matches!(payload, ImportPayload::Users(ref users) if users.len() == 1));
    }
}
