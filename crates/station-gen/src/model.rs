use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cost {
    Low,
    High,
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Cost::Low => "Low",
            Cost::High => "High",
        })
    }
}

/// Gemini models the AI strategy can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AiModel {
    #[default]
    Gemini25Flash,
    GeminiFlashLatest,
    Gemini25Pro,
}

impl AiModel {
    pub const ALL: [AiModel; 3] = [
        AiModel::Gemini25Flash,
        AiModel::GeminiFlashLatest,
        AiModel::Gemini25Pro,
    ];

    /// Identifier sent to the API.
    pub fn id(self) -> &'static str {
        match self {
            AiModel::Gemini25Flash => "gemini-2.5-flash",
            AiModel::GeminiFlashLatest => "gemini-flash-latest",
            AiModel::Gemini25Pro => "gemini-2.5-pro",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            AiModel::Gemini25Flash => "Gemini 2.5 Flash",
            AiModel::GeminiFlashLatest => "Gemini Flash",
            AiModel::Gemini25Pro => "Gemini 2.5 Pro",
        }
    }

    pub fn cost(self) -> Cost {
        match self {
            AiModel::Gemini25Pro => Cost::High,
            _ => Cost::Low,
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            AiModel::Gemini25Flash => "Fastest, low cost",
            AiModel::GeminiFlashLatest => "Balanced speed & quality",
            AiModel::Gemini25Pro => "Highest quality",
        }
    }
}

impl fmt::Display for AiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AiModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AiModel::ALL
            .into_iter()
            .find(|model| model.id() == s)
            .ok_or_else(|| format!("unknown model '{}'", s))
    }
}
