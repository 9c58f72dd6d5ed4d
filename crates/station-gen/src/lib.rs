//! Candidate user generation: random, archetype-based, or AI-backed.
//!
//! Generation only produces [`UserDraft`]s. Assigning ids and saving them is
//! left to the caller.

pub mod ai;
pub mod catalog;
pub mod gemini;
pub mod model;
pub mod random;
pub mod retry;
pub mod sanitize;
pub mod service;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use station_types::UserDraft;
use thiserror::Error;
use tracing::{info, warn};

pub use gemini::GeminiClient;
pub use model::{AiModel, Cost};
pub use retry::RetryPolicy;
pub use service::{GenerativeService, ServiceError};

/// Largest batch a single request may ask for.
pub const MAX_BATCH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Could not find an unused nickname after {0} attempts")]
    NicknamesExhausted(usize),

    #[error("AI generation is unavailable: no API key configured (set GEMINI_API_KEY)")]
    NoService,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Random,
    Template,
    Ai,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Random, Strategy::Template, Strategy::Ai];

    pub fn name(self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Template => "template",
            Strategy::Ai => "ai",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.name() == s.to_ascii_lowercase())
            .ok_or_else(|| format!("unknown strategy '{}' (expected random, template or ai)", s))
    }
}

pub struct Generator {
    service: Option<Arc<dyn GenerativeService>>,
    retry: RetryPolicy,
    rng: StdRng,
}

impl Generator {
    /// `service` backs the AI strategy and nickname suggestions. Without one,
    /// AI generation fails and nicknames are drawn at random.
    pub fn new(service: Option<Arc<dyn GenerativeService>>) -> Self {
        Self {
            service,
            retry: RetryPolicy::default(),
            rng: StdRng::from_os_rng(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    /// Produces `count` candidates whose nicknames avoid `existing`.
    ///
    /// Random and template candidates are only checked against `existing`,
    /// not against each other. AI candidates are unique among themselves too.
    pub async fn generate(
        &mut self,
        count: usize,
        strategy: Strategy,
        existing: &[String],
    ) -> Result<Vec<UserDraft>, GenerationError> {
        let drafts = match strategy {
            Strategy::Random => (0..count)
                .map(|_| random::random_draft(&mut self.rng, existing))
                .collect::<Result<Vec<_>, _>>()?,
            Strategy::Template => (0..count)
                .map(|_| random::template_draft(&mut self.rng, existing))
                .collect::<Result<Vec<_>, _>>()?,
            Strategy::Ai => self.generate_with_ai(count, existing).await?,
        };
        info!("Generated {} candidates using the {} strategy", drafts.len(), strategy);
        Ok(drafts)
    }

    async fn generate_with_ai(
        &mut self,
        count: usize,
        existing: &[String],
    ) -> Result<Vec<UserDraft>, GenerationError> {
        let service = self.service.clone().ok_or(GenerationError::NoService)?;
        let prompt = ai::user_list_prompt(count, existing);
        let schema = ai::user_list_schema();

        let drafts = self
            .retry
            .run("generate users", || {
                let service = Arc::clone(&service);
                let prompt = prompt.as_str();
                let schema = &schema;
                async move {
                    let response = service.generate_structured(prompt, schema).await?;
                    ai::parse_drafts(response)
                }
            })
            .await?;

        Ok(ai::finalize_nicknames(drafts, existing, &mut self.rng))
    }

    /// Asks the service for one nickname. Any failure, or an answer with
    /// nothing usable in it, falls back to a random nickname.
    pub async fn generate_nickname(&mut self) -> String {
        let Some(service) = self.service.clone() else {
            return random::random_nickname(&mut self.rng);
        };

        let answer = self
            .retry
            .run("generate nickname", || {
                let service = Arc::clone(&service);
                async move { service.generate_text(ai::NICKNAME_PROMPT).await }
            })
            .await;

        match answer {
            Ok(text) => {
                let nickname = sanitize::sanitize_nickname(text.trim());
                if nickname.is_empty() {
                    random::random_nickname(&mut self.rng)
                } else {
                    nickname
                }
            }
            Err(e) => {
                warn!("AI nickname generation failed, falling back to random: {}", e);
                random::random_nickname(&mut self.rng)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategy_names_parse() {
        assert_eq!("random".parse::<Strategy>(), Ok(Strategy::Random));
        assert_eq!("AI".parse::<Strategy>(), Ok(Strategy::Ai));
        assert!("magic".parse::<Strategy>().is_err());
    }

    #[tokio::test]
    async fn random_batch_has_distinct_nicknames() {
        let mut generator = Generator::new(None).with_rng(StdRng::seed_from_u64(11));
        let drafts = generator.generate(3, Strategy::Random, &[]).await.unwrap();

        assert_eq!(drafts.len(), 3);
        assert_ne!(drafts[0].nickname, drafts[1].nickname);
        assert_ne!(drafts[1].nickname, drafts[2].nickname);
        assert_ne!(drafts[0].nickname, drafts[2].nickname);
    }

    #[tokio::test]
    async fn ai_without_service_is_a_configuration_error() {
        let mut generator = Generator::new(None);
        let result = generator.generate(2, Strategy::Ai, &[]).await;
        assert_eq!(result, Err(GenerationError::NoService));

        let drafts = generator.generate(2, Strategy::Template, &[]).await.unwrap();
        assert_eq!(drafts.len(), 2);
    }

    #[tokio::test]
    async fn nickname_without_service_is_random() {
        let mut generator = Generator::new(None);
        let nick = generator.generate_nickname().await;
        assert!(nick.len() >= "CatDog100".len());
    }
}
