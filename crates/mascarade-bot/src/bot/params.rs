use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    #[error("bot parameter '{field}' must lie in [0, 1], got {value}")]
    OutOfRange { field: &'static str, value: f64 },
}

/// Tunables shared by the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BotParams {
    /// Probability this bot assigns to a swap it did not perform being genuine.
    pub swap_confidence: f64,
    /// Chance of a fake swap or a bluffed announcement.
    pub bluff_rate: f64,
    /// Own-card certainty needed before announcing it.
    pub announce_threshold: f64,
    /// Challenge an announcement believed less likely than this.
    pub challenge_threshold: f64,
    pub seed: u64,
}

impl Default for BotParams {
    fn default() -> Self {
        Self {
            swap_confidence: 0.5,
            bluff_rate: 0.3,
            announce_threshold: 0.8,
            challenge_threshold: 0.3,
            seed: 0,
        }
    }
}

impl BotParams {
    pub fn from_env() -> Self {
        Self::from_reader(|key| std::env::var(key).ok())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn validate(&self) -> Result<(), ParamsError> {
        let fields = [
            ("swap_confidence", self.swap_confidence),
            ("bluff_rate", self.bluff_rate),
            ("announce_threshold", self.announce_threshold),
            ("challenge_threshold", self.challenge_threshold),
        ];
        for (field, value) in fields {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ParamsError::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    fn from_reader<F>(mut read: F) -> Self
    where
        F: FnMut(&str) -> Option<String>,
    {
        let base = Self::default();
        let mut unit = |key: &str, fallback: f64| {
            read(key)
                .and_then(|raw| raw.trim().parse::<f64>().ok())
                .filter(|value| value.is_finite() && (0.0..=1.0).contains(value))
                .unwrap_or(fallback)
        };
        let swap_confidence = unit("MASC_BOT_SWAP_CONFIDENCE", base.swap_confidence);
        let bluff_rate = unit("MASC_BOT_BLUFF_RATE", base.bluff_rate);
        let announce_threshold = unit("MASC_BOT_ANNOUNCE_THRESHOLD", base.announce_threshold);
        let challenge_threshold = unit("MASC_BOT_CHALLENGE_THRESHOLD", base.challenge_threshold);
        let seed = read("MASC_BOT_SEED")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .unwrap_or(base.seed);

        Self {
            swap_confidence,
            bluff_rate,
            announce_threshold,
            challenge_threshold,
            seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn reader_overrides_and_ignores_garbage() {
        let env: HashMap<&str, &str> = HashMap::from([
            ("MASC_BOT_SWAP_CONFIDENCE", "0.9"),
            ("MASC_BOT_BLUFF_RATE", "1.7"),
            ("MASC_BOT_SEED", " 42 "),
        ]);
        let params = BotParams::from_reader(|key| env.get(key).map(|raw| raw.to_string()));
        assert_eq!(params.swap_confidence, 0.9);
        assert_eq!(params.bluff_rate, 0.3);
        assert_eq!(params.seed, 42);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn validate_names_the_offending_field() {
        let params = BotParams {
            challenge_threshold: -0.1,
            ..BotParams::default()
        };
        assert_eq!(
            params.validate(),
            Err(ParamsError::OutOfRange {
                field: "challenge_threshold",
                value: -0.1
            })
        );
    }
}
