//! Configuration structures for training
//!
//! This module provides the training-run configuration: learning rate, epoch
//! count, and presentation-order settings, parsed from JSON files.

use serde::Deserialize;
use std::error::Error;
use std::fs;

/// Configuration for a training run.
///
/// # Example
///
/// ```json
/// {
///   "learning_rate": 0.01,
///   "epochs": 100,
///   "seed": 42,
///   "shuffle": true
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Step size for the gradient-descent weight updates.
    pub learning_rate: f64,

    /// Number of passes over the training set.
    pub epochs: usize,

    /// Seed for the instance-order shuffle (clock-seeded when absent).
    pub seed: Option<u64>,

    /// Whether to reshuffle the instance order every epoch (default true).
    pub shuffle: Option<bool>,
}

impl TrainingConfig {
    /// Create a configuration with the given rate and epoch count, a fixed
    /// seed of 0, and shuffling enabled.
    pub fn new(learning_rate: f64, epochs: usize) -> Self {
        Self {
            learning_rate,
            epochs,
            seed: Some(0),
            shuffle: Some(true),
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into a
/// `TrainingConfig`.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read or
/// the JSON is invalid.
///
/// # Examples
///
/// ```no_run
/// use layered_backprop::config::load_config;
///
/// let cfg = load_config("config/training.json").unwrap();
/// assert!(cfg.learning_rate > 0.0);
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig, Box<dyn Error>> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates a training configuration.
pub fn validate_config(config: &TrainingConfig) -> Result<(), Box<dyn Error>> {
    if !(config.learning_rate > 0.0) || !config.learning_rate.is_finite() {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "learning_rate must be positive and finite",
        )));
    }

    if config.epochs == 0 {
        return Err(Box::new(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            "epochs must be at least 1",
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes_validation() {
        let config = TrainingConfig::new(0.01, 100);
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_zero_learning_rate_rejected() {
        let mut config = TrainingConfig::new(0.0, 100);
        config.learning_rate = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_negative_learning_rate_rejected() {
        let config = TrainingConfig::new(-0.5, 100);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_zero_epochs_rejected() {
        let config = TrainingConfig::new(0.01, 0);
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_config_parses_from_json() {
        let json = r#"{ "learning_rate": 0.05, "epochs": 10, "seed": 7 }"#;
        let config: TrainingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.learning_rate, 0.05);
        assert_eq!(config.epochs, 10);
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.shuffle, None);
    }
}
