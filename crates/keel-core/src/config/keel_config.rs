//! Top-level Keel configuration with layered resolution.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ConfidenceConfig, HealthConfig, RiskConfig, StabilityConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`KEEL_*`)
/// 2. Project config (`keel.toml` in project root)
/// 3. User config (`~/.keel/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeelConfig {
    pub confidence: ConfidenceConfig,
    pub stability: StabilityConfig,
    pub health: HealthConfig,
    pub risk: RiskConfig,
}

impl KeelConfig {
    /// Load configuration for the project rooted at `root`.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 3 (lowest priority): user config. Only a parse error is fatal.
        if let Some(user_config_path) = user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 2: project config
        let project_config_path = root.join("keel.toml");
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 1 (highest priority): environment variables
        Self::apply_env_overrides(&mut config);

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string (for testing).
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: KeelConfig = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &KeelConfig) -> Result<(), ConfigError> {
        if let Some(level) = config.confidence.credible_level {
            if !(level > 0.0 && level < 1.0) {
                return Err(invalid("confidence.credible_level", "must be strictly between 0.0 and 1.0"));
            }
        }

        for (field, value) in [
            ("confidence.self_weight", config.confidence.self_weight),
            ("confidence.low_mean_threshold", config.confidence.low_mean_threshold),
            ("confidence.low_uncertainty_variance", config.confidence.low_uncertainty_variance),
            (
                "confidence.moderate_uncertainty_variance",
                config.confidence.moderate_uncertainty_variance,
            ),
            ("confidence.high_uncertainty_variance", config.confidence.high_uncertainty_variance),
            ("stability.structural_weight", config.stability.structural_weight),
            ("stability.volatile_threshold", config.stability.volatile_threshold),
            ("stability.stable_threshold", config.stability.stable_threshold),
            ("risk.propagation_weight", config.risk.propagation_weight),
            ("risk.contribution_threshold", config.risk.contribution_threshold),
        ] {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    return Err(invalid(field, "must be between 0.0 and 1.0"));
                }
            }
        }

        if config.stability.effective_stable_threshold()
            > config.stability.effective_volatile_threshold()
        {
            return Err(invalid(
                "stability.stable_threshold",
                "must not exceed stability.volatile_threshold",
            ));
        }

        let health = &config.health;
        let weights = [
            ("health.structural_weight", health.effective_structural_weight()),
            ("health.confidence_weight", health.effective_confidence_weight()),
            ("health.stability_weight", health.effective_stability_weight()),
            ("health.coupling_weight", health.effective_coupling_weight()),
        ];
        for (field, w) in weights {
            if !w.is_finite() || w < 0.0 {
                return Err(invalid(field, "must be a non-negative number"));
            }
        }
        if weights.iter().map(|(_, w)| w).sum::<f64>() <= 0.0 {
            return Err(invalid("health", "sub-score weights must not all be zero"));
        }
        if let Some(floor) = health.critical_floor {
            if !(0.0..=100.0).contains(&floor) {
                return Err(invalid("health.critical_floor", "must be between 0 and 100"));
            }
        }
        if let Some(threshold) = health.coupling_threshold {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(invalid("health.coupling_threshold", "must be a non-negative number"));
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut KeelConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: KeelConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins only where it has a `Some` value.
    fn merge(base: &mut KeelConfig, other: &KeelConfig) {
        fn take<T: Clone>(base: &mut Option<T>, other: &Option<T>) {
            if other.is_some() {
                *base = other.clone();
            }
        }

        // Confidence
        take(&mut base.confidence.credible_level, &other.confidence.credible_level);
        take(&mut base.confidence.self_weight, &other.confidence.self_weight);
        take(
            &mut base.confidence.minimal_data_threshold,
            &other.confidence.minimal_data_threshold,
        );
        take(&mut base.confidence.low_mean_threshold, &other.confidence.low_mean_threshold);
        take(
            &mut base.confidence.low_uncertainty_observations,
            &other.confidence.low_uncertainty_observations,
        );
        take(
            &mut base.confidence.low_uncertainty_variance,
            &other.confidence.low_uncertainty_variance,
        );
        take(
            &mut base.confidence.moderate_uncertainty_observations,
            &other.confidence.moderate_uncertainty_observations,
        );
        take(
            &mut base.confidence.moderate_uncertainty_variance,
            &other.confidence.moderate_uncertainty_variance,
        );
        take(
            &mut base.confidence.high_uncertainty_observations,
            &other.confidence.high_uncertainty_observations,
        );
        take(
            &mut base.confidence.high_uncertainty_variance,
            &other.confidence.high_uncertainty_variance,
        );

        // Stability
        take(&mut base.stability.volatile_threshold, &other.stability.volatile_threshold);
        take(&mut base.stability.stable_threshold, &other.stability.stable_threshold);
        take(&mut base.stability.structural_weight, &other.stability.structural_weight);

        // Health
        take(&mut base.health.structural_weight, &other.health.structural_weight);
        take(&mut base.health.confidence_weight, &other.health.confidence_weight);
        take(&mut base.health.stability_weight, &other.health.stability_weight);
        take(&mut base.health.coupling_weight, &other.health.coupling_weight);
        take(&mut base.health.critical_floor, &other.health.critical_floor);
        take(&mut base.health.coupling_threshold, &other.health.coupling_threshold);
        take(
            &mut base.health.extreme_coupling_degree,
            &other.health.extreme_coupling_degree,
        );

        // Risk
        take(&mut base.risk.propagation_weight, &other.risk.propagation_weight);
        take(&mut base.risk.contribution_threshold, &other.risk.contribution_threshold);
    }

    /// Apply environment variable overrides. Every field has one, named
    /// `KEEL_<SECTION>_<FIELD>` (e.g. `KEEL_CONFIDENCE_SELF_WEIGHT`).
    /// Values that fail to parse are ignored.
    fn apply_env_overrides(config: &mut KeelConfig) {
        let c = &mut config.confidence;
        env_override("KEEL_CONFIDENCE_CREDIBLE_LEVEL", &mut c.credible_level);
        env_override("KEEL_CONFIDENCE_SELF_WEIGHT", &mut c.self_weight);
        env_override("KEEL_CONFIDENCE_MINIMAL_DATA_THRESHOLD", &mut c.minimal_data_threshold);
        env_override("KEEL_CONFIDENCE_LOW_MEAN_THRESHOLD", &mut c.low_mean_threshold);
        env_override(
            "KEEL_CONFIDENCE_LOW_UNCERTAINTY_OBSERVATIONS",
            &mut c.low_uncertainty_observations,
        );
        env_override("KEEL_CONFIDENCE_LOW_UNCERTAINTY_VARIANCE", &mut c.low_uncertainty_variance);
        env_override(
            "KEEL_CONFIDENCE_MODERATE_UNCERTAINTY_OBSERVATIONS",
            &mut c.moderate_uncertainty_observations,
        );
        env_override(
            "KEEL_CONFIDENCE_MODERATE_UNCERTAINTY_VARIANCE",
            &mut c.moderate_uncertainty_variance,
        );
        env_override(
            "KEEL_CONFIDENCE_HIGH_UNCERTAINTY_OBSERVATIONS",
            &mut c.high_uncertainty_observations,
        );
        env_override("KEEL_CONFIDENCE_HIGH_UNCERTAINTY_VARIANCE", &mut c.high_uncertainty_variance);

        let s = &mut config.stability;
        env_override("KEEL_STABILITY_VOLATILE_THRESHOLD", &mut s.volatile_threshold);
        env_override("KEEL_STABILITY_STABLE_THRESHOLD", &mut s.stable_threshold);
        env_override("KEEL_STABILITY_STRUCTURAL_WEIGHT", &mut s.structural_weight);

        let h = &mut config.health;
        env_override("KEEL_HEALTH_STRUCTURAL_WEIGHT", &mut h.structural_weight);
        env_override("KEEL_HEALTH_CONFIDENCE_WEIGHT", &mut h.confidence_weight);
        env_override("KEEL_HEALTH_STABILITY_WEIGHT", &mut h.stability_weight);
        env_override("KEEL_HEALTH_COUPLING_WEIGHT", &mut h.coupling_weight);
        env_override("KEEL_HEALTH_CRITICAL_FLOOR", &mut h.critical_floor);
        env_override("KEEL_HEALTH_COUPLING_THRESHOLD", &mut h.coupling_threshold);
        env_override("KEEL_HEALTH_EXTREME_COUPLING_DEGREE", &mut h.extreme_coupling_degree);

        let r = &mut config.risk;
        env_override("KEEL_RISK_PROPAGATION_WEIGHT", &mut r.propagation_weight);
        env_override("KEEL_RISK_CONTRIBUTION_THRESHOLD", &mut r.contribution_threshold);
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

fn env_override<T: FromStr>(key: &str, slot: &mut Option<T>) {
    if let Ok(val) = std::env::var(key) {
        match val.trim().parse::<T>() {
            Ok(v) => *slot = Some(v),
            Err(_) => tracing::warn!(key, value = %val, "ignoring unparsable environment override"),
        }
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}

/// Returns the user config path: `~/.keel/config.toml`.
fn user_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .map(|home| home.join(".keel").join("config.toml"))
}
