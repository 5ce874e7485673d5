//! Configuration system for Keel.
//! TOML-based, 3-layer resolution: env > project > defaults.

pub mod confidence_config;
pub mod health_config;
pub mod keel_config;
pub mod risk_config;
pub mod stability_config;

pub use confidence_config::ConfidenceConfig;
pub use health_config::HealthConfig;
pub use keel_config::KeelConfig;
pub use risk_config::RiskConfig;
pub use stability_config::StabilityConfig;
