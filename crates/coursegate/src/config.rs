//! Configuration for the enrollment engine.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use coursegate_common::constants::{
    CHALLENGE_RETRY_DELAY_MS, CODE_CONFIRM_DELAY_MS, CODE_DISPATCH_DELAY_MS, COMPLETION_LINGER_MS,
    DEFAULT_CURRENCY, DEFAULT_MERCHANT_NAME, DEFAULT_STORE_FILE, DEFAULT_THEME_COLOR,
};

/// Wizard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WizardConfig {
    /// Merchant display name passed to the checkout overlay
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,

    /// ISO currency code for checkout amounts
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Checkout overlay accent color
    #[serde(default = "default_theme_color")]
    pub theme_color: String,

    /// Simulated one-time-code dispatch latency (ms)
    #[serde(default = "default_dispatch_delay")]
    pub code_dispatch_delay_ms: u64,

    /// Simulated one-time-code confirmation latency (ms)
    #[serde(default = "default_confirm_delay")]
    pub code_confirm_delay_ms: u64,

    /// Delay before a mismatched challenge regenerates (ms)
    #[serde(default = "default_retry_delay")]
    pub challenge_retry_delay_ms: u64,

    /// How long a completed wizard lingers before closing (ms)
    #[serde(default = "default_linger")]
    pub completion_linger_ms: u64,

    /// Enrollment store file path
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

// Default value functions
fn default_merchant_name() -> String { DEFAULT_MERCHANT_NAME.to_string() }
fn default_currency() -> String { DEFAULT_CURRENCY.to_string() }
fn default_theme_color() -> String { DEFAULT_THEME_COLOR.to_string() }
fn default_dispatch_delay() -> u64 { CODE_DISPATCH_DELAY_MS }
fn default_confirm_delay() -> u64 { CODE_CONFIRM_DELAY_MS }
fn default_retry_delay() -> u64 { CHALLENGE_RETRY_DELAY_MS }
fn default_linger() -> u64 { COMPLETION_LINGER_MS }
fn default_store_path() -> String { DEFAULT_STORE_FILE.to_string() }

impl WizardConfig {
    /// Load configuration from a TOML file, falling back to defaults when
    /// the file does not exist.
    pub fn load(config_path: &str) -> Result<Self> {
        if !Path::new(config_path).exists() {
            tracing::warn!(path = %config_path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path))
            .build()
            .context("Failed to load config file")?;

        settings.try_deserialize().context("Failed to parse config")
    }
}

impl Default for WizardConfig {
    fn default() -> Self {
        Self {
            merchant_name: default_merchant_name(),
            currency: default_currency(),
            theme_color: default_theme_color(),
            code_dispatch_delay_ms: default_dispatch_delay(),
            code_confirm_delay_ms: default_confirm_delay(),
            challenge_retry_delay_ms: default_retry_delay(),
            completion_linger_ms: default_linger(),
            store_path: default_store_path(),
        }
    }
}
