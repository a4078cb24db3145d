//! Asset record validation.
//!
//! Normalizes adapter output before it reaches the merge engine:
//! - Records without an identity are rejected
//! - Negative values in non-percentage fields are clamped to zero
//! - Empty provenance is filled with the producing provider

use log::warn;
use rust_decimal::Decimal;

use crate::models::AssetRecord;

/// Validation severity levels.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ValidationSeverity {
    /// Hard failure - drop the record.
    Hard,
    /// Soft warning - keep the (repaired) record but log it.
    Soft,
}

/// A single problem found on a record.
#[derive(Clone, Debug)]
pub struct ValidationIssue {
    /// Severity of the issue.
    pub severity: ValidationSeverity,
    /// Description of the issue.
    pub message: String,
}

/// Validator configuration.
#[derive(Clone, Debug)]
pub struct ValidatorConfig {
    /// Clamp negative price / market cap / volume / liquidity to zero.
    pub clamp_negative_values: bool,
    /// Warn when a record has a zero price.
    pub warn_on_zero_price: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            clamp_negative_values: true,
            warn_on_zero_price: false,
        }
    }
}

/// Asset record validator.
#[derive(Clone, Debug, Default)]
pub struct AssetValidator {
    config: ValidatorConfig,
}

impl AssetValidator {
    /// Create a new validator with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator with custom configuration.
    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    /// Validate and repair a single record.
    ///
    /// Returns `None` when the record must be dropped. Repairs are logged.
    pub fn validate(&self, provider: &str, mut record: AssetRecord) -> Option<AssetRecord> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        if record.address.trim().is_empty() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Hard,
                message: "missing asset identity".to_string(),
            });
        }

        if self.config.clamp_negative_values {
            clamp_non_negative(&mut record.price, "price", &mut issues);
            clamp_non_negative(&mut record.market_cap, "market cap", &mut issues);
            clamp_non_negative(&mut record.volume, "volume", &mut issues);
            clamp_non_negative(&mut record.liquidity, "liquidity", &mut issues);
        }

        if self.config.warn_on_zero_price && record.price.is_zero() {
            issues.push(ValidationIssue {
                severity: ValidationSeverity::Soft,
                message: "zero price".to_string(),
            });
        }

        if record.sources.is_empty() {
            record.sources.push(provider.to_string());
        }

        if let Some(issue) = issues
            .iter()
            .find(|i| i.severity == ValidationSeverity::Hard)
        {
            warn!(
                "Dropping record '{}' from '{}': {}",
                record.ticker, provider, issue.message
            );
            return None;
        }

        for issue in &issues {
            warn!(
                "Record validation warning for '{}' from '{}': {}",
                record.address, provider, issue.message
            );
        }

        Some(record)
    }

    /// Validate a batch, preserving order.
    pub fn validate_all(&self, provider: &str, records: Vec<AssetRecord>) -> Vec<AssetRecord> {
        records
            .into_iter()
            .filter_map(|record| self.validate(provider, record))
            .collect()
    }
}

fn clamp_non_negative(value: &mut Decimal, field: &str, issues: &mut Vec<ValidationIssue>) {
    if value.is_sign_negative() && !value.is_zero() {
        issues.push(ValidationIssue {
            severity: ValidationSeverity::Soft,
            message: format!("negative {} ({}) clamped to zero", field, value),
        });
        *value = Decimal::ZERO;
    }
}
