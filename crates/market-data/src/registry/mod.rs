//! Provider registry module.
//!
//! This module provides orchestration for asset providers, including:
//! - Ordered concurrent fan-out across providers
//! - Per-provider interval rate limiting
//! - Bounded retry with exponential backoff
//! - Record validation

mod rate_limiter;
mod registry;
mod retry_policy;
mod validator;

pub use rate_limiter::RateLimiter;
pub use registry::ProviderRegistry;
pub use retry_policy::RetryPolicy;
pub use validator::{AssetValidator, ValidationIssue, ValidationSeverity, ValidatorConfig};
