// SPDX-License-Identifier: Apache-2.0

use std::time::Duration;
use vitrage_pricing::DEFAULT_VAT_RATE_PERMILLE;

pub const CONFIG_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
    pub catalog_ttl: Duration,
    pub vat_rate_permille: i64,
    pub max_quote_lines: usize,
    pub estimated_response: String,
    pub readiness_requires_catalog: bool,
    pub shutdown_drain: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            request_timeout: Duration::from_secs(5),
            catalog_ttl: Duration::from_secs(300),
            vat_rate_permille: DEFAULT_VAT_RATE_PERMILLE,
            max_quote_lines: 20,
            estimated_response: "binnen 1 werkdag".to_string(),
            readiness_requires_catalog: true,
            shutdown_drain: Duration::from_secs(5),
        }
    }
}

impl ApiConfig {
    /// Rejects configurations that would make every request fail, so a bad
    /// deploy dies at startup instead of serving errors.
    pub fn validate(&self) -> Result<(), String> {
        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be positive".to_string());
        }
        if self.request_timeout.is_zero() {
            return Err("request_timeout must be positive".to_string());
        }
        if !(0..=1000).contains(&self.vat_rate_permille) {
            return Err(format!(
                "vat_rate_permille out of range: {}",
                self.vat_rate_permille
            ));
        }
        if self.max_quote_lines == 0 {
            return Err("max_quote_lines must be positive".to_string());
        }
        if self.estimated_response.trim().is_empty() {
            return Err("estimated_response must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        ApiConfig::default().validate().expect("default config");
    }

    #[test]
    fn vat_rate_is_bounded() {
        let mut cfg = ApiConfig::default();
        cfg.vat_rate_permille = 1001;
        assert!(cfg.validate().is_err());
        cfg.vat_rate_permille = -1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_line_budget_is_rejected() {
        let mut cfg = ApiConfig::default();
        cfg.max_quote_lines = 0;
        assert!(cfg.validate().is_err());
    }
}
