//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?limit=` for short "latest N" listings.
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

impl LimitParams {
    /// The requested limit, defaulted and clamped to `[1, max]`.
    pub fn resolve(&self, default: i64, max: i64) -> i64 {
        self.limit.unwrap_or(default).clamp(1, max)
    }
}

/// `?search=&stage=` for the admin property listing.
#[derive(Debug, Default, Deserialize)]
pub struct PropertyListParams {
    pub search: Option<String>,
    pub stage: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_and_clamps() {
        assert_eq!(LimitParams { limit: None }.resolve(4, 50), 4);
        assert_eq!(LimitParams { limit: Some(0) }.resolve(4, 50), 1);
        assert_eq!(LimitParams { limit: Some(500) }.resolve(4, 50), 50);
        assert_eq!(LimitParams { limit: Some(12) }.resolve(4, 50), 12);
    }
}
