//! PM2.5 prediction behind `/predict`.
//!
//! There is no trained model; [`LinearMockModel`] is a fixed linear function
//! so the endpoint is deterministic.

/// Predicts a PM2.5 reading from a tract's branch count.
pub trait PredictionModel: Send + Sync {
    fn predict(&self, branch_count: i64) -> f64;

    fn name(&self) -> &str;
}

/// `intercept + slope * branch_count`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearMockModel {
    pub intercept: f64,
    pub slope: f64,
}

impl LinearMockModel {
    pub fn new(intercept: f64, slope: f64) -> Self {
        Self { intercept, slope }
    }
}

impl Default for LinearMockModel {
    fn default() -> Self {
        Self::new(10.0, 0.5)
    }
}

impl PredictionModel for LinearMockModel {
    fn predict(&self, branch_count: i64) -> f64 {
        self.intercept + self.slope * branch_count as f64
    }

    fn name(&self) -> &str {
        "linear-mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model() {
        let model = LinearMockModel::default();
        assert_eq!(model.predict(0), 10.0);
        assert_eq!(model.predict(4), 12.0);
        assert_eq!(model.predict(-2), 9.0);
        assert_eq!(model.name(), "linear-mock");
    }
}
