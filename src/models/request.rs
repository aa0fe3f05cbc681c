use serde::{Deserialize, Serialize};

/// One solve request: desired nutrient amounts and their importance weights.
///
/// Entries of `targets` that are zero or negative mean "no target for this
/// nutrient" and exert no pressure on the objective. Weights must lie in
/// [0, 1]; out-of-range weights are rejected at solve time rather than
/// silently corrected. Both vectors must match the catalog's nutrient count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlendRequest {
    pub targets: Vec<f64>,
    pub weights: Vec<f64>,
}

impl BlendRequest {
    pub fn new(targets: Vec<f64>, weights: Vec<f64>) -> Self {
        Self { targets, weights }
    }

    /// Build a request with the weights clamped into [0, 1], for callers that
    /// pass raw user input straight through.
    pub fn clamped(targets: Vec<f64>, weights: Vec<f64>) -> Self {
        let weights = weights.into_iter().map(|w| w.clamp(0.0, 1.0)).collect();
        Self { targets, weights }
    }

    /// Indices and values of the active targets (strictly positive entries).
    pub fn active_targets(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.targets
            .iter()
            .copied()
            .enumerate()
            .filter(|&(_, o)| o > 0.0)
    }

    /// True if no nutrient has both a positive target and a positive weight.
    pub fn is_degenerate(&self) -> bool {
        !self
            .active_targets()
            .any(|(k, _)| self.weights.get(k).copied().unwrap_or(0.0) > 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_targets_skip_nonpositive() {
        let request = BlendRequest::new(vec![60.0, 0.0, -5.0], vec![1.0, 1.0, 1.0]);
        let active: Vec<(usize, f64)> = request.active_targets().collect();
        assert_eq!(active, vec![(0, 60.0)]);
    }

    #[test]
    fn test_clamped_weights() {
        let request = BlendRequest::clamped(vec![60.0], vec![1.7]);
        assert_eq!(request.weights, vec![1.0]);

        let request = BlendRequest::clamped(vec![60.0], vec![-0.2]);
        assert_eq!(request.weights, vec![0.0]);
    }

    #[test]
    fn test_degenerate_detection() {
        // No active targets
        assert!(BlendRequest::new(vec![0.0, 0.0], vec![1.0, 1.0]).is_degenerate());
        // Active targets but all weights zero
        assert!(BlendRequest::new(vec![60.0, 10.0], vec![0.0, 0.0]).is_degenerate());
        // One target with weight
        assert!(!BlendRequest::new(vec![60.0, 0.0], vec![0.5, 0.0]).is_degenerate());
    }
}
