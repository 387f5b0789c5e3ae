use crate::error::SummaryError;

/// Configuration for a [`SummaryIndex`](crate::SummaryIndex)
#[derive(Debug, Clone)]
pub struct SummaryConfig {
    /// Maximum centroid drift a node may absorb when admitting a point.
    /// This bounds how far the running mean moves, not how far the point
    /// is from it.
    pub threshold: f32,

    /// Maximum points a node may hold before it becomes eligible for
    /// splitting. The same value bounds the node count that triggers a
    /// maintenance pass.
    pub branching_factor: usize,

    /// Number of final clusters produced by consolidation
    pub n_clusters: usize,

    /// Random seed for the default partitioner
    pub seed: u64,

    /// Print verbose output during maintenance and consolidation
    pub verbose: bool,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            branching_factor: 50,
            n_clusters: 3,
            seed: 0,
            verbose: false,
        }
    }
}

impl SummaryConfig {
    /// Create a new configuration with the specified core parameters
    pub fn new(threshold: f32, branching_factor: usize, n_clusters: usize) -> Self {
        Self {
            threshold,
            branching_factor,
            n_clusters,
            ..Default::default()
        }
    }

    /// Set the random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Check the construction preconditions
    pub fn validate(&self) -> Result<(), SummaryError> {
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(SummaryError::InvalidConfig(format!(
                "threshold must be a non-negative finite value, got {}",
                self.threshold
            )));
        }
        if self.branching_factor < 1 {
            return Err(SummaryError::InvalidConfig(
                "branching_factor must be at least 1".to_string(),
            ));
        }
        if self.n_clusters < 1 {
            return Err(SummaryError::InvalidConfig(
                "n_clusters must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
