use crate::distance::{compute_centroid_shift, compute_squared_norms, find_nearest_centroids};
use crate::error::SummaryError;
use ndarray::{Array1, Array2, ArrayView2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Unsupervised k-way vector partitioner.
///
/// Given a set of vectors and a target group count `k`, assigns one group
/// label in `0..k` to every vector, minimizing within-group variance. The
/// index uses this capability in two places: splitting an overfull node
/// (k = 2 over the node's points) and consolidating the structure
/// (k = `n_clusters` over node centroids).
///
/// Implementations choose their own algorithm, seeding, and determinism;
/// callers that need reproducible partitions should inject a seeded
/// implementation such as [`KMeansPartitioner`].
pub trait Partitioner {
    /// Partition the rows of `vectors` into `k` groups.
    ///
    /// Returns one label per row, each in `0..k`. Some labels may be
    /// unused when the input is degenerate (e.g. all rows identical).
    ///
    /// # Errors
    ///
    /// Returns an error if `k` is 0 or exceeds the number of rows.
    fn partition(&self, vectors: &ArrayView2<f32>, k: usize)
        -> Result<Array1<usize>, SummaryError>;
}

/// Seeded Lloyd's k-means partitioner.
///
/// The default [`Partitioner`] implementation: random centroid
/// initialization from the input rows, alternating assign/update steps,
/// empty clusters reseeded from random rows, convergence on total
/// centroid shift.
#[derive(Debug, Clone)]
pub struct KMeansPartitioner {
    /// Maximum number of assign/update iterations
    pub max_iters: usize,

    /// Convergence tolerance. When total centroid shift is below this
    /// threshold, the algorithm stops early. Set to a negative value to
    /// disable early stopping.
    pub tol: f64,

    /// Random seed for centroid initialization and empty-cluster reseeding
    pub seed: u64,

    /// Print per-iteration progress
    pub verbose: bool,
}

impl Default for KMeansPartitioner {
    fn default() -> Self {
        Self {
            max_iters: 25,
            tol: 1e-8,
            seed: 0,
            verbose: false,
        }
    }
}

impl KMeansPartitioner {
    /// Create a partitioner with the specified seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }

    /// Set the maximum number of iterations
    pub fn with_max_iters(mut self, max_iters: usize) -> Self {
        self.max_iters = max_iters;
        self
    }

    /// Set the convergence tolerance
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Set verbose mode
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

impl Partitioner for KMeansPartitioner {
    fn partition(
        &self,
        vectors: &ArrayView2<f32>,
        k: usize,
    ) -> Result<Array1<usize>, SummaryError> {
        let n_samples = vectors.nrows();
        let n_features = vectors.ncols();

        if k == 0 {
            return Err(SummaryError::InvalidConfig(
                "partition group count must be greater than 0".to_string(),
            ));
        }
        if n_samples < k {
            return Err(SummaryError::InvalidConfig(format!(
                "cannot partition {} vectors into {} groups",
                n_samples, k
            )));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        // Pre-compute data norms
        let data_norms = compute_squared_norms(vectors);

        // Initialize centroids (random selection from the input rows)
        let mut centroids = initialize_centroids(vectors, k, &mut rng);

        let mut labels = Array1::zeros(n_samples);

        for iteration in 0..self.max_iters {
            // Pre-compute centroid norms
            let centroid_norms = compute_squared_norms(&centroids.view());

            labels = find_nearest_centroids(
                vectors,
                &data_norms.view(),
                &centroids.view(),
                &centroid_norms.view(),
            );

            // Accumulate group sums and counts
            let mut cluster_sums: Array2<f32> = Array2::zeros((k, n_features));
            let mut cluster_counts: Array1<f32> = Array1::zeros(k);

            for (i, &label) in labels.iter().enumerate() {
                cluster_counts[label] += 1.0;
                for j in 0..n_features {
                    cluster_sums[[label, j]] += vectors[[i, j]];
                }
            }

            // Compute new centroids
            let prev_centroids = centroids.clone();
            let mut empty_clusters = Vec::new();

            for cluster_idx in 0..k {
                let count = cluster_counts[cluster_idx];
                if count > 0.0 {
                    for j in 0..n_features {
                        centroids[[cluster_idx, j]] = cluster_sums[[cluster_idx, j]] / count;
                    }
                } else {
                    empty_clusters.push(cluster_idx);
                }
            }

            // Reseed empty clusters from random rows
            if !empty_clusters.is_empty() {
                let indices: Vec<usize> = (0..n_samples).collect();
                let random_indices: Vec<usize> = indices
                    .choose_multiple(&mut rng, empty_clusters.len())
                    .cloned()
                    .collect();

                for (i, &cluster_idx) in empty_clusters.iter().enumerate() {
                    let data_idx = random_indices[i];
                    for j in 0..n_features {
                        centroids[[cluster_idx, j]] = vectors[[data_idx, j]];
                    }
                }

                if self.verbose {
                    eprintln!("  reseeded {} empty groups", empty_clusters.len());
                }
            }

            // Check convergence
            let shift = compute_centroid_shift(&prev_centroids.view(), &centroids.view());

            if self.verbose {
                eprintln!(
                    "  partition iteration {}/{}: shift = {:.6}",
                    iteration + 1,
                    self.max_iters,
                    shift
                );
            }

            if self.tol >= 0.0 && shift < self.tol {
                break;
            }
        }

        Ok(labels)
    }
}

/// Initialize centroids by randomly selecting k input rows
fn initialize_centroids(data: &ArrayView2<f32>, k: usize, rng: &mut ChaCha8Rng) -> Array2<f32> {
    let n_samples = data.nrows();
    let n_features = data.ncols();

    let indices: Vec<usize> = (0..n_samples).collect();
    let selected: Vec<usize> = indices.choose_multiple(rng, k).cloned().collect();

    let mut centroids = Array2::zeros((k, n_features));
    for (centroid_idx, &data_idx) in selected.iter().enumerate() {
        for j in 0..n_features {
            centroids[[centroid_idx, j]] = data[[data_idx, j]];
        }
    }

    centroids
}
