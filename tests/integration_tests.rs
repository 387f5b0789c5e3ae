use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use streamcluster_rs::{SummaryConfig, SummaryError, SummaryIndex};

/// Generate synthetic clustered data with known centers
fn generate_clustered_data(
    n_samples: usize,
    n_features: usize,
    n_clusters: usize,
    seed: u64,
) -> Array2<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let centers = Array2::random_using(
        (n_clusters, n_features),
        Uniform::new(-10.0, 10.0),
        &mut rng,
    );

    let samples_per_cluster = n_samples / n_clusters;
    let mut data = Array2::zeros((n_samples, n_features));

    for (cluster_idx, center) in centers.outer_iter().enumerate() {
        let start_idx = cluster_idx * samples_per_cluster;
        let end_idx = if cluster_idx == n_clusters - 1 {
            n_samples
        } else {
            (cluster_idx + 1) * samples_per_cluster
        };

        for i in start_idx..end_idx {
            for j in 0..n_features {
                let noise: f32 =
                    Array2::random_using((1, 1), Uniform::new(-0.5, 0.5), &mut rng)[[0, 0]];
                data[[i, j]] = center[j] + noise;
            }
        }
    }

    data
}

/// Generate three contiguous blocks of points around fixed, widely
/// separated centers. The separation dwarfs any drift bound the tests
/// use, so every cluster is guaranteed to form at least one node of its
/// own.
fn generate_separated_data(n_per_cluster: usize, seed: u64) -> Array2<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let centers = [
        [0.0f32, 0.0, 0.0, 0.0],
        [100.0, 0.0, 0.0, 0.0],
        [0.0, 100.0, 0.0, 0.0],
    ];

    let mut data = Array2::zeros((3 * n_per_cluster, 4));
    for (cluster_idx, center) in centers.iter().enumerate() {
        for i in 0..n_per_cluster {
            let noise = Array2::random_using((1, 4), Uniform::new(-0.5f32, 0.5), &mut rng);
            for j in 0..4 {
                data[[cluster_idx * n_per_cluster + i, j]] = center[j] + noise[[0, j]];
            }
        }
    }

    data
}

/// Check that every node's stored centroid equals the mean of its points
fn assert_centroids_are_means(index: &SummaryIndex) {
    for node in index.nodes() {
        let points = node.points();
        assert!(!points.is_empty());

        let mut mean: Array1<f32> = Array1::zeros(points[0].len());
        for point in points {
            mean += point;
        }
        mean /= points.len() as f32;

        let centroid = node.centroid().unwrap();
        for (c, m) in centroid.iter().zip(mean.iter()) {
            assert_relative_eq!(c, m, epsilon = 1e-3);
        }
    }
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_three_point_scenario() {
    let mut index = SummaryIndex::new(1.0, 50, 2).unwrap();

    index.insert(&array![0.0f32, 0.0].view()).unwrap();
    index.insert(&array![0.0f32, 0.1].view()).unwrap();
    index.insert(&array![10.0f32, 10.0].view()).unwrap();

    // The first two points merge, the third starts a new node
    assert_eq!(index.n_nodes(), 2);
    assert_eq!(index.nodes()[0].len(), 2);
    assert_eq!(index.nodes()[1].len(), 1);

    // Two nodes map onto two distinct labels
    let cluster_map = index.consolidate().unwrap();
    assert_eq!(cluster_map.len(), 2);
    assert_ne!(cluster_map[&0], cluster_map[&1]);

    // Queries near each node pick up that node's label
    let labels = index
        .predict(&array![[0.0f32, 0.05], [10.0, 10.05]].view())
        .unwrap();
    assert_eq!(labels.len(), 2);
    assert_ne!(labels[0], labels[1]);
    assert_eq!(labels[0], cluster_map[&0]);
    assert_eq!(labels[1], cluster_map[&1]);
}

#[test]
fn test_duplicate_stream_stays_in_one_node() {
    // 60 identical points all pass the zero-drift admission test, so the
    // node count never exceeds the branching factor and no maintenance
    // pass is needed.
    let mut index = SummaryIndex::new(1.0, 50, 1).unwrap();

    for _ in 0..60 {
        index.insert(&array![1.0f32, 1.0].view()).unwrap();
    }

    assert_eq!(index.n_nodes(), 1);
    assert_eq!(index.nodes()[0].len(), 60);
    assert_centroids_are_means(&index);

    let labels = index.predict(&array![[1.0f32, 1.0]].view()).unwrap();
    assert_eq!(labels.len(), 1);
}

#[test]
fn test_duplicate_heavy_maintenance_does_not_crash() {
    // A full node of identical points goes through a maintenance pass;
    // the degenerate 2-way partition must not crash or lose points.
    let mut index = SummaryIndex::new(0.1, 3, 2).unwrap();

    for _ in 0..10 {
        index.insert(&array![1.0f32, 1.0].view()).unwrap();
    }
    index.insert(&array![10.0f32, 10.0].view()).unwrap();
    index.insert(&array![20.0f32, 20.0].view()).unwrap();
    index.insert(&array![30.0f32, 30.0].view()).unwrap();

    let total: usize = index.nodes().iter().map(|n| n.len()).sum();
    assert_eq!(total, 13);
    assert_centroids_are_means(&index);
}

#[test]
fn test_predict_on_node_centroid_returns_its_label() {
    let mut index = SummaryIndex::new(0.5, 50, 2).unwrap();
    index.insert(&array![0.0f32, 0.0].view()).unwrap();
    index.insert(&array![10.0f32, 10.0].view()).unwrap();

    let cluster_map = index.consolidate().unwrap();
    let labels = index
        .predict(&array![[0.0f32, 0.0], [10.0, 10.0]].view())
        .unwrap();

    assert_eq!(labels[0], cluster_map[&0]);
    assert_eq!(labels[1], cluster_map[&1]);
}

#[test]
fn test_streaming_larger_mixture() {
    // Threshold 2.0 swallows the intra-cluster spread (point pairs are at
    // most ~2 apart) while the 100-unit separation keeps clusters from
    // bleeding into each other's nodes, so each cluster forms one node.
    let data = generate_separated_data(30, 42);

    let config = SummaryConfig::new(2.0, 40, 3).with_seed(42);
    let mut index = SummaryIndex::with_config(config).unwrap();

    for row in data.outer_iter() {
        index.insert(&row).unwrap();
    }

    assert_eq!(index.n_nodes(), 3);
    assert_centroids_are_means(&index);

    let total: usize = index.nodes().iter().map(|n| n.len()).sum();
    assert_eq!(total, 90);

    let labels = index.predict(&data.view()).unwrap();
    assert_eq!(labels.len(), 90);
    for &label in labels.iter() {
        assert!(label < 3);
    }

    // With exactly 3 nodes and 3 clusters the partition is a bijection:
    // blocks are pure and pairwise distinct
    assert_eq!(labels[0], labels[29]);
    assert_eq!(labels[30], labels[59]);
    assert_eq!(labels[60], labels[89]);
    assert_ne!(labels[0], labels[30]);
    assert_ne!(labels[30], labels[60]);
    assert_ne!(labels[0], labels[60]);

    // Consolidation is recomputed per call, but the seeded partitioner
    // makes repeated predictions over unchanged centroids identical
    let again = index.predict(&data.view()).unwrap();
    assert_eq!(labels, again);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_centroid_mean_roundtrip_under_random_stream() {
    let data = Array2::random_using(
        (200, 4),
        Uniform::new(-1.0f32, 1.0),
        &mut ChaCha8Rng::seed_from_u64(7),
    );

    let mut index = SummaryIndex::new(0.3, 20, 2).unwrap();
    for row in data.outer_iter() {
        index.insert(&row).unwrap();
        assert_centroids_are_means(&index);
    }

    let total: usize = index.nodes().iter().map(|n| n.len()).sum();
    assert_eq!(total, 200);
}

#[test]
fn test_node_count_never_decreases() {
    let data = generate_clustered_data(300, 3, 4, 11);

    let mut index = SummaryIndex::new(0.25, 30, 2).unwrap();

    for row in data.outer_iter() {
        let before = index.n_nodes();
        index.insert(&row).unwrap();
        let after = index.n_nodes();

        // A plain insert grows the count by at most one; a maintenance
        // pass replaces full nodes with their splits and never drops one
        assert!(after >= before);
    }

    assert!(index.n_nodes() > 0);
    let total: usize = index.nodes().iter().map(|n| n.len()).sum();
    assert_eq!(total, 300);
}

#[test]
fn test_reproducible_with_same_seed() {
    let data = generate_separated_data(50, 5);

    let run = |seed: u64| -> Vec<usize> {
        let config = SummaryConfig::new(0.2, 40, 3).with_seed(seed);
        let mut index = SummaryIndex::with_config(config).unwrap();
        for row in data.outer_iter() {
            index.insert(&row).unwrap();
        }
        index.predict(&data.view()).unwrap().to_vec()
    };

    assert_eq!(run(12345), run(12345));
}

// ============================================================================
// Error Paths
// ============================================================================

#[test]
fn test_consolidate_more_clusters_than_nodes() {
    let mut index = SummaryIndex::new(1.0, 50, 3).unwrap();
    index.insert(&array![0.0f32, 0.0].view()).unwrap();
    index.insert(&array![10.0f32, 10.0].view()).unwrap();

    // 2 distinct points built 2 nodes; 3 clusters cannot be formed
    assert_eq!(index.n_nodes(), 2);
    let result = index.consolidate();
    assert!(matches!(result, Err(SummaryError::InvalidConfig(_))));
}

#[test]
fn test_empty_index_errors() {
    let index = SummaryIndex::new(1.0, 50, 2).unwrap();

    assert!(matches!(
        index.consolidate(),
        Err(SummaryError::EmptyStructure(_))
    ));
    assert!(matches!(
        index.predict(&array![[1.0f32, 2.0]].view()),
        Err(SummaryError::EmptyStructure(_))
    ));
}

#[test]
fn test_dimension_mismatch_on_insert_and_predict() {
    let mut index = SummaryIndex::new(1.0, 50, 1).unwrap();
    index.insert(&array![0.0f32, 0.0].view()).unwrap();

    assert!(matches!(
        index.insert(&array![0.0f32, 0.0, 0.0].view()),
        Err(SummaryError::DimensionMismatch(_))
    ));
    assert!(matches!(
        index.predict(&array![[0.0f32]].view()),
        Err(SummaryError::DimensionMismatch(_))
    ));
}

#[test]
fn test_invalid_construction_values() {
    assert!(matches!(
        SummaryIndex::new(-0.5, 50, 3),
        Err(SummaryError::InvalidConfig(_))
    ));
    assert!(matches!(
        SummaryIndex::new(0.5, 0, 3),
        Err(SummaryError::InvalidConfig(_))
    ));
    assert!(matches!(
        SummaryIndex::new(0.5, 50, 0),
        Err(SummaryError::InvalidConfig(_))
    ));
}
