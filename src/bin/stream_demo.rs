//! Basic demo streaming synthetic clustered data through a summary index
//!
//! Run with: cargo run --bin stream-demo --release

use ndarray::Array2;
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use streamcluster_rs::{SummaryConfig, SummaryIndex};

fn main() {
    println!("=== streamcluster-rs demo ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!(
        "Generating {} samples with {} features...",
        n_samples, n_features
    );

    // Create clustered data by generating points around 3 centers
    let mut data = Array2::<f32>::zeros((n_samples, n_features));

    // Cluster centers
    let centers = [[-5.0f32, -5.0], [0.0, 5.0], [5.0, -5.0]];

    for i in 0..n_samples {
        let cluster_idx = i % 3;
        let noise = Array2::random((1, n_features), Uniform::new(-1.0f32, 1.0));
        data[[i, 0]] = centers[cluster_idx][0] + noise[[0, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[0, 1]];
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    let config = SummaryConfig {
        threshold: 0.05,
        branching_factor: 50,
        n_clusters,
        seed: 42,
        verbose: true,
    };

    println!(
        "Streaming {} points with threshold={}...\n",
        n_samples, config.threshold
    );

    let mut index = SummaryIndex::with_config(config).expect("Invalid configuration");
    for row in data.outer_iter() {
        index.insert(&row).expect("Insert failed");
    }

    println!(
        "\nStream summarized into {} nodes ({} points)",
        index.n_nodes(),
        index.nodes().iter().map(|n| n.len()).sum::<usize>()
    );

    // Consolidate node centroids into final clusters and label the stream
    let labels = index.predict(&data.view()).expect("Prediction failed");

    let mut counts = vec![0usize; n_clusters];
    for &label in labels.iter() {
        counts[label] += 1;
    }

    println!("\nPredicted cluster sizes:");
    for (label, count) in counts.iter().enumerate() {
        println!("  Cluster {}: {} points", label, count);
    }

    println!("\nDone.");
}
