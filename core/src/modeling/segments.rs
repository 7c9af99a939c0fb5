//! Customer segmentation with k-means, plus an elbow/silhouette sweep
//! over a range of cluster counts.

use super::features::{matrix_from_rows, StandardScaler};
use crate::{
    aggregate::CustomerProfile,
    config::ModelingConfig,
    error::{AnalysisError, AnalysisResult},
    rng::StageRng,
    types::EntityId,
};
use linfa::prelude::*;
use linfa_clustering::KMeans;
use linfa_nn::distance::L2Dist;
use ndarray::{Array1, Array2, ArrayView1};

const MODEL: &str = "kmeans";

pub const SEGMENT_FEATURES: [&str; 6] = [
    "purchase_count",
    "total_revenue",
    "total_margin",
    "age",
    "income_code",
    "digital_literacy_score",
];

pub const HIGH_VALUE: &str = "High Value";
pub const FREQUENT_BUYERS: &str = "Frequent Buyers";
pub const LOW_ENGAGEMENT: &str = "Low Engagement";
pub const MODERATE: &str = "Moderate";

#[derive(Debug, Clone, PartialEq)]
pub struct ElbowPoint {
    pub k: usize,
    pub inertia: f64,
    pub silhouette: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentProfile {
    pub cluster: usize,
    pub name: &'static str,
    pub customers: usize,
    pub avg_purchases: f64,
    pub avg_revenue: f64,
    pub avg_margin: f64,
    pub avg_age: f64,
    pub avg_income_code: f64,
    pub avg_digital_score: f64,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationReport {
    pub k: usize,
    pub elbow: Vec<ElbowPoint>,
    pub profiles: Vec<SegmentProfile>,
    /// Cluster index per customer, in profile order.
    pub assignments: Vec<(EntityId, usize)>,
}

impl SegmentationReport {
    pub fn segment_name(&self, cluster: usize) -> Option<&'static str> {
        self.profiles.get(cluster).map(|p| p.name)
    }
}

/// Label clusters from their mean revenue and mean purchase count.
///
/// Highest revenue is "High Value"; highest purchase count is
/// "Frequent Buyers" unless that cluster is already named; lowest
/// revenue is "Low Engagement" under the same rule; all others are
/// "Moderate". Ties resolve to the lowest cluster index.
pub fn name_clusters(avg_revenue: &[f64], avg_purchases: &[f64]) -> Vec<&'static str> {
    let mut names: Vec<Option<&'static str>> = vec![None; avg_revenue.len()];
    let rules = [
        (argmax(avg_revenue), HIGH_VALUE),
        (argmax(avg_purchases), FREQUENT_BUYERS),
        (argmin(avg_revenue), LOW_ENGAGEMENT),
    ];
    for (idx, name) in rules {
        if let Some(slot) = idx.and_then(|i| names.get_mut(i)) {
            if slot.is_none() {
                *slot = Some(name);
            }
        }
    }
    names.into_iter().map(|n| n.unwrap_or(MODERATE)).collect()
}

fn argmax(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b >= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

fn argmin(values: &[f64]) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
            Some((_, b)) if b <= v => best,
            _ => Some((i, v)),
        })
        .map(|(i, _)| i)
}

pub fn segment_features(profile: &CustomerProfile<'_>) -> Vec<f64> {
    vec![
        profile.behavior.purchase_count as f64,
        profile.behavior.total_revenue,
        profile.behavior.total_margin,
        profile.customer.age as f64,
        profile.customer.income_bracket.rank() as f64,
        profile.customer.digital_literacy_score,
    ]
}

struct Clustering {
    labels: Array1<usize>,
    inertia: f64,
}

fn fit_kmeans(
    records: &Array2<f64>,
    k: usize,
    config: &ModelingConfig,
    rng: &mut StageRng,
) -> AnalysisResult<Clustering> {
    if records.nrows() < k {
        return Err(AnalysisError::model(
            MODEL,
            format!("{} rows cannot form {k} clusters", records.nrows()),
        ));
    }
    let dataset = DatasetBase::from(records.clone());
    let model = KMeans::params_with(k, rng.fork(), L2Dist)
        .n_runs(config.kmeans_runs)
        .max_n_iterations(config.kmeans_max_iterations)
        .tolerance(config.kmeans_tolerance)
        .fit(&dataset)
        .map_err(|e| AnalysisError::model(MODEL, e))?;

    let labels: Array1<usize> = model.predict(records);
    let inertia = compute_inertia(records, &labels, model.centroids());
    Ok(Clustering { labels, inertia })
}

/// Within-cluster sum of squared distances to the assigned centroid.
pub fn compute_inertia(features: &Array2<f64>, labels: &Array1<usize>, centroids: &Array2<f64>) -> f64 {
    features
        .outer_iter()
        .zip(labels.iter())
        .filter(|(_, &c)| c < centroids.nrows())
        .map(|(point, &c)| squared_distance(&point, &centroids.row(c)))
        .sum()
}

fn squared_distance(a: &ArrayView1<f64>, b: &ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| (x - y).powi(2)).sum()
}

/// Mean silhouette over the given sample of row indices.
pub fn silhouette_on_sample(features: &Array2<f64>, labels: &Array1<usize>, sample: &[usize]) -> f64 {
    if sample.len() < 2 {
        return 0.0;
    }
    let k = labels.iter().copied().max().map_or(0, |m| m + 1);
    let mut total = 0.0;

    for &i in sample {
        let point = features.row(i);
        let own = labels[i];
        let mut sums = vec![0.0; k];
        let mut counts = vec![0usize; k];
        for &j in sample {
            if i == j {
                continue;
            }
            let d = squared_distance(&point, &features.row(j)).sqrt();
            sums[labels[j]] += d;
            counts[labels[j]] += 1;
        }

        if counts[own] == 0 {
            // singleton clusters score 0
            continue;
        }
        let a = sums[own] / counts[own] as f64;
        let b = (0..k)
            .filter(|&c| c != own && counts[c] > 0)
            .map(|c| sums[c] / counts[c] as f64)
            .fold(f64::INFINITY, f64::min);
        if b.is_finite() && a.max(b) > 0.0 {
            total += (b - a) / a.max(b);
        }
    }
    total / sample.len() as f64
}

fn sample_indices(n: usize, size: usize, rng: &mut StageRng) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..n).collect();
    if n > size {
        rng.shuffle(&mut idx);
        idx.truncate(size);
    }
    idx
}

pub fn segment_customers(
    profiles: &[CustomerProfile<'_>],
    config: &ModelingConfig,
    rng: &mut StageRng,
) -> AnalysisResult<SegmentationReport> {
    let rows: Vec<Vec<f64>> = profiles.iter().map(segment_features).collect();
    let raw = matrix_from_rows(MODEL, &rows, SEGMENT_FEATURES.len())?;
    let (_, scaled) = StandardScaler::fit_transform(MODEL, &raw)?;
    let sample = sample_indices(scaled.nrows(), config.silhouette_sample, rng);

    let mut elbow = Vec::new();
    for k in config.elbow_k_min..=config.elbow_k_max {
        if k > scaled.nrows() {
            break;
        }
        let clustering = fit_kmeans(&scaled, k, config, rng)?;
        let silhouette = silhouette_on_sample(&scaled, &clustering.labels, &sample);
        log::debug!("kmeans sweep: k={k} inertia={:.1} silhouette={silhouette:.3}", clustering.inertia);
        elbow.push(ElbowPoint {
            k,
            inertia: clustering.inertia,
            silhouette,
        });
    }

    let k = config.cluster_count;
    let clustering = fit_kmeans(&scaled, k, config, rng)?;

    let mut sums = vec![[0.0f64; 6]; k];
    let mut counts = vec![0usize; k];
    for (row, &cluster) in rows.iter().zip(clustering.labels.iter()) {
        counts[cluster] += 1;
        for (s, v) in sums[cluster].iter_mut().zip(row) {
            *s += v;
        }
    }
    let means: Vec<[f64; 6]> = sums
        .iter()
        .zip(&counts)
        .map(|(s, &n)| {
            if n == 0 {
                [0.0; 6]
            } else {
                s.map(|v| v / n as f64)
            }
        })
        .collect();

    let avg_revenue: Vec<f64> = means.iter().map(|m| m[1]).collect();
    let avg_purchases: Vec<f64> = means.iter().map(|m| m[0]).collect();
    let names = name_clusters(&avg_revenue, &avg_purchases);

    let profiles_out: Vec<SegmentProfile> = (0..k)
        .map(|c| SegmentProfile {
            cluster: c,
            name: names[c],
            customers: counts[c],
            avg_purchases: means[c][0],
            avg_revenue: means[c][1],
            avg_margin: means[c][2],
            avg_age: means[c][3],
            avg_income_code: means[c][4],
            avg_digital_score: means[c][5],
            total_revenue: sums[c][1],
        })
        .collect();

    for p in &profiles_out {
        log::info!("segment {} ({}): {} customers", p.cluster, p.name, p.customers);
    }

    Ok(SegmentationReport {
        k,
        elbow,
        profiles: profiles_out,
        assignments: profiles
            .iter()
            .zip(clustering.labels.iter())
            .map(|(p, &c)| (p.behavior.customer_id.clone(), c))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn distinct_clusters_get_distinct_names() {
        let names = name_clusters(&[500.0, 2_000.0, 100.0, 800.0], &[3.0, 4.0, 1.0, 9.0]);
        assert_eq!(names, vec![MODERATE, HIGH_VALUE, LOW_ENGAGEMENT, FREQUENT_BUYERS]);
    }

    #[test]
    fn high_value_wins_over_frequent_buyers() {
        let names = name_clusters(&[500.0, 2_000.0, 100.0, 800.0], &[3.0, 9.0, 1.0, 4.0]);
        assert_eq!(names, vec![MODERATE, HIGH_VALUE, LOW_ENGAGEMENT, MODERATE]);
    }

    #[test]
    fn ties_pick_lowest_index() {
        let names = name_clusters(&[300.0, 300.0, 300.0], &[2.0, 2.0, 2.0]);
        assert_eq!(names, vec![HIGH_VALUE, MODERATE, MODERATE]);
    }

    #[test]
    fn inertia_sums_squared_distances() {
        let x = array![[0.0, 0.0], [2.0, 0.0], [10.0, 10.0]];
        let labels = array![0usize, 0, 1];
        let centroids = array![[1.0, 0.0], [10.0, 10.0]];
        assert_eq!(compute_inertia(&x, &labels, &centroids), 2.0);
    }

    #[test]
    fn well_separated_points_have_high_silhouette() {
        let x = array![[0.0, 0.0], [0.0, 1.0], [50.0, 50.0], [50.0, 51.0]];
        let labels = array![0usize, 0, 1, 1];
        let s = silhouette_on_sample(&x, &labels, &[0, 1, 2, 3]);
        assert!(s > 0.95, "silhouette {s}");
    }
}
