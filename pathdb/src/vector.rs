//! Brute-force nearest-neighbour search.
//!
//! Every candidate is scanned. The ranking matches what a vector index returns
//! on small data sets: distances ascending, ties in candidate order.
use crate::common::Value;
use crate::database::{DatabaseDocument, VectorSearchResult};

/// Distance measure of a vector search. Every measure is normalized to
/// "lower = more similar".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DistanceMeasure {
    /// `sqrt(Σ(aᵢ − bᵢ)²)`
    #[default]
    Euclidean,
    /// `1 − a·b / (‖a‖‖b‖)`, in `[0, 2]`
    Cosine,
    /// `−(a·b)`
    DotProduct,
}

impl DistanceMeasure {
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMeasure::Euclidean => "EUCLIDEAN",
            DistanceMeasure::Cosine => "COSINE",
            DistanceMeasure::DotProduct => "DOT_PRODUCT",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "EUCLIDEAN" => Some(DistanceMeasure::Euclidean),
            "COSINE" => Some(DistanceMeasure::Cosine),
            "DOT_PRODUCT" => Some(DistanceMeasure::DotProduct),
            _ => None,
        }
    }

    /// Distance between two vectors of the same length.
    pub fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            DistanceMeasure::Euclidean => euclidean(a, b),
            DistanceMeasure::Cosine => cosine(a, b),
            DistanceMeasure::DotProduct => -dot(a, b),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let norm_a = dot(a, a).sqrt();
    let norm_b = dot(b, b).sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 2.0;
    }
    1.0 - dot(a, b) / (norm_a * norm_b)
}

/// Reads `value` as a numeric vector of exactly `dimensions` entries.
pub fn extract_vector(value: &Value, dimensions: usize) -> Option<Vec<f64>> {
    let items = value.as_array()?;
    if items.len() != dimensions {
        return None;
    }
    items.iter().map(Value::as_f64).collect()
}

/// Ranks `candidates` by the distance between their `vector_field` and
/// `query_vector`, keeping at most `limit` results.
///
/// Candidates whose field is missing, is not an array of numbers or has the
/// wrong length are skipped. An empty query vector matches nothing.
pub fn rank_nearest(
    candidates: Vec<DatabaseDocument>,
    vector_field: &str,
    query_vector: &[f64],
    measure: DistanceMeasure,
    limit: usize,
) -> Vec<VectorSearchResult> {
    if query_vector.is_empty() {
        return Vec::new();
    }

    let mut results: Vec<VectorSearchResult> = candidates
        .into_iter()
        .filter_map(|candidate| {
            let vector = candidate
                .data
                .resolve(vector_field)
                .and_then(|value| extract_vector(value, query_vector.len()))?;
            let distance = measure.distance(&vector, query_vector);
            Some(VectorSearchResult {
                path: candidate.path,
                data: candidate.data,
                distance,
            })
        })
        .collect();

    results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    results.truncate(limit);
    results
}
