//! Distance metrics and the distance -> relevance normalization.
//!
//! Index backends report a single native distance per hit (lower is closer).
//! Relevance (higher is closer, nominally in `[0, 1]`) is always derived from
//! that distance through [`DistanceMetric::relevance`], so both views of a
//! result set rank chunks identically.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Squared euclidean distance.
    #[default]
    L2,
    /// `1 - cos(a, b)`.
    Cosine,
    /// `1 - a . b`.
    Dot,
}

impl DistanceMetric {
    /// Map a native distance onto a relevance score. Strictly decreasing in
    /// `distance`; the result is not clamped.
    pub fn relevance(self, distance: f32) -> f32 {
        match self {
            // Embeddings are unit length, so the squared L2 distance spans [0, 4]
            // and sqrt(2) scales the common range into [0, 1].
            Self::L2 => 1.0 - distance / std::f32::consts::SQRT_2,
            Self::Cosine | Self::Dot => 1.0 - distance,
        }
    }

    /// Native distance between two vectors of equal length.
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        debug_assert_eq!(a.len(), b.len(), "vector dimensions must match");
        match self {
            Self::L2 => a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum(),
            Self::Cosine => {
                let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
                let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
                let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
                if na == 0.0 || nb == 0.0 { 1.0 } else { 1.0 - dot / (na * nb) }
            }
            Self::Dot => 1.0 - a.iter().zip(b).map(|(x, y)| x * y).sum::<f32>(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::L2 => "l2",
            Self::Cosine => "cosine",
            Self::Dot => "dot",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l2" | "euclidean" => Ok(Self::L2),
            "cosine" | "cos" => Ok(Self::Cosine),
            "dot" | "ip" | "inner_product" => Ok(Self::Dot),
            other => Err(Error::InvalidArgument(format!("unknown distance metric '{other}'"))),
        }
    }
}

/// Round half away from zero to `places` decimal digits.
pub fn round_score(score: f32, places: i32) -> f32 {
    let factor = 10f64.powi(places);
    ((f64::from(score) * factor).round() / factor) as f32
}
