// Hotspot risk classification
use super::snapshot::Hotspot;

pub const HIGH_RISK_THRESHOLD: f64 = 80.0;
pub const MEDIUM_RISK_THRESHOLD: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    High,
    Medium,
    Low,
}

impl RiskTier {
    pub fn from_level(risk_level: f64) -> Self {
        if risk_level >= HIGH_RISK_THRESHOLD {
            RiskTier::High
        } else if risk_level >= MEDIUM_RISK_THRESHOLD {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Marker fill color
    pub fn color(&self) -> &'static str {
        match self {
            RiskTier::High => "#ef4444",
            RiskTier::Medium => "#f59e0b",
            RiskTier::Low => "#10b981",
        }
    }

    /// Label used by the risk distribution chart
    pub fn label(&self) -> &'static str {
        match self {
            RiskTier::High => "Alto",
            RiskTier::Medium => "Médio",
            RiskTier::Low => "Baixo",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskBucket {
    pub tier: RiskTier,
    pub count: usize,
}

/// Count hotspots per tier, buckets ordered by first appearance
pub fn risk_distribution(hotspots: &[Hotspot]) -> Vec<RiskBucket> {
    let mut buckets: Vec<RiskBucket> = Vec::new();

    for hotspot in hotspots {
        let tier = RiskTier::from_level(hotspot.risk_level);
        match buckets.iter_mut().find(|b| b.tier == tier) {
            Some(bucket) => bucket.count += 1,
            None => buckets.push(RiskBucket { tier, count: 1 }),
        }
    }

    buckets
}
