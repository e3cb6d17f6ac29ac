//! Risk aggregation: fold findings into a score and threat tier

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::report::FindingCategory;
use crate::{FINDING_WEIGHT, MAX_RISK_SCORE};

/// Discrete threat classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ThreatLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ThreatLevel {
    /// Tier for an unclamped weighted total
    ///
    /// Thresholds compare the pre-clamp total, not the clamped score: a
    /// total of 76 is CRITICAL even though its score clamps no differently
    /// than 200's. Comparisons are strict, so exactly 20 is still LOW.
    pub fn from_total(total: u32) -> Self {
        if total > 75 {
            Self::Critical
        } else if total > 40 {
            Self::High
        } else if total > 20 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

impl fmt::Display for ThreatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        };
        f.write_str(s)
    }
}

/// Aggregated risk verdict for one scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskVerdict {
    pub score: u32,
    pub level: ThreatLevel,
}

/// Score a finding map: `FINDING_WEIGHT` points per finding, clamped to 100
pub fn score_findings(findings: &BTreeMap<FindingCategory, Vec<String>>) -> RiskVerdict {
    let count: u32 = findings.values().map(|v| v.len() as u32).sum();
    let total = count * FINDING_WEIGHT;
    RiskVerdict {
        score: total.min(MAX_RISK_SCORE),
        level: ThreatLevel::from_total(total),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn findings(counts: &[(FindingCategory, usize)]) -> BTreeMap<FindingCategory, Vec<String>> {
        counts
            .iter()
            .map(|(cat, n)| (*cat, vec!["finding".to_string(); *n]))
            .collect()
    }

    #[test]
    fn test_weighted_total() {
        let verdict = score_findings(&findings(&[
            (FindingCategory::Headers, 3),
            (FindingCategory::Cookies, 2),
        ]));
        assert_eq!(verdict.score, 25);
        assert_eq!(verdict.level, ThreatLevel::Medium);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // 4 findings = total 20, strictly-greater comparison keeps it LOW
        let verdict = score_findings(&findings(&[(FindingCategory::Headers, 4)]));
        assert_eq!(verdict.score, 20);
        assert_eq!(verdict.level, ThreatLevel::Low);

        assert_eq!(ThreatLevel::from_total(21), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_total(40), ThreatLevel::Medium);
        assert_eq!(ThreatLevel::from_total(41), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_total(75), ThreatLevel::High);
        assert_eq!(ThreatLevel::from_total(76), ThreatLevel::Critical);
    }

    #[test]
    fn test_score_clamps_but_tier_does_not() {
        // 30 findings = total 150: score clamps to 100, tier sees 150
        let verdict = score_findings(&findings(&[(FindingCategory::Scripts, 30)]));
        assert_eq!(verdict.score, 100);
        assert_eq!(verdict.level, ThreatLevel::Critical);
    }

    #[test]
    fn test_empty_findings() {
        let verdict = score_findings(&BTreeMap::new());
        assert_eq!(verdict.score, 0);
        assert_eq!(verdict.level, ThreatLevel::Low);
    }
}
