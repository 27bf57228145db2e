// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Display-oriented explanation breakdowns
//!
//! Produces two views over the same indicators the scoring engine uses:
//! a per-feature attribution map and a short ordered list of key
//! factors. The values are hand-picked scalars that mimic the shape of
//! attribution output; they are NOT Shapley values and are deliberately
//! not reconciled with the score. Do not attempt true attribution here.

use crate::scoring::{
    IndicatorSet, FEATURE_ACCOUNT_AGE, FEATURE_BIO_SENTIMENT, FEATURE_COMPLETENESS, FEATURE_RATIO,
    FEATURE_TWEETS_PER_DAY, FEATURE_VERIFIED,
};
use serde::{Deserialize, Serialize};

pub const FACTOR_RATIO: &str = "Follower/Following Ratio";
pub const FACTOR_BIO: &str = "Bio Content Analysis";
pub const FACTOR_FREQUENCY: &str = "Posting Frequency";
pub const FACTOR_COMPLETENESS: &str = "Profile Completeness";

/// One entry of the attribution map. Positive values point towards the
/// bot class, negative towards human.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributionEntry {
    pub feature: String,
    pub value: f64,
}

/// One entry of the key-factor list: the observed value plus a weight
/// chosen by a simple threshold.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalFactor {
    pub feature: String,
    pub value: f64,
    pub weight: f64,
}

/// Explanation for a single prediction
///
/// Pure function of already-validated inputs; exists only for the
/// duration of one analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explanation {
    /// Per-feature attribution in fixed display order.
    pub attributions: Vec<AttributionEntry>,
    /// Exactly four key factors in fixed display order.
    pub local_factors: Vec<LocalFactor>,
    /// Natural-language digest of the strongest signals.
    pub summary: String,
}

impl Explanation {
    /// The `n` attributions with the largest magnitude, strongest first.
    pub fn top_attributions(&self, n: usize) -> Vec<&AttributionEntry> {
        let mut sorted: Vec<&AttributionEntry> = self.attributions.iter().collect();
        sorted.sort_by(|a, b| {
            b.value
                .abs()
                .partial_cmp(&a.value.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.into_iter().take(n).collect()
    }
}

/// Build the explanation breakdowns from a profile's indicators.
pub fn explain(indicators: &IndicatorSet) -> Explanation {
    let attributions = attribution_map(indicators);
    let local_factors = local_factors(indicators);
    let summary = summarize(&attributions);

    Explanation {
        attributions,
        local_factors,
        summary,
    }
}

fn attribution_map(ind: &IndicatorSet) -> Vec<AttributionEntry> {
    let entry = |feature: &str, value: f64| AttributionEntry {
        feature: feature.to_string(),
        value,
    };

    vec![
        entry(FEATURE_RATIO, (ind.follower_ratio - 1.0) * 0.4),
        entry(
            FEATURE_TWEETS_PER_DAY,
            (ind.tweets_per_day / 10.0).min(1.0) * 0.3,
        ),
        entry(
            FEATURE_BIO_SENTIMENT,
            if ind.suspicious_bio { 0.25 } else { -0.15 },
        ),
        entry(
            FEATURE_COMPLETENESS,
            if ind.location_missing { 0.15 } else { -0.2 },
        ),
        entry(
            FEATURE_ACCOUNT_AGE,
            if ind.account_age_days < 30.0 { 0.2 } else { -0.1 },
        ),
        entry(FEATURE_VERIFIED, if ind.verified { -0.3 } else { 0.1 }),
    ]
}

fn local_factors(ind: &IndicatorSet) -> Vec<LocalFactor> {
    let factor = |feature: &str, value: f64, weight: f64| LocalFactor {
        feature: feature.to_string(),
        value,
        weight,
    };

    vec![
        factor(
            FACTOR_RATIO,
            ind.follower_ratio,
            if ind.follower_ratio > 2.0 { 0.8 } else { -0.3 },
        ),
        factor(
            FACTOR_BIO,
            if ind.suspicious_bio { 1.0 } else { 0.0 },
            if ind.suspicious_bio { 0.6 } else { -0.2 },
        ),
        factor(
            FACTOR_FREQUENCY,
            ind.tweets_per_day,
            if ind.tweets_per_day > 10.0 { 0.7 } else { -0.1 },
        ),
        factor(
            FACTOR_COMPLETENESS,
            if ind.location_missing { 0.0 } else { 1.0 },
            if ind.location_missing { 0.3 } else { -0.4 },
        ),
    ]
}

fn summarize(attributions: &[AttributionEntry]) -> String {
    let mut sorted: Vec<&AttributionEntry> = attributions.iter().collect();
    sorted.sort_by(|a, b| {
        b.value
            .abs()
            .partial_cmp(&a.value.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut parts = vec!["Strongest signals:".to_string()];
    for entry in sorted.into_iter().take(3) {
        let direction = if entry.value > 0.0 {
            "bot-indicating"
        } else {
            "human-indicating"
        };
        parts.push(format!(
            "  • {} ({direction}, {:+.3})",
            entry.feature, entry.value
        ));
    }
    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indicators(
        ratio: f64,
        tweets_per_day: f64,
        suspicious_bio: bool,
        location_missing: bool,
        age_days: f64,
        verified: bool,
    ) -> IndicatorSet {
        IndicatorSet {
            follower_ratio: ratio,
            tweets_per_day,
            suspicious_bio,
            default_avatar: false,
            location_missing,
            account_age_days: age_days,
            verified,
        }
    }

    fn value_of(explanation: &Explanation, feature: &str) -> f64 {
        explanation
            .attributions
            .iter()
            .find(|e| e.feature == feature)
            .map(|e| e.value)
            .expect("feature missing")
    }

    #[test]
    fn test_attribution_formulas() {
        let ind = indicators(3.0, 600.0, true, true, 10.0, false);
        let explanation = explain(&ind);

        assert!((value_of(&explanation, FEATURE_RATIO) - 0.8).abs() < 1e-9);
        // tweets/day capped at 1.0 before scaling
        assert!((value_of(&explanation, FEATURE_TWEETS_PER_DAY) - 0.3).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_BIO_SENTIMENT) - 0.25).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_COMPLETENESS) - 0.15).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_ACCOUNT_AGE) - 0.2).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_VERIFIED) - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_attribution_negative_branches() {
        let ind = indicators(0.5, 2.0, false, false, 400.0, true);
        let explanation = explain(&ind);

        assert!((value_of(&explanation, FEATURE_RATIO) + 0.2).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_TWEETS_PER_DAY) - 0.06).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_BIO_SENTIMENT) + 0.15).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_COMPLETENESS) + 0.2).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_ACCOUNT_AGE) + 0.1).abs() < 1e-9);
        assert!((value_of(&explanation, FEATURE_VERIFIED) + 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_local_factors_order_and_weights() {
        let ind = indicators(3.0, 600.0, true, true, 10.0, false);
        let factors = explain(&ind).local_factors;

        assert_eq!(factors.len(), 4);
        assert_eq!(factors[0].feature, FACTOR_RATIO);
        assert_eq!(factors[1].feature, FACTOR_BIO);
        assert_eq!(factors[2].feature, FACTOR_FREQUENCY);
        assert_eq!(factors[3].feature, FACTOR_COMPLETENESS);

        assert!((factors[0].weight - 0.8).abs() < 1e-9);
        assert!((factors[1].weight - 0.6).abs() < 1e-9);
        assert!((factors[2].weight - 0.7).abs() < 1e-9);
        assert!((factors[3].weight - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_local_factors_trust_weights() {
        let ind = indicators(0.2, 1.0, false, false, 200.0, false);
        let factors = explain(&ind).local_factors;

        assert!((factors[0].weight + 0.3).abs() < 1e-9);
        assert!((factors[1].weight + 0.2).abs() < 1e-9);
        assert!((factors[2].weight + 0.1).abs() < 1e-9);
        assert!((factors[3].weight + 0.4).abs() < 1e-9);
        assert!((factors[3].value - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_attributions_sorted_by_magnitude() {
        let ind = indicators(3.0, 600.0, true, true, 10.0, false);
        let explanation = explain(&ind);
        let top = explanation.top_attributions(2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].feature, FEATURE_RATIO); // 0.8 dominates
        assert!(top[0].value.abs() >= top[1].value.abs());
    }

    #[test]
    fn test_summary_mentions_strongest_signal() {
        let ind = indicators(3.0, 600.0, true, true, 10.0, false);
        let explanation = explain(&ind);

        assert!(explanation.summary.contains(FEATURE_RATIO));
        assert!(explanation.summary.contains("bot-indicating"));
    }
}
