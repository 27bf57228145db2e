// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Heuristic scoring engine
//!
//! Derives a small set of indicators from a profile and accumulates a
//! weighted score: each term is added only when its threshold condition
//! holds, nothing is blended. The score plus a bounded random jitter is
//! clamped into [0.55, 0.95] and compared against a single canonical
//! threshold to produce the verdict. The confidence is a display value,
//! not a calibrated probability.

use crate::profile::{Profile, BIO_MARKERS};
use chrono::{DateTime, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical classification threshold. The results view derives its
/// "high risk" band from this same constant, so the label and the
/// displayed risk level can never disagree.
pub const BOT_THRESHOLD: f64 = 0.75;

/// Lower and upper clamp bounds for the reported confidence. The floor
/// of 0.55 means the engine never reports near-certainty of the
/// negative class.
pub const CONFIDENCE_MIN: f64 = 0.55;
pub const CONFIDENCE_MAX: f64 = 0.95;

pub const FEATURE_RATIO: &str = "Follower/Following Ratio";
pub const FEATURE_TWEETS_PER_DAY: &str = "Tweets per Day";
pub const FEATURE_BIO_SENTIMENT: &str = "Bio Sentiment Score";
pub const FEATURE_COMPLETENESS: &str = "Profile Completeness";
pub const FEATURE_ACCOUNT_AGE: &str = "Account Age (days)";
pub const FEATURE_VERIFIED: &str = "Verification Status";

/// Binary verdict for a scored profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Bot,
    Human,
}

impl Verdict {
    /// Bot strictly above the threshold; exactly 0.75 is Human.
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > BOT_THRESHOLD {
            Verdict::Bot
        } else {
            Verdict::Human
        }
    }

    pub fn is_bot(&self) -> bool {
        matches!(self, Verdict::Bot)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Bot => write!(f, "Bot"),
            Verdict::Human => write!(f, "Human"),
        }
    }
}

/// Display band for the confidence value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Moderate,
    Low,
}

impl RiskLevel {
    pub fn from_confidence(confidence: f64) -> Self {
        if confidence > BOT_THRESHOLD {
            RiskLevel::High
        } else if confidence > 0.6 {
            RiskLevel::Moderate
        } else {
            RiskLevel::Low
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::High => write!(f, "High"),
            RiskLevel::Moderate => write!(f, "Moderate"),
            RiskLevel::Low => write!(f, "Low"),
        }
    }
}

/// Scalar indicators derived from a profile
///
/// Pure function of the profile and a reference time; has no identity
/// of its own.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndicatorSet {
    pub follower_ratio: f64,
    pub tweets_per_day: f64,
    pub suspicious_bio: bool,
    pub default_avatar: bool,
    pub location_missing: bool,
    pub account_age_days: f64,
    pub verified: bool,
}

impl IndicatorSet {
    pub fn from_profile(profile: &Profile, now: DateTime<Utc>) -> Self {
        let age_days = profile.age_days(now);
        Self {
            follower_ratio: profile.following as f64 / profile.followers.max(1) as f64,
            tweets_per_day: profile.tweets as f64 / age_days.max(1.0),
            suspicious_bio: BIO_MARKERS.iter().any(|m| profile.bio.contains(m)),
            // Generated avatar URLs never contain "default", so this
            // indicator cannot fire for synthetic profiles. It is kept
            // so profiles supplied from other sources score the same
            // way the original heuristic did.
            default_avatar: profile.avatar_url.contains("default"),
            location_missing: profile.location.is_empty(),
            account_age_days: age_days,
            verified: profile.verified,
        }
    }
}

/// Weighted threshold sum over the indicators. Deterministic; the
/// jitter is applied by [`Scorer::classify`].
pub fn base_score(indicators: &IndicatorSet) -> f64 {
    let mut score = 0.0;
    if indicators.follower_ratio > 2.0 {
        score += 0.30;
    }
    if indicators.tweets_per_day > 10.0 {
        score += 0.20;
    }
    if indicators.default_avatar {
        score += 0.15;
    }
    if indicators.suspicious_bio {
        score += 0.25;
    }
    if indicators.location_missing {
        score += 0.10;
    }
    score
}

/// Classification output for one profile
///
/// Derived once per analysis, immutable, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub verdict: Verdict,
    pub confidence: f64,
    pub risk: RiskLevel,
    /// Named display values shown alongside the verdict.
    pub features: BTreeMap<String, f64>,
}

/// Scoring engine with a seeded jitter stream
#[derive(Debug, Clone)]
pub struct Scorer {
    rng: ChaCha8Rng,
}

impl Scorer {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Score a profile against the current wall clock.
    pub fn classify(&mut self, profile: &Profile) -> Prediction {
        let now = Utc::now();
        let indicators = IndicatorSet::from_profile(profile, now);
        self.classify_indicators(&indicators)
    }

    /// Score from already-derived indicators. The jitter draw makes
    /// repeated calls on identical inputs non-deterministic unless the
    /// scorer was freshly seeded.
    pub fn classify_indicators(&mut self, indicators: &IndicatorSet) -> Prediction {
        let jitter = self.rng.gen::<f64>() * 0.2;
        let confidence = (base_score(indicators) + jitter).clamp(CONFIDENCE_MIN, CONFIDENCE_MAX);
        let verdict = Verdict::from_confidence(confidence);

        tracing::debug!(
            ratio = indicators.follower_ratio,
            tweets_per_day = indicators.tweets_per_day,
            confidence,
            %verdict,
            "scored profile"
        );

        Prediction {
            verdict,
            confidence,
            risk: RiskLevel::from_confidence(confidence),
            features: feature_values(indicators),
        }
    }
}

fn feature_values(indicators: &IndicatorSet) -> BTreeMap<String, f64> {
    let mut features = BTreeMap::new();
    features.insert(FEATURE_RATIO.to_string(), indicators.follower_ratio);
    features.insert(FEATURE_TWEETS_PER_DAY.to_string(), indicators.tweets_per_day);
    features.insert(
        FEATURE_BIO_SENTIMENT.to_string(),
        if indicators.suspicious_bio { -0.5 } else { 0.3 },
    );
    features.insert(
        FEATURE_COMPLETENESS.to_string(),
        if indicators.location_missing { 0.3 } else { 0.8 },
    );
    features.insert(FEATURE_ACCOUNT_AGE.to_string(), indicators.account_age_days);
    features.insert(
        FEATURE_VERIFIED.to_string(),
        if indicators.verified { 1.0 } else { 0.0 },
    );
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn profile(
        followers: u64,
        following: u64,
        tweets: u64,
        age_days: i64,
        bio: &str,
        location: &str,
    ) -> Profile {
        Profile {
            username: "test".to_string(),
            display_name: "Test".to_string(),
            bio: bio.to_string(),
            followers,
            following,
            tweets,
            verified: false,
            created_at: Utc::now() - Duration::days(age_days),
            avatar_url: "https://images.pexels.com/photos/1200/pexels-photo-1200.jpeg".to_string(),
            location: location.to_string(),
        }
    }

    #[test]
    fn test_indicator_derivation() {
        let p = profile(100, 300, 6_000, 10, "🔥 deals", "");
        let ind = IndicatorSet::from_profile(&p, Utc::now());

        assert!((ind.follower_ratio - 3.0).abs() < 1e-9);
        assert!((ind.tweets_per_day - 600.0).abs() < 1.0);
        assert!(ind.suspicious_bio);
        assert!(ind.location_missing);
        assert!(!ind.default_avatar);
    }

    #[test]
    fn test_indicators_guard_against_zero_denominators() {
        let p = profile(0, 500, 100, 0, "hello", "Berlin");
        let ind = IndicatorSet::from_profile(&p, Utc::now());

        // followers clamped to 1, age clamped to 1 day
        assert!((ind.follower_ratio - 500.0).abs() < 1e-9);
        assert!((ind.tweets_per_day - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_base_score_weights() {
        let p = profile(100, 300, 6_000, 10, "🔥 follow me 🚀", "");
        let ind = IndicatorSet::from_profile(&p, Utc::now());

        // ratio 3 (+0.30), 600 tweets/day (+0.20), bio (+0.25), no location (+0.10)
        assert!((base_score(&ind) - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_confidence_always_within_bounds() {
        let mut scorer = Scorer::new(42);
        let mut generator = crate::profile::ProfileGenerator::new(42);

        for i in 0..500 {
            let p = generator.generate(&format!("u{i}"));
            let prediction = scorer.classify(&p);
            assert!(prediction.confidence >= CONFIDENCE_MIN);
            assert!(prediction.confidence <= CONFIDENCE_MAX);
        }
    }

    #[test]
    fn test_verdict_threshold_boundary() {
        assert_eq!(Verdict::from_confidence(0.75), Verdict::Human);
        assert_eq!(Verdict::from_confidence(0.7500001), Verdict::Bot);
        assert_eq!(Verdict::from_confidence(0.95), Verdict::Bot);
        assert_eq!(Verdict::from_confidence(0.55), Verdict::Human);
    }

    #[test]
    fn test_risk_level_agrees_with_verdict() {
        for confidence in [0.55, 0.6, 0.61, 0.75, 0.7500001, 0.9, 0.95] {
            let verdict = Verdict::from_confidence(confidence);
            let risk = RiskLevel::from_confidence(confidence);
            assert_eq!(verdict.is_bot(), risk == RiskLevel::High);
        }
    }

    #[test]
    fn test_bot_scenario() {
        // followers 100, following 300, 6000 tweets over 10 days, marker
        // bio, empty location: base 0.85, so confidence lands in
        // [0.85, 0.95] and the verdict is always Bot.
        let p = profile(100, 300, 6_000, 10, "🔥 crypto 💎 signals 🚀", "");
        let mut scorer = Scorer::new(42);

        for _ in 0..50 {
            let prediction = scorer.classify(&p);
            assert!(prediction.confidence >= 0.85);
            assert!(prediction.confidence <= 0.95);
            assert_eq!(prediction.verdict, Verdict::Bot);
            assert_eq!(prediction.risk, RiskLevel::High);
        }
    }

    #[test]
    fn test_human_scenario_clamps_to_floor() {
        // No bonus fires: base 0, jitter < 0.2, so the confidence is
        // exactly the 0.55 floor and the verdict is Human.
        let p = profile(2_000, 200, 300, 365, "I write code", "San Francisco, CA");
        let mut scorer = Scorer::new(42);

        for _ in 0..50 {
            let prediction = scorer.classify(&p);
            assert!((prediction.confidence - CONFIDENCE_MIN).abs() < 1e-12);
            assert_eq!(prediction.verdict, Verdict::Human);
        }
    }

    #[test]
    fn test_feature_map_contents() {
        let p = profile(1_000, 100, 200, 100, "plain", "Austin, TX");
        let mut scorer = Scorer::new(1);
        let prediction = scorer.classify(&p);

        assert_eq!(prediction.features.len(), 6);
        assert!((prediction.features[FEATURE_BIO_SENTIMENT] - 0.3).abs() < 1e-9);
        assert!((prediction.features[FEATURE_COMPLETENESS] - 0.8).abs() < 1e-9);
        assert!((prediction.features[FEATURE_VERIFIED]).abs() < 1e-9);
    }
}
