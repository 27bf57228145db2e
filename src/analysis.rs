// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Analysis orchestration
//!
//! Ties the pieces together: sanitize the requested handle, fabricate a
//! profile for it, score it, build the explanation breakdowns and the
//! network layout, and package everything into one report. Also hosts
//! the demo evaluation, which generates a labeled population and
//! measures the scoring engine against the generator's ground truth.

use crate::explain::{explain, Explanation};
use crate::graph::{network_layout, NetworkLayout};
use crate::metrics::{auc_from_scores, ConfusionMatrix, ModelMetrics};
use crate::profile::{sanitize_handle, Profile, ProfileGenerator};
use crate::scoring::{IndicatorSet, Prediction, Scorer, Verdict};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for the demo evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub seed: u64,
    pub samples: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            samples: 1000,
        }
    }
}

/// Everything produced for one analyzed handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub handle: String,
    pub profile: Profile,
    pub indicators: IndicatorSet,
    pub prediction: Prediction,
    pub explanation: Explanation,
    pub network: NetworkLayout,
    pub generated_at: DateTime<Utc>,
    pub version: String,
}

impl AnalysisReport {
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), "report saved");
        Ok(())
    }

    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("# Analysis Report: @{}\n\n", self.handle));
        out.push_str(&format!(
            "Generated: {} | Engine v{}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.version
        ));

        out.push_str("## Verdict\n\n");
        out.push_str(&format!(
            "**{}** (confidence {:.1}%, risk: {})\n\n",
            self.prediction.verdict,
            self.prediction.confidence * 100.0,
            self.prediction.risk,
        ));

        out.push_str("## Profile\n\n");
        out.push_str(&format!(
            "| Field | Value |\n|---|---|\n| Display name | {} |\n| Followers | {} |\n| Following | {} |\n| Tweets | {} |\n| Verified | {} |\n| Location | {} |\n| Bio | {} |\n\n",
            self.profile.display_name,
            self.profile.followers,
            self.profile.following,
            self.profile.tweets,
            self.profile.verified,
            if self.profile.location.is_empty() { "(none)" } else { &self.profile.location },
            self.profile.bio,
        ));

        out.push_str("## Feature Attribution\n\n| Feature | Attribution |\n|---|---|\n");
        for entry in &self.explanation.attributions {
            out.push_str(&format!("| {} | {:+.3} |\n", entry.feature, entry.value));
        }

        out.push_str("\n## Key Factors\n\n| Factor | Value | Weight |\n|---|---|---|\n");
        for factor in &self.explanation.local_factors {
            out.push_str(&format!(
                "| {} | {:.2} | {:+.2} |\n",
                factor.feature, factor.value, factor.weight
            ));
        }

        out.push_str("\n## Summary\n\n");
        out.push_str(&self.explanation.summary);
        out.push('\n');
        out
    }
}

/// Stateful analyzer holding the seeded generator and scorer.
pub struct Analyzer {
    generator: ProfileGenerator,
    scorer: Scorer,
}

impl Analyzer {
    pub fn new(seed: u64) -> Self {
        Self {
            generator: ProfileGenerator::new(seed),
            scorer: Scorer::new(seed.wrapping_add(1)),
        }
    }

    /// Run the full pipeline for one handle.
    ///
    /// The input may be a bare handle or a profile URL; anything that
    /// sanitizes down to an empty string is rejected.
    pub fn analyze(&mut self, raw: &str) -> Result<AnalysisReport> {
        let handle = sanitize_handle(raw);
        if handle.is_empty() {
            bail!("no usable username in input {raw:?}");
        }
        tracing::info!(%handle, "analyzing profile");

        let profile = self.generator.generate(&handle);
        let indicators = IndicatorSet::from_profile(&profile, Utc::now());
        let prediction = self.scorer.classify_indicators(&indicators);
        let explanation = explain(&indicators);
        let network = network_layout(&handle);

        tracing::info!(
            verdict = %prediction.verdict,
            confidence = prediction.confidence,
            "analysis complete"
        );

        Ok(AnalysisReport {
            handle,
            profile,
            indicators,
            prediction,
            explanation,
            network,
            generated_at: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}

/// One row of the evaluation's sample table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleRecord {
    pub username: String,
    pub predicted: Verdict,
    pub actual: Verdict,
    pub confidence: f64,
}

/// Outcome of measuring the scorer against generated ground truth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub config: AnalysisConfig,
    pub confusion: ConfusionMatrix,
    pub metrics: ModelMetrics,
    pub samples: Vec<SampleRecord>,
    pub generated_at: DateTime<Utc>,
}

impl EvaluationReport {
    pub fn render_markdown(&self) -> String {
        let mut out = String::new();
        out.push_str("# Demo Evaluation\n\n");
        out.push_str(&format!(
            "Generated: {} | {} samples, seed {}\n\n",
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            self.config.samples,
            self.config.seed
        ));

        out.push_str("## Metrics\n\n```\n");
        out.push_str(&self.metrics.format());
        out.push_str("```\n\n## Confusion Matrix\n\n```\n");
        out.push_str(&self.confusion.format());
        out.push_str("```\n\n## Sample Predictions\n\n");
        out.push_str("| Username | Predicted | Actual | Confidence |\n|---|---|---|---|\n");
        for sample in &self.samples {
            out.push_str(&format!(
                "| {} | {} | {} | {:.1}% |\n",
                sample.username,
                sample.predicted,
                sample.actual,
                sample.confidence * 100.0
            ));
        }
        out
    }

    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write evaluation to {}", path.display()))?;
        Ok(())
    }
}

/// Generate a labeled population and score every profile, keeping the
/// first few of each outcome as a sample table.
pub fn run_demo_evaluation(config: &AnalysisConfig) -> Result<EvaluationReport> {
    if config.samples == 0 {
        bail!("evaluation needs at least one sample");
    }
    tracing::info!(samples = config.samples, seed = config.seed, "evaluation started");

    let mut generator = ProfileGenerator::new(config.seed);
    let mut scorer = Scorer::new(config.seed.wrapping_add(1));
    let now = Utc::now();

    let mut predicted = Vec::with_capacity(config.samples);
    let mut actual = Vec::with_capacity(config.samples);
    let mut scores = Vec::with_capacity(config.samples);
    let mut samples = Vec::new();

    for i in 0..config.samples {
        let (profile, is_bot) = generator.generate_labeled(&format!("account_{i}"));

        let indicators = IndicatorSet::from_profile(&profile, now);
        let prediction = scorer.classify_indicators(&indicators);
        let truth = if is_bot { Verdict::Bot } else { Verdict::Human };

        if samples.len() < 10 {
            samples.push(SampleRecord {
                username: profile.username.clone(),
                predicted: prediction.verdict,
                actual: truth,
                confidence: prediction.confidence,
            });
        }

        predicted.push(prediction.verdict);
        actual.push(truth);
        scores.push(prediction.confidence);
    }

    let confusion = ConfusionMatrix::from_verdicts(&predicted, &actual);
    let auc = auc_from_scores(&actual, &scores);
    let metrics = ModelMetrics::from_confusion(&confusion, auc);

    tracing::info!(
        accuracy = metrics.accuracy,
        auc = metrics.auc,
        "evaluation finished"
    );

    Ok(EvaluationReport {
        config: config.clone(),
        confusion,
        metrics,
        samples,
        generated_at: Utc::now(),
    })
}
