// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Bot detection demo engine
//!
//! This crate provides:
//! - Synthetic profile generation with seeded randomness
//! - A heuristic scoring engine (weighted threshold sum plus jitter)
//! - Explanation breakdowns (attribution map, key factors)
//! - File-backed credential and session storage
//! - Network and chart layout geometry for frontends
//! - Model metrics (static published record plus a live demo evaluation)
//!
//! Everything here is demonstration machinery: the profiles are
//! fabricated, the confidence is not calibrated, and the explanation
//! values are hand-picked. None of it should inform real moderation
//! decisions.

pub mod analysis;
pub mod chart;
pub mod explain;
pub mod graph;
pub mod metrics;
pub mod profile;
pub mod scoring;
pub mod store;

pub use analysis::{AnalysisConfig, AnalysisReport, Analyzer, EvaluationReport};
pub use explain::{explain, AttributionEntry, Explanation, LocalFactor};
pub use graph::{network_layout, NetworkLayout};
pub use metrics::{ConfusionMatrix, ModelMetrics};
pub use profile::{sanitize_handle, Profile, ProfileGenerator};
pub use scoring::{IndicatorSet, Prediction, RiskLevel, Scorer, Verdict, BOT_THRESHOLD};
pub use store::{Session, SessionStore};
