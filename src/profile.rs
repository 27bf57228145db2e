// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Synthetic profile generation for the bot detection demo
//!
//! Profiles are drawn from a seeded RNG so every analysis run is
//! reproducible. Roughly 30% of generated profiles are bot-like:
//! inflated follower/following/tweet counts, a promotional bio, and an
//! empty location. The rest look like ordinary accounts.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Bio substrings treated as promotional markers by the scoring engine.
pub const BIO_MARKERS: [&str; 3] = ["🔥", "💎", "🚀"];

const BOT_BIO: &str =
    "🔥 Follow for amazing content! 💎 Crypto expert! 🚀 #Bitcoin #Ethereum #ToTheMoon";
const HUMAN_BIO: &str = "Software engineer passionate about AI and machine learning. \
     Building the future one line of code at a time.";
const HUMAN_LOCATION: &str = "San Francisco, CA";

const MAX_ACCOUNT_AGE_SECS: i64 = 3 * 365 * 24 * 60 * 60;

/// A synthetic social-media profile
///
/// Created once per analysis request and immutable afterwards; never
/// persisted. Counts are unsigned, so the "all counts >= 0" invariant
/// holds by construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub followers: u64,
    pub following: u64,
    pub tweets: u64,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
    pub avatar_url: String,
    /// Empty string means the profile has no location set.
    pub location: String,
}

impl Profile {
    /// Account age in days relative to `now`, never negative.
    pub fn age_days(&self, now: DateTime<Utc>) -> f64 {
        ((now - self.created_at).num_seconds().max(0)) as f64 / 86_400.0
    }
}

/// Extract a usable handle from raw user input.
///
/// A `twitter.com/<handle>` URL yields the handle; anything else is
/// stripped down to alphanumeric characters and underscores. Returns an
/// empty string when nothing usable remains.
pub fn sanitize_handle(input: &str) -> String {
    if let Some(rest) = input.split("twitter.com/").nth(1) {
        let handle: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if !handle.is_empty() {
            return handle;
        }
    }
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

fn display_name(username: &str) -> String {
    let mut chars = username.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Seeded generator for synthetic profiles
///
/// All randomness flows through one ChaCha8 stream, so a fixed seed
/// produces a fixed sequence of profiles.
#[derive(Debug, Clone)]
pub struct ProfileGenerator {
    rng: ChaCha8Rng,
}

impl ProfileGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Generate a profile for the given handle. Always succeeds.
    pub fn generate(&mut self, username: &str) -> Profile {
        self.generate_labeled(username).0
    }

    /// Generate a profile along with the ground-truth bot flag that
    /// drove the draw. Used by the demo evaluation to compare the
    /// scoring engine against the generator.
    pub fn generate_labeled(&mut self, username: &str) -> (Profile, bool) {
        let is_bot = self.rng.gen_bool(0.3);
        let now = Utc::now();
        let age = Duration::seconds(self.rng.gen_range(0..MAX_ACCOUNT_AGE_SECS));

        let (followers, following, tweets) = if is_bot {
            (
                self.rng.gen_range(10_000..60_000),
                self.rng.gen_range(8_000..18_000),
                self.rng.gen_range(5_000..6_000),
            )
        } else {
            (
                self.rng.gen_range(100..5_100),
                self.rng.gen_range(50..1_050),
                self.rng.gen_range(100..2_100),
            )
        };

        let photo_id = self.rng.gen_range(1_000..2_000u32);
        let image_id = self.rng.gen_range(1_000..2_000u32);

        let profile = Profile {
            username: username.to_string(),
            display_name: display_name(username),
            bio: if is_bot { BOT_BIO } else { HUMAN_BIO }.to_string(),
            followers,
            following,
            tweets,
            verified: self.rng.gen_bool(0.1),
            created_at: now - age,
            avatar_url: format!(
                "https://images.pexels.com/photos/{photo_id}/pexels-photo-{image_id}.jpeg?w=150&h=150"
            ),
            location: if is_bot {
                String::new()
            } else {
                HUMAN_LOCATION.to_string()
            },
        };

        (profile, is_bot)
    }
}
