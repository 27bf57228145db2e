// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2024 Hyperpolymath

//! Decorative follower-network layout
//!
//! A fixed star/ring arrangement around the analyzed account: eight
//! follower nodes on an inner ring, six following nodes on an outer
//! ring, positions by plain trigonometric placement. The layout carries
//! no analytical meaning.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

pub const CENTER_X: f64 = 200.0;
pub const CENTER_Y: f64 = 200.0;
pub const FOLLOWER_COUNT: usize = 8;
pub const FOLLOWER_RADIUS: f64 = 100.0;
pub const FOLLOWING_COUNT: usize = 6;
pub const FOLLOWING_RADIUS: f64 = 150.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    User,
    Follower,
    Following,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEdge {
    pub source: String,
    pub target: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkLayout {
    pub nodes: Vec<NetworkNode>,
    pub edges: Vec<NetworkEdge>,
}

/// Build the synthetic network around a handle. Deterministic.
pub fn network_layout(handle: &str) -> NetworkLayout {
    let mut nodes = vec![NetworkNode {
        id: handle.to_string(),
        name: handle.to_string(),
        kind: NodeKind::User,
        x: CENTER_X,
        y: CENTER_Y,
    }];
    let mut edges = Vec::new();

    for i in 0..FOLLOWER_COUNT {
        let id = format!("follower_{i}");
        let angle = i as f64 / FOLLOWER_COUNT as f64 * TAU;
        nodes.push(NetworkNode {
            id: id.clone(),
            name: format!("Follower {}", i + 1),
            kind: NodeKind::Follower,
            x: CENTER_X + angle.cos() * FOLLOWER_RADIUS,
            y: CENTER_Y + angle.sin() * FOLLOWER_RADIUS,
        });
        edges.push(NetworkEdge {
            source: id,
            target: handle.to_string(),
        });
    }

    for i in 0..FOLLOWING_COUNT {
        let id = format!("following_{i}");
        let angle = i as f64 / FOLLOWING_COUNT as f64 * TAU;
        nodes.push(NetworkNode {
            id: id.clone(),
            name: format!("Following {}", i + 1),
            kind: NodeKind::Following,
            x: CENTER_X + angle.cos() * FOLLOWING_RADIUS,
            y: CENTER_Y + angle.sin() * FOLLOWING_RADIUS,
        });
        edges.push(NetworkEdge {
            source: handle.to_string(),
            target: id,
        });
    }

    NetworkLayout { nodes, edges }
}
