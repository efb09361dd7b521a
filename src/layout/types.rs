use crate::ir::{NodeKey, Tier};
use serde::Serialize;

/// One positioned box for one item. Rebuilt on every layout pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeBox {
    pub id: i64,
    pub tier: Tier,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Item name, ellipsized to the box width.
    pub title: String,
    /// Description (or the fallback text), ellipsized to the box width.
    pub subtitle: String,
}

impl NodeBox {
    pub fn key(&self) -> NodeKey {
        (self.tier, self.id)
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// A connector between boxes of adjacent tiers, upper tier first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeLayout {
    pub from: NodeKey,
    pub to: NodeKey,
    /// Start, two control points, end.
    pub points: [(f32, f32); 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowLabel {
    pub tier: Tier,
    pub text: String,
    pub x: f32,
    pub y: f32,
}

/// Message shown instead of the diagram when there is nothing to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placeholder {
    pub message: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Declarative description of a full redraw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub width: f32,
    pub height: f32,
    pub labels: Vec<RowLabel>,
    pub edges: Vec<EdgeLayout>,
    /// Value boxes, then Goal boxes, then Metric boxes, each in input order.
    pub nodes: Vec<NodeBox>,
    pub placeholder: Option<Placeholder>,
}

impl Layout {
    pub fn tier_nodes(&self, tier: Tier) -> impl Iterator<Item = &NodeBox> {
        self.nodes.iter().filter(move |node| node.tier == tier)
    }

    pub fn node(&self, key: NodeKey) -> Option<&NodeBox> {
        self.nodes.iter().find(|node| node.key() == key)
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder.is_some()
    }
}
