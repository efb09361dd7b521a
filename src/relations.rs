//! Link resolution between adjacent tiers.
//!
//! A payload can describe the same link in several places: a Value may list
//! its goals, a Goal may list its values, and either side may use embedded
//! reference objects (`"values": [{"id": 1, ...}]`) or a bare id list
//! (`"value_ids": [1]`). Everything is folded into one deduplicated list of
//! [`Link`]s, always oriented from the upper tier to the lower one.

use crate::ir::{HierarchyData, HierarchyItem, Tier, TierPair};
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// A resolved link, `source` in the upper tier and `target` in the lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Link {
    pub source: i64,
    pub target: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLinks {
    pub value_goal: Vec<Link>,
    pub goal_metric: Vec<Link>,
}

impl ResolvedLinks {
    pub fn get(&self, pair: TierPair) -> &[Link] {
        match pair {
            TierPair::ValueGoal => &self.value_goal,
            TierPair::GoalMetric => &self.goal_metric,
        }
    }

    pub fn len(&self) -> usize {
        self.value_goal.len() + self.goal_metric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Field names under which `tier` items reference `other` items, as
/// `(embedded, id_list)`.
pub fn relation_fields(tier: Tier, other: Tier) -> Option<(&'static str, &'static str)> {
    match (tier, other) {
        (Tier::Value, Tier::Goal) | (Tier::Metric, Tier::Goal) => Some(("goals", "goal_ids")),
        (Tier::Goal, Tier::Value) => Some(("values", "value_ids")),
        (Tier::Goal, Tier::Metric) => Some(("metrics", "metric_ids")),
        _ => None,
    }
}

/// Ids referenced by `item` through one relation.
///
/// The embedded form wins when it is a list; the id list is only read when
/// the embedded field is absent or not a list. Entries without an integer id
/// are skipped, and anything else counts as no relations at all.
pub fn relation_ids(item: &HierarchyItem, embedded: &str, id_list: &str) -> Vec<i64> {
    if let Some(refs) = item.field(embedded).and_then(|v| v.as_array()) {
        return refs
            .iter()
            .filter_map(|entry| entry.get("id").and_then(|id| id.as_i64()))
            .collect();
    }
    item.field(id_list)
        .and_then(|v| v.as_array())
        .map(|ids| ids.iter().filter_map(|id| id.as_i64()).collect())
        .unwrap_or_default()
}

/// Ids of `other` items that `item` (living in `tier`) points at.
pub fn outbound_ids(item: &HierarchyItem, tier: Tier, other: Tier) -> Vec<i64> {
    match relation_fields(tier, other) {
        Some((embedded, id_list)) => relation_ids(item, embedded, id_list),
        None => Vec::new(),
    }
}

pub fn resolve_links(data: &HierarchyData, pair: TierPair) -> Vec<Link> {
    let upper_tier = pair.upper();
    let lower_tier = pair.lower();
    let upper = data.tier(upper_tier);
    let lower = data.tier(lower_tier);
    let upper_ids: HashSet<i64> = upper.iter().map(|item| item.id).collect();
    let lower_ids: HashSet<i64> = lower.iter().map(|item| item.id).collect();

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    let mut push = |link: Link| {
        if seen.insert(link) {
            links.push(link);
        }
    };

    for item in upper {
        for target in outbound_ids(item, upper_tier, lower_tier) {
            if lower_ids.contains(&target) {
                push(Link {
                    source: item.id,
                    target,
                });
            } else {
                debug!(tier = %upper_tier, id = item.id, target, "dropping dangling {lower_tier} reference");
            }
        }
    }

    for item in lower {
        for source in outbound_ids(item, lower_tier, upper_tier) {
            if upper_ids.contains(&source) {
                push(Link {
                    source,
                    target: item.id,
                });
            } else {
                debug!(tier = %lower_tier, id = item.id, source, "dropping dangling {upper_tier} reference");
            }
        }
    }

    links
}

pub fn resolve_all(data: &HierarchyData) -> ResolvedLinks {
    ResolvedLinks {
        value_goal: resolve_links(data, TierPair::ValueGoal),
        goal_metric: resolve_links(data, TierPair::GoalMetric),
    }
}

/// Ids of `other` items linked to `(tier, id)`, in resolution order.
pub fn linked_ids(links: &ResolvedLinks, tier: Tier, id: i64, other: Tier) -> Vec<i64> {
    let Some(pair) = TierPair::between(tier, other) else {
        return Vec::new();
    };
    let upper_side = tier == pair.upper();
    links
        .get(pair)
        .iter()
        .filter_map(|link| {
            if upper_side && link.source == id {
                Some(link.target)
            } else if !upper_side && link.target == id {
                Some(link.source)
            } else {
                None
            }
        })
        .collect()
}
