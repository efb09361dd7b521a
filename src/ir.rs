use crate::error::HierarchyError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One of the three fixed rows of the diagram, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Value,
    Goal,
    Metric,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Value, Tier::Goal, Tier::Metric];

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Value => "value",
            Tier::Goal => "goal",
            Tier::Metric => "metric",
        }
    }

    /// Zero-based row index, Values on top.
    pub fn row(self) -> usize {
        match self {
            Tier::Value => 0,
            Tier::Goal => 1,
            Tier::Metric => 2,
        }
    }

    pub fn row_label(self) -> &'static str {
        match self {
            Tier::Value => "Values",
            Tier::Goal => "Goals",
            Tier::Metric => "Metrics",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a drawn item. Ids only are unique within a tier.
pub type NodeKey = (Tier, i64);

/// The two pairs of adjacent tiers that may be linked. Values and Metrics are
/// never linked directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TierPair {
    ValueGoal,
    GoalMetric,
}

impl TierPair {
    pub const ALL: [TierPair; 2] = [TierPair::ValueGoal, TierPair::GoalMetric];

    pub fn upper(self) -> Tier {
        match self {
            TierPair::ValueGoal => Tier::Value,
            TierPair::GoalMetric => Tier::Goal,
        }
    }

    pub fn lower(self) -> Tier {
        match self {
            TierPair::ValueGoal => Tier::Goal,
            TierPair::GoalMetric => Tier::Metric,
        }
    }

    pub fn between(a: Tier, b: Tier) -> Option<Self> {
        match (a, b) {
            (Tier::Value, Tier::Goal) | (Tier::Goal, Tier::Value) => Some(TierPair::ValueGoal),
            (Tier::Goal, Tier::Metric) | (Tier::Metric, Tier::Goal) => Some(TierPair::GoalMetric),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyItem {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every other field of the payload item, relation lists included.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HierarchyItem {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            extra: serde_json::Map::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Attach an id-list relation field such as `value_ids`.
    pub fn with_ids(mut self, field: &str, ids: &[i64]) -> Self {
        let list = ids.iter().map(|id| serde_json::Value::from(*id)).collect();
        self.extra
            .insert(field.to_string(), serde_json::Value::Array(list));
        self
    }

    /// Attach an embedded relation field such as `values: [{"id": 1}]`.
    pub fn with_refs(mut self, field: &str, ids: &[i64]) -> Self {
        let list = ids
            .iter()
            .map(|id| serde_json::json!({ "id": id }))
            .collect();
        self.extra
            .insert(field.to_string(), serde_json::Value::Array(list));
        self
    }

    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.extra.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HierarchyData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub values: Vec<HierarchyItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub goals: Vec<HierarchyItem>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metrics: Vec<HierarchyItem>,
}

impl HierarchyData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self, tier: Tier) -> &[HierarchyItem] {
        match tier {
            Tier::Value => &self.values,
            Tier::Goal => &self.goals,
            Tier::Metric => &self.metrics,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut Vec<HierarchyItem> {
        match tier {
            Tier::Value => &mut self.values,
            Tier::Goal => &mut self.goals,
            Tier::Metric => &mut self.metrics,
        }
    }

    pub fn find(&self, tier: Tier, id: i64) -> Option<&HierarchyItem> {
        self.tier(tier).iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.goals.is_empty() && self.metrics.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.values.len() + self.goals.len() + self.metrics.len()
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<HierarchyItem>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<HierarchyItem>>::deserialize(deserializer)?.unwrap_or_default())
}

pub fn parse_hierarchy(input: &str) -> Result<HierarchyData, HierarchyError> {
    let data: HierarchyData = serde_json::from_str(input)?;
    for tier in Tier::ALL {
        for item in data.tier(tier) {
            if item.name.trim().is_empty() {
                return Err(HierarchyError::EmptyName { tier, id: item.id });
            }
        }
    }
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_payload_with_missing_and_null_tiers() {
        let data = parse_hierarchy(r#"{"values":[{"id":1,"name":"Health"}],"goals":null}"#)
            .expect("payload should parse");
        assert_eq!(data.values.len(), 1);
        assert!(data.goals.is_empty());
        assert!(data.metrics.is_empty());
    }

    #[test]
    fn keeps_relation_fields_in_extra() {
        let data = parse_hierarchy(
            r#"{"goals":[{"id":10,"name":"Exercise","type":"goal","value_ids":[1],"description":null}]}"#,
        )
        .expect("payload should parse");
        let goal = &data.goals[0];
        assert_eq!(goal.description, None);
        assert!(goal.field("value_ids").is_some());
        assert_eq!(goal.field("type").and_then(|v| v.as_str()), Some("goal"));
    }

    #[test]
    fn rejects_item_without_name() {
        let err = parse_hierarchy(r#"{"values":[{"id":1}]}"#).unwrap_err();
        assert!(matches!(err, HierarchyError::Json(_)));
        let err = parse_hierarchy(r#"{"values":[{"id":1,"name":"  "}]}"#).unwrap_err();
        assert!(matches!(
            err,
            HierarchyError::EmptyName {
                tier: Tier::Value,
                id: 1
            }
        ));
    }

    #[test]
    fn tier_names_and_pairs() {
        assert_eq!(TierPair::between(Tier::Goal, Tier::Value), Some(TierPair::ValueGoal));
        assert_eq!(TierPair::between(Tier::Value, Tier::Metric), None);
        assert_eq!(serde_json::to_string(&Tier::Goal).unwrap(), "\"goal\"");
        assert_eq!(Tier::Metric.row_label(), "Metrics");
        assert_eq!(Tier::Value.to_string(), "value");
    }
}
