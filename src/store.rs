//! Seam to the data-access collaborator, plus an in-process implementation.
//!
//! Hosts normally talk to a remote service; [`MemoryStore`] keeps the same
//! contract in memory so sessions can be driven end to end without one.

use crate::error::StoreError;
use crate::ir::{HierarchyData, HierarchyItem, Tier, TierPair};
use std::collections::{BTreeMap, BTreeSet};

/// Requested links per adjacent tier. `None` leaves a relation untouched,
/// `Some(vec![])` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Connections {
    pub value_ids: Option<Vec<i64>>,
    pub goal_ids: Option<Vec<i64>>,
    pub metric_ids: Option<Vec<i64>>,
}

impl Connections {
    pub fn with(mut self, tier: Tier, ids: Vec<i64>) -> Self {
        *self.slot_mut(tier) = Some(ids);
        self
    }

    pub fn get(&self, tier: Tier) -> Option<&[i64]> {
        match tier {
            Tier::Value => self.value_ids.as_deref(),
            Tier::Goal => self.goal_ids.as_deref(),
            Tier::Metric => self.metric_ids.as_deref(),
        }
    }

    fn slot_mut(&mut self, tier: Tier) -> &mut Option<Vec<i64>> {
        match tier {
            Tier::Value => &mut self.value_ids,
            Tier::Goal => &mut self.goal_ids,
            Tier::Metric => &mut self.metric_ids,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewItem {
    pub name: String,
    pub description: Option<String>,
    pub connections: Connections,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn linked(mut self, tier: Tier, ids: Vec<i64>) -> Self {
        self.connections = self.connections.with(tier, ids);
        self
    }
}

/// Field changes; `None` keeps the current value, an empty description
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub trait HierarchySource {
    type Error: std::error::Error;

    fn fetch(&self) -> Result<HierarchyData, Self::Error>;
    fn create(&mut self, tier: Tier, item: NewItem) -> Result<HierarchyItem, Self::Error>;
    fn update(&mut self, tier: Tier, id: i64, update: ItemUpdate) -> Result<HierarchyItem, Self::Error>;
    fn update_connections(
        &mut self,
        tier: Tier,
        id: i64,
        connections: Connections,
    ) -> Result<HierarchyItem, Self::Error>;
    fn delete(&mut self, tier: Tier, id: i64) -> Result<(), Self::Error>;
    /// Remove every item of every tier.
    fn reset(&mut self) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone)]
struct Record {
    name: String,
    description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MemoryStore {
    items: [BTreeMap<i64, Record>; 3],
    next_id: [i64; 3],
    /// `(upper id, lower id)` per [`TierPair`].
    value_goal: BTreeSet<(i64, i64)>,
    goal_metric: BTreeSet<(i64, i64)>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            items: [BTreeMap::new(), BTreeMap::new(), BTreeMap::new()],
            next_id: [1; 3],
            value_goal: BTreeSet::new(),
            goal_metric: BTreeSet::new(),
        }
    }

    fn pair_links(&self, pair: TierPair) -> &BTreeSet<(i64, i64)> {
        match pair {
            TierPair::ValueGoal => &self.value_goal,
            TierPair::GoalMetric => &self.goal_metric,
        }
    }

    fn pair_links_mut(&mut self, pair: TierPair) -> &mut BTreeSet<(i64, i64)> {
        match pair {
            TierPair::ValueGoal => &mut self.value_goal,
            TierPair::GoalMetric => &mut self.goal_metric,
        }
    }

    fn ensure_exists(&self, tier: Tier, id: i64) -> Result<(), StoreError> {
        if self.items[tier.row()].contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::NotFound { tier, id })
        }
    }

    /// Ids of `other` items linked to `(tier, id)`, ascending.
    fn linked(&self, tier: Tier, id: i64, other: Tier) -> Vec<i64> {
        let Some(pair) = TierPair::between(tier, other) else {
            return Vec::new();
        };
        let upper_side = tier == pair.upper();
        self.pair_links(pair)
            .iter()
            .filter_map(|&(upper, lower)| match upper_side {
                true if upper == id => Some(lower),
                false if lower == id => Some(upper),
                _ => None,
            })
            .collect()
    }

    /// Callers run [`check_connections`] first, so a rejected write leaves
    /// every relation untouched.
    fn apply_connections(&mut self, tier: Tier, id: i64, connections: &Connections) {
        for other in Tier::ALL {
            let Some(ids) = connections.get(other) else {
                continue;
            };
            let Some(pair) = TierPair::between(tier, other) else {
                continue;
            };
            let upper_side = tier == pair.upper();
            let known: Vec<i64> = ids
                .iter()
                .copied()
                .filter(|candidate| self.items[other.row()].contains_key(candidate))
                .collect();
            let links = self.pair_links_mut(pair);
            links.retain(|&(upper, lower)| if upper_side { upper != id } else { lower != id });
            for candidate in known {
                links.insert(if upper_side { (id, candidate) } else { (candidate, id) });
            }
        }
    }

    fn item(&self, tier: Tier, id: i64) -> Result<HierarchyItem, StoreError> {
        let record = self.items[tier.row()]
            .get(&id)
            .ok_or(StoreError::NotFound { tier, id })?;
        let mut item = HierarchyItem::new(id, record.name.clone());
        item.description = record.description.clone();
        item.extra
            .insert("type".to_string(), serde_json::Value::from(tier.as_str()));
        let fields: &[(Tier, &str)] = match tier {
            Tier::Value => &[(Tier::Goal, "goal_ids")],
            Tier::Goal => &[(Tier::Value, "value_ids"), (Tier::Metric, "metric_ids")],
            Tier::Metric => &[(Tier::Goal, "goal_ids")],
        };
        for (other, field) in fields {
            item = item.with_ids(field, &self.linked(tier, id, *other));
        }
        Ok(item)
    }
}

fn check_connections(tier: Tier, connections: &Connections) -> Result<(), StoreError> {
    for other in Tier::ALL {
        if connections.get(other).is_some() && TierPair::between(tier, other).is_none() {
            return Err(StoreError::InvalidLink { tier, other });
        }
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<String, StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    Ok(trimmed.to_string())
}

impl HierarchySource for MemoryStore {
    type Error = StoreError;

    fn fetch(&self) -> Result<HierarchyData, StoreError> {
        let mut data = HierarchyData::new();
        for tier in Tier::ALL {
            let ids: Vec<i64> = self.items[tier.row()].keys().copied().collect();
            for id in ids {
                let item = self.item(tier, id)?;
                data.tier_mut(tier).push(item);
            }
        }
        Ok(data)
    }

    fn create(&mut self, tier: Tier, item: NewItem) -> Result<HierarchyItem, StoreError> {
        let name = validate_name(&item.name)?;
        check_connections(tier, &item.connections)?;
        let slot = tier.row();
        let id = self.next_id[slot];
        self.next_id[slot] += 1;
        self.items[slot].insert(
            id,
            Record {
                name,
                description: item.description.filter(|text| !text.trim().is_empty()),
            },
        );
        self.apply_connections(tier, id, &item.connections);
        self.item(tier, id)
    }

    fn update(&mut self, tier: Tier, id: i64, update: ItemUpdate) -> Result<HierarchyItem, StoreError> {
        let name = update.name.as_deref().map(validate_name).transpose()?;
        let record = self.items[tier.row()]
            .get_mut(&id)
            .ok_or(StoreError::NotFound { tier, id })?;
        if let Some(name) = name {
            record.name = name;
        }
        if let Some(description) = update.description {
            record.description = Some(description).filter(|text| !text.trim().is_empty());
        }
        self.item(tier, id)
    }

    fn update_connections(
        &mut self,
        tier: Tier,
        id: i64,
        connections: Connections,
    ) -> Result<HierarchyItem, StoreError> {
        self.ensure_exists(tier, id)?;
        check_connections(tier, &connections)?;
        self.apply_connections(tier, id, &connections);
        self.item(tier, id)
    }

    fn delete(&mut self, tier: Tier, id: i64) -> Result<(), StoreError> {
        self.items[tier.row()]
            .remove(&id)
            .ok_or(StoreError::NotFound { tier, id })?;
        for pair in TierPair::ALL {
            if pair.upper() == tier {
                self.pair_links_mut(pair).retain(|&(upper, _)| upper != id);
            } else if pair.lower() == tier {
                self.pair_links_mut(pair).retain(|&(_, lower)| lower != id);
            }
        }
        Ok(())
    }

    fn reset(&mut self) -> Result<(), StoreError> {
        *self = Self::new();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relations::resolve_all;

    fn seeded() -> MemoryStore {
        let mut store = MemoryStore::new();
        store.create(Tier::Value, NewItem::named("Health")).unwrap();
        store.create(Tier::Value, NewItem::named("Family")).unwrap();
        store
            .create(
                Tier::Goal,
                NewItem::named("Exercise").linked(Tier::Value, vec![1, 99]),
            )
            .unwrap();
        store
            .create(Tier::Metric, NewItem::named("Steps").linked(Tier::Goal, vec![1]))
            .unwrap();
        store
    }

    #[test]
    fn fetch_uses_id_list_form_on_both_sides() {
        let data = seeded().fetch().unwrap();
        let health = data.find(Tier::Value, 1).unwrap();
        let goal = data.find(Tier::Goal, 1).unwrap();
        assert_eq!(health.field("goal_ids"), Some(&serde_json::json!([1])));
        assert_eq!(goal.field("value_ids"), Some(&serde_json::json!([1])));
        assert_eq!(goal.field("metric_ids"), Some(&serde_json::json!([1])));
        assert_eq!(goal.field("type"), Some(&serde_json::json!("goal")));
        let links = resolve_all(&data);
        assert_eq!(links.value_goal.len(), 1);
        assert_eq!(links.goal_metric.len(), 1);
    }

    #[test]
    fn blank_names_are_rejected() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.create(Tier::Value, NewItem::named("   ")),
            Err(StoreError::EmptyName)
        );
    }

    #[test]
    fn values_cannot_link_to_metrics() {
        let mut store = seeded();
        let err = store
            .update_connections(Tier::Value, 1, Connections::default().with(Tier::Metric, vec![1]))
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::InvalidLink {
                tier: Tier::Value,
                other: Tier::Metric
            }
        );
    }

    #[test]
    fn rejected_connection_update_changes_nothing() {
        let mut store = seeded();
        let request = Connections::default()
            .with(Tier::Goal, vec![])
            .with(Tier::Metric, vec![1]);
        assert_eq!(
            store.update_connections(Tier::Value, 1, request),
            Err(StoreError::InvalidLink {
                tier: Tier::Value,
                other: Tier::Metric
            })
        );
        let data = store.fetch().unwrap();
        let health = data.find(Tier::Value, 1).unwrap();
        assert_eq!(health.field("goal_ids"), Some(&serde_json::json!([1])));
        assert_eq!(resolve_all(&data).value_goal.len(), 1);
    }

    #[test]
    fn updating_connections_replaces_one_side_only() {
        let mut store = seeded();
        let goal = store
            .update_connections(Tier::Goal, 1, Connections::default().with(Tier::Value, vec![2]))
            .unwrap();
        assert_eq!(goal.field("value_ids"), Some(&serde_json::json!([2])));
        assert_eq!(goal.field("metric_ids"), Some(&serde_json::json!([1])));
        let data = store.fetch().unwrap();
        let family = data.find(Tier::Value, 2).unwrap();
        assert_eq!(family.field("goal_ids"), Some(&serde_json::json!([1])));
    }

    #[test]
    fn update_changes_fields() {
        let mut store = seeded();
        let item = store
            .update(
                Tier::Value,
                2,
                ItemUpdate {
                    name: Some("Friends".into()),
                    description: Some("People".into()),
                },
            )
            .unwrap();
        assert_eq!(item.name, "Friends");
        assert_eq!(item.description.as_deref(), Some("People"));
        assert_eq!(
            store.update(Tier::Goal, 7, ItemUpdate::default()),
            Err(StoreError::NotFound {
                tier: Tier::Goal,
                id: 7
            })
        );
    }

    #[test]
    fn delete_drops_links_and_reset_clears_everything() {
        let mut store = seeded();
        store.delete(Tier::Goal, 1).unwrap();
        let data = store.fetch().unwrap();
        assert!(data.goals.is_empty());
        assert_eq!(data.values[0].field("goal_ids"), Some(&serde_json::json!([])));
        assert!(store.delete(Tier::Goal, 1).is_err());

        store.reset().unwrap();
        assert!(store.fetch().unwrap().is_empty());
        let again = store.create(Tier::Value, NewItem::named("Health")).unwrap();
        assert_eq!(again.id, 1);
    }
}
