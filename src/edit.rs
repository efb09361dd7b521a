//! Data behind the edit form opened when a box is activated.

use crate::ir::{HierarchyData, Tier};
use crate::relations::{linked_ids, resolve_all};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionOption {
    pub id: i64,
    pub name: String,
    pub checked: bool,
}

/// Checkbox list for one adjacent tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSection {
    pub tier: Tier,
    pub label: String,
    pub options: Vec<ConnectionOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditForm {
    pub tier: Tier,
    pub id: i64,
    pub name: String,
    pub description: String,
    pub sections: Vec<ConnectionSection>,
}

impl EditForm {
    /// Ids currently checked in the section for `tier`.
    pub fn selected(&self, tier: Tier) -> Vec<i64> {
        self.sections
            .iter()
            .filter(|section| section.tier == tier)
            .flat_map(|section| section.options.iter())
            .filter(|option| option.checked)
            .map(|option| option.id)
            .collect()
    }
}

/// Tiers an item of `tier` can be linked to, in display order.
pub fn adjacent_tiers(tier: Tier) -> &'static [Tier] {
    match tier {
        Tier::Value => &[Tier::Goal],
        Tier::Goal => &[Tier::Value, Tier::Metric],
        Tier::Metric => &[Tier::Goal],
    }
}

/// Build the edit form for `(tier, id)` from an explicit snapshot. Returns
/// `None` when the item is not part of `data`.
pub fn edit_form(data: &HierarchyData, tier: Tier, id: i64) -> Option<EditForm> {
    let item = data.find(tier, id)?;
    let links = resolve_all(data);
    let sections = adjacent_tiers(tier)
        .iter()
        .filter(|other| !data.tier(**other).is_empty())
        .map(|&other| {
            let linked = linked_ids(&links, tier, id, other);
            ConnectionSection {
                tier: other,
                label: format!("Connected {}", other.row_label()),
                options: data
                    .tier(other)
                    .iter()
                    .map(|candidate| ConnectionOption {
                        id: candidate.id,
                        name: candidate.name.clone(),
                        checked: linked.contains(&candidate.id),
                    })
                    .collect(),
            }
        })
        .collect();
    Some(EditForm {
        tier,
        id,
        name: item.name.clone(),
        description: item.description.clone().unwrap_or_default(),
        sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::HierarchyItem;

    fn data() -> HierarchyData {
        HierarchyData {
            values: vec![HierarchyItem::new(1, "Health"), HierarchyItem::new(2, "Family")],
            goals: vec![
                HierarchyItem::new(10, "Exercise")
                    .with_description("Move daily")
                    .with_refs("values", &[2])
                    .with_ids("metric_ids", &[20]),
            ],
            metrics: vec![HierarchyItem::new(20, "Steps"), HierarchyItem::new(21, "Runs")],
        }
    }

    #[test]
    fn goal_form_lists_values_and_metrics() {
        let form = edit_form(&data(), Tier::Goal, 10).expect("goal exists");
        assert_eq!(form.name, "Exercise");
        assert_eq!(form.description, "Move daily");
        let labels: Vec<&str> = form.sections.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Connected Values", "Connected Metrics"]);
        assert_eq!(form.selected(Tier::Value), vec![2]);
        assert_eq!(form.selected(Tier::Metric), vec![20]);
    }

    #[test]
    fn value_form_sees_links_declared_on_goals() {
        let form = edit_form(&data(), Tier::Value, 2).expect("value exists");
        assert_eq!(form.sections.len(), 1);
        assert_eq!(form.selected(Tier::Goal), vec![10]);
        let other = edit_form(&data(), Tier::Value, 1).expect("value exists");
        assert!(other.selected(Tier::Goal).is_empty());
        assert_eq!(other.description, "");
    }

    #[test]
    fn empty_adjacent_tiers_have_no_section() {
        let mut data = data();
        data.goals.clear();
        let form = edit_form(&data, Tier::Metric, 21).expect("metric exists");
        assert!(form.sections.is_empty());
    }

    #[test]
    fn unknown_items_have_no_form() {
        assert!(edit_form(&data(), Tier::Metric, 10).is_none());
    }
}
