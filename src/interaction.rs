//! Click handling for drawn boxes.
//!
//! The dispatcher is the only channel through which the diagram tells the
//! host that an item was activated; what happens next (usually opening an
//! edit form, see [`crate::edit`]) is up to the callback.

use crate::ir::{NodeKey, Tier};
use crate::layout::Layout;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitRegion {
    pub key: NodeKey,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl HitRegion {
    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }
}

pub struct InteractionDispatcher<F>
where
    F: FnMut(Tier, i64),
{
    regions: Vec<HitRegion>,
    callback: F,
}

impl<F> InteractionDispatcher<F>
where
    F: FnMut(Tier, i64),
{
    /// Register one handler per box of `layout`, in draw order.
    pub fn attach(layout: &Layout, callback: F) -> Self {
        let regions = layout
            .nodes
            .iter()
            .map(|node| HitRegion {
                key: node.key(),
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
            })
            .collect();
        Self { regions, callback }
    }

    pub fn targets(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.regions.iter().map(|region| region.key)
    }

    /// Fire the handler of the box drawn for `(tier, id)`. Returns `false`
    /// without calling back when no such box exists.
    pub fn activate(&mut self, tier: Tier, id: i64) -> bool {
        if !self.regions.iter().any(|region| region.key == (tier, id)) {
            return false;
        }
        (self.callback)(tier, id);
        true
    }

    /// Fire the handler of the topmost box under `(x, y)`.
    pub fn activate_at(&mut self, x: f32, y: f32) -> Option<NodeKey> {
        let key = hit_test(&self.regions, x, y)?;
        (self.callback)(key.0, key.1);
        Some(key)
    }
}

/// Later regions are drawn on top, so they win.
pub fn hit_test(regions: &[HitRegion], x: f32, y: f32) -> Option<NodeKey> {
    regions
        .iter()
        .rev()
        .find(|region| region.contains(x, y))
        .map(|region| region.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{HierarchyData, HierarchyItem};
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    fn layout() -> Layout {
        let data = HierarchyData {
            values: vec![HierarchyItem::new(1, "Health")],
            goals: vec![HierarchyItem::new(1, "Exercise").with_ids("value_ids", &[1])],
            metrics: vec![HierarchyItem::new(7, "Runs")],
        };
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        compute_layout(&data, &Theme::classic(), &config)
    }

    #[test]
    fn one_target_per_box() {
        let layout = layout();
        let dispatcher = InteractionDispatcher::attach(&layout, |_, _| {});
        let keys: Vec<NodeKey> = dispatcher.targets().collect();
        assert_eq!(keys, vec![(Tier::Value, 1), (Tier::Goal, 1), (Tier::Metric, 7)]);
    }

    #[test]
    fn activation_reports_tier_and_id() {
        let layout = layout();
        let mut seen = Vec::new();
        {
            let mut dispatcher = InteractionDispatcher::attach(&layout, |tier, id| seen.push((tier, id)));
            assert!(dispatcher.activate(Tier::Goal, 1));
            assert!(!dispatcher.activate(Tier::Metric, 1));
            let goal = layout.node((Tier::Goal, 1)).expect("goal box");
            let hit = dispatcher.activate_at(goal.center_x(), goal.y + 1.0);
            assert_eq!(hit, Some((Tier::Goal, 1)));
            assert_eq!(dispatcher.activate_at(-5.0, -5.0), None);
        }
        assert_eq!(seen, vec![(Tier::Goal, 1), (Tier::Goal, 1)]);
    }

    #[test]
    fn topmost_region_wins() {
        let regions = [
            HitRegion {
                key: (Tier::Value, 1),
                x: 0.0,
                y: 0.0,
                width: 10.0,
                height: 10.0,
            },
            HitRegion {
                key: (Tier::Value, 2),
                x: 5.0,
                y: 5.0,
                width: 10.0,
                height: 10.0,
            },
        ];
        assert_eq!(hit_test(&regions, 6.0, 6.0), Some((Tier::Value, 2)));
        assert_eq!(hit_test(&regions, 1.0, 1.0), Some((Tier::Value, 1)));
    }
}
