// Row placement: every tier is one horizontal row of equally sized boxes,
// centered on its own item count.

use crate::config::LayoutConfig;
use crate::ir::{HierarchyData, HierarchyItem, Tier};

/// Top-left corner assigned to one item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub id: i64,
    pub x: f32,
    pub y: f32,
}

/// Width taken by `count` boxes and the margins between them.
pub fn row_content_width(count: usize, config: &LayoutConfig) -> f32 {
    if count == 0 {
        return 0.0;
    }
    let pitch = config.box_width + config.box_margin;
    (count as f32 * pitch - config.box_margin).max(config.min_row_width)
}

/// Configured width, widened so the longest row plus padding fits. Boxes are
/// never shrunk.
pub fn canvas_width(data: &HierarchyData, config: &LayoutConfig) -> f32 {
    let widest = Tier::ALL
        .iter()
        .map(|tier| row_content_width(data.tier(*tier).len(), config))
        .fold(0.0, f32::max);
    config
        .canvas_width
        .max(widest + 2.0 * config.canvas_padding)
}

/// Configured height, grown so the bottom row still clears the padding.
pub fn canvas_height(config: &LayoutConfig) -> f32 {
    config
        .canvas_height
        .max(4.0 * (config.box_height + config.canvas_padding))
}

/// Rows sit at 1/4, 2/4 and 3/4 of the canvas height.
pub fn row_y(tier: Tier, canvas_height: f32) -> f32 {
    canvas_height / 4.0 * (tier.row() + 1) as f32
}

pub fn layout_tier(
    items: &[HierarchyItem],
    row_y: f32,
    canvas_width: f32,
    config: &LayoutConfig,
) -> Vec<Slot> {
    let pitch = config.box_width + config.box_margin;
    let start_x = (canvas_width - row_content_width(items.len(), config)) / 2.0;
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| Slot {
            id: item.id,
            x: start_x + idx as f32 * pitch,
            y: row_y,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(count: usize) -> Vec<HierarchyItem> {
        (0..count)
            .map(|idx| HierarchyItem::new(idx as i64 + 1, format!("Item {idx}")))
            .collect()
    }

    #[test]
    fn content_width_counts_inner_margins_only() {
        let config = LayoutConfig::default();
        assert_eq!(row_content_width(0, &config), 0.0);
        assert_eq!(row_content_width(1, &config), 180.0);
        assert_eq!(row_content_width(3, &config), 3.0 * 200.0 - 20.0);
    }

    #[test]
    fn content_width_is_floored() {
        let config = LayoutConfig {
            box_width: 4.0,
            box_margin: 0.0,
            ..LayoutConfig::default()
        };
        assert_eq!(row_content_width(1, &config), config.min_row_width);
    }

    #[test]
    fn single_box_is_centered() {
        let config = LayoutConfig::default();
        let slots = layout_tier(&items(1), 150.0, 800.0, &config);
        assert_eq!(slots.len(), 1);
        assert_eq!(slots[0].x, (800.0 - 180.0) / 2.0);
        assert_eq!(slots[0].y, 150.0);
    }

    #[test]
    fn rows_center_independently() {
        let config = LayoutConfig::default();
        let two = layout_tier(&items(2), 0.0, 800.0, &config);
        let three = layout_tier(&items(3), 0.0, 800.0, &config);
        for slots in [&two, &three] {
            let left = slots[0].x;
            let right = slots[slots.len() - 1].x + config.box_width;
            assert!((left - (800.0 - right)).abs() < 1e-3);
        }
        assert_ne!(two[0].x, three[0].x);
    }

    #[test]
    fn slots_keep_input_order_and_spacing() {
        let config = LayoutConfig::default();
        let slots = layout_tier(&items(4), 0.0, 1000.0, &config);
        let ids: Vec<i64> = slots.iter().map(|slot| slot.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        for pair in slots.windows(2) {
            assert_eq!(pair[1].x - pair[0].x, 200.0);
        }
    }

    #[test]
    fn canvas_widens_for_the_widest_row() {
        let config = LayoutConfig::default();
        let data = HierarchyData {
            values: items(1),
            goals: items(6),
            metrics: items(2),
        };
        let width = canvas_width(&data, &config);
        assert_eq!(width, 6.0 * 200.0 - 20.0 + 40.0);
        let narrow = HierarchyData {
            values: items(2),
            ..HierarchyData::default()
        };
        assert_eq!(canvas_width(&narrow, &config), 800.0);
    }

    #[test]
    fn rows_are_evenly_spaced() {
        assert_eq!(row_y(Tier::Value, 600.0), 150.0);
        assert_eq!(row_y(Tier::Goal, 600.0), 300.0);
        assert_eq!(row_y(Tier::Metric, 600.0), 450.0);
        let config = LayoutConfig {
            canvas_height: 100.0,
            ..LayoutConfig::default()
        };
        assert_eq!(canvas_height(&config), 400.0);
    }
}
