pub mod routing;
pub mod rows;
pub(crate) mod text;
pub(crate) mod types;
pub use types::*;

use crate::config::LayoutConfig;
use crate::ir::{HierarchyData, HierarchyItem, NodeKey, Tier, TierPair};
use crate::relations::{ResolvedLinks, resolve_all};
use crate::theme::Theme;
use routing::connector_points;
use rows::{canvas_height, canvas_width, layout_tier, row_y};
use std::collections::HashMap;
use text::fit_label;

const PLACEHOLDER_HEIGHT: f32 = 56.0;

pub fn compute_layout(data: &HierarchyData, theme: &Theme, config: &LayoutConfig) -> Layout {
    let links = resolve_all(data);
    layout_with_links(data, &links, theme, config)
}

/// Lay out `data` using links that were already resolved.
pub fn layout_with_links(
    data: &HierarchyData,
    links: &ResolvedLinks,
    theme: &Theme,
    config: &LayoutConfig,
) -> Layout {
    if data.is_empty() {
        return placeholder_layout(config);
    }
    let width = canvas_width(data, config);
    let height = canvas_height(config);

    let mut labels = Vec::with_capacity(Tier::ALL.len());
    let mut nodes = Vec::with_capacity(data.item_count());
    for tier in Tier::ALL {
        let y = row_y(tier, height);
        labels.push(RowLabel {
            tier,
            text: tier.row_label().to_string(),
            x: config.label_x,
            y: y - config.label_offset,
        });
        let items = data.tier(tier);
        for (slot, item) in layout_tier(items, y, width, config).into_iter().zip(items) {
            nodes.push(node_box(item, tier, slot.x, slot.y, theme, config));
        }
    }

    let index: HashMap<NodeKey, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.key(), idx))
        .collect();
    let mut edges = Vec::with_capacity(links.len());
    for pair in TierPair::ALL {
        for link in links.get(pair) {
            let from = (pair.upper(), link.source);
            let to = (pair.lower(), link.target);
            let (Some(&src), Some(&dst)) = (index.get(&from), index.get(&to)) else {
                continue;
            };
            edges.push(EdgeLayout {
                from,
                to,
                points: connector_points(&nodes[src], &nodes[dst]),
            });
        }
    }

    Layout {
        width,
        height,
        labels,
        edges,
        nodes,
        placeholder: None,
    }
}

fn node_box(
    item: &HierarchyItem,
    tier: Tier,
    x: f32,
    y: f32,
    theme: &Theme,
    config: &LayoutConfig,
) -> NodeBox {
    let max_text = (config.box_width - 2.0 * config.text_padding).max(0.0);
    let description = item
        .description
        .as_deref()
        .filter(|text| !text.trim().is_empty())
        .unwrap_or(&config.description_fallback);
    NodeBox {
        id: item.id,
        tier,
        x,
        y,
        width: config.box_width,
        height: config.box_height,
        title: fit_label(
            &item.name,
            max_text,
            theme.title_font_size,
            &theme.font_family,
            config.fast_text_metrics,
        ),
        subtitle: fit_label(
            description,
            max_text,
            theme.subtitle_font_size,
            &theme.font_family,
            config.fast_text_metrics,
        ),
    }
}

fn placeholder_layout(config: &LayoutConfig) -> Layout {
    let pad = config.canvas_padding;
    let width = config.canvas_width.max(2.0 * pad + 1.0);
    Layout {
        width,
        height: PLACEHOLDER_HEIGHT + 2.0 * pad,
        labels: Vec::new(),
        edges: Vec::new(),
        nodes: Vec::new(),
        placeholder: Some(Placeholder {
            message: config.empty_message.clone(),
            x: pad,
            y: pad,
            width: width - 2.0 * pad,
            height: PLACEHOLDER_HEIGHT,
        }),
    }
}
