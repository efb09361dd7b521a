use crate::layout::Layout;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

#[derive(Debug, Serialize)]
pub struct LayoutDump {
    pub width: f32,
    pub height: f32,
    pub placeholder: Option<String>,
    pub labels: Vec<LabelDump>,
    pub nodes: Vec<NodeDump>,
    pub edges: Vec<EdgeDump>,
}

#[derive(Debug, Serialize)]
pub struct LabelDump {
    pub text: String,
    pub x: f32,
    pub y: f32,
}

#[derive(Debug, Serialize)]
pub struct NodeDump {
    pub tier: String,
    pub id: i64,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub title: String,
    pub subtitle: String,
}

#[derive(Debug, Serialize)]
pub struct EdgeDump {
    pub from: String,
    pub to: String,
    pub points: Vec<[f32; 2]>,
}

impl LayoutDump {
    pub fn from_layout(layout: &Layout) -> Self {
        let labels = layout
            .labels
            .iter()
            .map(|label| LabelDump {
                text: label.text.clone(),
                x: label.x,
                y: label.y,
            })
            .collect();

        let nodes = layout
            .nodes
            .iter()
            .map(|node| NodeDump {
                tier: node.tier.to_string(),
                id: node.id,
                x: node.x,
                y: node.y,
                width: node.width,
                height: node.height,
                title: node.title.clone(),
                subtitle: node.subtitle.clone(),
            })
            .collect();

        let edges = layout
            .edges
            .iter()
            .map(|edge| EdgeDump {
                from: format!("{}:{}", edge.from.0, edge.from.1),
                to: format!("{}:{}", edge.to.0, edge.to.1),
                points: edge.points.iter().map(|(x, y)| [*x, *y]).collect(),
            })
            .collect();

        LayoutDump {
            width: layout.width,
            height: layout.height,
            placeholder: layout
                .placeholder
                .as_ref()
                .map(|placeholder| placeholder.message.clone()),
            labels,
            nodes,
            edges,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub fn write_layout_dump(path: &Path, layout: &Layout) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    let dump = LayoutDump::from_layout(layout);
    serde_json::to_writer_pretty(writer, &dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::ir::{HierarchyData, HierarchyItem};
    use crate::layout::compute_layout;
    use crate::theme::Theme;

    #[test]
    fn dump_names_edges_by_tier_and_id() {
        let data = HierarchyData {
            values: vec![HierarchyItem::new(1, "Health")],
            goals: vec![HierarchyItem::new(10, "Exercise").with_ids("value_ids", &[1])],
            metrics: vec![],
        };
        let config = LayoutConfig {
            fast_text_metrics: true,
            ..LayoutConfig::default()
        };
        let layout = compute_layout(&data, &Theme::classic(), &config);
        let dump = LayoutDump::from_layout(&layout);
        assert_eq!(dump.nodes.len(), 2);
        assert_eq!(dump.edges[0].from, "value:1");
        assert_eq!(dump.edges[0].to, "goal:10");
        let json: serde_json::Value = serde_json::from_str(&dump.to_json().unwrap()).unwrap();
        assert_eq!(json["nodes"][1]["tier"], "goal");
        assert!(json["placeholder"].is_null());
    }
}
