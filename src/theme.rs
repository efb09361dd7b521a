use crate::ir::Tier;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Theme {
    pub font_family: String,
    pub font_size: f32,
    pub title_font_size: f32,
    pub subtitle_font_size: f32,
    pub text_color: String,
    pub row_label_color: String,
    pub value_color: String,
    pub goal_color: String,
    pub metric_color: String,
    pub box_border_color: String,
    pub box_border_width: f32,
    pub box_corner_radius: f32,
    pub line_color: String,
    pub line_width: f32,
    pub line_opacity: f32,
    pub placeholder_background: String,
    pub placeholder_border: String,
    pub placeholder_text_color: String,
    pub background: String,
}

impl Theme {
    /// Green values, blue goals, amber metrics.
    pub fn classic() -> Self {
        Self {
            font_family: "\"Helvetica Neue\", Helvetica, Arial, sans-serif".to_string(),
            font_size: 16.0,
            title_font_size: 16.0,
            subtitle_font_size: 12.0,
            text_color: "#FFFFFF".to_string(),
            row_label_color: "#333333".to_string(),
            value_color: "#4CAF50".to_string(),
            goal_color: "#2196F3".to_string(),
            metric_color: "#FFC107".to_string(),
            box_border_color: "#FFFFFF".to_string(),
            box_border_width: 2.0,
            box_corner_radius: 5.0,
            line_color: "#999999".to_string(),
            line_width: 3.0,
            line_opacity: 0.6,
            placeholder_background: "#CFF4FC".to_string(),
            placeholder_border: "#B6EFFB".to_string(),
            placeholder_text_color: "#055160".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn modern() -> Self {
        Self {
            font_family: "Inter, Segoe UI, system-ui, -apple-system, sans-serif".to_string(),
            font_size: 13.0,
            title_font_size: 14.0,
            subtitle_font_size: 11.0,
            text_color: "#1C2430".to_string(),
            row_label_color: "#4A5568".to_string(),
            value_color: "#E3F4E8".to_string(),
            goal_color: "#E4EEFB".to_string(),
            metric_color: "#FDF3DA".to_string(),
            box_border_color: "#C7D2E5".to_string(),
            box_border_width: 1.2,
            box_corner_radius: 10.0,
            line_color: "#7A8AA6".to_string(),
            line_width: 1.6,
            line_opacity: 0.9,
            placeholder_background: "#F7FAFF".to_string(),
            placeholder_border: "#D7E0F0".to_string(),
            placeholder_text_color: "#1C2430".to_string(),
            background: "#FFFFFF".to_string(),
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        match name {
            "classic" | "default" => Some(Self::classic()),
            "modern" => Some(Self::modern()),
            _ => None,
        }
    }

    pub fn tier_color(&self, tier: Tier) -> &str {
        match tier {
            Tier::Value => &self.value_color,
            Tier::Goal => &self.goal_color,
            Tier::Metric => &self.metric_color,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::classic()
    }
}
