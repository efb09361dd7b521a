use crate::theme::Theme;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_EMPTY_MESSAGE: &str =
    "No data yet. Add values, goals, and metrics to visualize them.";
pub const DEFAULT_DESCRIPTION_FALLBACK: &str = "No description";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub canvas_padding: f32,
    pub box_width: f32,
    pub box_height: f32,
    pub box_margin: f32,
    pub min_row_width: f32,
    pub label_x: f32,
    pub label_offset: f32,
    pub text_padding: f32,
    pub fast_text_metrics: bool,
    pub empty_message: String,
    pub description_fallback: String,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800.0,
            canvas_height: 600.0,
            canvas_padding: 20.0,
            box_width: 180.0,
            box_height: 80.0,
            box_margin: 20.0,
            min_row_width: 10.0,
            label_x: 20.0,
            label_offset: 20.0,
            text_padding: 8.0,
            fast_text_metrics: false,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
            description_fallback: DEFAULT_DESCRIPTION_FALLBACK.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Pixel density multiplier for raster output.
    pub scale: f32,
    pub background: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            background: "#FFFFFF".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub theme: Theme,
    pub layout: LayoutConfig,
    pub render: RenderConfig,
}

impl Default for Config {
    fn default() -> Self {
        let theme = Theme::classic();
        let render = RenderConfig {
            background: theme.background.clone(),
            ..Default::default()
        };
        Self {
            theme,
            layout: LayoutConfig::default(),
            render,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    font_family: Option<String>,
    font_size: Option<f32>,
    title_font_size: Option<f32>,
    subtitle_font_size: Option<f32>,
    text_color: Option<String>,
    row_label_color: Option<String>,
    value_color: Option<String>,
    goal_color: Option<String>,
    metric_color: Option<String>,
    box_border_color: Option<String>,
    line_color: Option<String>,
    line_width: Option<f32>,
    line_opacity: Option<f32>,
    background: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LayoutConfigFile {
    width: Option<f32>,
    height: Option<f32>,
    padding: Option<f32>,
    box_width: Option<f32>,
    box_height: Option<f32>,
    box_margin: Option<f32>,
    text_padding: Option<f32>,
    fast_text_metrics: Option<bool>,
    empty_message: Option<String>,
    description_fallback: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    layout: Option<LayoutConfigFile>,
    scale: Option<f32>,
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let contents = std::fs::read_to_string(path)?;
    parse_config(&contents)
}

/// Parse a JSON5 config document and merge it over the defaults.
pub fn parse_config(contents: &str) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let parsed: ConfigFile = json5::from_str(contents)?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        config.theme = Theme::by_name(theme_name)
            .ok_or_else(|| anyhow::anyhow!("unknown theme: {theme_name}"))?;
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.font_family {
            config.theme.font_family = v;
        }
        if let Some(v) = vars.font_size {
            config.theme.font_size = v;
        }
        if let Some(v) = vars.title_font_size {
            config.theme.title_font_size = v;
        }
        if let Some(v) = vars.subtitle_font_size {
            config.theme.subtitle_font_size = v;
        }
        if let Some(v) = vars.text_color {
            config.theme.text_color = v;
        }
        if let Some(v) = vars.row_label_color {
            config.theme.row_label_color = v;
        }
        if let Some(v) = vars.value_color {
            config.theme.value_color = v;
        }
        if let Some(v) = vars.goal_color {
            config.theme.goal_color = v;
        }
        if let Some(v) = vars.metric_color {
            config.theme.metric_color = v;
        }
        if let Some(v) = vars.box_border_color {
            config.theme.box_border_color = v;
        }
        if let Some(v) = vars.line_color {
            config.theme.line_color = v;
        }
        if let Some(v) = vars.line_width {
            config.theme.line_width = v;
        }
        if let Some(v) = vars.line_opacity {
            config.theme.line_opacity = v.clamp(0.0, 1.0);
        }
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
    }
    config.render.background = config.theme.background.clone();

    if let Some(layout) = parsed.layout {
        if let Some(v) = layout.width {
            config.layout.canvas_width = v;
        }
        if let Some(v) = layout.height {
            config.layout.canvas_height = v;
        }
        if let Some(v) = layout.padding {
            config.layout.canvas_padding = v.max(0.0);
        }
        if let Some(v) = layout.box_width {
            config.layout.box_width = v.max(1.0);
        }
        if let Some(v) = layout.box_height {
            config.layout.box_height = v.max(1.0);
        }
        if let Some(v) = layout.box_margin {
            config.layout.box_margin = v.max(0.0);
        }
        if let Some(v) = layout.text_padding {
            config.layout.text_padding = v.max(0.0);
        }
        if let Some(v) = layout.fast_text_metrics {
            config.layout.fast_text_metrics = v;
        }
        if let Some(v) = layout.empty_message {
            config.layout.empty_message = v;
        }
        if let Some(v) = layout.description_fallback {
            config.layout.description_fallback = v;
        }
    }

    if let Some(scale) = parsed.scale {
        config.render.scale = scale.max(0.1);
    }

    Ok(config)
}
