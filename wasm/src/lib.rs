use hierarchy_rs_renderer::interaction::InteractionDispatcher;
use hierarchy_rs_renderer::{RenderOptions, Theme, compute_layout, parse_hierarchy, render_svg};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HierarchyRenderOptions {
    theme: Option<String>,
    font_family: Option<String>,
    font_size: Option<f32>,
    width: Option<f32>,
    height: Option<f32>,
    fast_text: Option<bool>,
}

#[derive(Debug, Serialize)]
struct HitResult {
    tier: String,
    id: i64,
}

fn parse_options(options_json: Option<String>) -> Result<HierarchyRenderOptions, JsValue> {
    match options_json {
        Some(raw) => serde_json::from_str(&raw).map_err(|error| JsValue::from_str(&error.to_string())),
        None => Ok(HierarchyRenderOptions::default()),
    }
}

fn build_render_options(options: HierarchyRenderOptions) -> Result<RenderOptions, String> {
    let mut render_options = RenderOptions::classic();
    if let Some(name) = options.theme.as_deref() {
        render_options.theme = Theme::by_name(name).ok_or_else(|| format!("unknown theme '{name}'"))?;
    }
    if let Some(font_family) = options.font_family {
        render_options.theme.font_family = font_family;
    }
    if let Some(font_size) = options.font_size {
        render_options.theme.font_size = font_size;
    }
    if let Some(width) = options.width {
        render_options.layout.canvas_width = width;
    }
    if let Some(height) = options.height {
        render_options.layout.canvas_height = height;
    }
    // No system fonts in the browser; glyph tables only help natively.
    render_options.layout.fast_text_metrics = options.fast_text.unwrap_or(true);
    Ok(render_options)
}

fn to_js(error: impl ToString) -> JsValue {
    JsValue::from_str(&error.to_string())
}

#[wasm_bindgen]
pub fn render_hierarchy_svg(payload_json: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = build_render_options(parse_options(options_json)?).map_err(to_js)?;
    hierarchy_rs_renderer::render_hierarchy_svg(payload_json, &options).map_err(to_js)
}

/// Box under `(x, y)` as `{"tier": "goal", "id": 3}`, or `null` when the
/// point misses every box.
#[wasm_bindgen]
pub fn hit_test(
    payload_json: &str,
    options_json: Option<String>,
    x: f32,
    y: f32,
) -> Result<Option<String>, JsValue> {
    let options = build_render_options(parse_options(options_json)?).map_err(to_js)?;
    locate(payload_json, &options, x, y).map_err(to_js)
}

fn locate(payload_json: &str, options: &RenderOptions, x: f32, y: f32) -> Result<Option<String>, String> {
    let data = parse_hierarchy(payload_json).map_err(|error| error.to_string())?;
    let layout = compute_layout(&data, &options.theme, &options.layout);
    let mut hit = None;
    InteractionDispatcher::attach(&layout, |tier, id| {
        hit = Some(HitResult {
            tier: tier.to_string(),
            id,
        })
    })
    .activate_at(x, y);
    hit.map(|hit| serde_json::to_string(&hit))
        .transpose()
        .map_err(|error| error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAYLOAD: &str = r#"{
        "values": [{"id": 1, "name": "Health"}],
        "goals": [{"id": 10, "name": "Exercise", "value_ids": [1]}],
        "metrics": []
    }"#;

    #[test]
    fn renders_payload_with_default_options() {
        let options = build_render_options(HierarchyRenderOptions::default()).unwrap();
        let svg = hierarchy_rs_renderer::render_hierarchy_svg(PAYLOAD, &options)
            .expect("payload should render");
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Health"));
        assert!(svg.contains("Exercise"));
    }

    #[test]
    fn rejects_unknown_theme() {
        let options = HierarchyRenderOptions {
            theme: Some("neon".to_string()),
            ..HierarchyRenderOptions::default()
        };
        assert!(build_render_options(options).is_err());
    }

    #[test]
    fn hit_test_finds_goal_box() {
        let options = build_render_options(HierarchyRenderOptions::default()).unwrap();
        // Single goal on an 800x600 canvas: x 310..490, y 300..380.
        let hit = locate(PAYLOAD, &options, 400.0, 340.0).unwrap();
        assert_eq!(hit.as_deref(), Some(r#"{"tier":"goal","id":10}"#));
        assert_eq!(locate(PAYLOAD, &options, 5.0, 5.0).unwrap(), None);
    }
}
