use crate::config::{Config, LayoutConfig, RenderConfig};
use crate::error::RenderError;
use crate::ir::HierarchyData;
use crate::layout::routing::{PathCommand, basis_commands};
use crate::layout::{Layout, NodeBox, Placeholder, compute_layout};
use crate::theme::Theme;
use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub theme: Theme,
    pub layout: LayoutConfig,
}

impl RenderOptions {
    pub fn classic() -> Self {
        Self::default()
    }
}

impl From<&Config> for RenderOptions {
    fn from(config: &Config) -> Self {
        Self {
            theme: config.theme.clone(),
            layout: config.layout.clone(),
        }
    }
}

/// Surface a rendered scene is painted onto. Every render replaces the whole
/// previous drawing.
pub trait RenderTarget {
    fn describe(&self) -> String;

    /// Whether the surface can currently be drawn on.
    fn is_attached(&self) -> bool {
        true
    }

    fn replace(&mut self, svg: &str) -> Result<(), RenderError>;
}

/// In-memory surface holding the last rendered document.
#[derive(Debug, Clone, Default)]
pub struct SvgBuffer {
    svg: Option<String>,
    renders: usize,
}

impl SvgBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.svg.as_deref()
    }

    pub fn render_count(&self) -> usize {
        self.renders
    }
}

impl RenderTarget for SvgBuffer {
    fn describe(&self) -> String {
        "in-memory buffer".to_string()
    }

    fn replace(&mut self, svg: &str) -> Result<(), RenderError> {
        self.svg = Some(svg.to_string());
        self.renders += 1;
        Ok(())
    }
}

/// An SVG file on disk. Its directory has to exist already.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RenderTarget for FileTarget {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn is_attached(&self) -> bool {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.is_dir(),
            _ => true,
        }
    }

    fn replace(&mut self, svg: &str) -> Result<(), RenderError> {
        std::fs::write(&self.path, svg).map_err(|source| RenderError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

/// Lay out `data` and paint it onto `target`, superseding whatever it showed.
///
/// A detached target fails before any layout work is done. Irregular payload
/// data never fails a render.
pub fn render<T: RenderTarget + ?Sized>(
    target: &mut T,
    data: &HierarchyData,
    options: &RenderOptions,
) -> Result<Layout, RenderError> {
    if !target.is_attached() {
        return Err(RenderError::MissingTarget(target.describe()));
    }
    let layout = compute_layout(data, &options.theme, &options.layout);
    let svg = render_svg(&layout, &options.theme);
    target.replace(&svg)?;
    debug!(
        target = %target.describe(),
        boxes = layout.nodes.len(),
        edges = layout.edges.len(),
        "rendered hierarchy"
    );
    Ok(layout)
}

pub fn render_svg(layout: &Layout, theme: &Theme) -> String {
    let mut svg = String::new();
    let width = layout.width;
    let height = layout.height;

    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" class=\"hierarchy-svg\" width=\"{width:.2}\" height=\"{height:.2}\" viewBox=\"0 0 {width:.2} {height:.2}\">",
    ));
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{}\"/>",
        escape_xml(&theme.background)
    ));

    if let Some(placeholder) = &layout.placeholder {
        push_placeholder(&mut svg, placeholder, theme);
        svg.push_str("</svg>");
        return svg;
    }

    for label in &layout.labels {
        svg.push_str(&format!(
            "<text class=\"row-label\" x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
            label.x,
            label.y,
            escape_xml(&theme.font_family),
            theme.font_size,
            escape_xml(&theme.row_label_color),
            escape_xml(&label.text)
        ));
    }

    // Connectors go first so boxes are painted over them.
    for edge in &layout.edges {
        svg.push_str(&format!(
            "<path class=\"link\" data-from=\"{}:{}\" data-to=\"{}:{}\" d=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" opacity=\"{}\"/>",
            edge.from.0,
            edge.from.1,
            edge.to.0,
            edge.to.1,
            points_to_path(&edge.points),
            escape_xml(&theme.line_color),
            theme.line_width,
            theme.line_opacity
        ));
    }

    for node in &layout.nodes {
        push_node(&mut svg, node, theme);
    }

    svg.push_str("</svg>");
    svg
}

fn push_node(svg: &mut String, node: &NodeBox, theme: &Theme) {
    svg.push_str(&format!(
        "<g class=\"node {tier}\" data-tier=\"{tier}\" data-id=\"{}\" transform=\"translate({:.2}, {:.2})\">",
        node.id,
        node.x,
        node.y,
        tier = node.tier
    ));
    svg.push_str(&format!(
        "<rect width=\"{:.2}\" height=\"{:.2}\" rx=\"{r}\" ry=\"{r}\" fill=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        node.width,
        node.height,
        escape_xml(theme.tier_color(node.tier)),
        escape_xml(&theme.box_border_color),
        theme.box_border_width,
        r = theme.box_corner_radius
    ));
    let center_x = node.width / 2.0;
    svg.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" font-weight=\"bold\" fill=\"{}\">{}</text>",
        node.height / 3.0,
        escape_xml(&theme.font_family),
        theme.title_font_size,
        escape_xml(&theme.text_color),
        escape_xml(&node.title)
    ));
    svg.push_str(&format!(
        "<text x=\"{center_x:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        node.height * 2.0 / 3.0,
        escape_xml(&theme.font_family),
        theme.subtitle_font_size,
        escape_xml(&theme.text_color),
        escape_xml(&node.subtitle)
    ));
    svg.push_str("</g>");
}

fn push_placeholder(svg: &mut String, placeholder: &Placeholder, theme: &Theme) {
    svg.push_str(&format!(
        "<rect class=\"placeholder\" x=\"{:.2}\" y=\"{:.2}\" width=\"{:.2}\" height=\"{:.2}\" rx=\"6\" ry=\"6\" fill=\"{}\" stroke=\"{}\"/>",
        placeholder.x,
        placeholder.y,
        placeholder.width,
        placeholder.height,
        escape_xml(&theme.placeholder_background),
        escape_xml(&theme.placeholder_border)
    ));
    svg.push_str(&format!(
        "<text x=\"{:.2}\" y=\"{:.2}\" text-anchor=\"middle\" dominant-baseline=\"middle\" font-family=\"{}\" font-size=\"{}\" fill=\"{}\">{}</text>",
        placeholder.x + placeholder.width / 2.0,
        placeholder.y + placeholder.height / 2.0,
        escape_xml(&theme.font_family),
        theme.font_size,
        escape_xml(&theme.placeholder_text_color),
        escape_xml(&placeholder.message)
    ));
}

fn points_to_path(points: &[(f32, f32)]) -> String {
    let mut d = String::new();
    for command in basis_commands(points) {
        if !d.is_empty() {
            d.push(' ');
        }
        let segment = match command {
            PathCommand::MoveTo((x, y)) => format!("M {x:.2} {y:.2}"),
            PathCommand::LineTo((x, y)) => format!("L {x:.2} {y:.2}"),
            PathCommand::CubicTo((x1, y1), (x2, y2), (x, y)) => {
                format!("C {x1:.2} {y1:.2} {x2:.2} {y2:.2} {x:.2} {y:.2}")
            }
        };
        d.push_str(&segment);
    }
    d
}

pub fn write_output_svg(svg: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, svg)?;
        }
        None => {
            print!("{}", svg);
        }
    }
    Ok(())
}

#[cfg(feature = "png")]
pub fn write_output_png(svg: &str, output: &Path, render_cfg: &RenderConfig) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.fontdb_mut().load_system_fonts();

    let tree = usvg::Tree::from_str(svg, &opt)?;
    let scale = render_cfg.scale.max(0.1);
    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width.max(1), height.max(1))
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;
    if let Some(color) = parse_hex_color(&render_cfg.background) {
        pixmap.fill(color);
    }

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::from_scale(scale, scale),
        &mut pixmap_mut,
    );
    pixmap
        .save_png(output)
        .map_err(|err| RenderError::Raster(err.to_string()))?;
    Ok(())
}

#[cfg(feature = "png")]
fn parse_hex_color(value: &str) -> Option<resvg::tiny_skia::Color> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |idx: usize| u8::from_str_radix(&hex[idx..idx + 2], 16).ok();
    Some(resvg::tiny_skia::Color::from_rgba8(
        channel(0)?,
        channel(2)?,
        channel(4)?,
        255,
    ))
}

#[cfg(not(feature = "png"))]
pub fn write_output_png(_svg: &str, _output: &Path, _render_cfg: &RenderConfig) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output requires the `png` feature"
    ))
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::{HierarchyItem, Tier};

    fn options() -> RenderOptions {
        let mut options = RenderOptions::classic();
        options.layout.fast_text_metrics = true;
        options
    }

    fn sample() -> HierarchyData {
        HierarchyData {
            values: vec![HierarchyItem::new(1, "A & <B>")],
            goals: vec![HierarchyItem::new(10, "Exercise").with_ids("value_ids", &[1])],
            metrics: vec![],
        }
    }

    #[test]
    fn render_svg_basic() {
        let options = options();
        let layout = compute_layout(&sample(), &options.theme, &options.layout);
        let svg = render_svg(&layout, &options.theme);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(">A &amp; &lt;B&gt;</text>"));
        assert!(svg.contains("data-tier=\"goal\" data-id=\"10\""));
        assert_eq!(svg.matches("<path class=\"link\"").count(), 1);
        assert_eq!(svg.matches("class=\"row-label\"").count(), 3);
    }

    #[test]
    fn shortened_labels_stay_escaped() {
        let options = options();
        let data = HierarchyData {
            values: vec![HierarchyItem::new(1, "Health & <Happiness> for the whole family")],
            ..HierarchyData::default()
        };
        let layout = compute_layout(&data, &options.theme, &options.layout);
        let title = &layout.nodes[0].title;
        assert!(title.ends_with('\u{2026}'), "got {title:?}");
        let svg = render_svg(&layout, &options.theme);
        assert!(svg.contains(&format!(">{}</text>", escape_xml(title))));
        assert!(svg.contains("Health &amp; &lt;Happ"));
        assert!(!svg.contains("<Happ"));
    }

    #[test]
    fn connectors_are_painted_before_boxes() {
        let options = options();
        let layout = compute_layout(&sample(), &options.theme, &options.layout);
        let svg = render_svg(&layout, &options.theme);
        let path = svg.find("<path class=\"link\"").expect("path");
        let group = svg.find("<g class=\"node").expect("group");
        assert!(path < group);
    }

    #[test]
    fn path_data_uses_basis_curve() {
        let d = points_to_path(&[(0.0, 0.0), (0.0, 30.0), (60.0, 60.0), (60.0, 90.0)]);
        assert!(d.starts_with("M 0.00 0.00 L 0.00 5.00 C"));
        assert!(d.ends_with("L 60.00 90.00"));
    }

    #[test]
    fn empty_payload_renders_only_the_placeholder() {
        let options = options();
        let layout = compute_layout(&HierarchyData::default(), &options.theme, &options.layout);
        let svg = render_svg(&layout, &options.theme);
        assert!(svg.contains("No data yet"));
        assert!(!svg.contains("<g class=\"node"));
        assert!(!svg.contains("row-label"));
    }

    #[test]
    fn render_replaces_previous_output() {
        let mut buffer = SvgBuffer::new();
        let options = options();
        render(&mut buffer, &sample(), &options).expect("first render");
        let first = buffer.contents().map(str::to_string);
        let layout = render(&mut buffer, &HierarchyData::default(), &options).expect("second render");
        assert!(layout.nodes.is_empty());
        assert_eq!(buffer.render_count(), 2);
        let second = buffer.contents().expect("contents");
        assert_ne!(first.as_deref(), Some(second));
        assert!(!second.contains("Exercise"));
    }

    #[test]
    fn render_is_idempotent() {
        let options = options();
        let mut a = SvgBuffer::new();
        let mut b = SvgBuffer::new();
        let first = render(&mut a, &sample(), &options).expect("render");
        let second = render(&mut b, &sample(), &options).expect("render");
        assert_eq!(first, second);
        assert_eq!(a.contents(), b.contents());
        assert_eq!(first.node((Tier::Value, 1)), second.node((Tier::Value, 1)));
    }

    #[test]
    fn detached_file_target_fails_fast() {
        let mut target = FileTarget::new("/definitely/not/a/real/dir/out.svg");
        let err = render(&mut target, &sample(), &options()).unwrap_err();
        assert!(matches!(err, RenderError::MissingTarget(_)));
    }
}
