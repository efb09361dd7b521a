#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod edit;
pub mod error;
pub mod interaction;
pub mod ir;
pub mod layout;
pub mod layout_dump;
pub mod relations;
pub mod render;
pub mod session;
pub mod store;
pub mod text_metrics;
pub mod theme;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, LayoutConfig, RenderConfig, load_config};
pub use edit::{EditForm, edit_form};
pub use error::{HierarchyError, RenderError, StoreError};
pub use interaction::InteractionDispatcher;
pub use ir::{HierarchyData, HierarchyItem, NodeKey, Tier, TierPair, parse_hierarchy};
pub use layout::{EdgeLayout, Layout, NodeBox, compute_layout};
pub use relations::{Link, resolve_all, resolve_links};
pub use render::{FileTarget, RenderOptions, RenderTarget, SvgBuffer, render, render_svg};
pub use session::{RefreshOutcome, RefreshTicket, Session};
pub use store::{HierarchySource, MemoryStore};
pub use theme::Theme;

/// Parse a JSON payload and return the rendered SVG document.
pub fn render_hierarchy_svg(payload: &str, options: &RenderOptions) -> Result<String, HierarchyError> {
    let data = parse_hierarchy(payload)?;
    let layout = compute_layout(&data, &options.theme, &options.layout);
    Ok(render_svg(&layout, &options.theme))
}
