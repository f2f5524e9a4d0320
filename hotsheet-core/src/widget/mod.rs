//! The Hot Sheet sidebar widget.
//!
//! A host wires the widget up by implementing [`ContentSource`] and
//! [`WidgetSettingsStore`] and calling [`render_widget_instance`] for each
//! page render. The widget itself never reads storage.

mod forms;
mod markup;

use chrono::{DateTime, Utc};

use crate::models::{
    Category, CategoryFilter, FeaturedLink, Post, RawCategoryId, WidgetConfig,
    WidgetSettingsInput,
};
use crate::selector;

pub use forms::render_feature_date_box;
pub use markup::{escape_html, leading_int, strip_tags, Markup};

/// Posts the host can offer as widget candidates.
pub trait ContentSource {
    /// Posts carrying a feature date, restricted to `filter`.
    ///
    /// Hosts usually return these ordered by date, but callers must not rely
    /// on it.
    fn featured_candidates(&self, filter: CategoryFilter) -> anyhow::Result<Vec<Post>>;
}

/// Persistence for per-instance widget settings.
pub trait WidgetSettingsStore {
    fn load_config(&self, widget_id: &str) -> anyhow::Result<Option<WidgetConfig>>;
    fn save_config(&self, widget_id: &str, config: &WidgetConfig) -> anyhow::Result<()>;
}

/// A sidebar widget the host knows how to draw, configure and save.
pub trait Widget {
    /// Front-end output. Must be empty when `items` is empty.
    fn render(&self, config: &WidgetConfig, items: &[FeaturedLink]) -> Markup;

    /// The settings form shown to administrators.
    fn form(&self, config: &WidgetConfig, categories: &[Category]) -> Markup;

    /// Merge submitted settings into the previous ones, sanitising them.
    fn update(&self, input: WidgetSettingsInput, old: WidgetConfig) -> WidgetConfig;
}

/// Markup the host wraps around every widget it places in a sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetChrome {
    pub before_widget: String,
    pub after_widget: String,
    pub before_title: String,
    pub after_title: String,
}

impl Default for WidgetChrome {
    fn default() -> Self {
        Self {
            before_widget: r#"<div class="widget hot-sheet">"#.to_string(),
            after_widget: "</div>".to_string(),
            before_title: r#"<h2 class="widget-title">"#.to_string(),
            after_title: "</h2>".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HotSheetWidget {
    chrome: WidgetChrome,
}

impl HotSheetWidget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_chrome(chrome: WidgetChrome) -> Self {
        Self { chrome }
    }
}

impl Widget for HotSheetWidget {
    fn render(&self, config: &WidgetConfig, items: &[FeaturedLink]) -> Markup {
        let mut out = Markup::empty();
        if items.is_empty() {
            return out;
        }

        out.push_raw(&self.chrome.before_widget);

        if !config.title.is_empty() {
            out.push_raw(&self.chrome.before_title);
            out.push_text(&config.title);
            out.push_raw(&self.chrome.after_title);
        }

        out.push_raw("<ul>");
        for item in items {
            out.push_raw(r#"<li><a href=""#);
            out.push_text(&item.url);
            out.push_raw(r#"">"#);
            out.push_text(&item.title);
            out.push_raw("</a></li>");
        }
        out.push_raw("</ul>");

        out.push_raw(&self.chrome.after_widget);
        out
    }

    fn form(&self, config: &WidgetConfig, categories: &[Category]) -> Markup {
        forms::render_settings_form(config, categories)
    }

    fn update(&self, input: WidgetSettingsInput, old: WidgetConfig) -> WidgetConfig {
        let title = input.title.map(|t| strip_tags(&t)).unwrap_or(old.title);
        let category_id = match input.category_id {
            Some(RawCategoryId::Number(id)) => id,
            Some(RawCategoryId::Text(raw)) => leading_int(&strip_tags(&raw)),
            None => old.category_id,
        };

        WidgetConfig { title, category_id }
    }
}

/// Render one placed widget instance at `now`.
///
/// Instances that were never configured render with default settings: no
/// title, every category.
pub fn render_widget_instance<W, H>(
    widget: &W,
    host: &H,
    widget_id: &str,
    now: DateTime<Utc>,
) -> anyhow::Result<Markup>
where
    W: Widget + ?Sized,
    H: ContentSource + WidgetSettingsStore + ?Sized,
{
    let config = host.load_config(widget_id)?.unwrap_or_default();
    let candidates = host.featured_candidates(config.category_filter())?;
    let items = selector::select(&candidates, config.category_filter(), now);

    tracing::debug!(
        widget_id,
        candidates = candidates.len(),
        featured = items.len(),
        "Rendering hot sheet"
    );

    Ok(widget.render(&config, &items))
}

/// Apply submitted settings to a widget instance and persist the result.
pub fn save_widget_settings<W, S>(
    widget: &W,
    store: &S,
    widget_id: &str,
    input: WidgetSettingsInput,
) -> anyhow::Result<WidgetConfig>
where
    W: Widget + ?Sized,
    S: WidgetSettingsStore + ?Sized,
{
    let old = store.load_config(widget_id)?.unwrap_or_default();
    let config = widget.update(input, old);
    store.save_config(widget_id, &config)?;
    Ok(config)
}
