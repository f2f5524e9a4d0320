//! Domain models for Hot Sheet.
//!
//! - [`Post`]: a content item that may carry a "feature until" timestamp.
//! - [`Category`]: a flat label used only to filter the widget.
//! - [`WidgetConfig`]: the saved settings of one widget instance.
//! - [`FeaturedLink`]: one `(title, url)` row of selector output.

mod category;
mod post;
mod widget;

pub use category::*;
pub use post::*;
pub use widget::*;
