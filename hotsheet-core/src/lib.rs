//! Core logic for Hot Sheet: which posts are still featured, how editors'
//! dates are read, and how the sidebar widget is drawn.
//!
//! Nothing in this crate talks to storage directly. Hosts provide posts and
//! persisted widget settings through [`widget::ContentSource`] and
//! [`widget::WidgetSettingsStore`].

pub mod dates;
pub mod models;
pub mod selector;
pub mod widget;

pub use dates::{format_feature_date, parse_feature_date};
pub use selector::select;
