pub mod api;
pub mod db;

pub use hotsheet_core::{dates, models, selector, widget};
