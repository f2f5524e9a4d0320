use serde::{Deserialize, Serialize};

use super::{CategoryFilter, CategoryId};

/// Saved settings for one widget instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetConfig {
    #[serde(default)]
    pub title: String,
    /// `0` shows every category.
    #[serde(default)]
    pub category_id: CategoryId,
}

impl WidgetConfig {
    pub fn category_filter(&self) -> CategoryFilter {
        CategoryFilter::from_id(self.category_id)
    }
}

/// Raw settings as submitted from the settings form, before sanitising.
///
/// Sanitised by [`crate::widget::Widget::update`] before it is stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WidgetSettingsInput {
    pub title: Option<String>,
    pub category_id: Option<RawCategoryId>,
}

/// A category id as a form or JSON client sends it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawCategoryId {
    Number(CategoryId),
    Text(String),
}

/// One row of widget output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturedLink {
    pub title: String,
    pub url: String,
}
