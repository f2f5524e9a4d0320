use serde::{Deserialize, Serialize};

/// Category identifiers are positive integers. Zero is reserved for "all".
pub type CategoryId = i64;

/// A post category. No hierarchy is modelled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

/// Input for creating a new category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub name: String,
}

/// Restricts featured posts to a single category.
///
/// Built from the raw stored id: anything `<= 0` means "all categories".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryFilter(Option<CategoryId>);

impl CategoryFilter {
    pub const ALL: Self = Self(None);

    pub fn from_id(id: CategoryId) -> Self {
        if id > 0 {
            Self(Some(id))
        } else {
            Self::ALL
        }
    }

    pub fn from_optional(id: Option<CategoryId>) -> Self {
        id.map(Self::from_id).unwrap_or(Self::ALL)
    }

    pub fn category(&self) -> Option<CategoryId> {
        self.0
    }

    pub fn matches(&self, categories: &[CategoryId]) -> bool {
        match self.0 {
            Some(id) => categories.contains(&id),
            None => true,
        }
    }
}
