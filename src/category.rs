use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed vocabulary of day classifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Workday,
    Weekend,
    Holiday,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Workday, Category::Weekend, Category::Holiday];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Workday => "WORKDAY",
            Category::Weekend => "WEEKEND",
            Category::Holiday => "HOLIDAY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category '{}'", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// A persisted category row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: Category,
}

impl CategoryRecord {
    pub fn new(id: i64, name: Category) -> Self {
        Self { id, name }
    }

    pub fn is(&self, category: Category) -> bool {
        self.name.as_str().eq_ignore_ascii_case(category.as_str())
    }
}

/// Row ids of the three categories, resolved once per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategorySet {
    pub workday: CategoryRecord,
    pub weekend: CategoryRecord,
    pub holiday: CategoryRecord,
}

impl CategorySet {
    pub fn record(&self, category: Category) -> CategoryRecord {
        match category {
            Category::Workday => self.workday,
            Category::Weekend => self.weekend,
            Category::Holiday => self.holiday,
        }
    }
}
