use std::fmt;

use serde::{Deserialize, Serialize};
use time::Date;

/// Identifier of a user-defined activity category.
///
/// Wraps i32 to match the database SERIAL type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(i32);

impl CategoryId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn as_i32(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for CategoryId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl From<CategoryId> for i32 {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

/// Address of one grid cell: a day row and a category column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellKey {
    pub day: Date,
    pub category_id: CategoryId,
}

impl CellKey {
    pub fn new(day: Date, category_id: impl Into<CategoryId>) -> Self {
        Self {
            day,
            category_id: category_id.into(),
        }
    }
}

impl fmt::Display for CellKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.day, self.category_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn cell_keys_order_by_day_then_category() {
        let mut keys = vec![
            CellKey::new(date!(2026 - 01 - 02), 1),
            CellKey::new(date!(2026 - 01 - 01), 7),
            CellKey::new(date!(2026 - 01 - 01), 3),
        ];
        keys.sort();

        assert_eq!(
            keys,
            vec![
                CellKey::new(date!(2026 - 01 - 01), 3),
                CellKey::new(date!(2026 - 01 - 01), 7),
                CellKey::new(date!(2026 - 01 - 02), 1),
            ]
        );
        assert_eq!(keys[0].to_string(), "2026-01-01|3");
    }

    #[test]
    fn category_id_serializes_transparently() {
        let json = serde_json::to_string(&CategoryId::new(42)).unwrap();
        assert_eq!(json, "42");
    }
}
