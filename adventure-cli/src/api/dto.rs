use adventure_core::{CategoryId, CellKey, GridMonth};
use serde::{Deserialize, Serialize};
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDto {
    pub id: CategoryId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDto {
    #[serde(with = "iso_date")]
    pub day: Date,
    pub category_id: CategoryId,
    pub minutes: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridDto {
    pub month: GridMonth,
    pub categories: Vec<CategoryDto>,
    pub cells: Vec<CellDto>,
}

impl GridDto {
    pub fn cell_values(&self) -> impl Iterator<Item = (CellKey, u32)> + '_ {
        self.cells
            .iter()
            .map(|cell| (CellKey::new(cell.day, cell.category_id), cell.minutes))
    }

    /// Find a category by id or case-insensitive name.
    pub fn find_category(&self, needle: &str) -> Option<&CategoryDto> {
        let needle = needle.trim();
        if let Ok(id) = needle.parse::<i32>() {
            if let Some(category) = self.categories.iter().find(|c| c.id.as_i32() == id) {
                return Some(category);
            }
        }
        self.categories
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(needle))
    }
}

#[derive(Serialize)]
pub struct CredentialsRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Serialize)]
pub struct CreateCategoryRequest<'a> {
    pub name: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitCellRequest {
    #[serde(with = "iso_date")]
    pub day: Date,
    pub category_id: CategoryId,
    pub minutes: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellCommitDto {
    pub outcome: String,
    pub entry_id: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct MeDto {
    pub id: i32,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}
