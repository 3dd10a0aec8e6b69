use serde::{Deserialize, Serialize};

/// Column headers, in row order, as shown to users and written to CSV.
pub const COPY_COLUMNS: [&str; 6] = ["대분류", "캠페인", "상세타겟", "추천 콘텐츠", "제목", "내용"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CopyRow {
    pub category: String,
    pub campaign: String,
    pub target: String,
    pub content_name: String,
    pub title: String,
    pub body: String,
}

impl CopyRow {
    /// Builds a row from exactly six cells in column order.
    pub fn from_cells(cells: [String; 6]) -> Self {
        let [category, campaign, target, content_name, title, body] = cells;
        Self {
            category,
            campaign,
            target,
            content_name,
            title,
            body,
        }
    }

    pub fn cells(&self) -> [&str; 6] {
        [
            &self.category,
            &self.campaign,
            &self.target,
            &self.content_name,
            &self.title,
            &self.body,
        ]
    }
}
