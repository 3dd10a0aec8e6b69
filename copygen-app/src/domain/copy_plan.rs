use super::CopyRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopyPlan {
    pub topic: String,
    pub model: String,
    pub rows: Vec<CopyRow>,
    pub generated_at: DateTime<Utc>,
}

impl CopyPlan {
    pub fn new(topic: String, model: String, rows: Vec<CopyRow>) -> Self {
        Self {
            topic,
            model,
            rows,
            generated_at: Utc::now(),
        }
    }
}
