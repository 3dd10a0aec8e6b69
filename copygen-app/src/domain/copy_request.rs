use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CopyRequest {
    pub topic: String,
    pub campaign: String,
    pub target: String,
    pub note: String,
    pub sheet_id: Option<String>,
    pub sheet_gid: Option<String>,
}

impl CopyRequest {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }

    pub fn with_campaign(mut self, campaign: impl Into<String>) -> Self {
        self.campaign = campaign.into();
        self
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = note.into();
        self
    }

    pub fn with_sheet(mut self, sheet_id: Option<String>, sheet_gid: Option<String>) -> Self {
        self.sheet_id = sheet_id.filter(|s| !s.trim().is_empty());
        self.sheet_gid = sheet_gid.filter(|s| !s.trim().is_empty());
        self
    }
}
