use serde::{Deserialize, Serialize};

use super::repo::Tag;

#[derive(Debug, Default, Deserialize)]
pub struct TagPayload {
    pub name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: i64,
    pub name: String,
}

impl From<Tag> for TagResponse {
    fn from(t: Tag) -> Self {
        Self {
            id: t.id,
            name: t.name,
        }
    }
}
