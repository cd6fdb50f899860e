use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user's saved reference to a question. `(user_id, question_id)` is unique.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Bookmark {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    pub fn new(user_id: &str, question_id: &str) -> Self {
        Bookmark {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            question_id: question_id.to_string(),
            created_at: Utc::now(),
        }
    }
}
