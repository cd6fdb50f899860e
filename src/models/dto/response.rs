use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::domain::{Bookmark, Difficulty, Question, QuestionMetadata, User, UserRole};

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub username: String,
    pub full_name: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            email: user.email,
            username: user.username,
            full_name: user.full_name,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub role: UserRole,
    pub username: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String, user: &User) -> Self {
        TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            role: user.role,
            username: user.username.clone(),
        }
    }
}

/// Full question including the answer; provenance metadata is flattened to top-level keys.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionResponse {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: QuestionMetadata,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        QuestionResponse {
            id: question.id,
            question: question.question,
            options: question.options,
            answer: question.answer,
            category: question.category,
            difficulty: question.difficulty,
            explanation: question.explanation,
            created_by: question.created_by,
            created_at: question.created_at,
            metadata: question.metadata,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkResponse {
    pub id: String,
    pub user_id: String,
    pub question_id: String,
    pub question: QuestionResponse,
    pub created_at: DateTime<Utc>,
}

impl From<(Bookmark, Question)> for BookmarkResponse {
    fn from((bookmark, question): (Bookmark, Question)) -> Self {
        BookmarkResponse {
            id: bookmark.id,
            user_id: bookmark.user_id,
            question_id: bookmark.question_id,
            question: question.into(),
            created_at: bookmark.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkCreatedResponse {
    pub id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookmarkStatusResponse {
    pub bookmarked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkUploadResponse {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_response_hides_password_hash() {
        let user = User::test_user("johndoe", UserRole::Admin);
        let json = serde_json::to_value(UserResponse::from(user)).unwrap();

        assert_eq!(json["username"], "johndoe");
        assert_eq!(json["role"], "admin");
        assert!(json.get("hashed_password").is_none());
    }

    #[test]
    fn test_question_response_flattens_metadata() {
        let mut question = Question::test_question("Q1", "Java", Difficulty::Easy);
        question
            .metadata
            .insert("generatedByAI".to_string(), serde_json::Value::Bool(true));

        let json = serde_json::to_value(QuestionResponse::from(question)).unwrap();
        assert_eq!(json["generatedByAI"], true);
        assert_eq!(json["answer"], "A");
        assert!(json.get("metadata").is_none());
    }
}
