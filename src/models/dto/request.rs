use serde::Deserialize;
use validator::Validate;

use crate::models::domain::{Difficulty, QuestionFilter, UserRole};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 3, max = 50))]
    pub username: String,

    #[validate(length(max = 100))]
    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub role: UserRole,

    #[validate(length(min = 1, max = 128))]
    pub password: String,
}

/// `username` holds either an email or a username.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,

    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: String,

    #[validate(length(min = 2, message = "A question needs at least two options"))]
    pub options: Vec<String>,

    #[validate(length(min = 1))]
    pub answer: String,

    #[validate(length(min = 1, max = 100))]
    pub category: String,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[serde(default)]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateQuestionRequest {
    #[validate(length(min = 1, message = "Question text must not be empty"))]
    pub question: Option<String>,

    #[validate(length(min = 2, message = "A question needs at least two options"))]
    pub options: Option<Vec<String>>,

    #[validate(length(min = 1))]
    pub answer: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub category: Option<String>,

    pub difficulty: Option<Difficulty>,

    pub explanation: Option<String>,
}

impl UpdateQuestionRequest {
    pub fn is_empty(&self) -> bool {
        self.question.is_none()
            && self.options.is_none()
            && self.answer.is_none()
            && self.category.is_none()
            && self.difficulty.is_none()
            && self.explanation.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddBookmarkRequest {
    pub question_id: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuestionQueryParams {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl From<QuestionQueryParams> for QuestionFilter {
    fn from(params: QuestionQueryParams) -> Self {
        QuestionFilter {
            category: params.category,
            difficulty: params.difficulty,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DrawQuizParams {
    pub category: Option<String>,
    pub difficulty: Option<Difficulty>,
    #[serde(default = "default_draw_limit")]
    pub limit: usize,
}

fn default_draw_limit() -> usize {
    10
}

impl DrawQuizParams {
    pub fn filter(&self) -> QuestionFilter {
        QuestionFilter {
            category: self.category.clone(),
            difficulty: self.difficulty,
        }
        .normalized()
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateQuestionsRequest {
    #[validate(length(min = 3, max = 200))]
    pub topic: String,

    #[validate(range(min = 1, max = 20))]
    #[serde(default = "default_generate_count")]
    pub count: u32,

    #[serde(default)]
    pub difficulty: Difficulty,

    #[validate(length(max = 100))]
    pub category: Option<String>,
}

fn default_generate_count() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeDifficultyRequest {
    #[validate(length(min = 10))]
    pub question: String,

    #[validate(length(min = 2, max = 6))]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ParseDocumentRequest {
    #[validate(length(min = 50, max = 50000))]
    pub document_text: String,

    #[validate(range(min = 1, max = 100))]
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
}

fn default_max_questions() -> u32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_rejects_bad_email() {
        let request = RegisterRequest {
            email: "not-an-email".to_string(),
            username: "johndoe".to_string(),
            full_name: None,
            role: UserRole::User,
            password: "secret".to_string(),
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_register_role_defaults_to_user() {
        let request: RegisterRequest = serde_json::from_str(
            r#"{"email":"a@example.com","username":"alice","password":"pw"}"#,
        )
        .unwrap();
        assert_eq!(request.role, UserRole::User);
    }

    #[test]
    fn test_create_question_requires_two_options() {
        let request: CreateQuestionRequest = serde_json::from_str(
            r#"{"question":"Q","options":["A"],"answer":"A","category":"X"}"#,
        )
        .unwrap();
        assert!(request.validate().is_err());
        assert_eq!(request.difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_draw_params_default_limit_and_blank_category() {
        let params: DrawQuizParams = serde_json::from_str(r#"{"category":""}"#).unwrap();
        assert_eq!(params.limit, 10);
        assert_eq!(params.filter(), QuestionFilter::default());
    }

    #[test]
    fn test_generate_request_count_bounds() {
        let request: GenerateQuestionsRequest =
            serde_json::from_str(r#"{"topic":"Java streams","count":25}"#).unwrap();
        assert!(request.validate().is_err());
    }
}
