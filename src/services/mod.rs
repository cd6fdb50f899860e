pub mod ai_service;
pub mod auth_service;
pub mod bookmark_service;
pub mod llm_client;
pub mod question_service;
pub mod quiz_service;

pub use ai_service::AiService;
pub use auth_service::AuthService;
pub use bookmark_service::BookmarkService;
pub use llm_client::{LlmClient, OpenAiClient};
pub use question_service::QuestionService;
pub use quiz_service::QuizService;
