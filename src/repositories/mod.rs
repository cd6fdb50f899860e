pub mod bookmark_repository;
pub mod question_repository;
pub mod user_repository;

pub use bookmark_repository::{BookmarkRepository, MongoBookmarkRepository};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use user_repository::{MongoUserRepository, UserRepository};
