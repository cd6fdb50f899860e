pub mod bookmark;
pub mod question;
pub mod user;
pub use bookmark::Bookmark;
pub use question::{Difficulty, Question, QuestionFilter, QuestionForDisplay, QuestionMetadata};
pub use user::{User, UserRole};
