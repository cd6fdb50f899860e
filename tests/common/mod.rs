#![allow(dead_code)]

use std::{
    collections::{BTreeSet, HashMap},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use tokio::sync::RwLock;

use quizdeck_server::{
    app_state::AppState,
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{Bookmark, Question, QuestionFilter, User, UserRole},
        dto::request::UpdateQuestionRequest,
    },
    repositories::{BookmarkRepository, QuestionRepository, UserRepository},
    services::LlmClient,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(AppError::DuplicateIdentity(
                "Email or username already registered".to_string(),
            ));
        }
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.username == username).cloned())
    }
}

impl InMemoryUserRepository {
    /// Direct record edit, standing in for an operator changing a role in the store.
    pub async fn set_role(&self, username: &str, role: UserRole) {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.username == username) {
            user.role = role;
        }
    }
}

#[derive(Default)]
pub struct InMemoryQuestionRepository {
    questions: RwLock<HashMap<String, Question>>,
}

impl InMemoryQuestionRepository {
    pub async fn len(&self) -> usize {
        self.questions.read().await.len()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        if questions.contains_key(&question.id) {
            return Err(AppError::AlreadyExists(format!("Question {}", question.id)));
        }
        questions.insert(question.id.clone(), question.clone());
        Ok(question)
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        Ok(self.questions.read().await.get(id).cloned())
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        Ok(ids.iter().filter_map(|id| questions.get(id).cloned()).collect())
    }

    async fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
        let questions = self.questions.read().await;
        let mut matching: Vec<Question> = questions
            .values()
            .filter(|q| q.matches(filter))
            .cloned()
            .collect();
        matching.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(matching)
    }

    async fn update(&self, id: &str, patch: &UpdateQuestionRequest) -> AppResult<Question> {
        let mut questions = self.questions.write().await;
        let question = questions
            .get_mut(id)
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))?;
        question.apply_patch(patch);
        Ok(question.clone())
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        self.questions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    async fn distinct_categories(&self) -> AppResult<Vec<String>> {
        let questions = self.questions.read().await;
        let categories: BTreeSet<String> =
            questions.values().map(|q| q.category.clone()).collect();
        Ok(categories.into_iter().collect())
    }
}

#[derive(Default)]
pub struct InMemoryBookmarkRepository {
    bookmarks: RwLock<Vec<Bookmark>>,
}

#[async_trait]
impl BookmarkRepository for InMemoryBookmarkRepository {
    async fn create(&self, bookmark: Bookmark) -> AppResult<Bookmark> {
        let mut bookmarks = self.bookmarks.write().await;
        if bookmarks
            .iter()
            .any(|b| b.user_id == bookmark.user_id && b.question_id == bookmark.question_id)
        {
            return Err(AppError::AlreadyExists(
                "Question already bookmarked".to_string(),
            ));
        }
        bookmarks.push(bookmark.clone());
        Ok(bookmark)
    }

    async fn delete(&self, user_id: &str, question_id: &str) -> AppResult<()> {
        let mut bookmarks = self.bookmarks.write().await;
        let before = bookmarks.len();
        bookmarks.retain(|b| !(b.user_id == user_id && b.question_id == question_id));
        if bookmarks.len() == before {
            return Err(AppError::NotFound("Bookmark not found".to_string()));
        }
        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Bookmark>> {
        let bookmarks = self.bookmarks.read().await;
        let mut owned: Vec<Bookmark> = bookmarks
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(owned)
    }

    async fn exists(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        let bookmarks = self.bookmarks.read().await;
        Ok(bookmarks
            .iter()
            .any(|b| b.user_id == user_id && b.question_id == question_id))
    }
}

/// Returns canned completions in order, repeating the last one when exhausted.
pub struct StubLlmClient {
    responses: Mutex<Vec<String>>,
    configured: bool,
}

impl StubLlmClient {
    pub fn unconfigured() -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            configured: false,
        }
    }

    pub fn with_responses(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().rev().map(|r| r.to_string()).collect()),
            configured: true,
        }
    }
}

#[async_trait]
impl LlmClient for StubLlmClient {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> AppResult<String> {
        if !self.configured {
            return Err(AppError::UpstreamError(
                "LLM API key is not configured".to_string(),
            ));
        }
        let mut responses = self.responses.lock().unwrap();
        match responses.len() {
            0 => Err(AppError::UpstreamError("no canned response".to_string())),
            1 => Ok(responses[0].clone()),
            _ => Ok(responses.pop().unwrap()),
        }
    }

    fn provider(&self) -> String {
        "stub".to_string()
    }

    fn model(&self) -> String {
        "stub-model".to_string()
    }

    fn is_configured(&self) -> bool {
        self.configured
    }
}

pub struct TestContext {
    pub state: AppState,
    pub users: Arc<InMemoryUserRepository>,
    pub questions: Arc<InMemoryQuestionRepository>,
    pub bookmarks: Arc<InMemoryBookmarkRepository>,
}

pub fn test_context() -> TestContext {
    test_context_with_llm(Arc::new(StubLlmClient::unconfigured()))
}

pub fn test_context_with_llm(llm: Arc<dyn LlmClient>) -> TestContext {
    let users = Arc::new(InMemoryUserRepository::default());
    let questions = Arc::new(InMemoryQuestionRepository::default());
    let bookmarks = Arc::new(InMemoryBookmarkRepository::default());

    let state = AppState::from_repositories(
        Config::test_config(),
        users.clone(),
        questions.clone(),
        bookmarks.clone(),
        llm,
    );

    TestContext {
        state,
        users,
        questions,
        bookmarks,
    }
}
