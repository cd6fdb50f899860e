use std::{collections::HashMap, sync::Arc};

use crate::{
    errors::{AppError, AppResult},
    models::domain::{Bookmark, Question, User},
    repositories::{BookmarkRepository, QuestionRepository},
};

pub struct BookmarkService {
    bookmarks: Arc<dyn BookmarkRepository>,
    questions: Arc<dyn QuestionRepository>,
}

impl BookmarkService {
    pub fn new(
        bookmarks: Arc<dyn BookmarkRepository>,
        questions: Arc<dyn QuestionRepository>,
    ) -> Self {
        Self {
            bookmarks,
            questions,
        }
    }

    pub async fn add(&self, user: &User, question_id: &str) -> AppResult<Bookmark> {
        if self.questions.find_by_id(question_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                question_id
            )));
        }

        let bookmark = self
            .bookmarks
            .create(Bookmark::new(&user.id, question_id))
            .await?;
        log::info!("User {} bookmarked question {}", user.id, question_id);
        Ok(bookmark)
    }

    pub async fn remove(&self, user: &User, question_id: &str) -> AppResult<()> {
        self.bookmarks.delete(&user.id, question_id).await?;
        log::info!("User {} removed bookmark on question {}", user.id, question_id);
        Ok(())
    }

    /// Bookmarks whose question has since been deleted are left out.
    pub async fn list(&self, user: &User) -> AppResult<Vec<(Bookmark, Question)>> {
        let bookmarks = self.bookmarks.find_by_user(&user.id).await?;
        let ids: Vec<String> = bookmarks.iter().map(|b| b.question_id.clone()).collect();

        let mut questions: HashMap<String, Question> = self
            .questions
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .map(|q| (q.id.clone(), q))
            .collect();

        Ok(bookmarks
            .into_iter()
            .filter_map(|bookmark| {
                let question = questions.remove(&bookmark.question_id)?;
                Some((bookmark, question))
            })
            .collect())
    }

    pub async fn is_bookmarked(&self, user: &User, question_id: &str) -> AppResult<bool> {
        self.bookmarks.exists(&user.id, question_id).await
    }
}
