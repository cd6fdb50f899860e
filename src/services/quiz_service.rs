use std::sync::Arc;

use rand::{seq::SliceRandom, Rng};

use crate::{
    errors::AppResult,
    models::domain::{Question, QuestionFilter, QuestionForDisplay},
    repositories::QuestionRepository,
};

pub struct QuizService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuizService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    /// Random, non-repeating selection of at most `limit` matching questions with answers removed.
    pub async fn draw(&self, filter: &QuestionFilter, limit: usize) -> AppResult<Vec<QuestionForDisplay>> {
        let matches = self.repository.list(filter).await?;
        let drawn = draw_from(matches, limit, &mut rand::thread_rng());
        log::debug!("Drew {} questions for quiz", drawn.len());
        Ok(drawn)
    }
}

pub fn draw_from<R: Rng + ?Sized>(
    mut questions: Vec<Question>,
    limit: usize,
    rng: &mut R,
) -> Vec<QuestionForDisplay> {
    questions.shuffle(rng);
    questions.truncate(limit);
    questions.into_iter().map(QuestionForDisplay::from).collect()
}
