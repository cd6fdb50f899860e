use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::{
            question::ensure_answer_in_options, Question, QuestionFilter, QuestionMetadata, User,
        },
        dto::{
            request::{CreateQuestionRequest, UpdateQuestionRequest},
            response::BulkUploadResponse,
        },
    },
    repositories::QuestionRepository,
};

pub struct QuestionService {
    repository: Arc<dyn QuestionRepository>,
}

impl QuestionService {
    pub fn new(repository: Arc<dyn QuestionRepository>) -> Self {
        Self { repository }
    }

    pub async fn create(&self, request: CreateQuestionRequest, creator: &User) -> AppResult<Question> {
        self.create_with_metadata(request, creator, QuestionMetadata::new())
            .await
    }

    pub async fn create_with_metadata(
        &self,
        request: CreateQuestionRequest,
        creator: &User,
        metadata: QuestionMetadata,
    ) -> AppResult<Question> {
        request.validate()?;
        ensure_answer_in_options(&request.options, &request.answer)?;

        let question = Question::new(request, &creator.username, metadata);
        let question = self.repository.create(question).await?;
        log::info!(
            "Question {} created in category '{}' by {}",
            question.id,
            question.category,
            creator.username
        );
        Ok(question)
    }

    pub async fn get(&self, id: &str) -> AppResult<Question> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    pub async fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
        self.repository.list(filter).await
    }

    pub async fn update(&self, id: &str, patch: UpdateQuestionRequest) -> AppResult<Question> {
        patch.validate()?;

        let mut merged = self.get(id).await?;
        if patch.is_empty() {
            return Ok(merged);
        }
        merged.apply_patch(&patch);
        ensure_answer_in_options(&merged.options, &merged.answer)?;

        let updated = self.repository.update(id, &patch).await?;
        log::info!("Question {} updated", id);
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> AppResult<()> {
        self.repository.delete(id).await?;
        log::info!("Question {} deleted", id);
        Ok(())
    }

    pub async fn categories(&self) -> AppResult<Vec<String>> {
        self.repository.distinct_categories().await
    }

    /// Each row is validated and stored on its own; bad rows are reported, not fatal.
    pub async fn bulk_import(
        &self,
        rows: Vec<serde_json::Value>,
        creator: &User,
    ) -> AppResult<BulkUploadResponse> {
        let mut report = BulkUploadResponse {
            total: rows.len(),
            ..Default::default()
        };

        for (idx, row) in rows.into_iter().enumerate() {
            let outcome = match serde_json::from_value::<CreateQuestionRequest>(row) {
                Ok(request) => self.create(request, creator).await.map(|_| ()),
                Err(e) => Err(AppError::ValidationFailed(e.to_string())),
            };

            match outcome {
                Ok(()) => report.success += 1,
                Err(AppError::DatabaseError(e)) => return Err(AppError::DatabaseError(e)),
                Err(e) => {
                    report.failed += 1;
                    report.errors.push(format!("Row {}: {}", idx + 1, e));
                }
            }
        }

        log::info!(
            "Bulk import by {}: {} stored, {} failed",
            creator.username,
            report.success,
            report.failed
        );
        Ok(report)
    }
}
