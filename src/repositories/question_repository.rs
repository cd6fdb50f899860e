use std::collections::BTreeSet;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::{FindOneAndUpdateOptions, FindOptions, IndexOptions, ReturnDocument},
    Collection, IndexModel,
};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::{
        domain::{Question, QuestionFilter},
        dto::request::UpdateQuestionRequest,
    },
};

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn create(&self, question: Question) -> AppResult<Question>;
    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>>;
    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>>;
    /// Full matching set, no pagination.
    async fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>>;
    /// Sets only the fields present in `patch`; `NotFound` when `id` is absent.
    async fn update(&self, id: &str, patch: &UpdateQuestionRequest) -> AppResult<Question>;
    async fn delete(&self, id: &str) -> AppResult<()>;
    async fn distinct_categories(&self) -> AppResult<Vec<String>>;
}

pub struct MongoQuestionRepository {
    collection: Collection<Question>,
}

impl MongoQuestionRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("questions");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        log::info!("Creating indexes for questions collection");

        let id_index = IndexModel::builder()
            .keys(doc! { "id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("id_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(id_index).await?;

        for field in ["category", "difficulty"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let model = IndexModel::builder().keys(keys).build();
            self.collection.create_index(model).await?;
        }

        log::info!("Successfully created indexes for questions collection");
        Ok(())
    }
}

pub fn filter_document(filter: &QuestionFilter) -> Document {
    let mut document = Document::new();
    if let Some(category) = &filter.category {
        document.insert("category", category.as_str());
    }
    if let Some(difficulty) = filter.difficulty {
        document.insert("difficulty", difficulty.as_str());
    }
    document
}

pub fn patch_document(patch: &UpdateQuestionRequest) -> Document {
    let mut set = Document::new();
    if let Some(question) = &patch.question {
        set.insert("question", question.as_str());
    }
    if let Some(options) = &patch.options {
        set.insert("options", options.clone());
    }
    if let Some(answer) = &patch.answer {
        set.insert("answer", answer.as_str());
    }
    if let Some(category) = &patch.category {
        set.insert("category", category.as_str());
    }
    if let Some(difficulty) = patch.difficulty {
        set.insert("difficulty", difficulty.as_str());
    }
    if let Some(explanation) = &patch.explanation {
        set.insert("explanation", explanation.as_str());
    }
    set
}

#[async_trait]
impl QuestionRepository for MongoQuestionRepository {
    async fn create(&self, question: Question) -> AppResult<Question> {
        match self.collection.insert_one(&question).await {
            Ok(_) => Ok(question),
            Err(e) if is_duplicate_key_error(&e) => Err(AppError::AlreadyExists(format!(
                "Question with id '{}' already exists",
                question.id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
        let question = self.collection.find_one(doc! { "id": id }).await?;
        Ok(question)
    }

    async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .collection
            .find(doc! { "id": { "$in": ids.to_vec() } })
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": 1 })
            .build();

        let cursor = self
            .collection
            .find(filter_document(filter))
            .with_options(find_options)
            .await?;
        let questions: Vec<Question> = cursor.try_collect().await?;
        Ok(questions)
    }

    async fn update(&self, id: &str, patch: &UpdateQuestionRequest) -> AppResult<Question> {
        let set = patch_document(patch);
        let updated = if set.is_empty() {
            self.find_by_id(id).await?
        } else {
            let options = FindOneAndUpdateOptions::builder()
                .return_document(ReturnDocument::After)
                .build();
            self.collection
                .find_one_and_update(doc! { "id": id }, doc! { "$set": set })
                .with_options(options)
                .await?
        };

        updated.ok_or_else(|| AppError::NotFound(format!("Question with id '{}' not found", id)))
    }

    async fn delete(&self, id: &str) -> AppResult<()> {
        let result = self.collection.delete_one(doc! { "id": id }).await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "Question with id '{}' not found",
                id
            )));
        }

        Ok(())
    }

    async fn distinct_categories(&self) -> AppResult<Vec<String>> {
        let values = self.collection.distinct("category", doc! {}).await?;
        let categories: BTreeSet<String> = values
            .into_iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect();
        Ok(categories.into_iter().collect())
    }
}
