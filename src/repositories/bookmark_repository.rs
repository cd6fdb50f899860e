use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::doc,
    options::{FindOptions, IndexOptions},
    Collection, IndexModel,
};

use crate::{
    db::{is_duplicate_key_error, Database},
    errors::{AppError, AppResult},
    models::domain::Bookmark,
};

#[async_trait]
pub trait BookmarkRepository: Send + Sync {
    /// Fails with `AlreadyExists` when the (user, question) pair is present.
    async fn create(&self, bookmark: Bookmark) -> AppResult<Bookmark>;
    /// Fails with `NotFound` when there was nothing to remove.
    async fn delete(&self, user_id: &str, question_id: &str) -> AppResult<()>;
    /// Newest first.
    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Bookmark>>;
    async fn exists(&self, user_id: &str, question_id: &str) -> AppResult<bool>;
}

pub struct MongoBookmarkRepository {
    collection: Collection<Bookmark>,
}

impl MongoBookmarkRepository {
    pub fn new(db: &Database) -> Self {
        let collection = db.get_collection("bookmarks");
        Self { collection }
    }

    pub async fn ensure_indexes(&self) -> AppResult<()> {
        let pair_model = IndexModel::builder()
            .keys(doc! { "user_id": 1, "question_id": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("user_question_unique".to_string())
                    .build(),
            )
            .build();
        self.collection.create_index(pair_model).await?;
        log::info!("Created unique index on bookmarks.(user_id, question_id)");

        let user_model = IndexModel::builder().keys(doc! { "user_id": 1 }).build();
        self.collection.create_index(user_model).await?;
        log::info!("Created index on bookmarks.user_id");

        Ok(())
    }
}

#[async_trait]
impl BookmarkRepository for MongoBookmarkRepository {
    async fn create(&self, bookmark: Bookmark) -> AppResult<Bookmark> {
        match self.collection.insert_one(&bookmark).await {
            Ok(_) => Ok(bookmark),
            Err(e) if is_duplicate_key_error(&e) => Err(AppError::AlreadyExists(
                "Question already bookmarked".to_string(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, user_id: &str, question_id: &str) -> AppResult<()> {
        let result = self
            .collection
            .delete_one(doc! { "user_id": user_id, "question_id": question_id })
            .await?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound("Bookmark not found".to_string()));
        }

        Ok(())
    }

    async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<Bookmark>> {
        let find_options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self
            .collection
            .find(doc! { "user_id": user_id })
            .with_options(find_options)
            .await?;
        let bookmarks: Vec<Bookmark> = cursor.try_collect().await?;
        Ok(bookmarks)
    }

    async fn exists(&self, user_id: &str, question_id: &str) -> AppResult<bool> {
        let count = self
            .collection
            .count_documents(doc! { "user_id": user_id, "question_id": question_id })
            .await?;
        Ok(count > 0)
    }
}
