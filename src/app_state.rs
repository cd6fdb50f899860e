use std::sync::Arc;

use crate::{
    auth::JwtService,
    config::Config,
    db::Database,
    errors::AppResult,
    repositories::{
        BookmarkRepository, MongoBookmarkRepository, MongoQuestionRepository,
        MongoUserRepository, QuestionRepository, UserRepository,
    },
    services::{
        AiService, AuthService, BookmarkService, LlmClient, OpenAiClient, QuestionService,
        QuizService,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub question_service: Arc<QuestionService>,
    pub quiz_service: Arc<QuizService>,
    pub bookmark_service: Arc<BookmarkService>,
    pub ai_service: Arc<AiService>,
    pub db: Option<Database>,
    pub config: Arc<Config>,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        let db = Database::connect(&config).await?;

        let user_repository = Arc::new(MongoUserRepository::new(&db));
        user_repository.ensure_indexes().await?;

        let question_repository = Arc::new(MongoQuestionRepository::new(&db));
        question_repository.ensure_indexes().await?;

        let bookmark_repository = Arc::new(MongoBookmarkRepository::new(&db));
        bookmark_repository.ensure_indexes().await?;

        let llm_client = Arc::new(OpenAiClient::from_config(&config)?);

        log::info!("Indexes ensured on database '{}'", db.db_name());

        let mut state = Self::from_repositories(
            config,
            user_repository,
            question_repository,
            bookmark_repository,
            llm_client,
        );
        state.db = Some(db);
        Ok(state)
    }

    /// Wires the services over already-constructed store handles.
    pub fn from_repositories(
        config: Config,
        user_repository: Arc<dyn UserRepository>,
        question_repository: Arc<dyn QuestionRepository>,
        bookmark_repository: Arc<dyn BookmarkRepository>,
        llm_client: Arc<dyn LlmClient>,
    ) -> Self {
        let jwt_service = JwtService::new(&config.jwt_secret, config.access_token_expire_minutes);
        let auth_service = Arc::new(AuthService::new(user_repository, jwt_service));

        let question_service = Arc::new(QuestionService::new(question_repository.clone()));
        let quiz_service = Arc::new(QuizService::new(question_repository.clone()));
        let bookmark_service = Arc::new(BookmarkService::new(
            bookmark_repository,
            question_repository,
        ));
        let ai_service = Arc::new(AiService::new(llm_client, question_service.clone()));

        Self {
            auth_service,
            question_service,
            quiz_service,
            bookmark_service,
            ai_service,
            db: None,
            config: Arc::new(config),
        }
    }
}
