use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use crate::{
    constants::prompts::{
        analyze_difficulty_prompt, generate_questions_prompt, parse_document_prompt,
        DIFFICULTY_ANALYST_SYSTEM_PROMPT, DOCUMENT_PARSER_SYSTEM_PROMPT,
        QUESTION_GENERATOR_SYSTEM_PROMPT,
    },
    errors::{AppError, AppResult},
    models::{
        domain::{question::ensure_answer_in_options, Difficulty, Question, QuestionMetadata, User},
        dto::request::CreateQuestionRequest,
    },
    services::{llm_client::LlmClient, question_service::QuestionService},
};

static OPENING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^```[A-Za-z]*\s*").expect("OPENING_FENCE is a valid regex pattern"));
static CLOSING_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*```$").expect("CLOSING_FENCE is a valid regex pattern"));

/// Same bound as `CreateQuestionRequest::category`.
const MAX_CATEGORY_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    AiGenerated,
    AiParsed,
}

/// Where a batch of candidates came from, recorded in the saved question's metadata.
#[derive(Debug, Clone, Copy)]
pub enum Provenance<'a> {
    Topic(&'a str),
    DocumentUpload,
}

/// A question-shaped record proposed by the model, not yet persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub explanation: String,
    pub category: String,
    pub difficulty: Difficulty,
    #[serde(rename = "generatedByAI")]
    pub generated_by_ai: bool,
    #[serde(rename = "sourceType")]
    pub source_type: SourceType,
    #[serde(rename = "aiProvider")]
    pub ai_provider: String,
    #[serde(rename = "aiModel")]
    pub ai_model: String,
}

impl GeneratedQuestion {
    fn to_create_request(&self) -> CreateQuestionRequest {
        CreateQuestionRequest {
            question: self.question.clone(),
            options: self.options.clone(),
            answer: self.answer.clone(),
            category: self.category.clone(),
            difficulty: self.difficulty,
            explanation: Some(self.explanation.clone()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCandidate {
    question: String,
    options: Vec<String>,
    answer: String,
    #[serde(default)]
    explanation: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DifficultyAnalysis {
    pub difficulty: Difficulty,
    pub confidence: f64,
    pub reasoning: String,
    #[serde(rename = "bloomsLevel")]
    pub blooms_level: String,
}

/// Result of persisting a batch of candidates; rejected ones are reported, not fatal.
#[derive(Debug, Clone, Default)]
pub struct SaveOutcome {
    pub saved: Vec<Question>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SavedCandidatesResponse {
    pub success: bool,
    pub saved_count: usize,
    pub failed_count: usize,
    pub errors: Vec<String>,
    pub questions: Vec<GeneratedQuestion>,
    pub message: String,
}

impl SavedCandidatesResponse {
    /// `action` reads as a past-tense verb phrase, e.g. "generated and saved".
    pub fn new(questions: Vec<GeneratedQuestion>, outcome: SaveOutcome, action: &str) -> Self {
        let saved_count = outcome.saved.len();
        let failed_count = outcome.errors.len();
        let mut message = format!("Successfully {} {} questions", action, saved_count);
        if failed_count > 0 {
            message.push_str(&format!(", {} rejected", failed_count));
        }

        Self {
            success: failed_count == 0,
            saved_count,
            failed_count,
            errors: outcome.errors,
            questions,
            message,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AiHealth {
    pub status: &'static str,
    pub api_key_configured: bool,
    pub provider: String,
    pub model: String,
}

pub struct AiService {
    client: Arc<dyn LlmClient>,
    question_service: Arc<QuestionService>,
}

impl AiService {
    pub fn new(client: Arc<dyn LlmClient>, question_service: Arc<QuestionService>) -> Self {
        Self {
            client,
            question_service,
        }
    }

    pub fn health(&self) -> AiHealth {
        let configured = self.client.is_configured();
        AiHealth {
            status: if configured { "healthy" } else { "misconfigured" },
            api_key_configured: configured,
            provider: self.client.provider(),
            model: self.client.model(),
        }
    }

    pub async fn generate_questions(
        &self,
        topic: &str,
        count: u32,
        difficulty: Difficulty,
        category: Option<&str>,
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let count = count.clamp(1, 20);
        let category = category
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| topic.trim().chars().take(MAX_CATEGORY_CHARS).collect());
        let category = category.as_str();

        let prompt = generate_questions_prompt(topic, count, difficulty, category);
        let response = self
            .client
            .complete(QUESTION_GENERATOR_SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| log::error!("AI question generation failed: {}", e))?;

        let candidates = self.candidates_from_response(
            &response,
            SourceType::AiGenerated,
            category,
            difficulty,
        )?;
        log::info!(
            "Generated {} candidate questions on '{}'",
            candidates.len(),
            topic
        );
        Ok(candidates)
    }

    pub async fn parse_document(
        &self,
        document_text: &str,
        max_questions: u32,
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let max_questions = max_questions.clamp(1, 100);
        let prompt = parse_document_prompt(document_text, max_questions);
        let response = self
            .client
            .complete(DOCUMENT_PARSER_SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| log::error!("AI document parsing failed: {}", e))?;

        let mut candidates = self.candidates_from_response(
            &response,
            SourceType::AiParsed,
            "General",
            Difficulty::Medium,
        )?;
        candidates.truncate(max_questions as usize);
        log::info!("Extracted {} candidate questions from document", candidates.len());
        Ok(candidates)
    }

    pub async fn analyze_difficulty(
        &self,
        question: &str,
        options: &[String],
    ) -> AppResult<DifficultyAnalysis> {
        let prompt = analyze_difficulty_prompt(question, options);
        let response = self
            .client
            .complete(DIFFICULTY_ANALYST_SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| log::error!("AI difficulty analysis failed: {}", e))?;

        let mut analysis: DifficultyAnalysis = serde_json::from_str(strip_code_fences(&response))
            .map_err(|e| {
                AppError::UpstreamError(format!("Failed to parse difficulty analysis: {}", e))
            })?;
        analysis.confidence = analysis.confidence.clamp(0.0, 1.0);
        Ok(analysis)
    }

    /// Persists candidates through the ordinary question create path. A candidate
    /// the question bank rejects is skipped; only store failures abort the batch.
    pub async fn save_candidates(
        &self,
        candidates: &[GeneratedQuestion],
        creator: &User,
        provenance: Provenance<'_>,
    ) -> AppResult<SaveOutcome> {
        let mut outcome = SaveOutcome {
            saved: Vec::with_capacity(candidates.len()),
            errors: Vec::new(),
        };

        for (idx, candidate) in candidates.iter().enumerate() {
            let result = self
                .question_service
                .create_with_metadata(
                    candidate.to_create_request(),
                    creator,
                    provenance_metadata(candidate, provenance),
                )
                .await;

            match result {
                Ok(question) => outcome.saved.push(question),
                Err(AppError::DatabaseError(e)) => return Err(AppError::DatabaseError(e)),
                Err(e) => {
                    log::warn!("Skipping AI candidate {}: {}", idx + 1, e);
                    outcome.errors.push(format!("Candidate {}: {}", idx + 1, e));
                }
            }
        }

        log::info!(
            "Saved {} of {} AI candidates for {}",
            outcome.saved.len(),
            candidates.len(),
            creator.username
        );
        Ok(outcome)
    }

    fn candidates_from_response(
        &self,
        response: &str,
        source_type: SourceType,
        default_category: &str,
        default_difficulty: Difficulty,
    ) -> AppResult<Vec<GeneratedQuestion>> {
        let provider = self.client.provider();
        let model = self.client.model();

        let candidates = parse_json_items(response)?
            .into_iter()
            .enumerate()
            .filter_map(|(idx, item)| {
                match candidate_from_value(item, default_category, default_difficulty) {
                    Ok(candidate) => Some(GeneratedQuestion {
                        source_type,
                        ai_provider: provider.clone(),
                        ai_model: model.clone(),
                        ..candidate
                    }),
                    Err(e) => {
                        log::warn!("Dropping AI candidate {}: {}", idx + 1, e);
                        None
                    }
                }
            })
            .collect();

        Ok(candidates)
    }
}

pub fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }
    let start = OPENING_FENCE.find(trimmed).map_or(0, |m| m.end());
    let end = CLOSING_FENCE
        .find(&trimmed[start..])
        .map_or(trimmed.len(), |m| start + m.start());
    &trimmed[start..end]
}

/// Accepts either a single JSON object or an array of them.
pub fn parse_json_items(response: &str) -> AppResult<Vec<Value>> {
    let value: Value = serde_json::from_str(strip_code_fences(response)).map_err(|e| {
        AppError::UpstreamError(format!("Failed to parse AI response as JSON: {}", e))
    })?;

    match value {
        Value::Array(items) => Ok(items),
        Value::Object(_) => Ok(vec![value]),
        _ => Err(AppError::UpstreamError(
            "AI response is neither an object nor an array".to_string(),
        )),
    }
}

fn candidate_from_value(
    value: Value,
    default_category: &str,
    default_difficulty: Difficulty,
) -> AppResult<GeneratedQuestion> {
    let raw: RawCandidate = serde_json::from_value(value)
        .map_err(|e| AppError::ValidationFailed(e.to_string()))?;

    if raw.question.trim().is_empty() {
        return Err(AppError::ValidationFailed("empty question text".to_string()));
    }

    let difficulty = raw
        .difficulty
        .and_then(|d| d.parse().ok())
        .unwrap_or(default_difficulty);
    let category = raw
        .category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default_category.to_string());

    let candidate = GeneratedQuestion {
        question: raw.question,
        options: raw.options,
        answer: raw.answer,
        explanation: raw.explanation.unwrap_or_default(),
        category,
        difficulty,
        generated_by_ai: true,
        source_type: SourceType::AiGenerated,
        ai_provider: String::new(),
        ai_model: String::new(),
    };

    // Same checks the question bank applies on create.
    candidate.to_create_request().validate()?;
    ensure_answer_in_options(&candidate.options, &candidate.answer)?;

    Ok(candidate)
}

fn provenance_metadata(candidate: &GeneratedQuestion, provenance: Provenance<'_>) -> QuestionMetadata {
    let mut ai_metadata = json!({
        "provider": candidate.ai_provider,
        "model": candidate.ai_model,
    });
    match provenance {
        Provenance::Topic(topic) => ai_metadata["topic"] = json!(topic),
        Provenance::DocumentUpload => ai_metadata["source"] = json!("document_upload"),
    }

    let mut metadata = QuestionMetadata::new();
    metadata.insert("generatedByAI".to_string(), Value::Bool(true));
    metadata.insert("sourceType".to_string(), json!(candidate.source_type));
    metadata.insert("aiMetadata".to_string(), ai_metadata);
    metadata
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{
            domain::{QuestionFilter, UserRole},
            dto::request::UpdateQuestionRequest,
        },
        repositories::QuestionRepository,
        services::llm_client::MockLlmClient,
    };
    use async_trait::async_trait;
    use tokio::sync::RwLock;

    #[derive(Default)]
    struct VecQuestionRepository {
        questions: RwLock<Vec<Question>>,
    }

    #[async_trait]
    impl QuestionRepository for VecQuestionRepository {
        async fn create(&self, question: Question) -> AppResult<Question> {
            self.questions.write().await.push(question.clone());
            Ok(question)
        }
        async fn find_by_id(&self, id: &str) -> AppResult<Option<Question>> {
            Ok(self.questions.read().await.iter().find(|q| q.id == id).cloned())
        }
        async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<Question>> {
            let questions = self.questions.read().await;
            Ok(questions
                .iter()
                .filter(|q| ids.contains(&q.id))
                .cloned()
                .collect())
        }
        async fn list(&self, filter: &QuestionFilter) -> AppResult<Vec<Question>> {
            Ok(self
                .questions
                .read()
                .await
                .iter()
                .filter(|q| q.matches(filter))
                .cloned()
                .collect())
        }
        async fn update(&self, id: &str, patch: &UpdateQuestionRequest) -> AppResult<Question> {
            let mut questions = self.questions.write().await;
            let question = questions
                .iter_mut()
                .find(|q| q.id == id)
                .ok_or_else(|| AppError::NotFound(id.to_string()))?;
            question.apply_patch(patch);
            Ok(question.clone())
        }
        async fn delete(&self, id: &str) -> AppResult<()> {
            let mut questions = self.questions.write().await;
            let before = questions.len();
            questions.retain(|q| q.id != id);
            if questions.len() == before {
                return Err(AppError::NotFound(id.to_string()));
            }
            Ok(())
        }
        async fn distinct_categories(&self) -> AppResult<Vec<String>> {
            let mut categories: Vec<String> = self
                .questions
                .read()
                .await
                .iter()
                .map(|q| q.category.clone())
                .collect();
            categories.sort();
            categories.dedup();
            Ok(categories)
        }
    }

    fn service_with_response(response: impl Into<String>) -> (AiService, Arc<VecQuestionRepository>) {
        let response = response.into();
        let mut client = MockLlmClient::new();
        client
            .expect_complete()
            .returning(move |_, _| Ok(response.clone()));
        client.expect_provider().returning(|| "openai".to_string());
        client.expect_model().returning(|| "gpt-4o-mini".to_string());
        client.expect_is_configured().returning(|| true);

        let repository = Arc::new(VecQuestionRepository::default());
        let question_service = Arc::new(QuestionService::new(repository.clone()));
        (AiService::new(Arc::new(client), question_service), repository)
    }

    const TWO_CANDIDATES: &str = r#"```json
[
  {"question": "What does JVM stand for?", "options": ["Java Virtual Machine", "Java Variable Method"], "answer": "Java Virtual Machine", "explanation": "By definition", "category": "Basics", "difficulty": "easy"},
  {"question": "Broken", "options": ["A", "B"], "answer": "C"}
]
```"#;

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  [2]  "), "[2]");
    }

    #[test]
    fn test_parse_json_items_accepts_object_or_array() {
        assert_eq!(parse_json_items("{\"a\":1}").unwrap().len(), 1);
        assert_eq!(parse_json_items("[{}, {}]").unwrap().len(), 2);
        assert!(matches!(
            parse_json_items("not json"),
            Err(AppError::UpstreamError(_))
        ));
        assert!(parse_json_items("42").is_err());
    }

    #[actix_web::test]
    async fn test_generate_drops_invalid_candidates_and_tags_provenance() {
        let (service, _) = service_with_response(TWO_CANDIDATES);

        let candidates = service
            .generate_questions("Java basics", 2, Difficulty::Medium, None)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        let candidate = &candidates[0];
        assert_eq!(candidate.difficulty, Difficulty::Easy);
        assert_eq!(candidate.source_type, SourceType::AiGenerated);
        assert_eq!(candidate.ai_model, "gpt-4o-mini");
        assert!(candidate.generated_by_ai);
    }

    #[actix_web::test]
    async fn test_parsed_candidates_fall_back_to_default_category() {
        let (service, _) = service_with_response(
            r#"{"question": "Is Java statically typed?", "options": ["Yes", "No"], "answer": "Yes"}"#,
        );

        let candidates = service
            .parse_document(&"Java is statically typed. ".repeat(5), 10)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].category, "General");
        assert_eq!(candidates[0].source_type, SourceType::AiParsed);
    }

    #[actix_web::test]
    async fn test_save_candidates_records_provenance_metadata() {
        let (service, repository) = service_with_response(TWO_CANDIDATES);
        let admin = User::test_user("admin", UserRole::Admin);

        let candidates = service
            .generate_questions("Java basics", 2, Difficulty::Medium, None)
            .await
            .unwrap();
        let outcome = service
            .save_candidates(&candidates, &admin, Provenance::Topic("Java basics"))
            .await
            .unwrap();

        assert_eq!(outcome.saved.len(), 1);
        assert!(outcome.errors.is_empty());
        let stored = repository.questions.read().await;
        let metadata = &stored[0].metadata;
        assert_eq!(metadata["generatedByAI"], Value::Bool(true));
        assert_eq!(metadata["sourceType"], "ai_generated");
        assert_eq!(metadata["aiMetadata"]["topic"], "Java basics");
        assert_eq!(stored[0].created_by, "admin");
    }

    #[actix_web::test]
    async fn test_analyze_difficulty_clamps_confidence() {
        let (service, _) = service_with_response(
            r#"{"difficulty": "hard", "confidence": 1.7, "reasoning": "Multi-step", "bloomsLevel": "Analyze"}"#,
        );

        let analysis = service
            .analyze_difficulty("Which collection is thread safe?", &["A".to_string(), "B".to_string()])
            .await
            .unwrap();

        assert_eq!(analysis.difficulty, Difficulty::Hard);
        assert_eq!(analysis.confidence, 1.0);
    }

    #[actix_web::test]
    async fn test_long_topic_category_is_capped_and_saves() {
        let (service, repository) = service_with_response(
            r#"[{"question": "What is a trait object?", "options": ["dyn Trait", "impl Trait"], "answer": "dyn Trait"}]"#,
        );
        let admin = User::test_user("admin", UserRole::Admin);
        let topic = "t".repeat(150);

        let candidates = service
            .generate_questions(&topic, 1, Difficulty::Medium, None)
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].category.chars().count(), MAX_CATEGORY_CHARS);

        let outcome = service
            .save_candidates(&candidates, &admin, Provenance::Topic(&topic))
            .await
            .unwrap();
        assert_eq!(outcome.saved.len(), 1);
        assert_eq!(repository.questions.read().await.len(), 1);
    }

    #[actix_web::test]
    async fn test_candidate_failing_create_rules_is_dropped() {
        let long_category = "c".repeat(110);
        let response = format!(
            r#"[{{"question": "Q one?", "options": ["A", "B"], "answer": "A", "category": "Basics"}},
                {{"question": "Q two?", "options": ["A", "B"], "answer": "A", "category": "{}"}}]"#,
            long_category
        );
        let (service, _) = service_with_response(response);

        let candidates = service
            .generate_questions("Java basics", 2, Difficulty::Medium, None)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].category, "Basics");
    }

    #[actix_web::test]
    async fn test_save_skips_rejected_candidate_and_reports_it() {
        let (service, repository) = service_with_response("[]");
        let admin = User::test_user("admin", UserRole::Admin);

        let valid = GeneratedQuestion {
            question: "What does JVM stand for?".to_string(),
            options: vec!["Java Virtual Machine".to_string(), "Other".to_string()],
            answer: "Java Virtual Machine".to_string(),
            explanation: String::new(),
            category: "Basics".to_string(),
            difficulty: Difficulty::Easy,
            generated_by_ai: true,
            source_type: SourceType::AiGenerated,
            ai_provider: "openai".to_string(),
            ai_model: "gpt-4o-mini".to_string(),
        };
        let rejected = GeneratedQuestion {
            category: "c".repeat(110),
            ..valid.clone()
        };

        let outcome = service
            .save_candidates(&[valid, rejected], &admin, Provenance::DocumentUpload)
            .await
            .unwrap();

        assert_eq!(outcome.saved.len(), 1);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("Candidate 2:"));
        assert_eq!(repository.questions.read().await.len(), 1);

        let response = SavedCandidatesResponse::new(Vec::new(), outcome, "parsed and saved");
        assert_eq!(response.saved_count, 1);
        assert_eq!(response.failed_count, 1);
        assert!(!response.success);
    }

    #[actix_web::test]
    async fn test_unparseable_output_is_an_upstream_error() {
        let (service, _) = service_with_response("Sorry, I cannot help with that.");

        let result = service
            .generate_questions("Java basics", 2, Difficulty::Medium, None)
            .await;
        assert!(matches!(result, Err(AppError::UpstreamError(_))));
    }
}
