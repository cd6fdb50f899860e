use std::{collections::BTreeMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::dto::request::{CreateQuestionRequest, UpdateQuestionRequest},
};

/// Open-ended extra fields carried next to the typed schema (AI provenance and the like).
pub type QuestionMetadata = BTreeMap<String, serde_json::Value>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(AppError::ValidationFailed(format!(
                "Unknown difficulty '{}', expected easy, medium or hard",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Question {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
    pub category: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: QuestionMetadata,
}

impl Question {
    pub fn new(request: CreateQuestionRequest, created_by: &str, metadata: QuestionMetadata) -> Self {
        Question {
            id: Uuid::new_v4().to_string(),
            question: request.question,
            options: request.options,
            answer: request.answer,
            category: request.category,
            difficulty: request.difficulty,
            explanation: request.explanation,
            created_by: created_by.to_string(),
            created_at: Utc::now(),
            metadata,
        }
    }

    pub fn matches(&self, filter: &QuestionFilter) -> bool {
        filter
            .category
            .as_deref()
            .map_or(true, |category| self.category == category)
            && filter
                .difficulty
                .map_or(true, |difficulty| self.difficulty == difficulty)
    }

    /// Overwrites only the fields present in the patch.
    pub fn apply_patch(&mut self, patch: &UpdateQuestionRequest) {
        if let Some(question) = &patch.question {
            self.question = question.clone();
        }
        if let Some(options) = &patch.options {
            self.options = options.clone();
        }
        if let Some(answer) = &patch.answer {
            self.answer = answer.clone();
        }
        if let Some(category) = &patch.category {
            self.category = category.clone();
        }
        if let Some(difficulty) = patch.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(explanation) = &patch.explanation {
            self.explanation = Some(explanation.clone());
        }
    }
}

/// The correct answer has to be the exact text of one of the options.
pub fn ensure_answer_in_options(options: &[String], answer: &str) -> AppResult<()> {
    if options.iter().any(|option| option == answer) {
        Ok(())
    } else {
        Err(AppError::ValidationFailed(format!(
            "Answer '{}' is not one of the listed options",
            answer
        )))
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct QuestionFilter {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
}

impl QuestionFilter {
    pub fn new(category: Option<&str>, difficulty: Option<Difficulty>) -> Self {
        Self {
            category: category.map(str::to_string),
            difficulty,
        }
    }

    pub fn by_category(category: &str) -> Self {
        Self::new(Some(category), None)
    }

    /// Blank category strings from query parameters mean "no filter".
    pub fn normalized(mut self) -> Self {
        if self.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
            self.category = None;
        }
        self
    }
}

/// A question as shown to a quiz taker: no answer, no explanation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionForDisplay {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub category: String,
    pub difficulty: Difficulty,
}

impl From<Question> for QuestionForDisplay {
    fn from(question: Question) -> Self {
        QuestionForDisplay {
            id: question.id,
            question: question.question,
            options: question.options,
            category: question.category,
            difficulty: question.difficulty,
        }
    }
}

#[cfg(test)]
impl Question {
    pub fn test_question(question: &str, category: &str, difficulty: Difficulty) -> Self {
        Question::new(
            CreateQuestionRequest {
                question: question.to_string(),
                options: vec!["A".to_string(), "B".to_string()],
                answer: "A".to_string(),
                category: category.to_string(),
                difficulty,
                explanation: Some("Because A".to_string()),
            },
            "admin",
            QuestionMetadata::new(),
        )
    }
}
