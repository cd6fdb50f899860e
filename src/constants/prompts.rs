use crate::models::domain::Difficulty;

pub const QUESTION_GENERATOR_SYSTEM_PROMPT: &str = "You are an expert quiz question generator. \
Generate high-quality multiple-choice questions that test understanding, not just memorization. \
Always respond with valid JSON only, no additional text or markdown.";

pub const DIFFICULTY_ANALYST_SYSTEM_PROMPT: &str = "You are an expert in educational assessment and Bloom's Taxonomy. \
Analyze question difficulty objectively based on cognitive complexity, required knowledge depth, \
problem-solving steps and language complexity. Respond with valid JSON only.";

pub const DOCUMENT_PARSER_SYSTEM_PROMPT: &str = "You are an expert at extracting and formatting quiz questions from documents. \
Extract all quiz questions, keeping their original content. Respond with valid JSON only.";

/// Only this many characters of an uploaded document are sent to the model.
pub const DOCUMENT_PROMPT_CHAR_LIMIT: usize = 5000;

pub fn generate_questions_prompt(
    topic: &str,
    count: u32,
    difficulty: Difficulty,
    category: &str,
) -> String {
    format!(
        r#"Generate {count} {difficulty} difficulty multiple-choice questions about: {topic}

Requirements:
- Each question has exactly 4 options
- "answer" is the exact text of the correct option
- Provide a brief explanation for the correct answer
- Questions test conceptual understanding

Respond with a JSON array in this exact format:
[
  {{
    "question": "Question text here?",
    "options": ["Option A", "Option B", "Option C", "Option D"],
    "answer": "Option A",
    "explanation": "Brief explanation of why this is correct",
    "category": "{category}",
    "difficulty": "{difficulty}"
  }}
]

Generate exactly {count} questions. Return ONLY the JSON array."#
    )
}

pub fn analyze_difficulty_prompt(question: &str, options: &[String]) -> String {
    format!(
        r#"Analyze the difficulty of this quiz question:

Question: {question}
Options: {options}

Respond with JSON in this exact format:
{{
  "difficulty": "easy" or "medium" or "hard",
  "confidence": 0.0 to 1.0,
  "reasoning": "Brief explanation of the assessment",
  "bloomsLevel": "Remember/Understand/Apply/Analyze/Evaluate/Create"
}}

Return ONLY the JSON object."#,
        options = options.join(", ")
    )
}

pub fn parse_document_prompt(document_text: &str, max_questions: u32) -> String {
    let excerpt: String = document_text
        .chars()
        .take(DOCUMENT_PROMPT_CHAR_LIMIT)
        .collect();

    format!(
        r#"Extract all quiz questions from this document. Convert True/False and other formats to multiple choice where needed.

Document text:
{excerpt}

Requirements:
- Extract up to {max_questions} questions
- Use 4 options when possible
- "answer" is the exact text of the correct option
- Infer the category from the content
- Assign difficulty (easy, medium or hard) from the question complexity

Respond with a JSON array of objects with the keys question, options, answer, explanation, category, difficulty.
Return ONLY the JSON array."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_prompt_mentions_parameters() {
        let prompt = generate_questions_prompt("Java generics", 3, Difficulty::Hard, "Generics");
        assert!(prompt.contains("Generate 3 hard difficulty"));
        assert!(prompt.contains("\"category\": \"Generics\""));
    }

    #[test]
    fn test_document_prompt_truncates_long_input() {
        let document = "x".repeat(DOCUMENT_PROMPT_CHAR_LIMIT + 100);
        let prompt = parse_document_prompt(&document, 10);
        assert!(!prompt.contains(&"x".repeat(DOCUMENT_PROMPT_CHAR_LIMIT + 1)));
    }
}
