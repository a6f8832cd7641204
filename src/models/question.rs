// src/models/question.rs

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Row, postgres::PgRow, types::Json};
use validator::{Validate, ValidationError};

/// Accepts "B" or "A,B,C1" style comma-joined category labels.
static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Z0-9]*(\s*,\s*[A-Z][A-Z0-9]*)*$").expect("category regex is valid")
});

/// Question type.
/// `Basic` questions are yes/no, `Specialist` questions offer A/B/C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Basic,
    Specialist,
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionKind::Basic => "basic",
            QuestionKind::Specialist => "specialist",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(QuestionKind::Basic),
            "specialist" => Ok(QuestionKind::Specialist),
            other => Err(format!("unknown question type '{}'", other)),
        }
    }
}

/// One selectable answer of a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    /// Label submitted by the client, e.g. "A" or "Tak".
    pub option: String,
    pub content: String,
    pub is_correct: bool,
}

/// Represents the 'questions' table in the database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: i64,

    /// Catalogue number of the question.
    pub number: String,

    pub content: String,

    /// Image or video file shown with the question.
    pub media: Option<String>,

    /// Point value, 1 to 3.
    pub points: i16,

    /// Comma-joined category labels, e.g. "B,C".
    pub category: String,

    #[serde(rename = "type")]
    pub kind: QuestionKind,

    /// Ordered answer options. Stored as a JSON array.
    pub answers: Json<Vec<AnswerOption>>,

    pub explanation: Option<String>,

    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

// The `type` column is TEXT, so the kind is parsed by hand instead of derived.
impl<'r> FromRow<'r, PgRow> for Question {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let kind: String = row.try_get("type")?;
        let kind = kind.parse::<QuestionKind>().map_err(|e| sqlx::Error::ColumnDecode {
            index: "type".to_string(),
            source: e.into(),
        })?;

        Ok(Self {
            id: row.try_get("id")?,
            number: row.try_get("number")?,
            content: row.try_get("content")?,
            media: row.try_get("media")?,
            points: row.try_get("points")?,
            category: row.try_get("category")?,
            kind,
            answers: row.try_get("answers")?,
            explanation: row.try_get("explanation")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl Question {
    /// The option flagged as correct, if any.
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.answers.iter().find(|a| a.is_correct)
    }

    /// Whether `answer` matches the correct option's label.
    pub fn is_correct(&self, answer: &str) -> bool {
        self.correct_option().is_some_and(|c| c.option == answer)
    }
}

/// Normalizes "a, B ,C" into "A,B,C".
pub fn normalize_category(category: &str) -> String {
    category
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(",")
}

/// Answer option without the correctness flag.
#[derive(Debug, Clone, Serialize)]
pub struct PublicAnswer {
    pub option: String,
    pub content: String,
}

/// DTO for sending an exam question to the client (excludes correctness and explanation).
#[derive(Debug, Clone, Serialize)]
pub struct PublicQuestion {
    pub id: i64,
    pub number: String,
    pub content: String,
    pub media: Option<String>,
    pub points: i16,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub answers: Vec<PublicAnswer>,
}

impl From<Question> for PublicQuestion {
    fn from(q: Question) -> Self {
        let Json(answers) = q.answers;
        Self {
            id: q.id,
            number: q.number,
            content: q.content,
            media: q.media,
            points: q.points,
            category: q.category,
            kind: q.kind,
            answers: answers
                .into_iter()
                .map(|a| PublicAnswer {
                    option: a.option,
                    content: a.content,
                })
                .collect(),
        }
    }
}

/// Query parameters for question listing and learning mode.
#[derive(Debug, Default, Deserialize)]
pub struct QuestionFilter {
    pub category: Option<String>,

    /// "basic", "specialist", or "random"/absent for any type.
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl QuestionFilter {
    /// Resolves the type filter. "random" means no filter.
    pub fn kind(&self) -> Result<Option<QuestionKind>, String> {
        match self.kind.as_deref() {
            None | Some("") | Some("random") => Ok(None),
            Some(other) => other.parse().map(Some),
        }
    }
}

/// DTO for creating a new question.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = validate_answer_set))]
pub struct CreateQuestionRequest {
    #[validate(length(min = 1, max = 20))]
    pub number: String,
    #[validate(length(min = 1, max = 2000))]
    pub content: String,
    #[validate(length(min = 1, max = 500))]
    pub media: Option<String>,
    #[validate(range(min = 1, max = 3))]
    pub points: i16,
    #[validate(length(min = 1, max = 50), custom(function = validate_category))]
    pub category: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub answers: Vec<AnswerOption>,
    #[validate(length(max = 5000))]
    pub explanation: Option<String>,
}

fn validate_category(category: &str) -> Result<(), ValidationError> {
    if !CATEGORY_RE.is_match(category) {
        return Err(ValidationError::new("invalid_category"));
    }
    Ok(())
}

/// Enforces the answer-set invariant: exactly one correct option,
/// two options for basic questions, two or three for specialist ones.
fn validate_answer_set(req: &CreateQuestionRequest) -> Result<(), ValidationError> {
    let answers = &req.answers;

    let count_ok = match req.kind {
        QuestionKind::Basic => answers.len() == 2,
        QuestionKind::Specialist => (2..=3).contains(&answers.len()),
    };
    if !count_ok {
        return Err(ValidationError::new("wrong_option_count"));
    }

    if answers.iter().filter(|a| a.is_correct).count() != 1 {
        return Err(ValidationError::new("exactly_one_correct_option"));
    }

    for (i, a) in answers.iter().enumerate() {
        if a.option.trim().is_empty() || a.content.trim().is_empty() || a.content.len() > 1000 {
            return Err(ValidationError::new("invalid_option"));
        }
        if answers[..i].iter().any(|b| b.option == a.option) {
            return Err(ValidationError::new("duplicate_option_label"));
        }
    }
    Ok(())
}

/// DTO for the bulk catalogue import.
#[derive(Debug, Deserialize, Validate)]
pub struct ImportQuestionsRequest {
    /// Clear the question bank before inserting.
    #[serde(default)]
    pub replace: bool,
    #[validate(length(min = 1, max = 5000), nested)]
    pub questions: Vec<CreateQuestionRequest>,
}
