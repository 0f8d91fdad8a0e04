//! Wire types for the quiz REST backend.
//!
//! Questions arrive as `{ _id, content, category, options: [{id, text}],
//! correct_answer }` where `correct_answer` is an option id. The client keeps
//! an index instead, resolved once here.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::QuizError;
use crate::types::{Question, QuizOption};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionDto {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDto {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub category: String,
    pub options: Vec<OptionDto>,
    pub correct_answer: String,
}

impl TryFrom<QuestionDto> for Question {
    type Error = QuizError;

    fn try_from(dto: QuestionDto) -> Result<Self, Self::Error> {
        let options = dto
            .options
            .into_iter()
            .map(|o| QuizOption::new(o.id, o.text))
            .collect();
        Question::new(
            dto.id.clone(),
            dto.category,
            dto.content,
            options,
            &dto.correct_answer,
        )
        .map_err(|source| QuizError::InvalidQuestion { id: dto.id, source })
    }
}

impl From<&Question> for QuestionDto {
    fn from(q: &Question) -> Self {
        Self {
            id: q.id.clone(),
            content: q.content.clone(),
            category: q.category.clone(),
            options: q
                .options
                .iter()
                .map(|o| OptionDto {
                    id: o.id.clone(),
                    text: o.text.clone(),
                })
                .collect(),
            correct_answer: q.correct_option().map(|o| o.id.clone()).unwrap_or_default(),
        }
    }
}

/// Convert a fetched batch, skipping questions that fail validation.
pub fn questions_from_dtos(dtos: Vec<QuestionDto>) -> Vec<Question> {
    dtos.into_iter()
        .filter_map(|dto| match Question::try_from(dto) {
            Ok(q) => Some(q),
            Err(err) => {
                warn!(%err, "skipping malformed question");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelProgressBody {
    pub level_id: String,
    pub score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterCompletionBody {
    pub chapter_sequence: u32,
    pub score: u32,
    pub money: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStatsBody {
    pub category: String,
    pub total_answered: u32,
    pub correct_count: u32,
}
