use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Longest question accepted, in characters.
const QUESTION_MAX_CHARS: usize = 150;

/// Frequently asked question attached to a post. Deleted with its post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faq {
    pub id: i32,
    pub post_id: i32,
    pub question: String,
    pub answer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Faq {
    pub fn new(
        post_id: i32,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(DomainError::Validation("FAQ question is empty".to_string()));
        }
        if question.chars().count() > QUESTION_MAX_CHARS {
            return Err(DomainError::Validation(format!(
                "FAQ question exceeds {QUESTION_MAX_CHARS} characters"
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: 0,
            post_id,
            question,
            answer: answer.into(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_new(&self) -> bool {
        self.id == 0
    }
}
