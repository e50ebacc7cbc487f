// ABOUTME: Lesson and question records plus their request payloads
// ABOUTME: Boundary models for the content and Q&A endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A unit of teaching content uploaded by an admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique lesson identifier
    pub id: String,
    /// Title, unique across all lessons
    pub title: String,
    /// Lesson body text
    pub content: String,
    /// When the lesson was created
    pub created_at: DateTime<Utc>,
    /// When the lesson was last modified
    pub updated_at: DateTime<Utc>,
}

impl Lesson {
    #[must_use]
    pub fn new(title: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A question asked about a lesson, optionally with a stored answer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    /// Unique question identifier
    pub id: String,
    /// Lesson the question was asked about
    pub lesson_id: String,
    /// Account that asked
    pub user_id: Uuid,
    /// Question text
    pub question: String,
    /// Answer text; empty until one is recorded
    pub answer: String,
    /// When the question was asked
    pub created_at: DateTime<Utc>,
}

impl Question {
    #[must_use]
    pub fn new(lesson_id: String, user_id: Uuid, question: String, answer: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lesson_id,
            user_id,
            question,
            answer,
            created_at: Utc::now(),
        }
    }
}

/// Payload for creating a lesson
#[derive(Debug, Deserialize)]
pub struct CreateLessonRequest {
    pub title: String,
    pub content: String,
}

/// Payload for saving a question with its answer
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    pub lesson_id: String,
    pub question: String,
    pub answer: String,
}

/// Payload for requesting an AI-generated answer
#[derive(Debug, Deserialize)]
pub struct AskQuestionRequest {
    pub lesson_id: String,
    pub question: String,
}

/// Query parameters for the lesson listing endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ListLessonsQuery {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
