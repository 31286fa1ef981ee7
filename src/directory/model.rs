//! Resolved domain entities and the trigger payload that references them.

use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type EventId = i64;
pub type QuestionId = i64;
pub type QuizId = i64;

/// A registered user; the recipient of notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub username: String,
}

/// A scheduled event users can register or RSVP for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    #[serde(default)]
    pub title: String,
}

/// A question, optionally asked as part of a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    #[serde(default)]
    pub text: String,
}

/// A quiz made up of questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quiz {
    pub id: QuizId,
    #[serde(default)]
    pub title: String,
}

/// The identifiers carried by an inbound domain event.
///
/// Which ids are required depends on the notification kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMessage {
    pub user_id: UserId,
    #[serde(default)]
    pub event_id: Option<EventId>,
    #[serde(default)]
    pub question_id: Option<QuestionId>,
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
}

impl DomainMessage {
    pub fn for_user(user_id: UserId) -> Self {
        Self {
            user_id,
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn with_question(mut self, question_id: QuestionId) -> Self {
        self.question_id = Some(question_id);
        self
    }

    pub fn with_quiz(mut self, quiz_id: QuizId) -> Self {
        self.quiz_id = Some(quiz_id);
        self
    }
}
