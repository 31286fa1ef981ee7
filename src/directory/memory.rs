//! In-memory entity directory.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::EntityLookup;
use super::model::{Event, EventId, Question, QuestionId, Quiz, QuizId, User, UserId};
use crate::error::LookupError;

/// Seed file contents for [`InMemoryDirectory::from_seed`].
#[derive(Debug, Default, Deserialize)]
pub struct DirectorySeed {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default)]
    pub quizzes: Vec<Quiz>,
}

/// Entity tables held in memory. Cheap to populate in tests and local runs.
#[derive(Default)]
pub struct InMemoryDirectory {
    users: RwLock<HashMap<UserId, User>>,
    events: RwLock<HashMap<EventId, Event>>,
    questions: RwLock<HashMap<QuestionId, Question>>,
    quizzes: RwLock<HashMap<QuizId, Quiz>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory pre-populated from a seed.
    pub fn from_seed(seed: DirectorySeed) -> Self {
        Self {
            users: RwLock::new(seed.users.into_iter().map(|u| (u.id, u)).collect()),
            events: RwLock::new(seed.events.into_iter().map(|e| (e.id, e)).collect()),
            questions: RwLock::new(seed.questions.into_iter().map(|q| (q.id, q)).collect()),
            quizzes: RwLock::new(seed.quizzes.into_iter().map(|q| (q.id, q)).collect()),
        }
    }

    pub async fn insert_user(&self, user: User) {
        self.users.write().await.insert(user.id, user);
    }

    pub async fn insert_event(&self, event: Event) {
        self.events.write().await.insert(event.id, event);
    }

    pub async fn insert_question(&self, question: Question) {
        self.questions.write().await.insert(question.id, question);
    }

    pub async fn insert_quiz(&self, quiz: Quiz) {
        self.quizzes.write().await.insert(quiz.id, quiz);
    }
}

#[async_trait]
impl EntityLookup for InMemoryDirectory {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, LookupError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, LookupError> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, LookupError> {
        Ok(self.questions.read().await.get(&id).cloned())
    }

    async fn find_quiz(&self, id: QuizId) -> Result<Option<Quiz>, LookupError> {
        Ok(self.quizzes.read().await.get(&id).cloned())
    }
}
