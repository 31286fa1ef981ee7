//! Lookups for the entities a notification refers to.

pub mod memory;
pub mod model;

use async_trait::async_trait;

pub use memory::{DirectorySeed, InMemoryDirectory};
pub use model::{DomainMessage, Event, EventId, Question, QuestionId, Quiz, QuizId, User, UserId};

use crate::error::LookupError;

/// Backend-agnostic entity lookup used by the dispatcher.
///
/// `Ok(None)` means the entity does not exist. `Err` means the lookup itself failed.
#[async_trait]
pub trait EntityLookup: Send + Sync {
    async fn find_user(&self, id: UserId) -> Result<Option<User>, LookupError>;

    async fn find_event(&self, id: EventId) -> Result<Option<Event>, LookupError>;

    async fn find_question(&self, id: QuestionId) -> Result<Option<Question>, LookupError>;

    async fn find_quiz(&self, id: QuizId) -> Result<Option<Quiz>, LookupError>;
}
