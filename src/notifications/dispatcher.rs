//! Notification dispatcher: resolve entities, build the envelope, queue it.

use std::sync::Arc;

use tracing::{debug, warn};

use super::factory::{AccountNotice, EnvelopeFactory, EventNotice};
use super::model::{Envelope, NotificationEvent};
use super::queue::RecipientQueue;
use crate::directory::{DomainMessage, EntityLookup, Event, Question, Quiz, User};
use crate::error::DispatchError;

/// Turns inbound domain events into queued envelopes.
///
/// Each successful dispatch appends exactly one envelope. Any failure aborts
/// before the queue is touched.
pub struct NotificationDispatcher {
    lookup: Arc<dyn EntityLookup>,
    queue: Arc<RecipientQueue>,
}

impl NotificationDispatcher {
    pub fn new(lookup: Arc<dyn EntityLookup>, queue: Arc<RecipientQueue>) -> Self {
        Self { lookup, queue }
    }

    pub fn queue(&self) -> &Arc<RecipientQueue> {
        &self.queue
    }

    /// Dispatch an event, returning the envelope that was queued.
    pub async fn dispatch(&self, event: NotificationEvent) -> Result<Envelope, DispatchError> {
        let event_type = event.event_type();
        let result = self.build(event).await;

        match result {
            Ok(envelope) => {
                self.queue.append(envelope.clone()).await;
                Ok(envelope)
            }
            Err(e) => {
                warn!(event_type = %event_type, error = %e, "Dispatch failed");
                Err(e)
            }
        }
    }

    async fn build(&self, event: NotificationEvent) -> Result<Envelope, DispatchError> {
        debug!(event_type = %event.event_type(), user_id = event.message().user_id, "Dispatching");

        match event {
            NotificationEvent::EventUpcoming { message } => {
                self.event_envelope(EventNotice::Upcoming, &message).await
            }
            NotificationEvent::EventStart { message } => {
                self.event_envelope(EventNotice::Start, &message).await
            }
            NotificationEvent::EventRsvp { message } => {
                self.event_envelope(EventNotice::Rsvp, &message).await
            }
            NotificationEvent::EventRegister { message } => {
                self.event_envelope(EventNotice::Register, &message).await
            }
            NotificationEvent::EventUnregister { message } => {
                self.event_envelope(EventNotice::Unregister, &message).await
            }
            NotificationEvent::QuestionAsked { message } => {
                let user = self.user(&message).await?;
                let question = self.question(&message).await?;
                let quiz = self.optional_quiz(&message).await?;
                Ok(EnvelopeFactory::question_asked(
                    &user,
                    &question,
                    quiz.as_ref(),
                ))
            }
            NotificationEvent::QuizComplete { message } => {
                let user = self.user(&message).await?;
                let quiz = self.optional_quiz(&message).await?;
                Ok(EnvelopeFactory::quiz_complete(&user, quiz.as_ref()))
            }
            NotificationEvent::UserDelete { message } => {
                self.account_envelope(AccountNotice::Delete, &message).await
            }
            NotificationEvent::UserSettingsVerified { message } => {
                self.account_envelope(AccountNotice::SettingsVerified, &message)
                    .await
            }
            NotificationEvent::UserSettingsChanged { message } => {
                self.account_envelope(AccountNotice::SettingsChanged, &message)
                    .await
            }
            NotificationEvent::PasswordReset { message } => {
                self.account_envelope(AccountNotice::PasswordReset, &message)
                    .await
            }
            NotificationEvent::Display {
                message,
                reference_id,
                display_type,
            } => {
                let user = self.user(&message).await?;
                Ok(EnvelopeFactory::display(&user, reference_id, display_type))
            }
            event @ (NotificationEvent::EventLastMinuteRegistration { .. }
            | NotificationEvent::EventCompleted { .. }) => Err(DispatchError::Unsupported {
                event_type: event.event_type().to_string(),
            }),
        }
    }

    async fn event_envelope(
        &self,
        notice: EventNotice,
        message: &DomainMessage,
    ) -> Result<Envelope, DispatchError> {
        let user = self.user(message).await?;
        let event = self.event(message).await?;
        Ok(EnvelopeFactory::event(notice, &user, &event))
    }

    async fn account_envelope(
        &self,
        notice: AccountNotice,
        message: &DomainMessage,
    ) -> Result<Envelope, DispatchError> {
        let user = self.user(message).await?;
        Ok(EnvelopeFactory::account(notice, &user))
    }

    // ── Entity resolution ────────────────────────────────────────────────

    async fn user(&self, message: &DomainMessage) -> Result<User, DispatchError> {
        self.lookup
            .find_user(message.user_id)
            .await?
            .ok_or_else(|| DispatchError::not_found("user", Some(message.user_id)))
    }

    async fn event(&self, message: &DomainMessage) -> Result<Event, DispatchError> {
        let id = message
            .event_id
            .ok_or_else(|| DispatchError::not_found("event", None))?;
        self.lookup
            .find_event(id)
            .await?
            .ok_or_else(|| DispatchError::not_found("event", Some(id)))
    }

    async fn question(&self, message: &DomainMessage) -> Result<Question, DispatchError> {
        let id = message
            .question_id
            .ok_or_else(|| DispatchError::not_found("question", None))?;
        self.lookup
            .find_question(id)
            .await?
            .ok_or_else(|| DispatchError::not_found("question", Some(id)))
    }

    /// A quiz is optional, but one that is referenced must exist.
    async fn optional_quiz(&self, message: &DomainMessage) -> Result<Option<Quiz>, DispatchError> {
        let Some(id) = message.quiz_id else {
            return Ok(None);
        };
        self.lookup
            .find_quiz(id)
            .await?
            .map(Some)
            .ok_or_else(|| DispatchError::not_found("quiz", Some(id)))
    }
}
