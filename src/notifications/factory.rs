//! Envelope construction, one rule per notification kind.
//!
//! Every rule takes already-resolved entities, so construction cannot fail.
//! Resolving those entities (and failing when one is missing) is the
//! dispatcher's job.

use chrono::Utc;
use uuid::Uuid;

use super::model::{Envelope, NotificationEventType, Operation, Service};
use crate::directory::{Event, Question, Quiz, User};

/// Notifications about a single event. All carry `[event_id]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventNotice {
    Upcoming,
    Start,
    Rsvp,
    Register,
    Unregister,
}

impl EventNotice {
    fn event_type(self) -> NotificationEventType {
        match self {
            Self::Upcoming => NotificationEventType::EventUpcoming,
            Self::Start => NotificationEventType::EventStart,
            Self::Rsvp => NotificationEventType::EventRsvp,
            Self::Register => NotificationEventType::EventRegister,
            Self::Unregister => NotificationEventType::EventUnregister,
        }
    }
}

/// Notifications about the recipient's own account. All carry `[user_id]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountNotice {
    Delete,
    SettingsVerified,
    SettingsChanged,
    PasswordReset,
}

impl AccountNotice {
    fn event_type(self) -> NotificationEventType {
        match self {
            Self::Delete => NotificationEventType::UserDelete,
            Self::SettingsVerified => NotificationEventType::UserSettingsVerified,
            Self::SettingsChanged => NotificationEventType::UserSettingsChanged,
            Self::PasswordReset => NotificationEventType::PasswordReset,
        }
    }
}

/// Pure envelope builders.
pub struct EnvelopeFactory;

impl EnvelopeFactory {
    pub fn event(notice: EventNotice, user: &User, event: &Event) -> Envelope {
        Self::get(
            user,
            Service::Event,
            notice.event_type(),
            vec![event.id.to_string()],
        )
    }

    /// `[question_id]`, followed by `quiz_id` when the question belongs to a quiz.
    pub fn question_asked(user: &User, question: &Question, quiz: Option<&Quiz>) -> Envelope {
        let mut parameters = vec![question.id.to_string()];
        parameters.extend(quiz.map(|q| q.id.to_string()));
        Self::get(
            user,
            Service::Question,
            NotificationEventType::QuestionAsked,
            parameters,
        )
    }

    /// `[user_id]`, followed by `quiz_id` when known.
    pub fn quiz_complete(user: &User, quiz: Option<&Quiz>) -> Envelope {
        let mut parameters = vec![user.id.to_string()];
        parameters.extend(quiz.map(|q| q.id.to_string()));
        Self::get(
            user,
            Service::Quiz,
            NotificationEventType::QuizComplete,
            parameters,
        )
    }

    pub fn account(notice: AccountNotice, user: &User) -> Envelope {
        Self::get(
            user,
            Service::User,
            notice.event_type(),
            vec![user.id.to_string()],
        )
    }

    /// Ask the client to display a lesson, question or reference material.
    ///
    /// Any other `display_type` falls back to the home screen: no service,
    /// no operation, no parameters.
    pub fn display(
        user: &User,
        reference_id: i64,
        display_type: NotificationEventType,
    ) -> Envelope {
        let service = match display_type {
            NotificationEventType::LessonDisplayed => Service::User,
            NotificationEventType::QuestionDisplayed => Service::Question,
            NotificationEventType::ReferenceMaterialDisplayed => Service::ReferenceMaterial,
            _ => return Self::home(user),
        };
        Self::get(user, service, display_type, vec![reference_id.to_string()])
    }

    fn home(user: &User) -> Envelope {
        Envelope {
            id: Uuid::new_v4(),
            recipient_id: user.id,
            event_type: NotificationEventType::HomeDisplayed,
            service: None,
            operation: None,
            parameters: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    fn get(
        user: &User,
        service: Service,
        event_type: NotificationEventType,
        parameters: Vec<String>,
    ) -> Envelope {
        Envelope {
            id: Uuid::new_v4(),
            recipient_id: user.id,
            event_type,
            service: Some(service),
            operation: Some(Operation::Get),
            parameters,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: 42,
            username: "pilot".into(),
        }
    }

    fn question() -> Question {
        Question {
            id: 11,
            text: "What is Vx?".into(),
        }
    }

    fn quiz() -> Quiz {
        Quiz {
            id: 77,
            title: "Performance".into(),
        }
    }

    #[test]
    fn event_notices_carry_event_id() {
        let event = Event {
            id: 5,
            title: "Ground school".into(),
        };
        for (notice, kind) in [
            (EventNotice::Upcoming, NotificationEventType::EventUpcoming),
            (EventNotice::Start, NotificationEventType::EventStart),
            (EventNotice::Rsvp, NotificationEventType::EventRsvp),
            (EventNotice::Register, NotificationEventType::EventRegister),
            (EventNotice::Unregister, NotificationEventType::EventUnregister),
        ] {
            let envelope = EnvelopeFactory::event(notice, &user(), &event);
            assert_eq!(envelope.recipient_id, 42);
            assert_eq!(envelope.event_type, kind);
            assert_eq!(envelope.service, Some(Service::Event));
            assert_eq!(envelope.operation, Some(Operation::Get));
            assert_eq!(envelope.parameters, vec!["5"]);
        }
    }

    #[test]
    fn question_asked_without_quiz() {
        let envelope = EnvelopeFactory::question_asked(&user(), &question(), None);
        assert_eq!(envelope.service, Some(Service::Question));
        assert_eq!(envelope.parameters, vec!["11"]);
    }

    #[test]
    fn question_asked_lists_question_before_quiz() {
        let envelope = EnvelopeFactory::question_asked(&user(), &question(), Some(&quiz()));
        assert_eq!(envelope.parameters, vec!["11", "77"]);
    }

    #[test]
    fn quiz_complete_lists_user_before_quiz() {
        let envelope = EnvelopeFactory::quiz_complete(&user(), Some(&quiz()));
        assert_eq!(envelope.service, Some(Service::Quiz));
        assert_eq!(envelope.event_type, NotificationEventType::QuizComplete);
        assert_eq!(envelope.parameters, vec!["42", "77"]);

        let envelope = EnvelopeFactory::quiz_complete(&user(), None);
        assert_eq!(envelope.parameters, vec!["42"]);
    }

    #[test]
    fn account_notices_carry_user_id() {
        for notice in [
            AccountNotice::Delete,
            AccountNotice::SettingsVerified,
            AccountNotice::SettingsChanged,
            AccountNotice::PasswordReset,
        ] {
            let envelope = EnvelopeFactory::account(notice, &user());
            assert_eq!(envelope.service, Some(Service::User));
            assert_eq!(envelope.parameters, vec!["42"]);
        }
        assert_eq!(
            EnvelopeFactory::account(AccountNotice::PasswordReset, &user()).event_type,
            NotificationEventType::PasswordReset
        );
    }

    #[test]
    fn display_lesson_uses_user_service() {
        let envelope =
            EnvelopeFactory::display(&user(), 3, NotificationEventType::LessonDisplayed);
        assert_eq!(envelope.service, Some(Service::User));
        assert_eq!(envelope.operation, Some(Operation::Get));
        assert_eq!(envelope.event_type, NotificationEventType::LessonDisplayed);
        assert_eq!(envelope.parameters, vec!["3"]);
    }

    #[test]
    fn display_question_and_reference_material() {
        let envelope =
            EnvelopeFactory::display(&user(), 8, NotificationEventType::QuestionDisplayed);
        assert_eq!(envelope.service, Some(Service::Question));

        let envelope = EnvelopeFactory::display(
            &user(),
            8,
            NotificationEventType::ReferenceMaterialDisplayed,
        );
        assert_eq!(envelope.service, Some(Service::ReferenceMaterial));
        assert_eq!(envelope.parameters, vec!["8"]);
    }

    #[test]
    fn display_other_types_fall_back_to_home() {
        for display_type in [
            NotificationEventType::HomeDisplayed,
            NotificationEventType::EventStart,
            NotificationEventType::QuizComplete,
        ] {
            let envelope = EnvelopeFactory::display(&user(), 3, display_type);
            assert_eq!(envelope.event_type, NotificationEventType::HomeDisplayed);
            assert_eq!(envelope.service, None);
            assert_eq!(envelope.operation, None);
            assert!(envelope.parameters.is_empty());
            assert_eq!(envelope.recipient_id, 42);
        }
    }
}
