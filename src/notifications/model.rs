//! Notification data model: envelopes, event kinds and push-channel frames.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::directory::{DomainMessage, UserId};
use crate::responses::ResponseOption;

/// Every kind of notification the relay knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEventType {
    EventUpcoming,
    EventStart,
    EventRsvp,
    EventRegister,
    EventUnregister,
    EventLastMinuteRegistration,
    EventCompleted,
    QuestionAsked,
    QuizComplete,
    UserDelete,
    UserSettingsVerified,
    UserSettingsChanged,
    PasswordReset,
    LessonDisplayed,
    QuestionDisplayed,
    ReferenceMaterialDisplayed,
    HomeDisplayed,
}

impl std::fmt::Display for NotificationEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::EventUpcoming => "EVENT_UPCOMING",
            Self::EventStart => "EVENT_START",
            Self::EventRsvp => "EVENT_RSVP",
            Self::EventRegister => "EVENT_REGISTER",
            Self::EventUnregister => "EVENT_UNREGISTER",
            Self::EventLastMinuteRegistration => "EVENT_LAST_MINUTE_REGISTRATION",
            Self::EventCompleted => "EVENT_COMPLETED",
            Self::QuestionAsked => "QUESTION_ASKED",
            Self::QuizComplete => "QUIZ_COMPLETE",
            Self::UserDelete => "USER_DELETE",
            Self::UserSettingsVerified => "USER_SETTINGS_VERIFIED",
            Self::UserSettingsChanged => "USER_SETTINGS_CHANGED",
            Self::PasswordReset => "PASSWORD_RESET",
            Self::LessonDisplayed => "LESSON_DISPLAYED",
            Self::QuestionDisplayed => "QUESTION_DISPLAYED",
            Self::ReferenceMaterialDisplayed => "REFERENCE_MATERIAL_DISPLAYED",
            Self::HomeDisplayed => "HOME_DISPLAYED",
        };
        f.write_str(name)
    }
}

/// Which subsystem an envelope concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Service {
    Event,
    Question,
    Quiz,
    ReferenceMaterial,
    User,
}

/// The action the client should take for an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Operation {
    /// Fetch the referenced resource.
    Get,
}

/// Canonical notification record addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub id: Uuid,
    pub recipient_id: UserId,
    pub event_type: NotificationEventType,
    pub service: Option<Service>,
    pub operation: Option<Operation>,
    /// String-encoded ids; order is fixed per event type.
    pub parameters: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

/// Inbound domain events, one variant per dispatchable notification kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    EventUpcoming { message: DomainMessage },
    EventStart { message: DomainMessage },
    EventRsvp { message: DomainMessage },
    EventRegister { message: DomainMessage },
    EventUnregister { message: DomainMessage },
    EventLastMinuteRegistration { message: DomainMessage },
    EventCompleted { message: DomainMessage },
    QuestionAsked { message: DomainMessage },
    QuizComplete { message: DomainMessage },
    UserDelete { message: DomainMessage },
    UserSettingsVerified { message: DomainMessage },
    UserSettingsChanged { message: DomainMessage },
    PasswordReset { message: DomainMessage },
    /// Ask the client to display something. Unrecognized display types show home.
    Display {
        message: DomainMessage,
        reference_id: i64,
        display_type: NotificationEventType,
    },
}

impl NotificationEvent {
    /// The trigger payload carried by this event.
    pub fn message(&self) -> &DomainMessage {
        match self {
            Self::EventUpcoming { message }
            | Self::EventStart { message }
            | Self::EventRsvp { message }
            | Self::EventRegister { message }
            | Self::EventUnregister { message }
            | Self::EventLastMinuteRegistration { message }
            | Self::EventCompleted { message }
            | Self::QuestionAsked { message }
            | Self::QuizComplete { message }
            | Self::UserDelete { message }
            | Self::UserSettingsVerified { message }
            | Self::UserSettingsChanged { message }
            | Self::PasswordReset { message }
            | Self::Display { message, .. } => message,
        }
    }

    /// The notification type this event is requested as.
    pub fn event_type(&self) -> NotificationEventType {
        match self {
            Self::EventUpcoming { .. } => NotificationEventType::EventUpcoming,
            Self::EventStart { .. } => NotificationEventType::EventStart,
            Self::EventRsvp { .. } => NotificationEventType::EventRsvp,
            Self::EventRegister { .. } => NotificationEventType::EventRegister,
            Self::EventUnregister { .. } => NotificationEventType::EventUnregister,
            Self::EventLastMinuteRegistration { .. } => {
                NotificationEventType::EventLastMinuteRegistration
            }
            Self::EventCompleted { .. } => NotificationEventType::EventCompleted,
            Self::QuestionAsked { .. } => NotificationEventType::QuestionAsked,
            Self::QuizComplete { .. } => NotificationEventType::QuizComplete,
            Self::UserDelete { .. } => NotificationEventType::UserDelete,
            Self::UserSettingsVerified { .. } => NotificationEventType::UserSettingsVerified,
            Self::UserSettingsChanged { .. } => NotificationEventType::UserSettingsChanged,
            Self::PasswordReset { .. } => NotificationEventType::PasswordReset,
            Self::Display { display_type, .. } => *display_type,
        }
    }
}

/// Actions a push client can send.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientAction {
    /// Free-text answer to a prompt (A/B/C/D, CONFIRM, STOP, ...).
    Reply { text: String },
}

/// Frames sent over the push channel (server → client).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WsMessage {
    /// Everything queued for the recipient (sent on connect and after lag).
    EnvelopesSync { envelopes: Vec<Envelope> },
    /// A newly queued envelope.
    Envelope { envelope: Envelope },
    /// The client's reply was recognized.
    ReplyAccepted { option: ResponseOption },
    /// The client's reply was not recognized.
    ReplyRejected { reason: String },
}
