//! Notification fan-out from domain events to per-recipient push envelopes.

pub mod dispatcher;
pub mod factory;
pub mod model;
pub mod queue;
pub mod ws;

pub use dispatcher::NotificationDispatcher;
pub use factory::{AccountNotice, EnvelopeFactory, EventNotice};
pub use model::{Envelope, NotificationEvent, NotificationEventType, Operation, Service};
pub use queue::RecipientQueue;
