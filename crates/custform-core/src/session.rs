//! Event-driven session over the customer form.
//!
//! Changes arrive one at a time and are applied synchronously. The
//! notification selector rule fires on every change; only the email message
//! is debounced: after a burst of email edits the resolver runs once, on the
//! last value, when the quiescence window has passed.
//!
//! # Example
//!
//! ```rust
//! use custform_core::config::FormConfig;
//! use custform_core::schema::EMAIL;
//! use custform_core::session::{FormEvent, FormSession};
//! use std::time::Duration;
//! use tokio::time::Instant;
//!
//! let mut session = FormSession::new(&FormConfig::default()).unwrap();
//! let start = Instant::now();
//!
//! session.handle(FormEvent::input(EMAIL, "not-an-email"), start).unwrap();
//! assert_eq!(session.poll(start), None);
//!
//! let message = session.poll(start + Duration::from_secs(1));
//! assert_eq!(message.as_deref(), Some("Please enter a valid email address"));
//! ```

use crate::config::FormConfig;
use crate::debounce::Debouncer;
use crate::error::Result;
use crate::messages::MessageResolver;
use crate::schema::{self, CustomerForm};
use custform_validate::FieldValue;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// One user action delivered by the display layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormEvent {
    /// The user edited a field
    Input { path: String, value: FieldValue },
    /// A field lost focus
    Touch { path: String },
    /// The notification channel was picked
    SetNotification { via: String },
    AddAddress,
    PopulateTestData,
    Reset,
}

impl FormEvent {
    pub fn input(path: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        FormEvent::Input {
            path: path.into(),
            value: value.into(),
        }
    }

    pub fn touch(path: impl Into<String>) -> Self {
        FormEvent::Touch { path: path.into() }
    }
}

pub struct FormSession {
    customer: CustomerForm,
    resolver: MessageResolver,
    email_changes: Debouncer<FieldValue>,
    email_message: String,
    evaluations: u64,
}

impl FormSession {
    pub fn new(config: &FormConfig) -> Result<Self> {
        Ok(Self {
            customer: CustomerForm::new()?,
            resolver: MessageResolver::from_config(config),
            email_changes: Debouncer::new(config.debounce_window()),
            email_message: String::new(),
            evaluations: 0,
        })
    }

    pub fn customer(&self) -> &CustomerForm {
        &self.customer
    }

    /// Message last computed for the email field.
    pub fn email_message(&self) -> &str {
        &self.email_message
    }

    /// How many times the email message has been recomputed.
    pub fn evaluations(&self) -> u64 {
        self.evaluations
    }

    /// When the pending email evaluation falls due, if one is pending.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.email_changes.deadline()
    }

    /// Apply one event. An email edit schedules a debounced evaluation.
    pub fn handle(&mut self, event: FormEvent, now: Instant) -> Result<()> {
        let before = self.customer.email()?.value().clone();
        let email_input = matches!(&event, FormEvent::Input { path, .. } if path == schema::EMAIL);

        match event {
            FormEvent::Input { path, value } => self.customer.form_mut().input(&path, value)?,
            FormEvent::Touch { path } => self.customer.form_mut().touch(&path)?,
            FormEvent::SetNotification { via } => self.customer.set_notification(&via)?,
            FormEvent::AddAddress => {
                self.customer.add_address()?;
            }
            FormEvent::PopulateTestData => self.customer.populate_test_data()?,
            FormEvent::Reset => self.customer.form_mut().reset()?,
        }

        let after = self.customer.email()?.value();
        if email_input || *after != before {
            self.email_changes.push(after.clone(), now);
        }
        Ok(())
    }

    /// Run the email resolver if its debounce window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let value = self.email_changes.poll(now)?;
        let field = self.customer.email().ok()?;
        self.email_message = self.resolver.resolve(field);
        self.evaluations += 1;
        tracing::debug!(
            value = %value,
            message = %self.email_message,
            "Evaluated debounced email"
        );
        Some(self.email_message.clone())
    }

    /// Feed events from `events` as they arrive and fire debounced
    /// evaluations on time. Each computed email message is passed to
    /// `on_message`. Returns once the channel closes and any pending
    /// evaluation has fired.
    ///
    /// An event that fails to apply is logged and skipped.
    pub async fn drive<F>(&mut self, mut events: mpsc::Receiver<FormEvent>, mut on_message: F)
    where
        F: FnMut(&str),
    {
        loop {
            let deadline = self.next_deadline();
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => {
                        if let Err(e) = self.handle(event, Instant::now()) {
                            tracing::warn!(error = %e, "Skipping form event");
                        }
                    }
                    None => break,
                },
                _ = sleep_until(deadline) => {
                    if let Some(message) = self.poll(Instant::now()) {
                        on_message(&message);
                    }
                }
            }
        }

        if let Some(deadline) = self.next_deadline() {
            tokio::time::sleep_until(deadline).await;
            if let Some(message) = self.poll(Instant::now()) {
                on_message(&message);
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::schema::{CONFIRM_EMAIL, EMAIL, PHONE};
    use custform_validate::ErrorKind;
    use std::time::Duration;

    fn session() -> FormSession {
        FormSession::new(&FormConfig::default()).unwrap()
    }

    #[test]
    fn burst_yields_one_evaluation_of_last_value() {
        let mut session = session();
        let start = Instant::now();
        for (i, value) in ["a", "a@", "a@b.com"].into_iter().enumerate() {
            let at = start + Duration::from_millis(200 * i as u64);
            session.handle(FormEvent::input(EMAIL, value), at).unwrap();
        }

        assert_eq!(session.poll(start + Duration::from_millis(1000)), None);
        assert_eq!(session.poll(start + Duration::from_millis(1400)), Some(String::new()));
        assert_eq!(session.evaluations(), 1);
        assert_eq!(session.poll(start + Duration::from_secs(10)), None);
    }

    #[test]
    fn touched_empty_email_reports_required() {
        let mut session = session();
        let start = Instant::now();
        session.handle(FormEvent::touch(EMAIL), start).unwrap();
        session.handle(FormEvent::input(EMAIL, ""), start).unwrap();
        let message = session.poll(start + Duration::from_secs(1));
        assert_eq!(message.as_deref(), Some("Please enter your email address"));
        assert_eq!(session.email_message(), "Please enter your email address");
    }

    #[test]
    fn other_fields_do_not_schedule() {
        let mut session = session();
        let start = Instant::now();
        session.handle(FormEvent::input(CONFIRM_EMAIL, "x"), start).unwrap();
        session.handle(FormEvent::AddAddress, start).unwrap();
        assert!(session.next_deadline().is_none());
    }

    #[test]
    fn notification_rule_is_not_debounced() {
        let mut session = session();
        let start = Instant::now();
        session
            .handle(FormEvent::SetNotification { via: "text".into() }, start)
            .unwrap();
        let phone = session.customer().form().field(PHONE).unwrap();
        assert!(phone.has_error(&ErrorKind::Required));
    }

    #[test]
    fn failed_event_leaves_state_alone() {
        let mut session = session();
        let err = session.handle(FormEvent::input("fax", "1"), Instant::now());
        assert!(err.is_err());
        assert!(session.next_deadline().is_none());
    }

    #[test]
    fn email_path_must_be_canonical() {
        let mut session = session();
        let start = Instant::now();
        session.handle(FormEvent::input(EMAIL, "bad"), start).unwrap();
        assert!(session.poll(start + Duration::from_secs(1)).is_some());

        let later = start + Duration::from_secs(2);
        for path in [".emailGroup.email", "emailGroup.email.", "emailGroup..email"] {
            let err = session.handle(FormEvent::input(path, "bad"), later);
            assert!(matches!(err, Err(FormError::NotFound(_))), "{path}");
        }
        assert!(session.next_deadline().is_none());

        session.handle(FormEvent::input(EMAIL, "bad"), later).unwrap();
        assert!(session.next_deadline().is_some());
    }

    #[test]
    fn events_from_json() {
        let events: Vec<FormEvent> = serde_json::from_str(
            r#"[
                {"input": {"path": "emailGroup.email", "value": "a@b.com"}},
                {"touch": {"path": "phone"}},
                {"set_notification": {"via": "text"}},
                "add_address"
            ]"#,
        )
        .unwrap();
        assert_eq!(events[0], FormEvent::input(EMAIL, "a@b.com"));
        assert_eq!(events[3], FormEvent::AddAddress);
    }
}
