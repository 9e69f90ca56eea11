//! Generic state for a single-input, single-request form
//!
//! Every tool widget has the same shape: an input, a loading flag, and
//! either a result or an error. [`AsyncForm`] keeps those together and
//! guarantees that a result and an error are never shown at the same time.
//!
//! Submissions are numbered. A response is only applied if it belongs to
//! the latest submission, so a slow request that finishes after the user
//! has resubmitted or cleared the form is dropped.

use std::future::Future;

/// Whether an input is complete enough to submit
pub trait FormInput {
    fn is_ready(&self) -> bool;
}

impl FormInput for String {
    fn is_ready(&self) -> bool {
        !self.trim().is_empty()
    }
}

impl FormInput for crate::tools::upn::UpnInput {
    fn is_ready(&self) -> bool {
        self.is_complete()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormPhase<R> {
    Idle,
    Loading,
    Ready(R),
    Failed(String),
}

/// Identifies one submission of a form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct AsyncForm<I, R> {
    pub input: I,
    phase: FormPhase<R>,
    submission: u64,
}

impl<I: Default, R> Default for AsyncForm<I, R> {
    fn default() -> Self {
        Self::new(I::default())
    }
}

impl<I, R> AsyncForm<I, R> {
    pub fn new(input: I) -> Self {
        Self {
            input,
            phase: FormPhase::Idle,
            submission: 0,
        }
    }

    pub fn phase(&self) -> &FormPhase<R> {
        &self.phase
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, FormPhase::Loading)
    }

    pub fn result(&self) -> Option<&R> {
        match &self.phase {
            FormPhase::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            FormPhase::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Set a result directly, for tools that need no request
    pub fn set_ready(&mut self, result: R) {
        self.submission += 1;
        self.phase = FormPhase::Ready(result);
    }

    /// Back to idle; any in-flight submission becomes stale
    pub fn reset(&mut self) {
        self.submission += 1;
        self.phase = FormPhase::Idle;
    }

    /// Fail the in-flight submission, if any, when its response can no
    /// longer arrive. Returns false if nothing was loading.
    pub fn abandon(&mut self, message: impl Into<String>) -> bool {
        if !self.is_loading() {
            return false;
        }

        tracing::debug!(ticket = self.submission, "abandoning in-flight submission");
        self.submission += 1;
        self.phase = FormPhase::Failed(message.into());
        true
    }

    /// Apply the outcome of a submission. Returns false if the ticket is stale.
    pub fn complete(&mut self, ticket: Ticket, outcome: Result<R, String>) -> bool {
        if ticket.0 != self.submission || !self.is_loading() {
            tracing::debug!(ticket = ticket.0, current = self.submission, "dropping stale response");
            return false;
        }

        self.phase = match outcome {
            Ok(result) => FormPhase::Ready(result),
            Err(message) => FormPhase::Failed(message),
        };
        true
    }
}

impl<I: FormInput, R> AsyncForm<I, R> {
    pub fn can_submit(&self) -> bool {
        self.input.is_ready() && !self.is_loading()
    }

    /// Start a submission, clearing the previous result or error.
    /// Returns `None` when submitting is not allowed right now.
    pub fn begin(&mut self) -> Option<Ticket> {
        if !self.can_submit() {
            return None;
        }

        self.submission += 1;
        self.phase = FormPhase::Loading;
        Some(Ticket(self.submission))
    }
}

impl<I: FormInput + Clone, R> AsyncForm<I, R> {
    /// Begin, run the request, and complete in one step.
    /// Returns false if the form could not be submitted.
    pub async fn submit<F, Fut>(&mut self, run: F) -> bool
    where
        F: FnOnce(I) -> Fut,
        Fut: Future<Output = Result<R, String>>,
    {
        let Some(ticket) = self.begin() else {
            return false;
        };

        let outcome = run(self.input.clone()).await;
        self.complete(ticket, outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::upn::UpnInput;

    #[test]
    fn test_cannot_submit_empty_input() {
        let mut form: AsyncForm<String, String> = AsyncForm::default();
        assert!(!form.can_submit());
        assert!(form.begin().is_none());

        form.input = "   ".into();
        assert!(!form.can_submit());

        form.input = "jane@contoso.com".into();
        assert!(form.can_submit());
    }

    #[test]
    fn test_upn_input_needs_all_fields() {
        let mut form: AsyncForm<UpnInput, String> = AsyncForm::default();
        form.input.first = "Jane".into();
        form.input.last = "Smith".into();
        assert!(!form.can_submit());
        form.input.domain = "contoso.com".into();
        assert!(form.can_submit());
    }

    #[test]
    fn test_loading_blocks_resubmit() {
        let mut form: AsyncForm<String, String> = AsyncForm::new("a@b.com".into());
        let ticket = form.begin().unwrap();
        assert!(form.is_loading());
        assert!(form.begin().is_none());

        assert!(form.complete(ticket, Ok("tenant".into())));
        assert_eq!(form.result().map(String::as_str), Some("tenant"));
        assert!(form.error().is_none());
    }

    #[test]
    fn test_error_replaces_result() {
        let mut form: AsyncForm<String, String> = AsyncForm::new("a@b.com".into());
        let first = form.begin().unwrap();
        form.complete(first, Ok("tenant".into()));

        let second = form.begin().unwrap();
        assert!(form.result().is_none());
        form.complete(second, Err("nope".into()));
        assert_eq!(form.error(), Some("nope"));
        assert!(form.result().is_none());
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut form: AsyncForm<String, String> = AsyncForm::new("a@b.com".into());
        let stale = form.begin().unwrap();
        form.reset();
        let current = form.begin().unwrap();

        assert!(!form.complete(stale, Ok("old".into())));
        assert!(form.is_loading());
        assert!(form.complete(current, Ok("new".into())));
        assert_eq!(form.result().map(String::as_str), Some("new"));
    }

    #[test]
    fn test_abandon_fails_loading_form() {
        let mut form: AsyncForm<String, String> = AsyncForm::new("a@b.com".into());
        assert!(!form.abandon("gone"));
        assert_eq!(form.phase(), &FormPhase::Idle);

        let ticket = form.begin().unwrap();
        assert!(form.abandon("gone"));
        assert_eq!(form.error(), Some("gone"));
        assert!(form.can_submit());

        // A late response for the abandoned submission is dropped
        assert!(!form.complete(ticket, Ok("tenant".into())));
        assert_eq!(form.error(), Some("gone"));
    }

    #[tokio::test]
    async fn test_submit_runs_request() {
        let mut form: AsyncForm<String, usize> = AsyncForm::new("contoso.com".into());
        let applied = form.submit(|input| async move { Ok(input.len()) }).await;
        assert!(applied);
        assert_eq!(form.phase(), &FormPhase::Ready(11));
    }

    #[tokio::test]
    async fn test_submit_refused_when_not_ready() {
        let mut form: AsyncForm<String, usize> = AsyncForm::default();
        let applied = form.submit(|_| async { Ok(1) }).await;
        assert!(!applied);
        assert_eq!(form.phase(), &FormPhase::Idle);
    }
}
