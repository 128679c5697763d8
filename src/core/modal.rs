use crate::core::events::OpenDemoModal;
use crate::domain::model::{ContactSubmission, ModalEvent, ModalStep};
use crate::domain::ports::{ContactSubmitter, ModalHost};
use crate::utils::error::BookingError;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub const BUSINESS_EMAIL_MESSAGE: &str = "Please use your business email. No Gmail, Yahoo, etc.";
pub const CONNECTION_ERROR_MESSAGE: &str = "Connection error. Please try again.";

/// 狀態轉移表；不在表內的組合代表該事件在此狀態下無效
pub fn next_step(step: ModalStep, event: ModalEvent) -> Option<ModalStep> {
    use ModalEvent::*;
    use ModalStep::*;

    match (step, event) {
        (_, Open) | (_, Close) => Some(Form),
        (Form, SubmitRejected) => Some(Form),
        (Form, SubmitAccepted) => Some(Submitting),
        (Submitting, SubmitSucceeded) => Some(Scheduler),
        (Submitting, SubmitFailed) => Some(Form),
        _ => None,
    }
}

/// 預約 demo 的 modal 控制器
///
/// 擁有 modal 的顯示狀態、表單欄位與 `Form → Submitting → Scheduler` 流程。
/// 畫面相關的副作用交給 `ModalHost`，網路呼叫交給 `ContactSubmitter`。
pub struct BookDemoModal<S: ContactSubmitter, H: ModalHost> {
    submitter: S,
    host: H,
    open: bool,
    step: ModalStep,
    first_name: String,
    last_name: String,
    email: String,
    error: Option<String>,
    meeting_url: Option<String>,
}

impl<S: ContactSubmitter, H: ModalHost> BookDemoModal<S, H> {
    pub fn new(submitter: S, host: H) -> Self {
        Self {
            submitter,
            host,
            open: false,
            step: ModalStep::Form,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            error: None,
            meeting_url: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn step(&self) -> ModalStep {
        self.step
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn meeting_url(&self) -> Option<&str> {
        self.meeting_url.as_deref()
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn inputs_enabled(&self) -> bool {
        self.open && self.step == ModalStep::Form
    }

    pub fn can_submit(&self) -> bool {
        self.inputs_enabled()
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        if self.inputs_enabled() {
            self.first_name = value.into();
        }
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        if self.inputs_enabled() {
            self.last_name = value.into();
        }
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        if self.inputs_enabled() {
            self.email = value.into();
        }
    }

    /// 處理所有尚未消化的開啟訊號，回傳處理了幾個
    pub fn listen(&mut self, receiver: &mut broadcast::Receiver<OpenDemoModal>) -> usize {
        let mut handled = 0;
        loop {
            match receiver.try_recv() {
                Ok(OpenDemoModal) => {
                    self.open();
                    handled += 1;
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::debug!("Skipped {} stale open signals", skipped);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        handled
    }

    pub fn open(&mut self) {
        self.reset_form();
        self.apply(ModalEvent::Open);

        if !self.open {
            self.open = true;
            self.host.show_dialog();
            self.host.set_scroll_lock(true);
        }
        // dialog 顯示後才移動焦點
        self.host.focus_first_field();
    }

    pub fn close(&mut self) {
        self.reset_form();
        self.apply(ModalEvent::Close);

        if self.open {
            self.open = false;
            self.host.hide_dialog();
            self.host.set_scroll_lock(false);
        }
    }

    /// 送出表單；只有在 `Form` 時有效，最多發出一次網路請求
    pub async fn submit(&mut self) -> ModalStep {
        if !self.can_submit() {
            tracing::debug!("Ignoring submit while {:?}", self.step);
            return self.step;
        }
        self.error = None;

        let contact = match ContactSubmission::from_form(
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
        ) {
            Ok(contact) => contact,
            Err(e) => {
                tracing::debug!("Form rejected before submit: {}", e);
                self.error = Some(match e {
                    BookingError::FreeEmailError { .. } => BUSINESS_EMAIL_MESSAGE.to_string(),
                    other => other.user_friendly_message(),
                });
                self.apply(ModalEvent::SubmitRejected);
                return self.step;
            }
        };

        self.apply(ModalEvent::SubmitAccepted);

        match self.submitter.submit(&contact).await {
            Ok(meeting_url) => {
                tracing::info!("✅ Demo request submitted for {}", contact.email);
                self.meeting_url = Some(meeting_url);
                self.apply(ModalEvent::SubmitSucceeded);
            }
            Err(e) => {
                tracing::warn!("❌ Demo request failed: {}", e);
                self.error = Some(match e {
                    BookingError::SubmissionRejectedError { .. } => e.user_friendly_message(),
                    _ => CONNECTION_ERROR_MESSAGE.to_string(),
                });
                self.apply(ModalEvent::SubmitFailed);
            }
        }

        self.step
    }

    fn apply(&mut self, event: ModalEvent) {
        match next_step(self.step, event) {
            Some(next) => {
                tracing::debug!("Modal {:?} --{:?}--> {:?}", self.step, event, next);
                self.step = next;
            }
            None => tracing::debug!("Modal ignored {:?} while {:?}", event, self.step),
        }
    }

    fn reset_form(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.email.clear();
        self.error = None;
        self.meeting_url = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Default)]
    struct RecordingHost {
        calls: Vec<&'static str>,
    }

    impl ModalHost for RecordingHost {
        fn show_dialog(&mut self) {
            self.calls.push("show");
        }

        fn hide_dialog(&mut self) {
            self.calls.push("hide");
        }

        fn set_scroll_lock(&mut self, locked: bool) {
            self.calls.push(if locked { "lock" } else { "unlock" });
        }

        fn focus_first_field(&mut self) {
            self.calls.push("focus");
        }
    }

    #[derive(Clone)]
    enum Reply {
        Url(&'static str),
        Rejected(Option<&'static str>),
        Offline,
    }

    #[derive(Clone)]
    struct StubSubmitter {
        reply: Reply,
        calls: Arc<AtomicUsize>,
    }

    impl StubSubmitter {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl ContactSubmitter for StubSubmitter {
        async fn submit(&self, _contact: &ContactSubmission) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Reply::Url(url) => Ok(url.to_string()),
                Reply::Rejected(message) => Err(BookingError::SubmissionRejectedError {
                    status: 400,
                    message: message.map(str::to_string),
                }),
                Reply::Offline => Err(BookingError::IoError(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))),
            }
        }
    }

    fn filled(reply: Reply) -> (BookDemoModal<StubSubmitter, RecordingHost>, Arc<AtomicUsize>) {
        let submitter = StubSubmitter::new(reply);
        let calls = submitter.calls.clone();
        let mut modal = BookDemoModal::new(submitter, RecordingHost::default());
        modal.open();
        modal.set_first_name("Jane");
        modal.set_last_name("Smith");
        modal.set_email("jane@acme.com");
        (modal, calls)
    }

    #[test]
    fn test_transition_table() {
        assert_eq!(next_step(ModalStep::Scheduler, ModalEvent::Open), Some(ModalStep::Form));
        assert_eq!(
            next_step(ModalStep::Form, ModalEvent::SubmitAccepted),
            Some(ModalStep::Submitting)
        );
        assert_eq!(
            next_step(ModalStep::Submitting, ModalEvent::SubmitFailed),
            Some(ModalStep::Form)
        );
        assert_eq!(next_step(ModalStep::Form, ModalEvent::SubmitSucceeded), None);
        assert_eq!(next_step(ModalStep::Submitting, ModalEvent::SubmitAccepted), None);
        assert_eq!(next_step(ModalStep::Scheduler, ModalEvent::SubmitRejected), None);
    }

    #[test]
    fn test_open_runs_entry_actions_in_order() {
        let mut modal = BookDemoModal::new(StubSubmitter::new(Reply::Offline), RecordingHost::default());
        modal.open();
        assert!(modal.is_open());
        assert_eq!(modal.step(), ModalStep::Form);
        assert_eq!(modal.host().calls, vec!["show", "lock", "focus"]);
    }

    #[test]
    fn test_inputs_ignored_while_closed() {
        let mut modal = BookDemoModal::new(StubSubmitter::new(Reply::Offline), RecordingHost::default());
        modal.set_first_name("Jane");
        assert_eq!(modal.first_name(), "");
    }

    #[tokio::test]
    async fn test_successful_submit_reaches_scheduler() {
        let (mut modal, calls) = filled(Reply::Url("https://meetings.example/jane"));
        assert_eq!(modal.submit().await, ModalStep::Scheduler);
        assert_eq!(modal.meeting_url(), Some("https://meetings.example/jane"));
        assert_eq!(modal.error(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(!modal.can_submit());
    }

    #[tokio::test]
    async fn test_blank_field_never_submits() {
        let (mut modal, calls) = filled(Reply::Url("https://meetings.example/jane"));
        modal.set_last_name("   ");
        assert_eq!(modal.submit().await, ModalStep::Form);
        assert_eq!(
            modal.error(),
            Some("First name, last name, and email are required.")
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_free_email_never_submits() {
        let (mut modal, calls) = filled(Reply::Url("https://meetings.example/jane"));
        modal.set_email("jane@gmail.com");
        assert_eq!(modal.submit().await, ModalStep::Form);
        assert_eq!(modal.error(), Some(BUSINESS_EMAIL_MESSAGE));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejection_keeps_fields_and_uses_server_message() {
        let (mut modal, _) = filled(Reply::Rejected(Some("Email domain is blocked")));
        assert_eq!(modal.submit().await, ModalStep::Form);
        assert_eq!(modal.error(), Some("Email domain is blocked"));
        assert_eq!(modal.first_name(), "Jane");
        assert_eq!(modal.email(), "jane@acme.com");

        let (mut modal, _) = filled(Reply::Rejected(None));
        modal.submit().await;
        assert_eq!(modal.error(), Some("Submission failed. Please try again."));
    }

    #[tokio::test]
    async fn test_connection_failure_message() {
        let (mut modal, calls) = filled(Reply::Offline);
        assert_eq!(modal.submit().await, ModalStep::Form);
        assert_eq!(modal.error(), Some(CONNECTION_ERROR_MESSAGE));

        // 可以手動重送
        assert_eq!(modal.submit().await, ModalStep::Form);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_close_and_reopen_resets() {
        let (mut modal, _) = filled(Reply::Url("https://meetings.example/jane"));
        modal.submit().await;
        modal.close();
        assert!(!modal.is_open());
        assert!(modal.host().calls.ends_with(&["hide", "unlock"]));

        modal.open();
        assert_eq!(modal.step(), ModalStep::Form);
        assert_eq!(modal.first_name(), "");
        assert_eq!(modal.last_name(), "");
        assert_eq!(modal.email(), "");
        assert_eq!(modal.error(), None);
        assert_eq!(modal.meeting_url(), None);
    }

    #[tokio::test]
    async fn test_submit_from_scheduler_is_ignored() {
        let (mut modal, calls) = filled(Reply::Url("https://meetings.example/jane"));
        modal.submit().await;
        assert_eq!(modal.submit().await, ModalStep::Scheduler);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listen_opens_on_signal() {
        let events = crate::core::events::DemoModalEvents::new();
        let mut receiver = events.subscribe();
        let mut modal = BookDemoModal::new(StubSubmitter::new(Reply::Offline), RecordingHost::default());

        assert_eq!(modal.listen(&mut receiver), 0);
        events.open_demo_modal();
        assert_eq!(modal.listen(&mut receiver), 1);
        assert!(modal.is_open());
    }
}
