//! Query lifecycle independent of the window.
//!
//! The controller owns the form state and all outputs (response area, summary field,
//! link status, loading flag). Every request runs on a background thread and reports
//! back over a channel; [`QueryController::pump`] drains those channels once per frame.

use crate::api::{Backend, QueryAccepted, QueryRequest, SearchRequest};
use crate::error::ClientError;
use crate::poll::{PollEvent, PollSession, PollState};
use crate::render::{format_completion, format_search_results, ResponseArea};
use crate::report::{error_line, info_line, OutputTarget};
use crate::session::generate_session_id;
use serde_json::Value;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Duration;

const DEFAULT_MAX_RESULTS: u32 = 10;

/// Which flow a submission takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryMode {
    /// Submit, then poll for the answer.
    Dialog,
    /// Synchronous search against `/api/{name}_search`.
    Search(String),
}

impl QueryMode {
    pub fn parse(mode: &str) -> Self {
        match mode.trim() {
            "" | "dialog" => QueryMode::Dialog,
            other => QueryMode::Search(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            QueryMode::Dialog => "dialog",
            QueryMode::Search(name) => name,
        }
    }
}

/// Current values of the input widgets.
#[derive(Debug, Clone, Default)]
pub struct QueryForm {
    pub user: String,
    pub session: String,
    pub model: String,
    pub query: String,
    pub use_rag_database: bool,
    pub mode: String,
    pub max_results: String,
    pub sources: String,
    pub link: String,
}

impl QueryForm {
    fn to_request(&self) -> QueryRequest {
        QueryRequest {
            user: self.user.clone(),
            session: self.session.clone(),
            model: self.model.clone(),
            query: self.query.clone(),
            use_rag_database: self.use_rag_database,
        }
    }

    /// Leading digits of the max-results field (`"25abc"` is 25, `"3.5"` is 3). Anything
    /// without a positive leading integer gives the default of 10.
    pub fn max_results(&self) -> u32 {
        let field = self.max_results.trim_start();
        let field = field.strip_prefix('+').unwrap_or(field);
        let digits = field
            .find(|c: char| !c.is_ascii_digit())
            .map_or(field, |end| &field[..end]);
        digits
            .parse::<u32>()
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

type Reply<T> = Receiver<Result<T, ClientError>>;

fn spawn_request<T, F>(request: F) -> Reply<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ClientError> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(request());
    });
    rx
}

/// Take a finished reply out of `slot`, if there is one.
fn take_reply<T>(slot: &mut Option<Reply<T>>) -> Option<Result<T, ClientError>> {
    let rx = slot.as_ref()?;
    match rx.try_recv() {
        Ok(result) => {
            *slot = None;
            Some(result)
        }
        Err(TryRecvError::Empty) => None,
        Err(TryRecvError::Disconnected) => {
            *slot = None;
            Some(Err(ClientError::Network("Request cancelled".to_string())))
        }
    }
}

pub struct QueryController {
    backend: Arc<dyn Backend>,
    poll_interval: Duration,

    pub form: QueryForm,

    // Outputs
    response: ResponseArea,
    text_summary: String,
    link_status: Option<String>,
    loading: bool,

    // In-flight work
    poll: Option<PollSession>,
    failed_handle: Option<String>,
    submit_reply: Option<Reply<QueryAccepted>>,
    search_reply: Option<Reply<Value>>,
    search_mode: String,
    summary_reply: Option<Reply<String>>,
    link_reply: Option<Reply<()>>,
}

impl QueryController {
    /// Create a controller with a freshly generated session identifier.
    pub fn new(backend: Arc<dyn Backend>, poll_interval: Duration, form: QueryForm) -> Self {
        let mut controller = Self {
            backend,
            poll_interval,
            form,
            response: ResponseArea::new(),
            text_summary: String::new(),
            link_status: None,
            loading: false,
            poll: None,
            failed_handle: None,
            submit_reply: None,
            search_reply: None,
            search_mode: String::new(),
            summary_reply: None,
            link_reply: None,
        };
        controller.reset_session();
        controller
    }

    pub fn reset_session(&mut self) {
        self.form.session = generate_session_id();
        tracing::info!(session = %self.form.session, "New session");
    }

    /// Submit the current form according to its mode.
    pub fn send_query(&mut self) {
        match QueryMode::parse(&self.form.mode) {
            QueryMode::Dialog => self.send_dialog(),
            QueryMode::Search(mode) => self.send_search(mode),
        }
    }

    fn send_dialog(&mut self) {
        self.cancel_poll();
        self.failed_handle = None;
        self.loading = true;

        let request = self.form.to_request();
        tracing::info!(
            user = %request.user,
            session = %request.session,
            model = %request.model,
            rag = request.use_rag_database,
            "Submitting dialog query"
        );
        let backend = Arc::clone(&self.backend);
        // Replacing the slot drops any earlier submission's reply.
        self.submit_reply = Some(spawn_request(move || backend.submit_query(&request)));
    }

    fn send_search(&mut self, mode: String) {
        let request = SearchRequest {
            query: self.form.query.clone(),
            max_results: self.form.max_results(),
        };
        tracing::info!(mode = %mode, max_results = request.max_results, "Submitting search");
        let backend = Arc::clone(&self.backend);
        self.search_mode = mode.clone();
        self.search_reply = Some(spawn_request(move || backend.search(&mode, &request)));
    }

    pub fn summarize_sources(&mut self) {
        let sources = self.form.sources.clone();
        tracing::info!(sources = %sources, "Requesting metadata summary");
        let backend = Arc::clone(&self.backend);
        self.summary_reply = Some(spawn_request(move || backend.metadata_summary(&sources)));
    }

    pub fn submit_link(&mut self) {
        let link = self.form.link.clone();
        tracing::info!(link = %link, "Submitting link");
        self.link_status = None;
        let backend = Arc::clone(&self.backend);
        self.link_reply = Some(spawn_request(move || backend.submit_link(&link)));
    }

    pub fn clear_response(&mut self) {
        self.response.clear();
    }

    /// Start a new polling loop for the handle whose last loop failed.
    pub fn retry_poll(&mut self) -> bool {
        let Some(query_id) = self.failed_handle.take() else {
            return false;
        };
        tracing::info!(query_id = %query_id, "Retrying poll");
        self.start_poll(query_id);
        true
    }

    pub fn can_retry(&self) -> bool {
        self.failed_handle.is_some()
    }

    fn start_poll(&mut self, query_id: String) {
        self.cancel_poll();
        self.loading = true;
        self.poll = Some(PollSession::start(
            Arc::clone(&self.backend),
            query_id,
            self.poll_interval,
        ));
    }

    fn cancel_poll(&mut self) {
        if let Some(mut session) = self.poll.take() {
            session.cancel();
        }
    }

    /// Apply every finished request and poll outcome. Call once per frame.
    pub fn pump(&mut self) {
        if let Some(result) = take_reply(&mut self.submit_reply) {
            match result {
                Ok(accepted) => {
                    tracing::info!(
                        query_id = %accepted.query_id,
                        status = ?accepted.status,
                        "Query accepted"
                    );
                    self.start_poll(accepted.query_id);
                }
                Err(e) => self.report_error(OutputTarget::Response, "Error sending query", e),
            }
        }

        match self.poll.as_mut().and_then(|session| session.try_next()) {
            Some(PollEvent::Completed(payload)) => {
                self.response.prepend(&format_completion(payload.as_ref()));
                self.loading = false;
            }
            Some(PollEvent::Failed(e)) => {
                // A query the backend itself marked as failed will not recover on retry.
                if !matches!(e, ClientError::Backend(_)) {
                    self.failed_handle = self.active_query_id().map(str::to_string);
                }
                self.report_error(OutputTarget::Response, "Error fetching query status", e);
            }
            None => {}
        }

        if let Some(result) = take_reply(&mut self.search_reply) {
            let mode = std::mem::take(&mut self.search_mode);
            match result.and_then(|data| format_search_results(&mode, data)) {
                Ok(text) => self.response.prepend(&text),
                Err(e) => self.report_error(OutputTarget::Response, "Error sending query", e),
            }
        }

        if let Some(result) = take_reply(&mut self.summary_reply) {
            match result {
                Ok(summary) => self.text_summary = summary,
                Err(e) => self.report_error(OutputTarget::Summary, "Error summarizing sources", e),
            }
        }

        if let Some(result) = take_reply(&mut self.link_reply) {
            match result {
                Ok(()) => {
                    self.link_status = Some(info_line("Link submission", "Link submitted successfully!"))
                }
                Err(e) => self.report_error(OutputTarget::LinkStatus, "Error submitting link", e),
            }
        }
    }

    /// The single error path: log, write `Error: ...` to `target`, hide the loading
    /// indicator.
    fn report_error(&mut self, target: OutputTarget, context: &str, err: ClientError) {
        let line = error_line(context, &err);
        match target {
            OutputTarget::Response => self.response.prepend(&line),
            OutputTarget::Summary => self.text_summary = line,
            OutputTarget::LinkStatus => self.link_status = Some(line),
        }
        self.loading = false;
    }

    /// Whether any request or poll loop is still outstanding.
    pub fn is_busy(&self) -> bool {
        self.submit_reply.is_some()
            || self.search_reply.is_some()
            || self.summary_reply.is_some()
            || self.link_reply.is_some()
            || self.poll.as_ref().is_some_and(|p| !p.state().is_terminal())
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn poll_state(&self) -> PollState {
        self.poll.as_ref().map_or(PollState::Idle, |p| p.state())
    }

    pub fn active_query_id(&self) -> Option<&str> {
        self.poll.as_ref().map(|p| p.query_id())
    }

    pub fn response(&self) -> &ResponseArea {
        &self.response
    }

    pub fn text_summary(&self) -> &str {
        &self.text_summary
    }

    pub fn text_summary_mut(&mut self) -> &mut String {
        &mut self.text_summary
    }

    pub fn link_status(&self) -> Option<&str> {
        self.link_status.as_deref()
    }
}
