use log::{debug, info, warn};
use serde::Serialize;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::{
    cardapio::{ApiError, Credentials, PaymentMethod, PaymentMethodSource, RequestTrace},
    error::LookupError,
};

mod demo;
mod pagination;

pub use demo::{
    DEMO_API_KEY, DEMO_NOTE, DEMO_PARTNER_KEY, DemoCause, demo_catalog, demo_credentials,
};
pub use pagination::{PAGE_SIZE, Pagination};

/// Outcome of the latest submission. Replaced wholesale, never merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LookupResult {
    #[default]
    Idle,
    Loading,
    Success {
        methods: Vec<PaymentMethod>,
        raw: Value,
        demo: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        note: Option<String>,
    },
    Empty {
        raw: Value,
    },
    Failure {
        message: String,
    },
}

impl LookupResult {
    pub fn methods(&self) -> &[PaymentMethod] {
        match self {
            LookupResult::Success { methods, .. } => methods,
            _ => &[],
        }
    }

    pub fn raw(&self) -> Option<&Value> {
        match self {
            LookupResult::Success { raw, .. } | LookupResult::Empty { raw } => Some(raw),
            _ => None,
        }
    }

    pub fn is_demo(&self) -> bool {
        matches!(self, LookupResult::Success { demo: true, .. })
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LookupResult::Loading)
    }

    fn from_methods(methods: Vec<PaymentMethod>) -> Self {
        let raw = json!({ "data": &methods });
        LookupResult::Success {
            methods,
            raw,
            demo: false,
            note: None,
        }
    }

    fn demo(cause: DemoCause) -> Self {
        let methods = demo_catalog();
        let raw = demo::demo_raw(&methods, cause);
        LookupResult::Success {
            methods,
            raw,
            demo: true,
            note: Some(DEMO_NOTE.to_string()),
        }
    }
}

/// Everything a view needs to render the lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupState {
    pub result: LookupResult,
    pub trace: Option<RequestTrace>,
    pub pagination: Pagination,
    submission: u64,
}

impl LookupState {
    pub fn methods(&self) -> &[PaymentMethod] {
        self.result.methods()
    }

    pub fn page_items(&self) -> &[PaymentMethod] {
        self.pagination.page(self.methods())
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.methods().len())
    }

    pub fn current_page(&self) -> usize {
        self.pagination.current_page()
    }
}

pub const LOOKUP_CANCELLED: &str = "Consulta interrompida antes da resposta. Tente novamente.";

/// An in-flight submission. If it is dropped before [`PendingLookup::finish`]
/// while still owning the latest token, `Loading` is replaced with a
/// `Failure` so the controller stays retryable.
struct PendingLookup<'a> {
    state: &'a watch::Sender<LookupState>,
    token: u64,
    settled: bool,
}

impl PendingLookup<'_> {
    /// Publishes `result` unless a newer submission has started.
    fn finish(mut self, result: LookupResult) -> bool {
        self.settled = true;
        let token = self.token;
        self.state.send_if_modified(|state| {
            if state.submission != token {
                return false;
            }
            state.result = result;
            state.pagination.reset();
            true
        })
    }
}

impl Drop for PendingLookup<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let token = self.token;
        let abandoned = self.state.send_if_modified(|state| {
            if state.submission != token || !state.result.is_loading() {
                return false;
            }
            state.result = LookupResult::Failure {
                message: LOOKUP_CANCELLED.to_string(),
            };
            true
        });
        if abandoned {
            warn!("Lookup #{} dropped before completion", token);
        }
    }
}

/// Drives one lookup at a time against a [`PaymentMethodSource`] and
/// publishes the resulting [`LookupState`].
///
/// Every submission takes a fresh token; a response that arrives after a
/// newer submission started is dropped.
pub struct LookupController<S> {
    source: S,
    demo_api_key: String,
    state: watch::Sender<LookupState>,
}

impl<S: PaymentMethodSource> LookupController<S> {
    pub fn new(source: S, demo_api_key: impl Into<String>) -> Self {
        let (state, _) = watch::channel(LookupState::default());
        Self {
            source,
            demo_api_key: demo_api_key.into(),
            state,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn demo_api_key(&self) -> &str {
        &self.demo_api_key
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupState> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> LookupState {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().result.is_loading()
    }

    /// Runs one lookup. Blank keys are rejected before any network call and
    /// leave the published state untouched.
    ///
    /// Returns the result this submission produced, which is only published
    /// if no newer submission started in the meantime.
    pub async fn submit(&self, credentials: Credentials) -> Result<LookupResult, LookupError> {
        if !credentials.is_complete() {
            warn!("Lookup rejected: missing API or partner key");
            return Err(LookupError::MissingCredentials);
        }

        let pending = self.begin(&credentials);
        let token = pending.token;
        info!("Lookup #{} started", token);

        let outcome = self.source.fetch_methods(&credentials).await;
        let result = self.resolve(&credentials, outcome);

        if pending.finish(result.clone()) {
            debug!("Lookup #{} published", token);
        } else {
            warn!("Lookup #{} superseded by a newer submission; discarding", token);
        }

        Ok(result)
    }

    pub fn next_page(&self) -> bool {
        self.state.send_if_modified(|state| {
            let len = state.methods().len();
            state.pagination.next(len)
        })
    }

    pub fn prev_page(&self) -> bool {
        self.state.send_if_modified(|state| state.pagination.prev())
    }

    fn begin(&self, credentials: &Credentials) -> PendingLookup<'_> {
        let mut token = 0;
        self.state.send_modify(|state| {
            state.submission += 1;
            token = state.submission;
            state.trace = Some(RequestTrace::from(credentials));
            state.result = LookupResult::Loading;
            state.pagination.reset();
        });
        PendingLookup {
            state: &self.state,
            token,
            settled: false,
        }
    }

    fn resolve(
        &self,
        credentials: &Credentials,
        outcome: Result<Vec<PaymentMethod>, ApiError>,
    ) -> LookupResult {
        let is_demo = credentials.api_key == self.demo_api_key;
        match outcome {
            Ok(methods) if !methods.is_empty() => LookupResult::from_methods(methods),
            Ok(_) if is_demo => {
                info!("Upstream returned no methods for the demo key; loading demo catalog");
                LookupResult::demo(DemoCause::EmptyUpstream)
            }
            Ok(_) => LookupResult::Empty {
                raw: json!({ "data": [] }),
            },
            Err(e) if is_demo => {
                warn!("Lookup failed for the demo key ({}); loading demo catalog", e);
                LookupResult::demo(DemoCause::UpstreamFailed)
            }
            Err(e) => LookupResult::Failure {
                message: e.to_string(),
            },
        }
    }
}
