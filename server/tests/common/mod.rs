#![allow(dead_code)]

use async_trait::async_trait;
use axum::{Router, http::HeaderMap, http::StatusCode, routing::get};
use parking_lot::Mutex;
use payment_lookup::{
    ApiError, Credentials, PaymentMethod, PaymentMethodSource, cardapio::PaymentKind,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{net::TcpListener, sync::oneshot};
use url::Url;

/// Local stand-in for the partner API.
pub struct MockUpstream {
    pub url: Url,
    requests: Arc<Mutex<Vec<HeaderMap>>>,
}

impl MockUpstream {
    pub async fn spawn(status: StatusCode, body: &'static str) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();
        let router = Router::new().route(
            "/api/partner/v1/merchant/payment_methods",
            get(move |headers: HeaderMap| {
                let seen = seen.clone();
                async move {
                    seen.lock().push(headers);
                    (status, body)
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        let url = Url::parse(&format!(
            "http://{}/api/partner/v1/merchant/payment_methods",
            addr
        ))
        .unwrap();
        Self { url, requests }
    }

    pub fn requests(&self) -> Vec<HeaderMap> {
        self.requests.lock().clone()
    }
}

/// An address nothing listens on.
pub async fn unreachable_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}/payment_methods", addr)).unwrap()
}

/// Replays canned outcomes in order and counts calls.
#[derive(Default)]
pub struct ScriptedSource {
    outcomes: Mutex<VecDeque<Result<Vec<PaymentMethod>, ApiError>>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(outcomes: Vec<Result<Vec<PaymentMethod>, ApiError>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentMethodSource for ScriptedSource {
    async fn fetch_methods(
        &self,
        _credentials: &Credentials,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Holds each call open until the test releases the gate for that API key.
#[derive(Default)]
pub struct GatedSource {
    gates: Mutex<HashMap<String, oneshot::Receiver<Result<Vec<PaymentMethod>, ApiError>>>>,
}

impl GatedSource {
    pub fn gate(&self, api_key: &str) -> oneshot::Sender<Result<Vec<PaymentMethod>, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(api_key.to_string(), rx);
        tx
    }
}

#[async_trait]
impl PaymentMethodSource for GatedSource {
    async fn fetch_methods(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        let gate = self.gates.lock().remove(&credentials.api_key);
        match gate {
            Some(gate) => gate
                .await
                .unwrap_or_else(|_| Err(ApiError::transport("gate dropped"))),
            None => Err(ApiError::transport("no gate for key")),
        }
    }
}

pub fn methods(count: i64) -> Vec<PaymentMethod> {
    (1..=count)
        .map(|id| PaymentMethod::new(id, format!("Method {id}"), PaymentKind::Money))
        .collect()
}
