use async_trait::async_trait;
use http::StatusCode;
use log::{debug, info, warn};
use reqwest::Client;
use url::Url;

use crate::cardapio::model::{Credentials, PaymentMethod, RequestTrace, extract_methods};

const CONTEXT: &str = "GET /merchant/payment_methods";

/// Failures surfaced by the partner API client. The `Display` text is the
/// message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Requisição inválida (400). Verifique se os dados estão corretos.")]
    InvalidRequest,

    #[error("Credenciais inválidas (401). Verifique seu X-API-KEY e X-PARTNER-KEY.")]
    InvalidCredentials,

    #[error("Acesso negado (403). Verifique as permissões do seu token.")]
    Forbidden,

    #[error("Recurso não encontrado (404). Verifique se a URL da API mudou.")]
    NotFound,

    #[error("Limite de requisições excedido (429). Aguarde um momento.")]
    RateLimited,

    #[error("Erro interno no servidor da Cardápio Web (500). Tente novamente mais tarde.")]
    ServerError,

    #[error(
        "Serviço indisponível temporariamente ({}). O servidor pode estar em manutenção.",
        .0.as_u16()
    )]
    ServiceUnavailable(StatusCode),

    #[error("Erro na API ({}): {status_text}", .status.as_u16())]
    UnknownHttp {
        status: StatusCode,
        status_text: String,
    },

    #[error("{0}")]
    Transport(String),
}

impl ApiError {
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => ApiError::InvalidRequest,
            401 => ApiError::InvalidCredentials,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            500 => ApiError::ServerError,
            502..=504 => ApiError::ServiceUnavailable(status),
            _ => ApiError::UnknownHttp {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
            },
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            ApiError::Transport(
                "Falha ao conectar com o serviço. Verifique sua conexão.".to_string(),
            )
        } else {
            ApiError::Transport(message)
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::InvalidRequest => Some(StatusCode::BAD_REQUEST),
            ApiError::InvalidCredentials => Some(StatusCode::UNAUTHORIZED),
            ApiError::Forbidden => Some(StatusCode::FORBIDDEN),
            ApiError::NotFound => Some(StatusCode::NOT_FOUND),
            ApiError::RateLimited => Some(StatusCode::TOO_MANY_REQUESTS),
            ApiError::ServerError => Some(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::ServiceUnavailable(status) => Some(*status),
            ApiError::UnknownHttp { status, .. } => Some(*status),
            ApiError::Transport(_) => None,
        }
    }
}

/// Anything able to list a merchant's payment methods.
#[async_trait]
pub trait PaymentMethodSource: Send + Sync {
    async fn fetch_methods(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<PaymentMethod>, ApiError>;
}

/// reqwest-backed client for the partner payment methods endpoint.
///
/// Issues a single GET per call. No retries and no timeout beyond the
/// transport default.
#[derive(Clone, Debug)]
pub struct PaymentClient {
    endpoint: Url,
    client: Client,
}

impl PaymentClient {
    pub fn new(endpoint: Url) -> Self {
        Self {
            endpoint,
            client: Client::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn get_methods(&self, trace: &RequestTrace) -> Result<Vec<PaymentMethod>, ApiError> {
        let headers = trace.header_map()?;
        let http_response = self
            .client
            .get(self.endpoint.clone())
            .headers(headers)
            .send()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;

        let status = http_response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status));
        }

        let body = http_response
            .bytes()
            .await
            .map_err(|e| ApiError::transport(e.to_string()))?;
        let body: serde_json::Value =
            serde_json::from_slice(&body).map_err(|e| ApiError::transport(e.to_string()))?;

        extract_methods(body).map_err(|e| ApiError::transport(e.to_string()))
    }
}

#[async_trait]
impl PaymentMethodSource for PaymentClient {
    async fn fetch_methods(
        &self,
        credentials: &Credentials,
    ) -> Result<Vec<PaymentMethod>, ApiError> {
        debug!("{} -> {}", CONTEXT, self.endpoint);
        let result = self.get_methods(&RequestTrace::from(credentials)).await;
        match &result {
            Ok(methods) => info!("{} returned {} payment methods", CONTEXT, methods.len()),
            Err(e) => warn!("{} failed: {}", CONTEXT, e),
        }
        result
    }
}
