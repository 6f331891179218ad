use payment_lookup::{
    LookupResult, LookupState, PaymentMethod, cardapio::RequestTrace, lookup::Pagination,
};
use serde::Serialize;

/// JSON rendering of the lookup for the preview UI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub result: LookupResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<RequestTrace>,
    pub pagination: Pagination,
    pub total_pages: usize,
    pub page_items: Vec<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copied_id: Option<i64>,
}

impl StateView {
    pub fn new(state: &LookupState, copied_id: Option<i64>) -> Self {
        Self {
            result: state.result.clone(),
            trace: state.trace.clone(),
            pagination: state.pagination,
            total_pages: state.total_pages(),
            page_items: state.page_items().to_vec(),
            copied_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CopyResponse {
    pub id: i64,
    pub copied_for_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
