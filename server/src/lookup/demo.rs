use serde_json::{Value, json};

use crate::cardapio::{Credentials, PaymentKind, PaymentMethod};

pub const DEMO_API_KEY: &str = "7nSyGq49NVXuyZfgEQNPg3TdUqLNXTMNMNJwckvE";
pub const DEMO_PARTNER_KEY: &str = "DEMO_PARTNER_KEY";

pub const DEMO_NOTE: &str = "Nota: Exibindo dados de demonstração (Erro de conexão real/CORS).";

/// Why the demo catalog replaced the upstream answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DemoCause {
    EmptyUpstream,
    UpstreamFailed,
}

pub fn demo_credentials(api_key: &str) -> Credentials {
    Credentials::new(api_key, DEMO_PARTNER_KEY)
}

pub fn demo_catalog() -> Vec<PaymentMethod> {
    [
        (101, "Dinheiro (Demo)", PaymentKind::Money),
        (102, "Cartão de Crédito Visa", PaymentKind::CreditCard),
        (103, "PIX Online", PaymentKind::Online),
        (104, "Mastercard", PaymentKind::CreditCard),
        (105, "Elo", PaymentKind::CreditCard),
        (106, "Amex", PaymentKind::CreditCard),
        (107, "Alelo", PaymentKind::Voucher),
        (108, "Sodexo", PaymentKind::Voucher),
        (109, "Ticket Restaurante", PaymentKind::Voucher),
        (110, "VR Refeição", PaymentKind::Voucher),
        (111, "Dinheiro (Extra)", PaymentKind::Money),
        (112, "PIX (Extra)", PaymentKind::Online),
    ]
    .into_iter()
    .map(|(id, name, kind)| PaymentMethod {
        active: Some(true),
        ..PaymentMethod::new(id, name, kind)
    })
    .collect()
}

pub(crate) fn demo_raw(methods: &[PaymentMethod], cause: DemoCause) -> Value {
    match cause {
        DemoCause::EmptyUpstream => json!({
            "success": true,
            "data": methods,
            "message": "Demo Data Loaded",
        }),
        DemoCause::UpstreamFailed => json!({
            "success": true,
            "data": methods,
            "error_simulated": true,
        }),
    }
}
