mod client;
mod config;
mod model;

pub use client::{ApiError, PaymentClient, PaymentMethodSource};
pub use config::CardapioConfig;
pub use model::{
    API_KEY_HEADER, Credentials, PARTNER_KEY_HEADER, PaymentKind, PaymentMethod, RequestTrace,
};
