pub mod cardapio;
pub mod clipboard;
pub mod error;
pub mod lookup;

pub use cardapio::{ApiError, Credentials, PaymentClient, PaymentMethod, PaymentMethodSource};
pub use clipboard::{Clipboard, ClipboardRelay, MemoryClipboard, SystemClipboard};
pub use error::{ClipboardError, LookupError};
pub use lookup::{LookupController, LookupResult, LookupState};
