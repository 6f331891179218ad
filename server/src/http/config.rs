use envconfig::Envconfig;
use payment_lookup::cardapio::CardapioConfig;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardBackend {
    System,
    Memory,
}

impl FromStr for ClipboardBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(ClipboardBackend::System),
            "memory" => Ok(ClipboardBackend::Memory),
            other => Err(format!("unknown clipboard backend: {other}")),
        }
    }
}

#[derive(Envconfig, Clone)]
pub struct Config {
    #[envconfig(from = "LOG_LEVEL", default = "info")]
    pub log_level: log::Level,

    #[envconfig(from = "SERVER_PORT", default = "3000")]
    pub server_port: u16,

    #[envconfig(from = "SERVER_HOST", default = "127.0.0.1")]
    pub server_host: String,

    #[envconfig(from = "CLIPBOARD_BACKEND", default = "system")]
    pub clipboard_backend: ClipboardBackend,

    #[envconfig(nested)]
    pub cardapio: CardapioConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, envconfig::Error> {
        Config::init_from_env()
    }
}
