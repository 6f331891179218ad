use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("Por favor, preencha ambas as chaves para continuar.")]
    MissingCredentials,
}

#[derive(Error, Debug)]
pub enum ClipboardError {
    #[error("No clipboard tool available on this platform")]
    Unavailable,

    #[error("Clipboard command `{command}` exited with {status}")]
    CommandFailed {
        command: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("Failed to write to clipboard: {0}")]
    IoError(#[from] std::io::Error),
}
