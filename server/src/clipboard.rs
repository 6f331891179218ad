use async_trait::async_trait;
use log::{debug, warn};
use parking_lot::Mutex;
use std::{io::ErrorKind, process::Stdio, sync::Arc, time::Duration};
use tokio::{io::AsyncWriteExt, process::Command};
use tokio_util::sync::CancellationToken;

use crate::error::ClipboardError;

/// How long a copied id stays marked.
pub const COPY_FEEDBACK: Duration = Duration::from_millis(2000);

#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Platform clipboard, reached through the first helper binary found on `PATH`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

impl SystemClipboard {
    async fn pipe(command: &'static str, args: &[&str], text: &str) -> Result<(), ClipboardError> {
        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes()).await?;
        }

        let status = child.wait().await?;
        if !status.success() {
            return Err(ClipboardError::CommandFailed { command, status });
        }
        Ok(())
    }
}

#[async_trait]
impl Clipboard for SystemClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        for &(command, args) in CLIPBOARD_COMMANDS {
            match Self::pipe(command, args, text).await {
                Ok(()) => {
                    debug!("Copied {} bytes via {}", text.len(), command);
                    return Ok(());
                }
                Err(ClipboardError::IoError(e)) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            }
        }
        Err(ClipboardError::Unavailable)
    }
}

/// In-process clipboard; keeps every write.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    writes: Mutex<Vec<String>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<String> {
        self.writes.lock().last().cloned()
    }

    pub fn history(&self) -> Vec<String> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        self.writes.lock().push(text.to_string());
        Ok(())
    }
}

/// Returned by [`ClipboardRelay::copy`]; identifies one marking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyMark {
    pub id: i64,
    generation: u64,
}

#[derive(Debug, Default)]
struct MarkState {
    copied: Option<i64>,
    generation: u64,
    pending_clear: Option<CancellationToken>,
}

/// Copies payment method ids and remembers the last one for a short while.
///
/// Only one id is marked at a time. A new copy cancels the previous clear
/// timer before scheduling its own.
pub struct ClipboardRelay {
    clipboard: Arc<dyn Clipboard>,
    hold: Duration,
    mark: Arc<Mutex<MarkState>>,
    write_lock: tokio::sync::Mutex<()>,
}

impl ClipboardRelay {
    pub fn new(clipboard: Arc<dyn Clipboard>) -> Self {
        Self::with_hold(clipboard, COPY_FEEDBACK)
    }

    pub fn with_hold(clipboard: Arc<dyn Clipboard>, hold: Duration) -> Self {
        Self {
            clipboard,
            hold,
            mark: Arc::new(Mutex::new(MarkState::default())),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// Marks `id` straight away, then writes it to the clipboard. Writes are
    /// serialized and skipped once a newer copy has taken the mark, so the
    /// clipboard never ends up holding an older id than the one marked.
    ///
    /// Clipboard failures are logged and otherwise ignored.
    pub async fn copy(&self, id: i64) -> CopyMark {
        let cancel = CancellationToken::new();
        let generation = {
            let mut state = self.mark.lock();
            if let Some(previous) = state.pending_clear.take() {
                previous.cancel();
            }
            state.generation += 1;
            state.copied = Some(id);
            state.pending_clear = Some(cancel.clone());
            state.generation
        };

        let mark = Arc::clone(&self.mark);
        let hold = self.hold;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(hold) => {
                    let mut state = mark.lock();
                    if state.generation == generation {
                        state.copied = None;
                        state.pending_clear = None;
                    }
                }
            }
        });

        let _writing = self.write_lock.lock().await;
        let superseded = self.mark.lock().generation != generation;
        if superseded {
            debug!("Skipping clipboard write for {}: superseded", id);
        } else if let Err(e) = self.clipboard.write_text(&id.to_string()).await {
            warn!("Failed to copy payment method id {} to clipboard: {}", id, e);
        }

        CopyMark { id, generation }
    }

    pub fn copied(&self) -> Option<i64> {
        self.mark.lock().copied
    }

    pub fn is_copied(&self, id: i64) -> bool {
        self.copied() == Some(id)
    }

    /// Whether `mark` is still the active marking.
    pub fn is_current(&self, mark: &CopyMark) -> bool {
        let state = self.mark.lock();
        state.generation == mark.generation && state.copied == Some(mark.id)
    }
}

#[cfg(all(test, target_os = "linux"))]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    #[tokio::test]
    async fn abandoned_helper_process_is_killed() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let pid_file = std::env::temp_dir().join(format!("clipboard-helper-{nanos}.pid"));
        let script = format!("echo $$ > {}; exec sleep 30", pid_file.display());

        let args = ["-c", script.as_str()];
        let pending = SystemClipboard::pipe("sh", &args, "107");
        assert!(
            tokio::time::timeout(Duration::from_millis(500), pending)
                .await
                .is_err()
        );

        let pid = std::fs::read_to_string(&pid_file).unwrap();
        let _ = std::fs::remove_file(&pid_file);
        tokio::time::sleep(Duration::from_millis(200)).await;

        // Either reaped already or left as a zombie; never still sleeping.
        match std::fs::read_to_string(format!("/proc/{}/stat", pid.trim())) {
            Ok(stat) => {
                let state = stat.rsplit(')').next().unwrap().trim_start().chars().next();
                assert_eq!(state, Some('Z'), "helper still alive: {stat}");
            }
            Err(e) => assert_eq!(e.kind(), ErrorKind::NotFound),
        }
    }
}
