//! Concurrent batch downloading.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::stream::StreamExt;
use futures::{future, stream};

use crate::batch::plan::create_folder_structure;
use crate::batch::{LogHook, ProgressHook};
use crate::engine::Extractor;
use crate::error::Result;
use crate::fs::naming::sanitize_filename;
use crate::media::{MediaKind, QualitySpec};
use crate::resolve::VideoItem;

/// Default worker pool width.
pub const DEFAULT_MAX_WORKERS: usize = 3;

/// Outcome of one batch run. Snapshot, immutable once returned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub successful: u64,
    pub failed: u64,
    pub errors: Vec<String>,
}

/// Shared flag for cooperative cancellation, cloneable into signal
/// handlers and UI callbacks.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Mutable bookkeeping for one run. Counter updates and the progress
/// callback always happen together under the same lock.
#[derive(Default)]
struct RunState {
    completed: usize,
    successful: u64,
    failed: u64,
    errors: Vec<String>,
    last_logged_pct: u8,
}

/// Downloads a flat item list with bounded concurrency.
///
/// A fresh downloader per run is the intended usage; `run` resets the
/// cancellation flag and counters on entry.
pub struct BatchDownloader<'a, E: Extractor> {
    engine: &'a E,
    max_workers: usize,
    cancel: CancelHandle,
}

impl<'a, E: Extractor> BatchDownloader<'a, E> {
    pub fn new(engine: &'a E) -> Self {
        Self {
            engine,
            max_workers: DEFAULT_MAX_WORKERS,
            cancel: CancelHandle::default(),
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    /// Handle for cancelling this downloader from elsewhere (signal
    /// handler, UI button).
    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    /// Request cancellation. Already-dispatched transfers run to
    /// completion; nothing new is submitted.
    pub fn cancel(&self) {
        self.cancel.cancel();
        tracing::info!("Cancelling batch download...");
    }

    /// Download every item in `items`, `self.max_workers` at a time.
    ///
    /// Individual failures are recorded in the report, never propagated;
    /// only destination planning can fail the whole run, and it runs
    /// before any job is submitted.
    pub async fn run(
        &self,
        items: &[VideoItem],
        kind: MediaKind,
        base_path: &Path,
        quality: QualitySpec,
        on_progress: Option<&ProgressHook<'_>>,
        on_log: Option<&LogHook<'_>>,
    ) -> Result<BatchReport> {
        self.cancel.flag.store(false, Ordering::SeqCst);

        if items.is_empty() {
            emit(on_log, "No videos to download");
            return Ok(BatchReport::default());
        }

        let total = items.len();
        emit(
            on_log,
            &format!("Starting batch download of {} items as {}", total, kind),
        );

        let organized = create_folder_structure(items, base_path, kind)?;
        let state = Mutex::new(RunState::default());

        let mut completions = stream::iter(items.iter())
            .take_while(|_| future::ready(!self.cancel.is_cancelled()))
            .map(|item| {
                let dest = organized
                    .get(&item.folder)
                    .cloned()
                    .unwrap_or_else(|| base_path.to_path_buf());
                async move {
                    let outcome = self.download_one(item, kind, &dest, quality).await;
                    (item, outcome)
                }
            })
            .buffer_unordered(self.max_workers);

        // Completions are processed as they arrive so slow items never
        // block progress for fast ones.
        while let Some((item, outcome)) = completions.next().await {
            if self.cancel.is_cancelled() {
                // Drain without processing: in-flight jobs still finish,
                // but cancelled runs stop counting and reporting.
                continue;
            }

            let mut st = state.lock().unwrap();
            st.completed += 1;
            match outcome {
                Ok(()) => st.successful += 1,
                Err(message) => {
                    st.failed += 1;
                    st.errors.push(format!("{}: {}", item.title, message));
                    emit(on_log, &format!("Failed: {} - {}", item.title, message));
                }
            }

            let pct = (st.completed * 100 / total) as u8;
            if let Some(on_progress) = on_progress {
                on_progress(pct);
            }

            if pct > st.last_logged_pct && (pct % 5 == 0 || pct == 100) {
                st.last_logged_pct = pct;
                emit(
                    on_log,
                    &format!(
                        "Download progress: {} {}% ({}/{} items)",
                        render_bar(st.completed, total),
                        pct,
                        st.completed,
                        total
                    ),
                );
            }
        }

        let st = state.into_inner().unwrap();
        if self.cancel.is_cancelled() {
            emit(on_log, "Batch download cancelled");
        } else {
            emit(
                on_log,
                &format!(
                    "Batch download completed: {} successful, {} failed",
                    st.successful, st.failed
                ),
            );
        }

        Ok(BatchReport {
            successful: st.successful,
            failed: st.failed,
            errors: st.errors,
        })
    }

    /// One job. Every failure is converted into a message; a single item
    /// must never abort the batch.
    async fn download_one(
        &self,
        item: &VideoItem,
        kind: MediaKind,
        dest: &Path,
        quality: QualitySpec,
    ) -> std::result::Result<(), String> {
        let filename = sanitize_filename(&item.title);
        let filename = (!filename.is_empty()).then_some(filename.as_str());

        self.engine
            .fetch_and_store(&item.url, dest, kind, quality, filename, None)
            .await
            .map_err(|e| e.to_string())
    }
}

fn emit(on_log: Option<&LogHook<'_>>, message: &str) {
    tracing::debug!("{}", message);
    if let Some(on_log) = on_log {
        on_log(message);
    }
}

/// 20-slot ASCII progress bar for log output.
fn render_bar(completed: usize, total: usize) -> String {
    const BAR_LENGTH: usize = 20;
    let filled = BAR_LENGTH * completed / total;
    let arrow = if filled < BAR_LENGTH { ">" } else { "" };
    format!(
        "[{}{}{}]",
        "=".repeat(filled),
        arrow,
        " ".repeat(BAR_LENGTH.saturating_sub(filled + 1))
    )
}
