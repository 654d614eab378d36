//! Cooperative cancellation of an analysis run.
//!
//! Cancellation is only observed at chapter-wave boundaries: a wave that has
//! started always finishes, so no chapter is ever half committed. The
//! checkpoint names the first chapter the next run will pick up.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::models::ChapterRef;

pub trait Cancellable {
    fn is_cancelled(&self) -> bool;

    /// Request cancellation. Takes effect at the next checkpoint.
    fn cancel(&self);
}

/// Result of checking the token before a wave of chapters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    Proceed,
    /// Stop here; `resume_from` and everything after it stay pending.
    Stop {
        resume_from: ChapterRef,
        remaining: usize,
    },
}

/// Shared flag: clones handed to taggers or other threads cancel the same run.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check before starting the wave that begins `pending[0]`.
    pub fn checkpoint(&self, pending: &[ChapterRef]) -> Checkpoint {
        match pending.first() {
            Some(&resume_from) if self.is_cancelled() => {
                tracing::info!(
                    resume_from = %resume_from,
                    remaining = pending.len(),
                    "cancellation observed between waves"
                );
                Checkpoint::Stop {
                    resume_from,
                    remaining: pending.len(),
                }
            }
            _ => Checkpoint::Proceed,
        }
    }
}

impl Cancellable for CancellationToken {
    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }
}
