//! Poll-cycle cancellation.
//!
//! Each refresh takes a [`CycleToken`]. Starting a newer cycle, or calling
//! [`PollCycles::invalidate`], cancels every older token; results produced
//! under a cancelled token are dropped.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;

/// Source of poll-cycle tokens.
#[derive(Debug, Clone)]
pub struct PollCycles {
    generation: Arc<watch::Sender<u64>>,
}

impl Default for PollCycles {
    fn default() -> Self {
        Self::new()
    }
}

impl PollCycles {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            generation: Arc::new(tx),
        }
    }

    /// Start a new cycle, cancelling all older ones.
    pub fn begin(&self) -> CycleToken {
        let generation = self.advance();
        CycleToken {
            generation,
            rx: self.generation.subscribe(),
        }
    }

    /// Cancel every outstanding cycle without starting one.
    pub fn invalidate(&self) {
        self.advance();
    }

    pub fn current(&self) -> u64 {
        *self.generation.borrow()
    }

    fn advance(&self) -> u64 {
        let mut next = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            next = *g;
        });
        next
    }
}

/// Handle to one poll cycle.
#[derive(Debug)]
pub struct CycleToken {
    generation: u64,
    rx: watch::Receiver<u64>,
}

impl CycleToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True until a newer cycle starts.
    pub fn is_current(&self) -> bool {
        *self.rx.borrow() == self.generation
    }

    /// Resolves once this cycle has been superseded.
    pub async fn cancelled(&mut self) {
        while self.is_current() {
            if self.rx.changed().await.is_err() {
                // Source dropped: nothing can supersede us any more.
                std::future::pending::<()>().await;
            }
        }
    }

    /// Run `fut` under this cycle. `None` if the cycle was cancelled before
    /// or while it ran.
    pub async fn run<F: Future>(&mut self, fut: F) -> Option<F::Output> {
        let outcome = tokio::select! {
            out = fut => Some(out),
            _ = self.cancelled() => None,
        };
        outcome.filter(|_| self.is_current())
    }
}
