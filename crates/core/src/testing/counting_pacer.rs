//! Pacer that counts pauses instead of sleeping.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::orchestrator::Pacer;

#[derive(Debug, Default)]
pub struct CountingPacer {
    pauses: AtomicUsize,
}

impl CountingPacer {
    pub fn count(&self) -> usize {
        self.pauses.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Pacer for CountingPacer {
    async fn pause(&self) {
        self.pauses.fetch_add(1, Ordering::SeqCst);
    }
}
