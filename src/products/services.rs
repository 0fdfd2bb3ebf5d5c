use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use tracing::{debug, info, instrument};

use super::client::ProductLookup;
use super::dto::ResolvedProduct;
use crate::barcode::Barcode;
use crate::error::AppResult;

/// Result of one lookup attempt, judged against every attempt issued after it.
#[derive(Debug)]
pub enum LookupOutcome {
    /// Latest attempt; its result should replace whatever is displayed.
    Current(AppResult<ResolvedProduct>),
    /// A newer attempt was issued while this one was in flight.
    Stale { request_id: u64, latest: u64 },
}

impl LookupOutcome {
    pub fn is_stale(&self) -> bool {
        matches!(self, LookupOutcome::Stale { .. })
    }
}

/// Tags every lookup with a monotonic id and drops replies that are not from the newest one.
pub struct LookupCoordinator {
    lookup: Arc<dyn ProductLookup>,
    latest: AtomicU64,
}

impl LookupCoordinator {
    pub fn new(lookup: Arc<dyn ProductLookup>) -> Self {
        Self {
            lookup,
            latest: AtomicU64::new(0),
        }
    }

    pub fn latest_request(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Invalid input still counts as the newest attempt, but never reaches the network.
    #[instrument(skip(self))]
    pub async fn lookup(&self, raw: &str) -> LookupOutcome {
        let request_id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;

        let barcode = match Barcode::parse(raw) {
            Ok(b) => b,
            Err(e) => return LookupOutcome::Current(Err(e)),
        };

        let result = self.lookup.fetch(&barcode).await;

        let latest = self.latest_request();
        if latest != request_id {
            debug!(request_id, latest, %barcode, "discarding stale lookup reply");
            return LookupOutcome::Stale { request_id, latest };
        }

        if let Ok(record) = &result {
            info!(%barcode, product = record.display_name(), "product resolved");
        }
        LookupOutcome::Current(result.map(|record| ResolvedProduct { barcode, record }))
    }
}
