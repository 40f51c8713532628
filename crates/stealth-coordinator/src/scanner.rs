//! The scanner loop (§4.G): poll `scanned = 0` events, derive a tag per
//! event via the threshold engine, match against the event's tag, and
//! promote matches into the inbox.

use std::time::Duration;

use stealth_core::{validate_r_shape, AnnouncementEvent};
use stealth_crypto::{Point, Tag};
use stealth_store::EventStore;

use crate::engine::ThresholdEngine;
use crate::error::CoordinatorError;

pub struct Scanner {
    pub store: EventStore,
    pub engine: ThresholdEngine,
    pub user_id: String,
    pub loop_interval: Duration,
    pub batch_size: usize,
}

/// Outcome of processing a single event, for logging and tests.
#[derive(Debug, PartialEq, Eq)]
pub enum ScanOutcome {
    Matched,
    NoMatch,
    Malformed,
    Error,
}

impl Scanner {
    /// Run forever, sleeping `loop_interval` between iterations. Exits
    /// only on an unrecoverable store error; per-event failures never
    /// escape (§4.G step 5, §7 propagation policy).
    pub async fn run_forever(&self) -> Result<(), CoordinatorError> {
        loop {
            match self.run_once().await {
                Ok(processed) => {
                    if processed > 0 {
                        log::info!("scanner: processed {processed} event(s)");
                    }
                }
                Err(e) => {
                    log::error!("scanner: loop iteration failed: {e}");
                }
            }
            tokio::time::sleep(self.loop_interval).await;
        }
    }

    /// One iteration: fetch unscanned events and process each. Returns the
    /// number of events processed.
    pub async fn run_once(&self) -> Result<usize, CoordinatorError> {
        let events = self.store.fetch_unscanned(self.batch_size)?;
        for event in &events {
            self.process_event(event).await?;
        }
        Ok(events.len())
    }

    async fn process_event(&self, event: &AnnouncementEvent) -> Result<ScanOutcome, CoordinatorError> {
        if !validate_r_shape(&event.r) {
            log::warn!("scanner: event {} has a malformed R, skipping", event.id);
            self.store.mark_scanned(event.id, false)?;
            return Ok(ScanOutcome::Malformed);
        }

        let r_point = match Point::decode_compressed(&event.r) {
            Ok(p) => p,
            Err(e) => {
                log::warn!("scanner: event {} R failed to decode: {e}", event.id);
                self.store.mark_scanned(event.id, false)?;
                return Ok(ScanOutcome::Malformed);
            }
        };

        let derived = match self.engine.derive_tag(&r_point).await {
            Ok(tag) => tag,
            Err(CoordinatorError::ThresholdUnavailable)
            | Err(CoordinatorError::InsufficientShares { .. }) => {
                log::warn!("scanner: event {} could not be scanned (insufficient shares)", event.id);
                self.store.mark_scanned(event.id, false)?;
                return Ok(ScanOutcome::Error);
            }
            Err(e) => {
                log::error!("scanner: event {} scan failed: {e}", event.id);
                self.store.mark_scanned(event.id, false)?;
                return Ok(ScanOutcome::Error);
            }
        };

        let event_tag = Tag(event.tag);
        if derived.matches(&event_tag) {
            self.store.insert_inbox(
                &self.user_id,
                event.id,
                &event.tag,
                &event.r,
                &event.memo,
                &event.commitment,
            )?;
            self.store.mark_scanned(event.id, true)?;
            Ok(ScanOutcome::Matched)
        } else {
            self.store.mark_scanned(event.id, false)?;
            Ok(ScanOutcome::NoMatch)
        }
    }
}
