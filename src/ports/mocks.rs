//! Recording test doubles for the ports.
//!
//! Used by the unit tests and the `tests/` integration suite; no network.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use async_trait::async_trait;

use crate::domain::TokenRecord;
use super::lookup::{AddressLookup, LookupError, PoolLookup};
use super::sink::{RecordSink, SinkError};
use super::source::{PageSource, ScrapeError};

/// Lookup stub with canned answers that records every call and tracks
/// how many calls were in flight at once
#[derive(Debug, Default)]
pub struct StubLookup {
    calls: Arc<Mutex<Vec<String>>>,
    responses: Arc<Mutex<HashMap<String, String>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Duration,
}

impl StubLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to answer `key` with `value`; unknown keys fail with `NoResults`
    pub fn with_response(self, key: &str, value: &str) -> Self {
        self.responses.lock().unwrap().insert(key.to_string(), value.to_string());
        self
    }

    /// Builder method to hold every call for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Get all recorded calls
    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of simultaneous calls observed
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn answer(&self, key: &str) -> Result<String, LookupError> {
        self.calls.lock().unwrap().push(key.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        let result = self
            .responses
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| LookupError::NoResults(key.to_string()));

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl AddressLookup for StubLookup {
    async fn lookup_address(&self, pair_id: &str) -> Result<String, LookupError> {
        self.answer(pair_id).await
    }
}

#[async_trait]
impl PoolLookup for StubLookup {
    async fn lookup_pool(&self, mint: &str) -> Result<String, LookupError> {
        self.answer(mint).await
    }
}

/// Page source serving scripted pages; pages past the script are empty
#[derive(Debug, Default)]
pub struct StubPageSource {
    pages: Mutex<HashMap<u32, Result<Vec<TokenRecord>, String>>>,
    calls: Mutex<Vec<u32>>,
}

impl StubPageSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(self, page: u32, records: Vec<TokenRecord>) -> Self {
        self.pages.lock().unwrap().insert(page, Ok(records));
        self
    }

    pub fn with_failure(self, page: u32, reason: &str) -> Self {
        self.pages.lock().unwrap().insert(page, Err(reason.to_string()));
        self
    }

    /// Pages requested so far, in order
    pub fn get_calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl PageSource for StubPageSource {
    async fn scrape_page(&self, page: u32) -> Result<Vec<TokenRecord>, ScrapeError> {
        self.calls.lock().unwrap().push(page);
        match self.pages.lock().unwrap().get(&page) {
            Some(Ok(records)) => Ok(records.clone()),
            Some(Err(reason)) => Err(ScrapeError::ParseError(reason.clone())),
            None => Ok(Vec::new()),
        }
    }
}

/// Sink that keeps a copy of every batch it receives, or fails on demand
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    name: String,
    batches: Arc<Mutex<Vec<Vec<TokenRecord>>>>,
    fail: bool,
}

impl RecordingSink {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// A sink whose every `accept` fails
    pub fn failing(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail: true,
            ..Default::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<TokenRecord>> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RecordSink for RecordingSink {
    fn name(&self) -> &str {
        &self.name
    }

    async fn accept(&self, records: &[TokenRecord]) -> Result<usize, SinkError> {
        if self.fail {
            return Err(SinkError::WriteError {
                path: self.name.clone(),
                reason: "configured to fail".to_string(),
            });
        }
        self.batches.lock().unwrap().push(records.to_vec());
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stub_lookup() {
        let stub = StubLookup::new().with_response("p1", "ADDR1");

        assert_eq!(stub.lookup_address("p1").await, Ok("ADDR1".to_string()));
        assert!(matches!(
            stub.lookup_pool("missing").await,
            Err(LookupError::NoResults(_))
        ));
        assert_eq!(stub.get_calls(), vec!["p1".to_string(), "missing".to_string()]);
        assert_eq!(stub.max_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_stub_page_source() {
        let source = StubPageSource::new()
            .with_page(1, vec![TokenRecord::new("A", "Alpha")])
            .with_failure(2, "blocked");

        assert_eq!(source.scrape_page(1).await.unwrap().len(), 1);
        assert!(source.scrape_page(2).await.is_err());
        assert!(source.scrape_page(3).await.unwrap().is_empty());
        assert_eq!(source.get_calls(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_recording_sink() {
        let sink = RecordingSink::new("memory");
        let written = sink.accept(&[TokenRecord::new("A", "Alpha")]).await.unwrap();
        assert_eq!(written, 1);
        assert_eq!(sink.batches().len(), 1);

        let failing = RecordingSink::failing("broken");
        assert!(failing.accept(&[]).await.is_err());
    }
}
