#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fakeflow::{Error, Fakeable, Result};
use serde_json::{Value, json};

/// Entity that records the options of every faked item and echoes them back.
pub struct Recorder {
    name: &'static str,
    all: Mutex<Vec<Value>>,
}

impl Recorder {
    pub fn new(name: &'static str) -> Arc<Self> {
        Arc::new(Self {
            name,
            all: Mutex::new(Vec::new()),
        })
    }

    pub fn all(&self) -> Vec<Value> {
        self.all.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.all.lock().unwrap().len()
    }
}

#[async_trait]
impl Fakeable for Recorder {
    type Options = Value;
    type Output = Value;

    fn name(&self) -> &str {
        self.name
    }

    async fn fake(&self, options: Value) -> Result<Value> {
        let options = if options.is_null() { json!({}) } else { options };
        self.all.lock().unwrap().push(options.clone());
        Ok(options)
    }
}

/// Entity that sleeps per item and tracks how many calls overlap.
#[derive(Default)]
pub struct Slow {
    active: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl Slow {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fakeable for Slow {
    type Options = u64;
    type Output = u64;

    async fn fake(&self, delay_ms: u64) -> Result<u64> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        self.active.fetch_sub(1, Ordering::SeqCst);
        Ok(delay_ms)
    }
}

#[derive(Debug)]
pub struct Rejected(pub usize);

impl std::fmt::Display for Rejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "item {} rejected", self.0)
    }
}

impl std::error::Error for Rejected {}

/// Entity failing for one index, succeeding for the others.
pub struct FailsAt {
    pub index: usize,
    pub calls: AtomicUsize,
}

impl FailsAt {
    pub fn new(index: usize) -> Arc<Self> {
        Arc::new(Self {
            index,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl Fakeable for FailsAt {
    type Options = usize;
    type Output = usize;

    async fn fake(&self, index: usize) -> Result<usize> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if index == self.index {
            return Err(Error::factory(Rejected(index)));
        }
        Ok(index)
    }
}
