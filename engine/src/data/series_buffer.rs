// Ordered candle history owned by the engine.
use serde::Deserialize;
use shared::models::Candle;
use std::collections::VecDeque;

use crate::error::{EngineError, Result};

/// What to do when upstream resends a candle with the last stored timestamp
/// (typically the still-open current interval).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Overwrite,
    Reject,
}

#[derive(Debug, Clone)]
pub struct SeriesBuffer {
    candles: VecDeque<Candle>,
    policy: DuplicatePolicy,
    capacity: Option<usize>,
}

impl SeriesBuffer {
    pub fn new(policy: DuplicatePolicy) -> Self {
        Self {
            candles: VecDeque::new(),
            policy,
            capacity: None,
        }
    }

    /// Keeps at most `capacity` candles, evicting the oldest on append.
    pub fn with_capacity(policy: DuplicatePolicy, capacity: usize) -> Self {
        Self {
            candles: VecDeque::with_capacity(capacity),
            policy,
            capacity: Some(capacity),
        }
    }

    pub fn append(&mut self, candle: Candle) -> Result<()> {
        if let Some(last) = self.candles.back_mut() {
            if candle.timestamp < last.timestamp
                || (candle.timestamp == last.timestamp && self.policy == DuplicatePolicy::Reject)
            {
                return Err(EngineError::OutOfOrder {
                    last: last.timestamp,
                    received: candle.timestamp,
                });
            }
            if candle.timestamp == last.timestamp {
                *last = candle;
                return Ok(());
            }
        }

        self.candles.push_back(candle);
        if let Some(capacity) = self.capacity {
            while self.candles.len() > capacity {
                self.candles.pop_front();
            }
        }
        Ok(())
    }

    /// Appends in order, stopping at the first rejected candle. Returns how many were accepted.
    pub fn extend<I>(&mut self, candles: I) -> Result<usize>
    where
        I: IntoIterator<Item = Candle>,
    {
        let mut accepted = 0;
        for candle in candles {
            self.append(candle)?;
            accepted += 1;
        }
        Ok(accepted)
    }

    /// Like `extend`, but first skips the leading run of the batch already
    /// covered by the stored tail, since a refreshed fetch overlaps the history
    /// merged on the previous cycle. Under `Reject` a candle equal to the tail
    /// keeps the stored one. Anything after that run goes through `append`, so
    /// an older candle following a newer one fails with `OutOfOrder`.
    pub fn merge<I>(&mut self, candles: I) -> Result<usize>
    where
        I: IntoIterator<Item = Candle>,
    {
        let tail = self.last().map(|c| c.timestamp);
        let policy = self.policy;
        let fresh = candles.into_iter().skip_while(|candle| match tail {
            Some(tail) => {
                candle.timestamp < tail || (candle.timestamp == tail && policy == DuplicatePolicy::Reject)
            }
            None => false,
        });
        self.extend(fresh)
    }

    /// The last `n` candles, or all of them when fewer are stored.
    pub fn window(&self, n: usize) -> Vec<Candle> {
        let start = self.candles.len().saturating_sub(n);
        self.candles.iter().skip(start).copied().collect()
    }

    /// The last `n` candles, failing when fewer are stored.
    pub fn exact_window(&self, n: usize) -> Result<Vec<Candle>> {
        if self.candles.len() < n {
            return Err(EngineError::InsufficientData {
                required: n,
                available: self.candles.len(),
            });
        }
        Ok(self.window(n))
    }

    pub fn snapshot(&self) -> Vec<Candle> {
        self.candles.iter().copied().collect()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.back()
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn clear(&mut self) {
        self.candles.clear();
    }
}

impl Default for SeriesBuffer {
    fn default() -> Self {
        Self::new(DuplicatePolicy::default())
    }
}
