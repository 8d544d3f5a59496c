// ── Simple queue ──

use serde::Serialize;

use crate::config::RankSide;

/// An `"<upload>/<download>"` pair, as RouterOS reports both byte
/// counters and rate limits for simple queues.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterPair {
    pub upload: u64,
    pub download: u64,
}

impl CounterPair {
    /// Parse `"123/456"`. Anything else (missing half, non-numeric) is `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (upload, download) = raw.trim().split_once('/')?;
        Some(Self {
            upload: upload.trim().parse().ok()?,
            download: download.trim().parse().ok()?,
        })
    }

    pub fn side(&self, side: RankSide) -> u64 {
        match side {
            RankSide::Upload => self.upload,
            RankSide::Download => self.download,
        }
    }
}

/// One `/queue/simple` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Queue {
    pub name: String,
    /// First target address with a host `/32` suffix removed.
    pub target: Option<String>,
    /// Current rate in bits per second.
    pub rate: Option<CounterPair>,
    /// Cumulative byte counters. `None` when absent or unparsable.
    pub bytes: Option<CounterPair>,
}
