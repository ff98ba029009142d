// Narration metrics collection and tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Counters for the narration pipeline, shared across handlers.
#[derive(Debug, Clone)]
pub struct NarrationMetrics {
    started_at: DateTime<Utc>,
    requests: Arc<AtomicU64>,
    narrations: Arc<AtomicU64>,
    failures: Arc<AtomicU64>,
    chunks: Arc<AtomicU64>,
    audio_bytes: Arc<AtomicU64>,
    total_latency_ms: Arc<AtomicU64>,
    max_latency_ms: Arc<AtomicU64>,
}

impl NarrationMetrics {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            requests: Arc::new(AtomicU64::new(0)),
            narrations: Arc::new(AtomicU64::new(0)),
            failures: Arc::new(AtomicU64::new(0)),
            chunks: Arc::new(AtomicU64::new(0)),
            audio_bytes: Arc::new(AtomicU64::new(0)),
            total_latency_ms: Arc::new(AtomicU64::new(0)),
            max_latency_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_narration(&self, chunks: usize, bytes: usize, latency_ms: u64) {
        self.narrations.fetch_add(1, Ordering::Relaxed);
        self.chunks.fetch_add(chunks as u64, Ordering::Relaxed);
        self.audio_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.max_latency_ms.fetch_max(latency_ms, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn avg_latency_ms(&self) -> f64 {
        let count = self.narrations.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        self.total_latency_ms.load(Ordering::Relaxed) as f64 / count as f64
    }

    pub fn snapshot(&self) -> MetricsResponse {
        let now = Utc::now();
        MetricsResponse {
            timestamp: now,
            uptime_seconds: (now - self.started_at).num_seconds().max(0) as u64,
            request_count: self.requests.load(Ordering::Relaxed),
            narration_count: self.narrations.load(Ordering::Relaxed),
            narration_failures: self.failures.load(Ordering::Relaxed),
            chunks_synthesized: self.chunks.load(Ordering::Relaxed),
            audio_bytes: self.audio_bytes.load(Ordering::Relaxed),
            avg_latency_ms: self.avg_latency_ms(),
            max_latency_ms: self.max_latency_ms.load(Ordering::Relaxed),
        }
    }
}

impl Default for NarrationMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsResponse {
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub request_count: u64,
    pub narration_count: u64,
    pub narration_failures: u64,
    pub chunks_synthesized: u64,
    pub audio_bytes: u64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
}
