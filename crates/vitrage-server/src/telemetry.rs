// SPDX-License-Identifier: Apache-2.0

use axum::http::StatusCode;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;

/// Per-route latency window; older samples fall off so memory stays bounded
/// and the p95 reflects recent traffic.
const LATENCY_SAMPLE_CAP: usize = 512;

#[derive(Default)]
pub struct RequestMetrics {
    counts: Mutex<HashMap<(String, u16), u64>>,
    latency_ns: Mutex<HashMap<String, VecDeque<u64>>>,
    pub quotes_accepted_total: AtomicU64,
    pub quotes_rejected_total: AtomicU64,
}

impl RequestMetrics {
    pub(crate) async fn observe_request(&self, route: &str, status: StatusCode, latency: Duration) {
        let mut counts = self.counts.lock().await;
        *counts
            .entry((route.to_string(), status.as_u16()))
            .or_insert(0) += 1;
        drop(counts);
        let mut latency_map = self.latency_ns.lock().await;
        let samples = latency_map.entry(route.to_string()).or_default();
        samples.push_back(latency.as_nanos() as u64);
        while samples.len() > LATENCY_SAMPLE_CAP {
            samples.pop_front();
        }
    }

    /// Prometheus text exposition of the counters and per-route p95 latency.
    pub(crate) async fn render(&self) -> String {
        let mut body = String::new();
        let mut counts = self
            .counts
            .lock()
            .await
            .iter()
            .map(|((route, status), count)| (route.clone(), *status, *count))
            .collect::<Vec<_>>();
        counts.sort();
        for (route, status, count) in counts {
            body.push_str(&format!(
                "vitrage_http_requests_total{{route=\"{route}\",status=\"{status}\"}} {count}\n"
            ));
        }
        let latencies = self.latency_ns.lock().await.clone();
        let mut routes = latencies.keys().cloned().collect::<Vec<_>>();
        routes.sort();
        for route in routes {
            let samples = latencies[&route].iter().copied().collect::<Vec<_>>();
            let p95 = percentile_ns(&samples, 0.95);
            body.push_str(&format!(
                "vitrage_http_request_latency_p95_seconds{{route=\"{route}\"}} {:.6}\n",
                p95 as f64 / 1_000_000_000.0
            ));
        }
        body.push_str(&format!(
            "vitrage_quotes_accepted_total {}\n",
            self.quotes_accepted_total.load(Ordering::Relaxed)
        ));
        body.push_str(&format!(
            "vitrage_quotes_rejected_total {}\n",
            self.quotes_rejected_total.load(Ordering::Relaxed)
        ));
        body
    }
}

fn percentile_ns(samples: &[u64], quantile: f64) -> u64 {
    if samples.is_empty() {
        return 0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_unstable();
    let idx = ((sorted.len() as f64) * quantile).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percentile_of_empty_is_zero() {
        assert_eq!(percentile_ns(&[], 0.95), 0);
    }

    #[test]
    fn percentile_picks_upper_tail() {
        let samples: Vec<u64> = (1..=100).collect();
        assert_eq!(percentile_ns(&samples, 0.95), 95);
    }

    #[tokio::test]
    async fn latency_window_is_bounded_and_sheds_oldest_samples() {
        let metrics = RequestMetrics::default();
        // Old outliers first; sustained traffic afterwards must push them out.
        for _ in 0..40 {
            metrics
                .observe_request("/v1/quotes", StatusCode::CREATED, Duration::from_secs(60))
                .await;
        }
        for _ in 0..LATENCY_SAMPLE_CAP {
            metrics
                .observe_request("/v1/quotes", StatusCode::CREATED, Duration::from_millis(1))
                .await;
        }
        let samples = metrics.latency_ns.lock().await;
        let window = &samples["/v1/quotes"];
        assert_eq!(window.len(), LATENCY_SAMPLE_CAP);
        assert!(window.iter().all(|&ns| ns < 1_000_000_000));
    }

    #[tokio::test]
    async fn render_includes_observed_routes() {
        let metrics = RequestMetrics::default();
        metrics
            .observe_request("/healthz", StatusCode::OK, Duration::from_millis(2))
            .await;
        metrics.quotes_accepted_total.fetch_add(1, Ordering::Relaxed);
        let body = metrics.render().await;
        assert!(body.contains("vitrage_http_requests_total{route=\"/healthz\",status=\"200\"} 1"));
        assert!(body.contains("vitrage_quotes_accepted_total 1"));
    }
}
