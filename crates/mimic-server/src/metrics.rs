//! Prometheus metrics for the stub server.
//!
//! Each server owns a [`Metrics`] with its own registry, so servers sharing a process report
//! only their own traffic. Exposed on the admin API.
use crate::mapping::RequestMethod;
use prometheus::{CounterVec, Encoder, IntCounter, IntGauge, Opts, Registry, TextEncoder};

/// Label for methods outside the supported verbs
const OTHER_METHOD: &str = "OTHER";

pub struct Metrics {
    registry: Registry,
    /// Stub requests served
    requests_total: CounterVec,
    /// Mappings registered since start
    mappings_registered_total: IntCounter,
    /// Mappings currently held by the store, refreshed on scrape
    mappings: IntGauge,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = CounterVec::new(
            Opts::new("mimic_requests_total", "Total number of stub requests served"),
            &["method", "outcome"], // outcome: matched|unmatched
        )?;
        let mappings_registered_total = IntCounter::new(
            "mimic_mappings_registered_total",
            "Total number of mappings registered",
        )?;
        let mappings = IntGauge::new("mimic_mappings", "Number of mappings currently registered")?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(mappings_registered_total.clone()))?;
        registry.register(Box::new(mappings.clone()))?;

        Ok(Self {
            registry,
            requests_total,
            mappings_registered_total,
            mappings,
        })
    }

    /// Record one served stub request
    pub fn record_request(&self, method: &str, matched: bool) {
        let outcome = if matched { "matched" } else { "unmatched" };
        self.requests_total
            .with_label_values(&[method_label(method), outcome])
            .inc();
    }

    /// Record mappings added to the store, from the admin API or from startup files
    pub fn record_registrations(&self, count: u64) {
        self.mappings_registered_total.inc_by(count);
    }

    /// Collect all metrics in Prometheus text format. `mapping_count` is the owning store's size.
    pub fn collect(&self, mapping_count: usize) -> String {
        self.mappings.set(mapping_count as i64);

        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        if encoder.encode(&metric_families, &mut buffer).is_err() {
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Bounded label for a wire method: one of the supported verbs, or `OTHER`.
pub fn method_label(method: &str) -> &'static str {
    RequestMethod::from_wire(method)
        .map(|m| m.as_str())
        .unwrap_or(OTHER_METHOD)
}
