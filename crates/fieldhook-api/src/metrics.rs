//! Prometheus counters for reports and deliveries
use fieldhook_dispatch::DispatchReport;
use prometheus::{Encoder, IntCounterVec, Opts, Registry, TextEncoder};

pub struct Metrics {
    registry: Registry,
    reports: IntCounterVec,
    deliveries: IntCounterVec,
}

impl Metrics {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let reports = IntCounterVec::new(
            Opts::new("fieldhook_reports_total", "Research reports received, by outcome"),
            &["outcome"],
        )?;
        let deliveries = IntCounterVec::new(
            Opts::new("fieldhook_deliveries_total", "Webhook deliveries attempted, by outcome"),
            &["outcome"],
        )?;
        registry.register(Box::new(reports.clone()))?;
        registry.register(Box::new(deliveries.clone()))?;

        Ok(Self {
            registry,
            reports,
            deliveries,
        })
    }

    pub fn record_report(&self, outcome: &str) {
        self.reports.with_label_values(&[outcome]).inc();
    }

    pub fn record_dispatch(&self, report: &DispatchReport) {
        self.deliveries
            .with_label_values(&["delivered"])
            .inc_by(report.delivered.len() as u64);
        self.deliveries
            .with_label_values(&["failed"])
            .inc_by(report.failed.len() as u64);
    }

    pub fn encode(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).to_string())
    }
}
