use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub shift_operations_total: IntCounterVec,
    pub shift_operation_latency_seconds: HistogramVec,
    pub active_assignments: IntGauge,
    pub donations_registered: IntGauge,
    pub volunteers_registered: IntGauge,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let shift_operations_total = IntCounterVec::new(
            Opts::new(
                "shift_operations_total",
                "Shift claim and release operations by outcome",
            ),
            &["operation", "outcome"],
        )
        .expect("valid shift_operations_total metric");

        let shift_operation_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "shift_operation_latency_seconds",
                "Latency of shift operations in seconds",
            ),
            &["operation"],
        )
        .expect("valid shift_operation_latency_seconds metric");

        let active_assignments = IntGauge::new(
            "active_assignments",
            "Current number of volunteer claims across all donations",
        )
        .expect("valid active_assignments metric");

        let donations_registered =
            IntGauge::new("donations_registered", "Current number of donation postings")
                .expect("valid donations_registered metric");

        let volunteers_registered = IntGauge::new(
            "volunteers_registered",
            "Current number of volunteer driver registrations",
        )
        .expect("valid volunteers_registered metric");

        registry
            .register(Box::new(shift_operations_total.clone()))
            .expect("register shift_operations_total");
        registry
            .register(Box::new(shift_operation_latency_seconds.clone()))
            .expect("register shift_operation_latency_seconds");
        registry
            .register(Box::new(active_assignments.clone()))
            .expect("register active_assignments");
        registry
            .register(Box::new(donations_registered.clone()))
            .expect("register donations_registered");
        registry
            .register(Box::new(volunteers_registered.clone()))
            .expect("register volunteers_registered");

        Self {
            registry,
            shift_operations_total,
            shift_operation_latency_seconds,
            active_assignments,
            donations_registered,
            volunteers_registered,
        }
    }

    pub fn record_shift_operation(&self, operation: &str, outcome: &str, elapsed_seconds: f64) {
        self.shift_operations_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.shift_operation_latency_seconds
            .with_label_values(&[operation])
            .observe(elapsed_seconds);
    }

    pub fn encode(&self) -> Result<String, String> {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();

        TextEncoder::new()
            .encode(&metric_families, &mut buffer)
            .map_err(|err| format!("failed to encode metrics: {err}"))?;

        String::from_utf8(buffer).map_err(|err| format!("metrics are not valid utf8: {err}"))
    }
}
