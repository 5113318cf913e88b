use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub parcels_created_total: IntCounter,
    pub status_transitions_total: IntCounterVec,
    pub block_toggles_total: IntCounterVec,
    pub parcels_deleted_total: IntCounter,
}

impl Metrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let parcels_created_total =
            IntCounter::new("parcels_created_total", "Total parcels booked")
                .expect("valid parcels_created_total metric");

        let status_transitions_total = IntCounterVec::new(
            Opts::new(
                "status_transitions_total",
                "Total accepted status transitions by target status",
            ),
            &["status"],
        )
        .expect("valid status_transitions_total metric");

        let block_toggles_total = IntCounterVec::new(
            Opts::new("block_toggles_total", "Total block flag toggles by action"),
            &["action"],
        )
        .expect("valid block_toggles_total metric");

        let parcels_deleted_total =
            IntCounter::new("parcels_deleted_total", "Total parcels deleted")
                .expect("valid parcels_deleted_total metric");

        registry
            .register(Box::new(parcels_created_total.clone()))
            .expect("register parcels_created_total");
        registry
            .register(Box::new(status_transitions_total.clone()))
            .expect("register status_transitions_total");
        registry
            .register(Box::new(block_toggles_total.clone()))
            .expect("register block_toggles_total");
        registry
            .register(Box::new(parcels_deleted_total.clone()))
            .expect("register parcels_deleted_total");

        Self {
            registry,
            parcels_created_total,
            status_transitions_total,
            block_toggles_total,
            parcels_deleted_total,
        }
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
