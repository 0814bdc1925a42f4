use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, register_int_counter_vec, Encoder, Histogram, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static WORK_ORDERS_CREATED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "cmms_work_orders_created_total",
        "Work orders created, by kind",
        &["kind"]
    )
    .expect("register work_orders_created_total")
});

pub static WORK_ORDER_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "cmms_work_order_transitions_total",
        "Work order status transitions, by target status",
        &["to"]
    )
    .expect("register work_order_transitions_total")
});

pub static NOTIFICATIONS_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "cmms_notifications_created_total",
        "Notifications created"
    )
    .expect("register notifications_created_total")
});

pub static SCHEDULER_RUNS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "cmms_scheduler_runs_total",
        "Preventive maintenance due checks executed"
    )
    .expect("register scheduler_runs_total")
});

pub static SCHEDULER_RUN_DURATION: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "cmms_scheduler_run_duration_seconds",
        "Duration of a preventive maintenance due check in seconds",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("register scheduler_run_duration")
});

/// Touch every metric so they appear in the exposition before their first event.
pub fn init_metrics() {
    Lazy::force(&WORK_ORDERS_CREATED_TOTAL);
    Lazy::force(&WORK_ORDER_TRANSITIONS_TOTAL);
    Lazy::force(&NOTIFICATIONS_CREATED_TOTAL);
    Lazy::force(&SCHEDULER_RUNS_TOTAL);
    Lazy::force(&SCHEDULER_RUN_DURATION);
}

/// Default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
