// agricredit/core/marketplace/src/metrics.rs

// Metrics for ledger operations and credit flows
use agricredit_primitives::{LedgerError, LedgerResult};
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, IntCounter, IntCounterVec};

pub static MARKET_OPERATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "agricredit_market_operations_total",
        "Ledger operations by kind and outcome",
        &["operation", "outcome"]
    )
    .expect("register agricredit_market_operations_total")
});

pub static FEES_COLLECTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "agricredit_fees_collected_total",
        "Credits collected into the platform wallet"
    )
    .expect("register agricredit_fees_collected_total")
});

pub static CREDITS_MINTED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("agricredit_credits_minted_total", "Credits issued as rewards")
        .expect("register agricredit_credits_minted_total")
});

pub static CREDITS_DECAYED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "agricredit_credits_decayed_total",
        "Credits removed by inactivity decay"
    )
    .expect("register agricredit_credits_decayed_total")
});

pub fn record_outcome<T>(operation: &str, result: &LedgerResult<T>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(LedgerError::Validation(_)) => "validation",
        Err(LedgerError::Conflict(_)) => "conflict",
        Err(LedgerError::NotFound(_)) => "not_found",
        Err(LedgerError::Storage(_)) => "storage",
    };
    MARKET_OPERATIONS_TOTAL
        .with_label_values(&[operation, outcome])
        .inc();
}

/// Prometheus text exposition of the default registry
pub fn gather_text() -> String {
    use prometheus::Encoder;

    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    if encoder.encode(&prometheus::gather(), &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
