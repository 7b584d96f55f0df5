use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("vet_records_statds")
        .with_description("Vet records app statistics")
        .with_unit("attempt")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

/// create, update, delete, cascade_delete_owner, cascade_delete_vet
pub fn incr_record_action_statds(action: &str) {
    incr_statds("record_action".to_string(), action.into())
}

pub fn incr_login_statds(outcome: &str) {
    incr_statds("login".to_string(), outcome.into())
}

/// Which link of the reply chain answered: a model id or `fallback_<topic>`
pub fn incr_chat_reply_statds(source: &str) {
    incr_statds("chat_reply".to_string(), source.into())
}

pub fn incr_doctor_handoff_statds(action: &str) {
    incr_statds("doctor_handoff".to_string(), action.into())
}
