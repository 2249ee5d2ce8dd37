use tracing::Span;

use super::TraceId;

/// Root span for one quote stream. Every row produced inside it inherits the trace id.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "stream",
        name = %name,
        trace_id = %trace_id.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_can_be_created_without_subscriber() {
        let id = TraceId::default();
        let root = root_span("replay", &id);
        let _guard = root.enter();
        tracing::info!("inside root span");
    }
}
