//! Observability for the Consultant chat client: the tracing subscriber and
//! its optional OpenTelemetry bridge.

pub mod tracing_setup;
