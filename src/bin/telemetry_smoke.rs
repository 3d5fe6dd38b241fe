use anyhow::Result;
use opentelemetry::KeyValue;
use tracing::{info, span, Level};

#[tokio::main]
async fn main() -> Result<()> {
    let tel = ngn_dex_core::telemetry::init("ngn-dex-core")?;
    let span = span!(Level::INFO, "smoke_span", otel.name = "telemetry_smoke");
    let _e = span.enter();
    info!("emitindo métrica e finalizando…");
    tel.swap_latency_ms
        .record(0.0, &[KeyValue::new("component", "telemetry_smoke")]);
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
    tel.shutdown();
    Ok(())
}
