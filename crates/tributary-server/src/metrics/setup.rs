//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

/// Buckets del histograma de duracion de polls (en segundos).
///
/// Un poll incluye fetch de red, por eso la escala llega a minutos.
const POLL_BUCKETS: &[f64] = &[
    0.01,  // 10 milisegundos
    0.05,  // 50 milisegundos
    0.1,   // 100 milisegundos
    0.25,  // 250 milisegundos
    0.5,   // 500 milisegundos
    1.0,   // 1 segundo
    2.5,   // 2.5 segundos
    5.0,   // 5 segundos
    10.0,  // 10 segundos
    30.0,  // 30 segundos
    60.0,  // 1 minuto
    120.0, // 2 minutos
];

/// Inicializa el sistema de metricas y retorna el handle para el endpoint.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(POLL_BUCKETS)?
        .install_recorder()?;

    tributary_git::metrics::describe();
    super::http::register_http_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}
