use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;

/// Installs the global subscriber.
///
/// Everything goes to stdout through `RUST_LOG` (default `info,surety_node=debug`).
/// Records on the `audit` target are additionally appended to `audit_path`
/// when given; keep the returned guard alive to flush them.
pub fn init_logging(audit_path: Option<&Path>) -> Option<WorkerGuard> {
    let stdout_layer = tracing_subscriber::fmt::layer().with_filter(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "info,surety_node=debug".into()),
    );

    let (audit_layer, guard) = match audit_path {
        Some(path) => {
            let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
            let file_name = path.file_name().map(|f| f.to_os_string()).unwrap_or_else(|| "audit.log".into());
            let file_appender = tracing_appender::rolling::never(dir, file_name);
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

            let layer = tracing_subscriber::fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_filter(tracing_subscriber::filter::filter_fn(|metadata| {
                    metadata.target() == "audit"
                }));
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(stdout_layer)
        .with(audit_layer)
        .init();

    guard
}
