//! Optional flamegraph capture around pipeline phases.
//!
//! Built with `--features profile`, each phase writes `tfgraph-<phase>.svg` to
//! the working directory. Without the feature the closure just runs.

#[cfg(feature = "profile")]
pub fn profile_phase<F, R>(name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    use pprof::ProfilerGuard;
    use tracing::{info, warn};

    let guard = match ProfilerGuard::new(1000) {
        Ok(guard) => guard,
        Err(err) => {
            warn!(phase = name, error = %err, "profiler unavailable");
            return f();
        }
    };
    let result = f();

    let filename = format!("tfgraph-{name}.svg");
    let written = guard.report().build().map_err(|e| e.to_string()).and_then(|report| {
        let file = std::fs::File::create(&filename).map_err(|e| e.to_string())?;
        report.flamegraph(file).map_err(|e| e.to_string())
    });
    match written {
        Ok(()) => info!(phase = name, file = %filename, "flamegraph saved"),
        Err(err) => warn!(phase = name, error = %err, "flamegraph not written"),
    }

    result
}

#[cfg(not(feature = "profile"))]
pub fn profile_phase<F, R>(_name: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    f()
}
