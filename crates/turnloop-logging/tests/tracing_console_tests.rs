use turnloop_logging::{init_tracing, LogFormat};

// The subscriber is process-global, so this file holds a single test.
#[test]
fn test_init_tracing_installs_global_subscriber() {
    init_tracing("info", LogFormat::Json);

    assert!(tracing::enabled!(tracing::Level::INFO));
    tracing::info!(turns = 2, "loop stopped");
}
