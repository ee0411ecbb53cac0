mod cylinder_tests;
mod pipeline_tests;

use crate::Values;

/// Build a values map from name/value pairs
pub(crate) fn vals(pairs: &[(&str, f64)]) -> Values {
    pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
}

pub(crate) const CYLINDER: &str = include_str!("../../data/cylinder.ef");
pub(crate) const AREA: &str = include_str!("../../data/area.ef");
pub(crate) const VOLUME: &str = include_str!("../../data/volume.ef");
pub(crate) const WIRE_LOAD: &str = include_str!("../../data/wire_load.ef");

/// Operating point of the cylinder fixture
pub(crate) fn cylinder_values() -> Values {
    vals(&[
        ("height", 12.0),
        ("radius", 5.0),
        ("area", 78.539816),
        ("volume", 942.477796),
    ])
}

/// Install a test subscriber so `RUST_LOG=debug cargo test` shows solver logs
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
