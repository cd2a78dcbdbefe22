mod walker;

pub use walker::{scan_sources, ScanResult};
