mod dependencies;

pub use dependencies::generate_dependencies;
