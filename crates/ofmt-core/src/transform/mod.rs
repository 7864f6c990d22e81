pub mod extract;
pub mod strip;

pub use extract::extract_paths;
pub use strip::strip_extensions;
