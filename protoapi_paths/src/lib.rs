//! HTTP rule path templates and path value escaping, used by `protoapi` crates

pub mod escape;
pub mod path_template;

pub use escape::{escape_path, escape_segment};
pub use path_template::{Capture, PathTemplate};
