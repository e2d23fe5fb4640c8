pub mod instance;

pub use instance::{method_not_allowed_body, not_found, stamp_instance, INSTANCE_HEADER};
