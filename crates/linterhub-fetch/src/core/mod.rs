//! Pure transformations used by the download path.

mod validation;

pub use validation::{is_redirect, request_options};
