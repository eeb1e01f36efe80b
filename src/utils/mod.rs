pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{image_mime_from_extension, input_to_url, is_http_url, local_path, url_extension};
