pub mod builder;
pub mod encode;

pub use builder::{build_file_url, build_tree_url, repo_base_url, UrlRequest};
pub use encode::{encode_bytes, encode_component, encode_os_segment, encode_path};
