pub mod http;
pub mod transcoder;
