//! Blocking HTTP plumbing shared by the provider call and the audio download.

mod http;

pub use http::{HttpTransport, DOWNLOAD_CHUNK_SIZE};
