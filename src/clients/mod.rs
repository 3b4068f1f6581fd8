pub mod any;
pub mod file_client;
pub mod http_client;

pub use any::AnyClient;
pub use file_client::FileClient;
pub use http_client::HttpClient;
