pub mod app;

pub use app::{App, RunRequest};
