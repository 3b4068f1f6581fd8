pub mod resource;

pub use resource::{FetchState, Resource};
