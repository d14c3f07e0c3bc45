//! Storage primitives shared by the repository implementations.

mod atomic_json;

pub use atomic_json::AtomicJsonFile;
