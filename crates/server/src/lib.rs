//! Notes service built on `plainroute-connect`.

pub mod config;
pub mod notes;
pub mod routes;

pub use config::{ServerConfig, load_config};
pub use notes::{Note, NoteStore};
pub use routes::router;
