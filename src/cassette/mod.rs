//! Cassette (fixture) loading subsystem.
//!
//! # Data Flow
//! ```text
//! path (file or directory)
//!     → loader.rs (list files, sorted by name)
//!     → decoder.rs (YAML / JSON / TOML → StubDeclaration[])
//!     → schema.rs (declaration → validated Stub)
//!     → Registry::extend (one atomic batch)
//!
//! On change (optional):
//!     watcher.rs detects change
//!     → loader.rs reloads all watched paths
//!     → Registry::replace
//! ```
//!
//! # Design Decisions
//! - Fail fast: any unreadable file or bad declaration aborts the load and
//!   leaves the registry untouched
//! - Files load in name order, entries in document order; order is match priority
//! - Format is chosen by extension; the core only sees declarations

pub mod decoder;
pub mod loader;
pub mod schema;
pub mod watcher;

pub use decoder::{CassetteDecoder, DecodeError};
pub use loader::{load_path, load_paths, CassetteError};
pub use schema::{CassetteDocument, ResponseDeclaration, StubDeclaration};
pub use watcher::CassetteWatcher;
