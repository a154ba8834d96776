//! Project file storage.
//!
//! The converters talk to project files only through [`ProjectStore`]:
//! - [`SqliteProjectStore`]: single-file `SQLite` containers
//! - [`MemoryProjectStore`]: in-process containers for tests and embedding
//!
//! Both share the packed record layout in [`codec`].

// Connections and guards are held for the whole call.
#![allow(clippy::significant_drop_tightening)]

pub mod codec;
mod memory;
mod sqlite;
mod traits;

pub use memory::MemoryProjectStore;
pub use sqlite::{SqliteProjectStore, VERSION_ATTRIBUTE};
pub use traits::{FormatVersion, ProjectStore};
