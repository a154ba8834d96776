//! Command handlers module.
//!
//! - `io.rs`: project and single-element conversion commands
//! - `config.rs`: configuration display command
//! - `elements.rs`: schema listing command

mod config;
mod elements;
mod io;

pub use config::cmd_config;
pub use elements::cmd_elements;
pub use io::{cmd_element_from_csv, cmd_element_to_csv, cmd_from_csv, cmd_to_csv};
