// SPDX-License-Identifier: MIT
//
// Kartenwerk — Core types and error definitions shared across all crates.

pub mod config;
pub mod error;
pub mod session;
pub mod types;

pub use config::PageGeometry;
pub use error::KartenwerkError;
pub use session::EditorSession;
pub use types::*;
