pub mod ats;
pub mod cache;
pub mod error;
pub mod offer;
pub mod source;

pub use error::{Result, SyncError};
