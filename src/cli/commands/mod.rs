//! CLI command implementations

pub mod backup;
pub mod init;
pub mod mat;
pub mod reconcile;
pub mod route;
pub mod sup;
pub mod utils;
pub mod validate;
pub mod wh;
