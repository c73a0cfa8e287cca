pub mod export;
pub mod init;
pub mod validate;

pub use export::{export, ExportArgs};
pub use init::{init, InitArgs};
pub use validate::{validate, ValidateArgs};
