//! Data structures describing quotation requests

mod file_kind;
mod parameters;
mod upload;

pub use file_kind::ModelFileKind;
pub use parameters::{BrimStyle, InfillPattern, PrintParameters, SeamPosition};
pub use upload::UploadedFile;
