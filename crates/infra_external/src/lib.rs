//! External Collaborators
//!
//! Adapters for the normalization ports that are not backed by PostgreSQL:
//!
//! - [`FsObjectStore`]: uploaded documents laid out as `<root>/<bucket>/<key>`
//! - [`HttpTextDetector`]: a line-level text detection service answering with
//!   a `Blocks` document of `LINE`/`WORD`/`PAGE` entries

pub mod object_store;
pub mod text_detection;

pub use object_store::FsObjectStore;
pub use text_detection::{HttpTextDetector, TextDetectionConfig};
