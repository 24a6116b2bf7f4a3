//! Byte sources for the engine
//!
//! Resources are opened by callers (a path on disk, or a named buffer in a
//! [`MemoryFs`]) and then handed to the probing pipeline, which opens
//! whatever further resources the detected format needs.

pub mod files;
pub mod memory;
pub mod reader;
pub mod registry;
pub mod resource;

pub use files::FileResource;
pub use memory::{MemoryFs, MemoryResource};
pub use reader::ResourceReader;
pub use registry::{ResourceId, ResourceRegistry};
pub use resource::{split_extension, Resource, ResourceExt, DEFAULT_BUFFER_SIZE};
