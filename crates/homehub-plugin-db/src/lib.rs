//! On-disk discovery of hub apps and widgets.
//!
//! Apps live in one directory each and are described by a `manifest.json`;
//! widgets are single files that declare a `<Name>Widget` type. Scanning
//! only produces metadata, it never constructs anything.

mod entry;
mod scan;

pub use entry::*;
pub use scan::*;
