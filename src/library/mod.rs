mod media;
pub mod filter;
pub mod loader;
pub mod permission;
pub mod scan;

pub use media::*;
pub use filter::FilteredView;
pub use loader::{CatalogLoader, LoadOutcome};
pub use permission::{FolderPermission, PermissionProvider, PermissionStatus};
pub use scan::FolderSource;
