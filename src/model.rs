mod config;
mod record;

pub use self::config::{FolderErrorPolicy, GalleryConfig};
pub use self::record::{PackageRecord, Snapshot};
