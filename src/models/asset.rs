use crate::models::MediaItem;

pub const DEFAULT_ASSET_ROOT: &str = "/assets";

/// Fixed location that media filenames are resolved against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoot(String);

impl AssetRoot {
    pub fn new(root: impl Into<String>) -> Self {
        Self(root.into())
    }

    /// Resolve the item's asset, or `None` when its filename is blank.
    pub fn resolve(&self, item: &MediaItem) -> Option<String> {
        self.resolve_file(&item.reference)
    }

    /// Join a filename onto the root. The filename is trimmed first; blank
    /// filenames resolve to `None`.
    pub fn resolve_file(&self, file: &str) -> Option<String> {
        let file = file.trim();
        if file.is_empty() {
            None
        } else {
            Some(self.join(file))
        }
    }

    fn join(&self, file: &str) -> String {
        format!("{}/{}", self.0.trim_end_matches('/'), file)
    }
}

impl Default for AssetRoot {
    fn default() -> Self {
        Self::new(DEFAULT_ASSET_ROOT)
    }
}
