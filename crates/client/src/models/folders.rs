//! Folder API models.

use serde::{Deserialize, Serialize};

/// A dashboard folder.
///
/// The built-in `General` folder has id 0 and an empty uid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: i64,
    #[serde(default)]
    pub uid: String,
    pub title: String,
}

impl Folder {
    /// Whether this is the built-in General folder.
    pub fn is_general(&self) -> bool {
        self.id == 0
    }
}
