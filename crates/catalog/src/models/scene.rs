use crate::SceneId;

/// A scene on disk that usage can be attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scene {
    pub id: SceneId,
    /// Display name (usually the file stem)
    pub name: String,
    /// Storage path of the scene, relative to the project root
    pub path: String,
}
impl Scene {
    pub fn new(id: impl Into<SceneId>, name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            path: path.into(),
        }
    }
}
