mod asset;
mod scene;
mod size;

pub use self::asset::{Asset, ImportMode};
pub use self::scene::Scene;
pub use self::size::{ObservedSize, Size};
