pub mod map;
pub mod markers;
pub mod render;
pub mod symbology;
pub mod tiles;

pub use map::*;
pub use markers::*;
pub use render::*;
pub use symbology::*;
pub use tiles::*;
