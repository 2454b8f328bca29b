pub mod lakes;
pub mod regions;
pub mod rivers;
pub mod submissions;
pub mod vector_chunk;

pub use lakes::*;
pub use regions::*;
pub use rivers::*;
pub use submissions::*;
pub use vector_chunk::*;
