pub mod attrs;
pub mod live;
pub mod tree;

pub use attrs::*;
pub use live::*;
pub use tree::*;
