pub mod script;
pub mod dictionary;
pub mod line;
pub mod overlap;
pub mod region;
pub mod conductor;

pub use script::*;
pub use dictionary::*;
pub use line::*;
pub use overlap::*;
pub use region::*;
pub use conductor::*;

#[cfg(test)]
mod tests;
