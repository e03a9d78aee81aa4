mod root;
pub use root::*;
