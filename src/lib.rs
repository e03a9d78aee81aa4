pub mod controlled;

pub mod overlay;
pub use overlay::{alert, message, spin, toast};

pub mod primitives;

pub mod views;

pub mod components;

pub mod theme;

mod utils;
pub use utils::ElementIdExt;

mod assets;
pub use assets::*;

mod init;
pub use init::*;
