mod focus_ring;
pub use focus_ring::*;

mod cursor_blink;
pub use cursor_blink::*;

mod text_edit;
pub use text_edit::*;
