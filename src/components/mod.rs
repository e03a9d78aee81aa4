mod badge;
pub use badge::*;

mod cascader;
pub use cascader::*;

mod checkbox;
pub use checkbox::*;

mod date_picker;
pub use date_picker::*;

mod icon;
pub use icon::*;

pub mod input;
pub use input::{EditCommand, Input};

mod input_otp;
pub use input_otp::*;

mod popover;
pub use popover::*;

mod radio;
pub use radio::*;

pub mod select;
pub use select::{Select, SelectError, SelectOptions};

mod switch;
pub use switch::*;
