//! Theme system providing colors, typography, and layout dimensions.
//!
//! Themes support multiple variants (dark and light) with a consistent set of semantic
//! color tokens and size scales. The user's light/dark/system choice is a
//! [`ThemePreference`] that can be persisted through a [`ThemeStore`].

mod deserializers;

mod schema;
pub use schema::*;

mod ext;
pub use ext::*;

mod kinds;
pub use kinds::*;

mod preference;
pub use preference::*;
