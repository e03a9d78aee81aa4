use gpui::InteractiveElement;

/// Tags an element so tests can look up its bounds with `VisualTestContext::debug_bounds`.
/// Outside of `test-support` builds this does nothing.
pub trait TestSelectorExt: InteractiveElement + Sized {
    #[allow(unused_variables)]
    fn test_selector(self, selector: impl FnOnce() -> String) -> Self {
        #[cfg(feature = "test-support")]
        {
            self.debug_selector(selector)
        }

        #[cfg(not(feature = "test-support"))]
        {
            self
        }
    }
}

impl<E: InteractiveElement> TestSelectorExt for E {}
