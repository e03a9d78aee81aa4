use gpui::{AbsoluteLength, DefiniteLength, Pixels, Window, px};

pub trait PixelsExt {
    /// Vertical padding that makes a single line of text reach this height.
    fn padding_needed_for_height(
        &self,
        window: &Window,
        text_size: AbsoluteLength,
        line_height: DefiniteLength,
    ) -> Pixels;
}

impl PixelsExt for Pixels {
    fn padding_needed_for_height(
        &self,
        window: &Window,
        text_size: AbsoluteLength,
        line_height: DefiniteLength,
    ) -> Pixels {
        let rem_size = window.rem_size();
        let text_size = f32::from(text_size.to_pixels(rem_size));

        let line_height = match line_height {
            DefiniteLength::Absolute(line_height) => f32::from(line_height.to_pixels(rem_size)),
            DefiniteLength::Fraction(frac) => text_size * frac,
        };

        px(((f32::from(*self) - line_height) / 2.).max(0.))
    }
}
