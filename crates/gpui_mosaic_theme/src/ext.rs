use gpui::App;

use crate::{ActiveVariantId, Theme, ThemePreference, ThemeStore};

/// Extension trait for accessing and modifying the global theme.
pub trait ThemeExt {
    /// Changes the theme.
    fn set_theme<T: AsRef<Theme>>(&mut self, theme: T);

    /// Gets an immutable reference to the theme.
    fn get_theme(&self) -> &Theme;

    /// Selects the variant matching `preference` and remembers the preference.
    fn apply_theme_preference(&mut self, preference: ThemePreference);

    /// The preference last applied, [`ThemePreference::System`] if none was.
    fn theme_preference(&self) -> ThemePreference;

    /// Applies `preference` and writes it to `store`. Failing to persist is logged and
    /// does not undo the change.
    fn persist_theme_preference(&mut self, preference: ThemePreference, store: &dyn ThemeStore);
}

impl ThemeExt for App {
    fn set_theme<T: AsRef<Theme>>(&mut self, theme: T) {
        self.set_global::<Theme>(theme.as_ref().clone());

        let preference = self.theme_preference();
        self.apply_theme_preference(preference);
    }

    fn get_theme(&self) -> &Theme {
        self.global()
    }

    fn apply_theme_preference(&mut self, preference: ThemePreference) {
        self.set_global(preference);

        let Some(theme) = self.try_global::<Theme>() else {
            return;
        };

        let index = preference.variant_index(&theme.variants, self.window_appearance());
        self.set_global(ActiveVariantId(index));
        self.refresh_windows();
    }

    fn theme_preference(&self) -> ThemePreference {
        self.try_global::<ThemePreference>()
            .copied()
            .unwrap_or_default()
    }

    fn persist_theme_preference(&mut self, preference: ThemePreference, store: &dyn ThemeStore) {
        self.apply_theme_preference(preference);

        if let Err(err) = store.save(preference) {
            tracing::warn!("could not persist theme preference: {err}");
        }
    }
}
