use std::borrow::Cow;

use anyhow::anyhow;
use gpui::{AssetSource, Result, SharedString};
use smallvec::SmallVec;

/// An [`AssetSource`] that asks each provider in turn.
pub struct Assets<const N: usize> {
    providers: SmallVec<[Box<dyn AssetProvider>; N]>,
}

impl<const N: usize> Assets<N> {
    pub fn new(providers: [Box<dyn AssetProvider>; N]) -> Assets<N> {
        Self {
            providers: SmallVec::from(providers),
        }
    }
}

#[macro_export]
macro_rules! assets {
    ( $( $item:expr ),* $(,)? ) => {
        $crate::Assets::new([
            $( Box::new($item) ),*
        ])
    };
}

impl<const N: usize> AssetSource for Assets<N> {
    fn load(&self, path: &str) -> Result<Option<Cow<'static, [u8]>>> {
        if path.is_empty() {
            return Ok(None);
        }

        self.providers
            .iter()
            .find_map(|provider| provider.get(path))
            .map(Some)
            .ok_or_else(|| anyhow!("could not find asset at path \"{path}\""))
    }

    fn list(&self, path: &str) -> Result<Vec<SharedString>> {
        let mut paths = Vec::new();
        for provider in &self.providers {
            paths.extend(provider.list(path)?);
        }
        Ok(paths)
    }
}

pub trait AssetProvider: Send + Sync {
    fn get(&self, path: &str) -> Option<Cow<'static, [u8]>>;
    fn list(&self, path: &str) -> Result<Vec<SharedString>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str, &'static [u8]);

    impl AssetProvider for Fixed {
        fn get(&self, path: &str) -> Option<Cow<'static, [u8]>> {
            (path == self.0).then_some(Cow::Borrowed(self.1))
        }

        fn list(&self, path: &str) -> Result<Vec<SharedString>> {
            Ok(self
                .0
                .starts_with(path)
                .then(|| self.0.into())
                .into_iter()
                .collect())
        }
    }

    #[test]
    fn earlier_providers_win() {
        let assets = crate::assets![Fixed("a.svg", b"first"), Fixed("a.svg", b"second")];

        let loaded = assets.load("a.svg").unwrap().unwrap();
        assert_eq!(loaded.as_ref(), b"first");
    }

    #[test]
    fn missing_asset_is_an_error_and_empty_path_is_none() {
        let assets = crate::assets![Fixed("a.svg", b"a")];

        assert!(assets.load("b.svg").is_err());
        assert!(assets.load("").unwrap().is_none());
    }

    #[test]
    fn list_merges_providers() {
        let assets = crate::assets![Fixed("icons/a.svg", b"a"), Fixed("icons/b.svg", b"b")];

        assert_eq!(assets.list("icons/").unwrap().len(), 2);
    }
}
