use std::collections::HashMap;

use gpui::{App, AppContext, Entity, Global};

use super::{OverlayConfig, OverlayFamily, OverlayId, OverlayManager, OverlayOptions, OverlayPatch};

/// Process-wide home of the overlay managers, one per family.
///
/// Installing the registry is what gives overlays somewhere to mount. Until it is
/// installed every overlay call is a no-op.
pub struct OverlayRegistry {
    config: OverlayConfig,
    managers: HashMap<OverlayFamily, Entity<OverlayManager>>,
}

impl Global for OverlayRegistry {}

impl OverlayRegistry {
    /// Installs the registry. Managers that already exist are kept.
    pub fn install(config: OverlayConfig, cx: &mut App) {
        if let Some(registry) = cx.try_global::<Self>()
            && !registry.managers.is_empty()
        {
            tracing::warn!("overlay registry is already in use; keeping its configuration");
            return;
        }

        cx.set_global(Self {
            config,
            managers: HashMap::new(),
        });
    }

    pub fn is_installed(cx: &App) -> bool {
        cx.has_global::<Self>()
    }

    pub fn config(cx: &App) -> Option<&OverlayConfig> {
        cx.try_global::<Self>().map(|registry| &registry.config)
    }

    pub fn get(family: OverlayFamily, cx: &App) -> Option<Entity<OverlayManager>> {
        cx.try_global::<Self>()?.managers.get(&family).cloned()
    }

    /// Returns the family's manager, creating it on first use.
    pub fn get_or_create(family: OverlayFamily, cx: &mut App) -> Option<Entity<OverlayManager>> {
        let Some(registry) = cx.try_global::<Self>() else {
            tracing::debug!(
                family = family.name(),
                "overlay registry is not installed; nowhere to mount"
            );
            return None;
        };

        if let Some(manager) = registry.managers.get(&family) {
            return Some(manager.clone());
        }

        let config = registry.config.clone();
        let manager = cx.new(|_cx| OverlayManager::new(family, config));
        cx.global_mut::<Self>()
            .managers
            .insert(family, manager.clone());

        tracing::debug!(family = family.name(), "mounted overlay family");

        // Roots need to draw the new layer.
        cx.refresh_windows();

        Some(manager)
    }

    /// Every mounted manager, in a fixed family order.
    pub fn mounted(cx: &App) -> Vec<Entity<OverlayManager>> {
        OverlayFamily::ALL
            .iter()
            .filter_map(|family| Self::get(*family, cx))
            .collect()
    }
}

/// Shows an overlay in `family`. Returns `None` when there is nowhere to mount it.
pub fn show(
    family: OverlayFamily,
    options: impl Into<OverlayOptions>,
    cx: &mut App,
) -> Option<OverlayId> {
    let manager = OverlayRegistry::get_or_create(family, cx)?;
    let options = options.into();

    Some(manager.update(cx, |manager, cx| manager.show(options, cx)))
}

pub fn close(family: OverlayFamily, id: OverlayId, cx: &mut App) {
    if let Some(manager) = OverlayRegistry::get(family, cx) {
        manager.update(cx, |manager, cx| manager.close(id, cx));
    }
}

pub fn clear(family: OverlayFamily, cx: &mut App) {
    if let Some(manager) = OverlayRegistry::get(family, cx) {
        manager.update(cx, |manager, cx| manager.clear(cx));
    }
}

pub fn update(family: OverlayFamily, id: OverlayId, patch: OverlayPatch, cx: &mut App) {
    if let Some(manager) = OverlayRegistry::get(family, cx) {
        manager.update(cx, |manager, cx| manager.update(id, patch, cx));
    }
}

#[cfg(all(test, feature = "test-support"))]
mod tests {
    use gpui::TestAppContext;
    use tracing_test::traced_test;

    use super::*;

    #[traced_test]
    #[gpui::test]
    fn test_show_without_registry_is_noop(cx: &mut TestAppContext) {
        cx.update(|cx| {
            assert!(show(OverlayFamily::Toast, "nowhere", cx).is_none());
            close(OverlayFamily::Toast, OverlayId::next(), cx);
            clear(OverlayFamily::Alert, cx);

            assert!(OverlayRegistry::mounted(cx).is_empty());
        });

        assert!(logs_contain("nowhere to mount"));
    }

    #[gpui::test]
    fn test_families_are_mounted_lazily_once(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);
            assert!(OverlayRegistry::mounted(cx).is_empty());

            show(OverlayFamily::Message, "one", cx);
            let first = OverlayRegistry::get(OverlayFamily::Message, cx).unwrap();
            show(OverlayFamily::Message, "two", cx);
            let second = OverlayRegistry::get(OverlayFamily::Message, cx).unwrap();

            assert_eq!(first.entity_id(), second.entity_id());
            assert_eq!(OverlayRegistry::mounted(cx).len(), 1);
            assert_eq!(first.read(cx).queue().live_count(), 2);
        });
    }

    #[gpui::test]
    fn test_families_do_not_share_queues(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);

            let toast = show(OverlayFamily::Toast, "toast", cx).unwrap();
            show(OverlayFamily::Alert, "alert", cx);

            close(OverlayFamily::Alert, toast, cx);

            let toasts = OverlayRegistry::get(OverlayFamily::Toast, cx).unwrap();
            assert_eq!(toasts.read(cx).queue().live_ids(), vec![toast]);
        });
    }

    #[traced_test]
    #[gpui::test]
    fn test_reinstall_keeps_mounted_managers(cx: &mut TestAppContext) {
        cx.update(|cx| {
            OverlayRegistry::install(OverlayConfig::default(), cx);
            show(OverlayFamily::Alert, "kept", cx);

            OverlayRegistry::install(
                OverlayConfig {
                    exit_duration_ms: 10,
                    ..Default::default()
                },
                cx,
            );

            assert_eq!(OverlayRegistry::mounted(cx).len(), 1);
            assert_eq!(OverlayRegistry::config(cx).unwrap().exit_duration_ms, 200);
        });

        assert!(logs_contain("already in use"));
    }
}
