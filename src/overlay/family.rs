use std::time::Duration;

use enum_assoc::Assoc;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// A category of transient surface with its own mount point and queue.
#[derive(Assoc, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[func(pub fn name(&self) -> &'static str)]
#[func(pub fn is_single_slot(&self) -> bool)]
pub enum OverlayFamily {
    #[assoc(name = "toast")]
    #[assoc(is_single_slot = true)]
    Toast,
    #[assoc(name = "message")]
    #[assoc(is_single_slot = false)]
    Message,
    #[assoc(name = "alert")]
    #[assoc(is_single_slot = false)]
    Alert,
    #[assoc(name = "spin")]
    #[assoc(is_single_slot = true)]
    Spin,
}

impl OverlayFamily {
    pub const ALL: [OverlayFamily; 4] = [Self::Toast, Self::Message, Self::Alert, Self::Spin];
}

/// Per-family defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FamilyConfig {
    /// Auto-dismiss delay used when `show` doesn't set one. Zero disables it.
    pub duration_ms: u64,
    /// Most live entries shown at once. Ignored by single-slot families.
    pub max_stack: Option<usize>,
}

/// A family block as written in JSON. Absent fields keep that family's own default.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FamilyOverrides {
    duration_ms: Option<u64>,
    /// `null` lifts the cap, a missing key keeps the default one.
    #[serde(default, deserialize_with = "present")]
    max_stack: Option<Option<usize>>,
}

fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Option<usize>>, D::Error> {
    Option::<usize>::deserialize(deserializer).map(Some)
}

impl FamilyOverrides {
    fn apply(self, mut base: FamilyConfig) -> FamilyConfig {
        if let Some(duration_ms) = self.duration_ms {
            base.duration_ms = duration_ms;
        }
        if let Some(max_stack) = self.max_stack {
            base.max_stack = max_stack;
        }
        base
    }
}

macro_rules! family_block {
    ($name:ident, $field:ident) => {
        fn $name<'de, D: Deserializer<'de>>(deserializer: D) -> Result<FamilyConfig, D::Error> {
            FamilyOverrides::deserialize(deserializer)
                .map(|overrides| overrides.apply(OverlayConfig::default().$field))
        }
    };
}

family_block!(toast_block, toast);
family_block!(message_block, message);
family_block!(alert_block, alert);
family_block!(spin_block, spin);

impl FamilyConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

#[derive(Error, Debug)]
pub enum OverlayConfigError {
    #[error("overlay config is malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("max_stack for {family} must be at least 1")]
    EmptyStack { family: &'static str },
}

/// Timing and stacking settings for every overlay family.
///
/// ```json
/// { "exit_duration_ms": 150, "message": { "duration_ms": 2000, "max_stack": 5 } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// How long an entry stays mounted in `Leaving` before it is dropped.
    pub exit_duration_ms: u64,
    #[serde(deserialize_with = "toast_block")]
    pub toast: FamilyConfig,
    #[serde(deserialize_with = "message_block")]
    pub message: FamilyConfig,
    #[serde(deserialize_with = "alert_block")]
    pub alert: FamilyConfig,
    #[serde(deserialize_with = "spin_block")]
    pub spin: FamilyConfig,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            exit_duration_ms: 200,
            toast: FamilyConfig {
                duration_ms: 3000,
                max_stack: None,
            },
            message: FamilyConfig {
                duration_ms: 3000,
                max_stack: Some(8),
            },
            alert: FamilyConfig {
                duration_ms: 4500,
                max_stack: None,
            },
            spin: FamilyConfig {
                duration_ms: 0,
                max_stack: None,
            },
        }
    }
}

impl OverlayConfig {
    pub fn from_json(json: &str) -> Result<Self, OverlayConfigError> {
        let config: Self = serde_json::from_str(json)?;

        for family in OverlayFamily::ALL {
            if config.family(family).max_stack == Some(0) {
                return Err(OverlayConfigError::EmptyStack {
                    family: family.name(),
                });
            }
        }

        Ok(config)
    }

    pub fn family(&self, family: OverlayFamily) -> &FamilyConfig {
        match family {
            OverlayFamily::Toast => &self.toast,
            OverlayFamily::Message => &self.message,
            OverlayFamily::Alert => &self.alert,
            OverlayFamily::Spin => &self.spin,
        }
    }

    pub fn exit_duration(&self) -> Duration {
        Duration::from_millis(self.exit_duration_ms)
    }

    /// How many live entries `family` may hold.
    pub fn capacity(&self, family: OverlayFamily) -> Option<usize> {
        if family.is_single_slot() {
            Some(1)
        } else {
            self.family(family).max_stack
        }
    }
}
