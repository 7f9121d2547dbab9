// Per-class EDCA contention parameters and the effective-window formula

use std::fmt;

/// Access category of a contending node.
///
/// Behavior differs only in parameter values, never in logic, so this is a
/// plain label attached to each node rather than a subtype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessClass {
    Ap,
    Sta,
}

impl fmt::Display for AccessClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessClass::Ap => write!(f, "AP"),
            AccessClass::Sta => write!(f, "STA"),
        }
    }
}

/// Immutable per-class contention configuration.
///
/// `aifs` is the number of idle slots the class must observe before it may
/// join the countdown; `cw_min`/`cw_max` bound the contention window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentionParams {
    aifs: u32,
    cw_min: u32,
    cw_max: u32,
}

impl ContentionParams {
    /// Validates `cw_min <= cw_max` before any simulation state exists.
    pub fn new(class: AccessClass, aifs: u32, cw_min: u32, cw_max: u32) -> Result<Self, ConfigError> {
        if cw_min > cw_max {
            return Err(ConfigError::WindowBounds {
                class,
                cw_min,
                cw_max,
            });
        }
        Ok(Self {
            aifs,
            cw_min,
            cw_max,
        })
    }

    pub fn aifs(&self) -> u32 {
        self.aifs
    }

    pub fn cw_min(&self) -> u32 {
        self.cw_min
    }

    pub fn cw_max(&self) -> u32 {
        self.cw_max
    }

    /// Effective contention window after `fail_streak` consecutive failures:
    /// `min(cw_max, (cw_min + 1) * 2^fail_streak - 1)`.
    ///
    /// The doubling saturates so an unbounded streak clamps at `cw_max`
    /// instead of overflowing. Holds for the initial draw (`fail_streak = 0`,
    /// where it reduces to `cw_min`), after every success and after every
    /// failure.
    pub fn effective_cw(&self, fail_streak: u32) -> u32 {
        // 2^33 - 1 already exceeds any u32 cw_max, so capping the shift
        // cannot change the clamped result
        let grown = (u64::from(self.cw_min) + 1)
            .saturating_mul(1u64 << fail_streak.min(32))
            - 1;
        grown.min(u64::from(self.cw_max)) as u32
    }
}

/// Errors raised while assembling a simulation configuration.
///
/// All of these abort before any node is created; nothing inside a running
/// simulation is fallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Contention window bounds are inverted for a class
    WindowBounds {
        class: AccessClass,
        cw_min: u32,
        cw_max: u32,
    },

    /// The population contains no collision domain at all
    NoGroups,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::WindowBounds {
                class,
                cw_min,
                cw_max,
            } => write!(
                f,
                "{} contention window is inverted: cw_min {} > cw_max {}",
                class, cw_min, cw_max
            ),
            ConfigError::NoGroups => write!(f, "simulation needs at least one group"),
        }
    }
}

impl std::error::Error for ConfigError {}
