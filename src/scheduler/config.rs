/*
 * OTHER_RR Configuration
 *
 * The class has one tunable: the quantum, i.e. how many timer ticks a task
 * may run before it is rotated to the tail of its run queue. The value is
 * fixed when the class is constructed and handed to the tick handler through
 * the class instance; nothing reads it from mutable global state.
 *
 * The quantum can be given on the kernel command line:
 *
 *     console=ttyS0 other_rr.quantum=5
 *
 * A quantum of 0 disables forced rotation entirely.
 */

use super::error::ConfigError;
use super::types::TimeSliceTicks;

/// Default quantum in ticks
pub const DEFAULT_QUANTUM: TimeSliceTicks = TimeSliceTicks::DEFAULT;

/// Largest accepted quantum (10s @ 100Hz)
pub const MAX_QUANTUM: u32 = 1000;

const CMDLINE_PREFIX: &str = "other_rr.";

/// Immutable OTHER_RR configuration
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SchedConfig {
    quantum: TimeSliceTicks,
}

impl SchedConfig {
    pub const DEFAULT: SchedConfig = SchedConfig {
        quantum: DEFAULT_QUANTUM,
    };

    /// Build a configuration with the given quantum
    ///
    /// Values above [`MAX_QUANTUM`] are clamped; use [`SchedConfig::try_with_quantum`]
    /// to reject them instead.
    pub const fn with_quantum(ticks: u32) -> Self {
        let ticks = if ticks > MAX_QUANTUM { MAX_QUANTUM } else { ticks };
        Self {
            quantum: TimeSliceTicks(ticks),
        }
    }

    pub fn try_with_quantum(ticks: u32) -> Result<Self, ConfigError> {
        if ticks > MAX_QUANTUM {
            return Err(ConfigError::QuantumTooLarge);
        }
        Ok(Self::with_quantum(ticks))
    }

    /// Ticks before forced rotation (0 = never)
    pub const fn quantum(&self) -> TimeSliceTicks {
        self.quantum
    }

    /// Parse `other_rr.*` parameters out of a kernel command line
    ///
    /// Words not starting with `other_rr.` belong to other subsystems and are
    /// skipped. Without any `other_rr.quantum` the default is kept; if it is
    /// given more than once the last one wins.
    pub fn from_cmdline(cmdline: &str) -> Result<Self, ConfigError> {
        let mut config = Self::DEFAULT;

        for word in cmdline.split_whitespace() {
            let Some(param) = word.strip_prefix(CMDLINE_PREFIX) else {
                continue;
            };
            let (key, value) = param.split_once('=').ok_or(ConfigError::MissingValue)?;
            match key {
                "quantum" => {
                    let ticks = value
                        .parse::<u32>()
                        .map_err(|_| ConfigError::InvalidNumber)?;
                    config = Self::try_with_quantum(ticks)?;
                }
                _ => return Err(ConfigError::UnknownKey),
            }
        }

        log::debug!("[OtherRR] config: quantum={} ticks", config.quantum.get());
        Ok(config)
    }
}

impl Default for SchedConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
