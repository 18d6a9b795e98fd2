// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Debug switches consulted on hot paths.
//!
//! All of them live in one immutable [`DebugConfig`] owned by the
//! [`ActorStore`](crate::actor::ActorStore). Replace it wholesale with
//! [`ActorStore::set_debug_config`](crate::actor::ActorStore::set_debug_config).

/// Environment variable read by [`DebugConfig::from_env`].
pub const DEBUG_ENV_VAR: &str = "PROSCENIUM_DEBUG";

/// Process-wide debug switches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DebugConfig {
    /// Never skip painting an actor because its volume is off screen.
    pub disable_culling: bool,
    /// Always redraw the whole stage instead of accumulating clips.
    pub disable_clipped_redraws: bool,
    /// Outline each actor's paint volume while painting.
    pub paint_volumes: bool,
    /// Tint each accumulated redraw clip while painting.
    pub redraws: bool,
    /// Check the map/realize invariants after every state change.
    pub verify_map_state: bool,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            disable_culling: false,
            disable_clipped_redraws: false,
            paint_volumes: false,
            redraws: false,
            verify_map_state: cfg!(debug_assertions),
        }
    }
}

impl DebugConfig {
    /// All switches off, including map-state verification.
    pub const RELEASE: Self = Self {
        disable_culling: false,
        disable_clipped_redraws: false,
        paint_volumes: false,
        redraws: false,
        verify_map_state: false,
    };

    /// Parses a comma- or whitespace-separated list of flag names on top of
    /// [`DebugConfig::default`].
    ///
    /// Recognized flags: `disable-culling`, `disable-clipped-redraws`,
    /// `paint-volumes`, `redraws`, `verify-map-state`,
    /// `no-verify-map-state`. Unknown flags are logged and ignored.
    #[must_use]
    pub fn from_flags_str(flags: &str) -> Self {
        let mut config = Self::default();
        for flag in flags
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
        {
            match flag {
                "disable-culling" => config.disable_culling = true,
                "disable-clipped-redraws" => config.disable_clipped_redraws = true,
                "paint-volumes" => config.paint_volumes = true,
                "redraws" => config.redraws = true,
                "verify-map-state" => config.verify_map_state = true,
                "no-verify-map-state" => config.verify_map_state = false,
                other => tracing::warn!(flag = other, "unknown debug flag"),
            }
        }
        config
    }

    /// Reads [`DEBUG_ENV_VAR`], falling back to the defaults when unset.
    #[must_use]
    pub fn from_env() -> Self {
        match std::env::var(DEBUG_ENV_VAR) {
            Ok(flags) => Self::from_flags_str(&flags),
            Err(_) => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_is_default() {
        assert_eq!(DebugConfig::from_flags_str(""), DebugConfig::default());
    }

    #[test]
    fn parses_known_flags() {
        let c = DebugConfig::from_flags_str("disable-culling, paint-volumes no-verify-map-state");
        assert!(c.disable_culling);
        assert!(c.paint_volumes);
        assert!(!c.disable_clipped_redraws);
        assert!(!c.verify_map_state);
    }

    #[test]
    fn unknown_flags_are_ignored() {
        let c = DebugConfig::from_flags_str("bogus,redraws");
        assert!(c.redraws);
    }
}
