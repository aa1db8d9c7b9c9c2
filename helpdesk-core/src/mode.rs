use std::fmt;

use serde::Serialize;

/// Used when `DEMO_MODE` is unset or blank.
pub const DEFAULT_MODE: Mode = Mode::Demo;

/// Response strategy for every request handled by this process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Canned keyword answers, no external calls.
    Mock,
    /// Completion API behind a per-identity daily quota.
    Demo,
    /// Authenticated mode; not implemented.
    Production,
}

/// Outcome of resolving a raw mode value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeResolution {
    pub mode: Mode,
    /// `false` when the value was not a known mode and fell through to production.
    pub recognized: bool,
}

impl Mode {
    /// Map a raw config value to a mode. Unknown values resolve to
    /// [`Mode::Production`] with `recognized == false`.
    pub fn resolve(raw: Option<&str>) -> ModeResolution {
        let value = raw.map(str::trim).filter(|value| !value.is_empty());

        let Some(value) = value else {
            return ModeResolution {
                mode: DEFAULT_MODE,
                recognized: true,
            };
        };

        match value {
            "mock" => ModeResolution {
                mode: Self::Mock,
                recognized: true,
            },
            "demo" => ModeResolution {
                mode: Self::Demo,
                recognized: true,
            },
            "production" => ModeResolution {
                mode: Self::Production,
                recognized: true,
            },
            _ => ModeResolution {
                mode: Self::Production,
                recognized: false,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Demo => "demo",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_values_resolve() {
        assert_eq!(Mode::resolve(Some("mock")).mode, Mode::Mock);
        assert_eq!(Mode::resolve(Some("demo")).mode, Mode::Demo);
        assert_eq!(Mode::resolve(Some("production")).mode, Mode::Production);
        assert!(Mode::resolve(Some("production")).recognized);
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        let resolved = Mode::resolve(Some(" mock\n"));
        assert_eq!(resolved.mode, Mode::Mock);
        assert!(resolved.recognized);
    }

    #[test]
    fn unset_or_blank_uses_default() {
        assert_eq!(Mode::resolve(None).mode, Mode::Demo);
        assert_eq!(Mode::resolve(Some("   ")).mode, Mode::Demo);
        assert!(Mode::resolve(None).recognized);
    }

    #[test]
    fn unknown_values_fall_through_to_production() {
        for raw in ["Mock", "staging", "dmeo"] {
            let resolved = Mode::resolve(Some(raw));
            assert_eq!(resolved.mode, Mode::Production, "{raw}");
            assert!(!resolved.recognized, "{raw}");
        }
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mode::Mock).unwrap(), "\"mock\"");
        assert_eq!(Mode::Production.to_string(), "production");
    }
}
