//! Rendering tables keyed by observed compiler output.
//!
//! Which spellings mean "anonymous namespace" and which namespace segments
//! are stdlib-internal noise is compiler- and platform-specific, and the
//! built-in set is not exhaustive. New spellings are data, not code: drop a
//! `config.yaml` next to the other app data and the parser never needs to
//! change.

use once_cell::sync::Lazy;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;

pub static CONFIG: Lazy<Config> = Lazy::new(Config::parse);

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Exact-match identifier substitutions applied during rendering.
    #[serde(default = "defaults::aliases")]
    pub aliases: FxHashMap<String, String>,

    /// Identifiers suppressed entirely, together with their `::`.
    #[serde(default = "defaults::noise")]
    pub noise: FxHashSet<String>,
}

impl Config {
    pub fn parse() -> Self {
        let Some(mut path) = dirs::data_dir() else {
            return defaults::config();
        };
        path.push("prettify");
        path.push("config.yaml");

        let raw = std::fs::read_to_string(&path).unwrap_or_default();
        if raw.is_empty() {
            return defaults::config();
        }

        match serde_yaml::from_str(&raw) {
            Ok(parsed) => parsed,
            Err(err) => {
                log::warn!("failed to parse {}: {err}", path.display());

                // render with the built-in tables instead
                defaults::config()
            }
        }
    }
}

pub mod defaults {
    use super::{Config, FxHashMap, FxHashSet};

    /// Anonymous-namespace spellings observed from GCC, Clang and MSVC,
    /// plus the MSVC lambda call-type marker.
    const ALIASES: &[(&str, &str)] = &[
        ("(anonymous namespace)", "{anon-ns}"),
        ("anonymous namespace", "{anon-ns}"),
        ("{anonymous namespace}", "{anon-ns}"),
        ("{anonymous}", "{anon-ns}"),
        ("`anonymous namespace'", "{anon-ns}"),
        ("<lambda>", "lambda"),
    ];

    /// Internal stdlib namespace segments: libc++'s versioning namespace
    /// and libstdc++'s ABI namespace.
    const NOISE: &[&str] = &["__1", "__cxx11"];

    pub fn aliases() -> FxHashMap<String, String> {
        ALIASES
            .iter()
            .map(|&(spelling, canonical)| (spelling.to_owned(), canonical.to_owned()))
            .collect()
    }

    pub fn noise() -> FxHashSet<String> {
        NOISE.iter().map(|&segment| segment.to_owned()).collect()
    }

    pub fn config() -> Config {
        Config {
            aliases: aliases(),
            noise: noise(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables() {
        let config = defaults::config();
        assert_eq!(config.aliases.get("{anonymous}").unwrap(), "{anon-ns}");
        assert_eq!(
            config.aliases.get("(anonymous namespace)").unwrap(),
            "{anon-ns}"
        );
        assert!(config.noise.contains("__cxx11"));
    }

    #[test]
    fn overrides_deserialize() {
        let raw = "aliases:\n  '<unnamed>': '{anon-ns}'\nnoise: ['__detail']\n";
        let config: Config = serde_yaml::from_str(raw).unwrap();
        assert_eq!(config.aliases.get("<unnamed>").unwrap(), "{anon-ns}");
        assert!(config.noise.contains("__detail"));
        // explicit tables replace the defaults
        assert!(!config.noise.contains("__1"));
    }

    #[test]
    fn partial_overrides_keep_defaults() {
        let raw = "noise: ['__gnu_cxx']\n";
        let config: Config = serde_yaml::from_str(raw).unwrap();
        assert!(config.noise.contains("__gnu_cxx"));
        assert_eq!(config.aliases.get("{anonymous}").unwrap(), "{anon-ns}");
    }
}
