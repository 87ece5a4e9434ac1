//! Ensemble configuration and plugin registration.
//!
//! ## Example
//!
//! ```json
//! { "loo-limit": 15, "folds": 5, "seed": 7, "fragment-window": 1 }
//! ```

use crate::error::{Error, Result};
use crate::muse::MuseFactory;
use crate::theory::Theory;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

/// Below this many examples the ensemble cross-validates by leave-one-out.
pub const DEFAULT_LOO_LIMIT: usize = 15;
/// Default fold count for k-fold cross-validation.
pub const DEFAULT_FOLDS: usize = 5;
/// Default window width of the standard fragment theory.
pub const DEFAULT_FRAGMENT_WINDOW: usize = 1;

/// Numeric knobs shared by every ensemble spawned from one root.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct Config {
    /// Example count at which cross-validation switches from leave-one-out to k-fold.
    pub loo_limit: usize,
    /// Number of folds for k-fold cross-validation.
    pub folds: usize,
    /// Seed for the k-fold shuffle.
    pub seed: u64,
    /// Window width of the standard fragment theory.
    pub fragment_window: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            loo_limit: DEFAULT_LOO_LIMIT,
            folds: DEFAULT_FOLDS,
            seed: 0,
            fragment_window: DEFAULT_FRAGMENT_WINDOW,
        }
    }
}

impl Config {
    /// Parses a configuration from JSON; missing keys take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values no ensemble can run with, such as fewer than two folds.
    pub fn validate(&self) -> Result<()> {
        if self.folds < 2 {
            return Err(Error::Config(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if self.fragment_window == 0 {
            return Err(Error::Config(String::from(
                "fragment-window must be at least 1",
            )));
        }
        Ok(())
    }
}

/// Builds one plugin theory for a freshly spawned ensemble.
///
/// The factory is handed the [`MuseFactory`] so plugin theories can spawn nested ensembles of
/// their own.
pub type PluginFactory = Arc<dyn Fn(&MuseFactory) -> Box<dyn Theory> + Send + Sync>;

/// Leaf theories contributed by external code, appended to every ensemble after the standard
/// ones.
#[derive(Clone, Default)]
pub struct Registry {
    plugins: Vec<PluginFactory>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a plugin factory, called once for every ensemble spawned.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn(&MuseFactory) -> Box<dyn Theory> + Send + Sync + 'static,
    {
        self.plugins.push(Arc::new(factory));
    }

    /// Drops every registered plugin, e.g. between independent runs.
    pub fn clear(&mut self) {
        self.plugins.clear();
    }

    /// Number of registered plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub(crate) fn plugins(&self) -> &[PluginFactory] {
        &self.plugins
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("plugins", &self.plugins.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theories::SimpleTheory;

    #[test]
    fn parse_partial_json() {
        let config = Config::from_json(r#"{"seed": 9, "fragment-window": 2}"#).unwrap();
        assert_eq!(config.seed, 9);
        assert_eq!(config.fragment_window, 2);
        assert_eq!(config.folds, DEFAULT_FOLDS);
        assert_eq!(config.loo_limit, DEFAULT_LOO_LIMIT);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{"folds": 1}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"fragment-window": 0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(Config::from_json("{"), Err(Error::Json(_))));
    }

    #[test]
    fn register_and_clear() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.register(|_| Box::new(SimpleTheory::identity()));
        registry.register(|_| Box::new(SimpleTheory::upper()));
        assert_eq!(registry.len(), 2);
        registry.clear();
        assert!(registry.is_empty());
    }
}
