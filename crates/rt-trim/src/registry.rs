//! Construct-by-name table of trim strategies.

use crate::dictionary::Dictionary;
use crate::error::{ConfigError, TrimResult};
use crate::fixed::{self, FixedTrim};
use crate::strategy::{TrimContext, TrimStrategy};
use crate::target_coeff::{self, TargetCoeffTrim};
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Builds an unconfigured strategy; the registry calls `read` afterwards.
pub type StrategyCtor = fn(TrimContext) -> Box<dyn TrimStrategy>;

/// Keyword under which a rotor dictionary names its trim strategy.
pub const TRIM_MODEL_KEY: &str = "trimModel";

#[derive(Clone, Default)]
pub struct TrimRegistry {
    ctors: BTreeMap<String, StrategyCtor>,
}

impl TrimRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry with the built-in strategies.
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.register(target_coeff::TYPE_NAME, TargetCoeffTrim::boxed);
        registry.register(fixed::TYPE_NAME, FixedTrim::boxed);
        registry
    }

    /// Process-wide registry with the built-in strategies.
    pub fn global() -> &'static TrimRegistry {
        static GLOBAL: OnceLock<TrimRegistry> = OnceLock::new();
        GLOBAL.get_or_init(TrimRegistry::with_defaults)
    }

    /// Add or replace a strategy. Returns the constructor it replaced.
    pub fn register(&mut self, name: impl Into<String>, ctor: StrategyCtor) -> Option<StrategyCtor> {
        self.ctors.insert(name.into(), ctor)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.ctors.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.ctors.keys().map(String::as_str)
    }

    /// Construct the strategy registered as `name` and read its coefficients.
    pub fn new_strategy(
        &self,
        name: &str,
        ctx: TrimContext,
        dict: &Dictionary,
    ) -> TrimResult<Box<dyn TrimStrategy>> {
        let ctor = self
            .ctors
            .get(name)
            .ok_or_else(|| ConfigError::UnknownStrategy {
                name: name.to_string(),
                known: self.names().map(str::to_string).collect(),
            })?;

        let mut strategy = ctor(ctx);
        strategy.read(dict)?;
        tracing::debug!(model = name, "trim strategy selected");
        Ok(strategy)
    }

    /// Construct the strategy named by the `trimModel` entry of `dict`.
    pub fn select(&self, ctx: TrimContext, dict: &Dictionary) -> TrimResult<Box<dyn TrimStrategy>> {
        let name: String = dict.lookup(TRIM_MODEL_KEY)?;
        self.new_strategy(&name, ctx, dict)
    }
}
