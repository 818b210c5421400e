//! Render-time configuration surface (spec §3.3, §6).

use crate::filters::FilterFn;
use std::collections::HashMap;

/// Policy flags and custom-filter overrides consumed by the evaluator.
///
/// This is the entire external configuration surface of the engine: there
/// is no file format, environment variable, or CLI, mirroring the teacher's
/// `ParserConfig`/`with_settings` builder shape but scaled to the two flags
/// and one map the spec actually names.
#[derive(Clone, Default)]
pub struct Options {
    /// If true, looking up an undefined variable is a fatal error rather
    /// than resolving to `Value::Null`.
    pub strict_variables: bool,
    /// If true, invoking an unregistered filter is a fatal error rather
    /// than a no-op.
    pub strict_filters: bool,
    /// User-supplied filters, consulted before built-ins.
    pub custom_filters: HashMap<String, FilterFn>,
}

impl Options {
    /// Starts from all-lax defaults with no custom filters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `strict_variables`.
    pub fn with_strict_variables(mut self, strict: bool) -> Self {
        self.strict_variables = strict;
        self
    }

    /// Sets `strict_filters`.
    pub fn with_strict_filters(mut self, strict: bool) -> Self {
        self.strict_filters = strict;
        self
    }

    /// Registers a custom filter, shadowing any built-in of the same name.
    pub fn with_filter(mut self, name: impl Into<String>, f: FilterFn) -> Self {
        self.custom_filters.insert(name.into(), f);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lax() {
        let opts = Options::new();
        assert!(!opts.strict_variables);
        assert!(!opts.strict_filters);
        assert!(opts.custom_filters.is_empty());
    }

    #[test]
    fn builder_sets_flags() {
        let opts = Options::new()
            .with_strict_variables(true)
            .with_strict_filters(true);
        assert!(opts.strict_variables);
        assert!(opts.strict_filters);
    }
}
