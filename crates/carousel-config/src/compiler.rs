//! Attribute compiler
//!
//! Walks the prefixed attributes of one container and assembles the nested
//! configuration object. Nothing here fails: malformed values decode to
//! strings and unknown keys are skipped with a warning.
//!
//! Duplicate spellings of one key resolve last-wins in attribute order. Hosts
//! do not all report attributes in the same order, so markup should not rely
//! on conflicting duplicates.

use std::collections::BTreeMap;

use carousel_dom::{ElementTree, NodeId};
use serde::Serialize;

use crate::keys::{resolve_key, Module, ResolvedKey};
use crate::names::AttributeNames;
use crate::value::{decode, ConfigMap, Value};

/// Configuration compiled from one container's attributes
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttributeConfig {
    #[serde(flatten)]
    entries: ConfigMap,
    #[serde(skip)]
    unrecognized: Vec<String>,
}

impl AttributeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Follow a path of nested objects
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.entries.get(*first)?, |value, seg| value.as_object()?.get(*seg))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn insert(&mut self, key: &str, value: Value) -> Option<Value> {
        self.entries.insert(key.to_string(), value)
    }

    /// Assign through nested objects, creating them as needed.
    /// A non-object intermediate is replaced by a fresh object.
    pub fn insert_path(&mut self, path: &[String], value: Value) {
        assign_path(&mut self.entries, path, value);
    }

    pub fn entries(&self) -> &ConfigMap {
        &self.entries
    }

    pub fn into_entries(self) -> ConfigMap {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prefix-stripped names that matched no rule
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}

fn assign_path(map: &mut ConfigMap, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };

    let mut current = map;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(Value::object);
        if !slot.is_object() {
            *slot = Value::object();
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

/// A module's resolved shape: exactly one of a bare value or an object
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleConfig {
    Flag(Value),
    Options(ConfigMap),
}

impl ModuleConfig {
    pub fn into_value(self) -> Value {
        match self {
            ModuleConfig::Flag(value) => value,
            ModuleConfig::Options(map) => Value::Object(map),
        }
    }
}

/// Per-module accumulator used during one container scan
#[derive(Debug, Clone, Default)]
pub struct ModuleBucket {
    flag: Option<Value>,
    options: ConfigMap,
}

impl ModuleBucket {
    pub fn set_flag(&mut self, value: Value) {
        self.flag = Some(value);
    }

    pub fn set_option(&mut self, option: String, value: Value) {
        self.options.insert(option, value);
    }

    /// Collapse to a single shape.
    ///
    /// Flag only: the flag. Options only: the options object. Both: the
    /// options object with `enabled` taken from the flag's truthiness unless
    /// an explicit `enabled` option exists.
    pub fn finish(self) -> ModuleConfig {
        match (self.flag, self.options.is_empty()) {
            (Some(flag), true) => ModuleConfig::Flag(flag),
            (Some(flag), false) => {
                let mut options = self.options;
                options
                    .entry("enabled".to_string())
                    .or_insert(Value::Bool(flag.is_truthy()));
                ModuleConfig::Options(options)
            }
            (None, _) => ModuleConfig::Options(self.options),
        }
    }
}

/// Compiles container attributes into an [`AttributeConfig`]
#[derive(Debug, Clone)]
pub struct AttributeCompiler<'a> {
    names: &'a AttributeNames,
    debug: bool,
}

impl<'a> AttributeCompiler<'a> {
    pub fn new(names: &'a AttributeNames) -> Self {
        Self {
            names,
            debug: false,
        }
    }

    /// Log every decision at debug level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Compile the attributes of `container`
    pub fn compile<T: ElementTree + ?Sized>(&self, tree: &T, container: NodeId) -> AttributeConfig {
        let config = self.compile_pairs(tree.attributes(container));
        if self.debug {
            tracing::debug!(
                "Compiled {} into {} key(s)",
                tree.describe(container),
                config.entries().len()
            );
        }
        config
    }

    /// Compile raw (name, value) pairs in iteration order
    pub fn compile_pairs<I, N, V>(&self, attributes: I) -> AttributeConfig
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = AttributeConfig::new();
        let mut modules: BTreeMap<Module, ModuleBucket> = BTreeMap::new();

        for (name, raw) in attributes {
            let name = name.as_ref();
            let Some(key) = self.names.strip(name) else {
                continue;
            };
            if self.names.is_reserved(key) {
                continue;
            }

            let value = decode(raw.as_ref());
            match resolve_key(key) {
                ResolvedKey::Direct(k) => {
                    if self.debug {
                        tracing::debug!("{} -> {} = {}", name, k, value);
                    }
                    config.insert(&k, value);
                }
                ResolvedKey::ModuleFlag(module) => {
                    if self.debug {
                        tracing::debug!("{} -> {:?} flag = {}", name, module, value);
                    }
                    modules.entry(module).or_default().set_flag(value);
                }
                ResolvedKey::ModuleOption(module, option) => {
                    if self.debug {
                        tracing::debug!("{} -> {:?}.{} = {}", name, module, option, value);
                    }
                    modules.entry(module).or_default().set_option(option, value);
                }
                ResolvedKey::Path(path) => {
                    if self.debug {
                        tracing::debug!("{} -> {} = {}", name, path.join("."), value);
                    }
                    config.insert_path(&path, value);
                }
                ResolvedKey::Unrecognized => {
                    tracing::warn!("Unknown attribute: {}", name);
                    config.unrecognized.push(key.to_string());
                }
            }
        }

        for (module, bucket) in modules {
            merge_module(&mut config, module.config_key(), bucket.finish());
        }

        config
    }
}

/// Merge a resolved module into the config. An options object merges field by
/// field into an object already present under the key (module fields win). A
/// bare flag landing on such an object becomes its `enabled` field unless one
/// is already set; otherwise the module value replaces what was there.
fn merge_module(config: &mut AttributeConfig, key: &str, module: ModuleConfig) {
    if let Some(Value::Object(existing)) = config.get_mut(key) {
        match module {
            ModuleConfig::Options(options) => existing.extend(options),
            ModuleConfig::Flag(flag) => {
                existing
                    .entry("enabled".to_string())
                    .or_insert(Value::Bool(flag.is_truthy()));
            }
        }
        return;
    }
    config.insert(key, module.into_value());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pairs: &[(&str, &str)]) -> AttributeConfig {
        let names = AttributeNames::default();
        AttributeCompiler::new(&names).compile_pairs(pairs.iter().copied())
    }

    #[test]
    fn test_direct_numeric_key() {
        let config = compile(&[("se-speed", "300")]);
        assert_eq!(config.get("speed"), Some(&Value::Number(300.0)));
    }

    #[test]
    fn test_skips_foreign_and_reserved_attributes() {
        let config = compile(&[
            ("class", "hero"),
            ("se-swiper-instances", "hero"),
            ("se-breakpoint", "mobile"),
            ("data-speed", "10"),
        ]);
        assert!(config.is_empty());
        assert!(config.unrecognized().is_empty());
    }

    #[test]
    fn test_module_flag_only() {
        let config = compile(&[("se-keyboard", "")]);
        assert_eq!(config.get("keyboard"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_module_flag_with_options_becomes_object() {
        let config = compile(&[("se-autoplay", ""), ("se-autoplay-delay", "5000")]);
        let autoplay = config.get("autoplay").and_then(Value::as_object).unwrap();
        assert_eq!(autoplay.get("enabled"), Some(&Value::Bool(true)));
        assert_eq!(autoplay.get("delay"), Some(&Value::Number(5000.0)));
        assert_eq!(autoplay.len(), 2);
    }

    #[test]
    fn test_module_options_order_independent() {
        let config = compile(&[("se-autoplay-delay", "5000"), ("se-autoplay", "")]);
        assert!(config.get("autoplay").unwrap().is_object());
    }

    #[test]
    fn test_false_flag_with_options_disables() {
        let config = compile(&[("se-autoplay", "false"), ("se-autoplay-delay", "5000")]);
        assert_eq!(
            config.get_path(&["autoplay", "enabled"]),
            Some(&Value::Bool(false))
        );
    }

    #[test]
    fn test_explicit_enabled_option_wins() {
        let config = compile(&[("se-keyboard", "false"), ("se-keyboard-enabled", "true")]);
        assert_eq!(
            config.get_path(&["keyboard", "enabled"]),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_options_only_module() {
        let config = compile(&[("se-pagination-type", "fraction")]);
        assert_eq!(
            config.get_path(&["pagination", "type"]),
            Some(&Value::String("fraction".into()))
        );
    }

    #[test]
    fn test_effect_module_key() {
        let config = compile(&[("se-effect", "fade"), ("se-fade-cross-fade", "")]);
        assert_eq!(config.get("effect"), Some(&Value::String("fade".into())));
        assert_eq!(
            config.get_path(&["fadeEffect", "crossFade"]),
            Some(&Value::Bool(true))
        );
    }

    #[test]
    fn test_dotted_path() {
        let config = compile(&[
            ("se-breakpoints.768.slides-per-view", "2"),
            ("se-breakpoints.768.space-between", "24"),
        ]);
        assert_eq!(
            config.get_path(&["breakpoints", "768", "slidesPerView"]),
            Some(&Value::Number(2.0))
        );
        assert_eq!(
            config.get_path(&["breakpoints", "768", "spaceBetween"]),
            Some(&Value::Number(24.0))
        );
    }

    #[test]
    fn test_dotted_path_replaces_scalar_intermediate() {
        let config = compile(&[("se-zoom.x", "1"), ("se-zoom.x.y", "2")]);
        assert_eq!(config.get_path(&["zoom", "x", "y"]), Some(&Value::Number(2.0)));
    }

    #[test]
    fn test_dotted_path_merges_with_module_object() {
        let config = compile(&[("se-autoplay.delay", "100"), ("se-autoplay-pause-on-mouse-enter", "")]);
        let autoplay = config.get("autoplay").and_then(Value::as_object).unwrap();
        assert_eq!(autoplay.get("delay"), Some(&Value::Number(100.0)));
        assert_eq!(autoplay.get("pauseOnMouseEnter"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_bare_flag_keeps_dotted_options() {
        let config = compile(&[("se-zoom.max-ratio", "3"), ("se-zoom", "")]);
        let zoom = config.get("zoom").and_then(Value::as_object).unwrap();
        assert_eq!(zoom.get("maxRatio"), Some(&Value::Number(3.0)));
        assert_eq!(zoom.get("enabled"), Some(&Value::Bool(true)));

        let config = compile(&[("se-zoom.max-ratio", "3"), ("se-zoom", "false")]);
        assert_eq!(config.get_path(&["zoom", "enabled"]), Some(&Value::Bool(false)));
        assert_eq!(config.get_path(&["zoom", "maxRatio"]), Some(&Value::Number(3.0)));
    }

    #[test]
    fn test_bare_flag_respects_dotted_enabled() {
        let config = compile(&[("se-zoom.enabled", "false"), ("se-zoom", "")]);
        assert_eq!(config.get_path(&["zoom", "enabled"]), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_unrecognized_is_skipped() {
        let config = compile(&[("se-sped", "300"), ("se-loop", "")]);
        assert_eq!(config.unrecognized(), ["sped".to_string()]);
        assert_eq!(config.get("loop"), Some(&Value::Bool(true)));
        assert!(!config.contains("sped"));
    }

    #[test]
    fn test_duplicate_spelling_last_wins() {
        let config = compile(&[("se-space-between", "10"), ("se-space-between", "20")]);
        assert_eq!(config.get("spaceBetween"), Some(&Value::Number(20.0)));
    }

    #[test]
    fn test_custom_prefix() {
        let names = AttributeNames::new("data-swiper-");
        let config = AttributeCompiler::new(&names)
            .compile_pairs([("data-swiper-speed", "500"), ("se-speed", "1")]);
        assert_eq!(config.get("speed"), Some(&Value::Number(500.0)));
    }
}
