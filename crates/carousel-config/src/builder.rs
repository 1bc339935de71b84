//! Final slider configuration
//!
//! Turns an augmented [`AttributeConfig`] into the [`SliderConfig`] handed to
//! the slider engine: engine defaults underneath, bare module flags expanded
//! into option objects, and the list of modules the engine must load.

use carousel_dom::{ElementTree, NodeId};
use serde::Serialize;

use crate::compiler::{AttributeCompiler, AttributeConfig};
use crate::keys::Module;
use crate::names::AttributeNames;
use crate::structure::{NavigationElements, StructuralAugmenter, StructuralHints};
use crate::value::{ConfigMap, Value};

/// Configuration handed to the slider engine
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SliderConfig {
    #[serde(flatten)]
    pub options: ConfigMap,
    pub modules: Vec<Module>,
}

impl SliderConfig {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.options.get(key)
    }

    /// Follow a key path through nested objects
    pub fn get_path(&self, path: &[&str]) -> Option<&Value> {
        let (first, rest) = path.split_first()?;
        rest.iter()
            .try_fold(self.options.get(*first)?, |value, key| value.as_object()?.get(*key))
    }

    /// Whether `key` is present and switched on, honouring `enabled` inside
    /// a module options object
    pub fn is_enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(Value::is_enabled)
    }

    pub fn requires(&self, module: Module) -> bool {
        self.modules.contains(&module)
    }
}

/// Where the slider engine mounts an instance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mount {
    pub container: NodeId,
    pub wrapper: Option<NodeId>,
    pub slide_count: usize,
}

impl Mount {
    pub fn new(container: NodeId, hints: &StructuralHints) -> Self {
        Self {
            container,
            wrapper: hints.wrapper,
            slide_count: hints.slide_count,
        }
    }
}

/// Engine defaults underneath every compiled configuration
pub fn default_options() -> ConfigMap {
    let mut a11y = ConfigMap::new();
    a11y.insert("enabled".into(), Value::Bool(true));

    let mut options = ConfigMap::new();
    options.insert("slidesPerView".into(), Value::from("auto"));
    options.insert("spaceBetween".into(), Value::Number(0.0));
    options.insert("a11y".into(), Value::Object(a11y));
    options
}

/// Options a module gets when it was switched on with a bare `true`
fn expanded_defaults(module: Module) -> Option<ConfigMap> {
    let fields = match module {
        Module::Autoplay => vec![
            ("delay", Value::Number(3000.0)),
            ("disableOnInteraction", Value::Bool(false)),
        ],
        Module::FreeMode => vec![("enabled", Value::Bool(true)), ("momentum", Value::Bool(true))],
        Module::Keyboard | Module::Mousewheel => vec![("enabled", Value::Bool(true))],
        _ => return None,
    };
    Some(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

/// Builds [`SliderConfig`]s on top of a set of defaults
#[derive(Debug, Clone)]
pub struct SliderConfigBuilder {
    defaults: ConfigMap,
}

impl SliderConfigBuilder {
    pub fn new() -> Self {
        Self {
            defaults: default_options(),
        }
    }

    /// Replace the defaults. Keys missing from `defaults` are simply not
    /// defaulted.
    pub fn with_defaults(defaults: ConfigMap) -> Self {
        Self { defaults }
    }

    pub fn defaults(&self) -> &ConfigMap {
        &self.defaults
    }

    pub fn build(&self, config: AttributeConfig) -> SliderConfig {
        let mut options = self.defaults.clone();
        options.extend(config.into_entries());

        for module in [
            Module::Autoplay,
            Module::FreeMode,
            Module::Keyboard,
            Module::Mousewheel,
        ] {
            let key = module.config_key();
            if matches!(options.get(key), Some(Value::Bool(true))) {
                if let Some(expanded) = expanded_defaults(module) {
                    options.insert(key.to_string(), Value::Object(expanded));
                }
            }
        }

        let modules = required_modules(&options);
        SliderConfig { options, modules }
    }
}

impl Default for SliderConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Modules the slider engine has to load for `options`
pub fn required_modules(options: &ConfigMap) -> Vec<Module> {
    let mut modules: Vec<Module> = Module::KEYED
        .iter()
        .copied()
        .filter(|m| options.get(m.config_key()).is_some_and(Value::is_truthy))
        .collect();

    if let Some(effect) = options
        .get("effect")
        .and_then(Value::as_str)
        .and_then(Module::from_effect)
    {
        modules.push(effect);
    }

    modules.push(Module::A11y);
    modules
}

/// Everything needed to construct one slider
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledContainer {
    pub config: SliderConfig,
    pub mount: Mount,
    /// Attribute names that were skipped as unrecognized
    pub unrecognized: Vec<String>,
}

/// Compile, augment and build one container in a single pass
#[derive(Debug, Clone)]
pub struct ContainerPipeline<'a> {
    names: &'a AttributeNames,
    builder: &'a SliderConfigBuilder,
    debug: bool,
}

impl<'a> ContainerPipeline<'a> {
    pub fn new(names: &'a AttributeNames, builder: &'a SliderConfigBuilder) -> Self {
        Self {
            names,
            builder,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Run the pipeline for `container`. Reads the current attributes every
    /// time; nothing is cached between calls.
    pub fn run<T: ElementTree + ?Sized>(
        &self,
        tree: &mut T,
        container: NodeId,
        instance_name: &str,
        external: NavigationElements,
    ) -> CompiledContainer {
        let mut attributes = AttributeCompiler::new(self.names)
            .with_debug(self.debug)
            .compile(&*tree, container);

        let hints = StructuralAugmenter::new(self.names)
            .with_debug(self.debug)
            .augment(tree, container, instance_name, &mut attributes, external);

        let unrecognized = attributes.unrecognized().to_vec();
        let config = self.builder.build(attributes);
        if self.debug {
            tracing::debug!("{}: modules {:?}", instance_name, config.modules);
        }

        CompiledContainer {
            config,
            mount: Mount::new(container, &hints),
            unrecognized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pairs: &[(&str, &str)]) -> SliderConfig {
        let names = AttributeNames::default();
        let compiled = AttributeCompiler::new(&names).compile_pairs(pairs.iter().copied());
        SliderConfigBuilder::new().build(compiled)
    }

    #[test]
    fn test_defaults_apply() {
        let config = build(&[]);
        assert_eq!(config.get("slidesPerView"), Some(&Value::from("auto")));
        assert_eq!(config.get("spaceBetween"), Some(&Value::Number(0.0)));
        assert_eq!(config.get_path(&["a11y", "enabled"]), Some(&Value::Bool(true)));
        assert_eq!(config.modules, vec![Module::A11y]);
    }

    #[test]
    fn test_compiled_keys_replace_defaults() {
        let config = build(&[("se-slides-per-view", "3"), ("se-space-between", "16")]);
        assert_eq!(config.get("slidesPerView"), Some(&Value::Number(3.0)));
        assert_eq!(config.get("spaceBetween"), Some(&Value::Number(16.0)));
    }

    #[test]
    fn test_bare_autoplay_expands() {
        let config = build(&[("se-autoplay", "")]);
        assert_eq!(config.get_path(&["autoplay", "delay"]), Some(&Value::Number(3000.0)));
        assert_eq!(
            config.get_path(&["autoplay", "disableOnInteraction"]),
            Some(&Value::Bool(false))
        );
        assert!(config.requires(Module::Autoplay));
    }

    #[test]
    fn test_autoplay_object_not_expanded() {
        let config = build(&[("se-autoplay", ""), ("se-autoplay-delay", "5000")]);
        assert_eq!(config.get_path(&["autoplay", "delay"]), Some(&Value::Number(5000.0)));
        assert_eq!(config.get_path(&["autoplay", "disableOnInteraction"]), None);
    }

    #[test]
    fn test_free_mode_expands() {
        let config = build(&[("se-free-mode", "true")]);
        assert_eq!(config.get_path(&["freeMode", "momentum"]), Some(&Value::Bool(true)));
        assert!(config.requires(Module::FreeMode));
    }

    #[test]
    fn test_disabled_module_not_required() {
        let config = build(&[("se-keyboard", "false"), ("se-loop", "")]);
        assert_eq!(config.get("keyboard"), Some(&Value::Bool(false)));
        assert!(!config.requires(Module::Keyboard));
    }

    #[test]
    fn test_disabled_module_object_is_not_enabled() {
        let config = build(&[("se-autoplay", "false"), ("se-autoplay-delay", "5000")]);
        assert_eq!(config.get_path(&["autoplay", "delay"]), Some(&Value::Number(5000.0)));
        assert!(!config.is_enabled("autoplay"));

        let config = build(&[("se-autoplay", ""), ("se-autoplay-delay", "5000")]);
        assert!(config.is_enabled("autoplay"));
    }

    #[test]
    fn test_effect_module_required() {
        let config = build(&[("se-effect", "coverflow")]);
        assert!(config.requires(Module::Coverflow));
        assert!(config.requires(Module::A11y));
    }

    #[test]
    fn test_unknown_effect_ignored() {
        let config = build(&[("se-effect", "slide")]);
        assert_eq!(config.modules, vec![Module::A11y]);
    }

    #[test]
    fn test_serializes_flat_with_modules() {
        let config = build(&[("se-speed", "300"), ("se-parallax", "")]);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["speed"], serde_json::json!(300));
        assert_eq!(json["modules"], serde_json::json!(["Parallax", "A11y"]));
    }
}
