//! Carousel config - declarative attribute compiler
//!
//! Turns the prefixed attributes on a carousel container (`se-speed="300"`,
//! `se-autoplay-delay="5000"`, `se-breakpoints.768.slides-per-view="2"`) into
//! the nested configuration object a slider engine expects, then fills in
//! what the surrounding markup implies.
//!
//! ```text
//! attributes --decode/resolve--> AttributeConfig --augment--> --build--> SliderConfig
//! ```

mod builder;
mod compiler;
mod keys;
mod names;
mod structure;
mod value;

pub use builder::{
    default_options, required_modules, CompiledContainer, ContainerPipeline, Mount, SliderConfig,
    SliderConfigBuilder,
};
pub use compiler::{AttributeCompiler, AttributeConfig, ModuleBucket, ModuleConfig};
pub use keys::{resolve_key, to_camel_case, Module, ResolvedKey, DIRECT_KEYS};
pub use names::{AttributeNames, NavMarker};
pub use structure::{
    annotate, apply_classes, referenced_elements, ClassConvention, NavigationElements,
    StructuralAugmenter, StructuralHints, DEFAULT_WRAPPER_CLASS,
};
pub use value::{decode, ConfigMap, Value};
