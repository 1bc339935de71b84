//! Key resolution
//!
//! Classifies an attribute name (prefix already stripped) as a direct
//! top-level key, a module flag, a module sub-option, or a dotted path.

use serde::Serialize;

/// Top-level keys assigned as-is after hyphen normalization
pub const DIRECT_KEYS: &[&str] = &[
    "speed",
    "direction",
    "loop",
    "rewind",
    "grab-cursor",
    "centered-slides",
    "slide-to-clicked-slide",
    "auto-height",
    "space-between",
    "initial-slide",
    "css-mode",
    "effect",
    "a11y",
    "parallax",
    "slides-per-view",
    "slides-per-group",
    "allow-touch-move",
    "watch-slides-progress",
];

/// Optional slider engine capabilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Module {
    Navigation,
    Pagination,
    Scrollbar,
    Autoplay,
    FreeMode,
    Keyboard,
    Mousewheel,
    Parallax,
    Zoom,
    Grid,
    Thumbs,
    Virtual,
    #[serde(rename = "EffectFade")]
    Fade,
    #[serde(rename = "EffectCube")]
    Cube,
    #[serde(rename = "EffectCoverflow")]
    Coverflow,
    #[serde(rename = "EffectFlip")]
    Flip,
    #[serde(rename = "EffectCards")]
    Cards,
    #[serde(rename = "EffectCreative")]
    Creative,
    A11y,
}

impl Module {
    /// Modules configurable through `<module>` / `<module>-<option>` attributes
    pub const PREFIXED: &'static [Module] = &[
        Module::Autoplay,
        Module::FreeMode,
        Module::Keyboard,
        Module::Mousewheel,
        Module::Navigation,
        Module::Pagination,
        Module::Scrollbar,
        Module::Grid,
        Module::Zoom,
        Module::Thumbs,
        Module::Virtual,
        Module::Fade,
        Module::Coverflow,
        Module::Cube,
        Module::Flip,
        Module::Cards,
        Module::Creative,
    ];

    /// Modules switched on by a truthy top-level key of the same name
    pub const KEYED: &'static [Module] = &[
        Module::Navigation,
        Module::Pagination,
        Module::Scrollbar,
        Module::Autoplay,
        Module::FreeMode,
        Module::Keyboard,
        Module::Mousewheel,
        Module::Parallax,
        Module::Zoom,
        Module::Grid,
        Module::Thumbs,
        Module::Virtual,
    ];

    /// Attribute spelling, e.g. `free-mode`
    pub fn attribute_name(self) -> &'static str {
        match self {
            Module::Navigation => "navigation",
            Module::Pagination => "pagination",
            Module::Scrollbar => "scrollbar",
            Module::Autoplay => "autoplay",
            Module::FreeMode => "free-mode",
            Module::Keyboard => "keyboard",
            Module::Mousewheel => "mousewheel",
            Module::Parallax => "parallax",
            Module::Zoom => "zoom",
            Module::Grid => "grid",
            Module::Thumbs => "thumbs",
            Module::Virtual => "virtual",
            Module::Fade => "fade",
            Module::Cube => "cube",
            Module::Coverflow => "coverflow",
            Module::Flip => "flip",
            Module::Cards => "cards",
            Module::Creative => "creative",
            Module::A11y => "a11y",
        }
    }

    /// Key in the slider engine configuration, e.g. `freeMode`, `fadeEffect`
    pub fn config_key(self) -> &'static str {
        match self {
            Module::FreeMode => "freeMode",
            Module::Fade => "fadeEffect",
            Module::Cube => "cubeEffect",
            Module::Coverflow => "coverflowEffect",
            Module::Flip => "flipEffect",
            Module::Cards => "cardsEffect",
            Module::Creative => "creativeEffect",
            other => other.attribute_name(),
        }
    }

    /// Effect module named by the `effect` option
    pub fn from_effect(effect: &str) -> Option<Module> {
        match effect {
            "fade" => Some(Module::Fade),
            "cube" => Some(Module::Cube),
            "coverflow" => Some(Module::Coverflow),
            "flip" => Some(Module::Flip),
            "cards" => Some(Module::Cards),
            "creative" => Some(Module::Creative),
            _ => None,
        }
    }
}

/// Outcome of classifying one attribute name
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedKey {
    /// Top-level key, already normalized
    Direct(String),
    /// `<module>` on its own
    ModuleFlag(Module),
    /// `<module>-<option>`, option normalized
    ModuleOption(Module, String),
    /// `a.b-c.d` split into normalized segments
    Path(Vec<String>),
    Unrecognized,
}

/// Classify an attribute name
pub fn resolve_key(name: &str) -> ResolvedKey {
    if DIRECT_KEYS.contains(&name) {
        return ResolvedKey::Direct(to_camel_case(name));
    }

    for &module in Module::PREFIXED {
        let prefix = module.attribute_name();
        if name == prefix {
            return ResolvedKey::ModuleFlag(module);
        }
        if let Some(option) = name.strip_prefix(prefix).and_then(|r| r.strip_prefix('-')) {
            if option.is_empty() {
                return ResolvedKey::Unrecognized;
            }
            return ResolvedKey::ModuleOption(module, to_camel_case(option));
        }
    }

    if name.contains('.') {
        let segments: Vec<String> = name.split('.').map(to_camel_case).collect();
        if segments.iter().any(String::is_empty) {
            return ResolvedKey::Unrecognized;
        }
        return ResolvedKey::Path(segments);
    }

    ResolvedKey::Unrecognized
}

/// Convert kebab-case to camelCase.
///
/// Only a hyphen followed by a lowercase ASCII letter is folded; `a-1` and a
/// trailing `-` are kept verbatim.
pub fn to_camel_case(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '-' {
            if let Some(&next) = chars.peek() {
                if next.is_ascii_lowercase() {
                    result.push(next.to_ascii_uppercase());
                    chars.next();
                    continue;
                }
            }
        }
        result.push(c);
    }

    result
}
