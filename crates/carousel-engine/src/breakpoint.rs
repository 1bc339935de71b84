//! Breakpoint rules
//!
//! A named media condition gates whether an instance should exist at the
//! current viewport size. Only width features are supported:
//! `(min-width: 768px) and (max-width: 991px)`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use lightningcss::media_query::{
    MediaCondition as CssCondition, MediaFeature, MediaFeatureComparison, MediaFeatureId,
    MediaFeatureName, MediaFeatureValue, MediaType, Operator, QueryFeature,
};
use lightningcss::printer::PrinterOptions;
use lightningcss::rules::CssRule;
use lightningcss::stylesheet::{ParserOptions, StyleSheet};
use lightningcss::traits::ToCss;
use lightningcss::values::length::Length;

use crate::error::{BreakpointError, EngineError};

/// Rules available without configuration
pub const DEFAULT_RULES: &[(&str, &str)] = &[
    ("tablet", "(max-width: 991px)"),
    ("mobile-l", "(max-width: 767px)"),
    ("mobile", "(max-width: 479px)"),
];

/// Viewport dimensions in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// One `(feature: value)` clause
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaClause {
    MinWidth(f64),
    MaxWidth(f64),
}

impl MediaClause {
    pub fn matches(&self, viewport: &Viewport) -> bool {
        match *self {
            MediaClause::MinWidth(px) => viewport.width >= px,
            MediaClause::MaxWidth(px) => viewport.width <= px,
        }
    }
}

/// Clauses joined by `and`
#[derive(Debug, Clone, PartialEq)]
pub struct MediaCondition {
    clauses: Vec<MediaClause>,
}

impl MediaCondition {
    pub fn clauses(&self) -> &[MediaClause] {
        &self.clauses
    }

    pub fn matches(&self, viewport: &Viewport) -> bool {
        self.clauses.iter().all(|c| c.matches(viewport))
    }
}

impl FromStr for MediaCondition {
    type Err = BreakpointError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(BreakpointError::Empty);
        }
        if s.contains(['{', '}', ';']) {
            return Err(BreakpointError::Malformed(s.to_string()));
        }

        // Parsed as the prelude of an empty @media block
        let source = format!("@media {s} {{}}");
        let sheet = StyleSheet::parse(&source, ParserOptions::default())
            .map_err(|e| BreakpointError::Malformed(format!("{s}: {e}")))?;
        let list = match sheet.rules.0.as_slice() {
            [CssRule::Media(rule)] => &rule.query,
            _ => return Err(BreakpointError::Malformed(s.to_string())),
        };
        let [query] = list.media_queries.as_slice() else {
            return Err(BreakpointError::Malformed(s.to_string()));
        };
        if query.qualifier.is_some() || !matches!(query.media_type, MediaType::All) {
            return Err(BreakpointError::UnsupportedFeature(css_text(query)));
        }
        let condition = query
            .condition
            .as_ref()
            .ok_or_else(|| BreakpointError::Malformed(s.to_string()))?;

        let mut clauses = Vec::new();
        collect_clauses(condition, &mut clauses)?;
        Ok(Self { clauses })
    }
}

fn collect_clauses(
    condition: &CssCondition<'_>,
    clauses: &mut Vec<MediaClause>,
) -> Result<(), BreakpointError> {
    match condition {
        CssCondition::Feature(feature) => clauses.push(width_clause(feature)?),
        CssCondition::Operation {
            operator: Operator::And,
            conditions,
        } => {
            for condition in conditions {
                collect_clauses(condition, clauses)?;
            }
        }
        other => return Err(BreakpointError::UnsupportedFeature(css_text(other))),
    }
    Ok(())
}

/// `min-width`/`max-width` arrive as inclusive width ranges
fn width_clause(feature: &MediaFeature<'_>) -> Result<MediaClause, BreakpointError> {
    let QueryFeature::Range {
        name: MediaFeatureName::Standard(MediaFeatureId::Width),
        operator,
        value,
    } = feature
    else {
        return Err(BreakpointError::UnsupportedFeature(css_text(feature)));
    };

    let px = match value {
        MediaFeatureValue::Length(Length::Value(length)) => length.to_px(),
        _ => None,
    }
    .map(f64::from)
    .filter(|n| n.is_finite())
    .ok_or_else(|| BreakpointError::InvalidLength(css_text(feature)))?;

    match operator {
        MediaFeatureComparison::GreaterThanEqual => Ok(MediaClause::MinWidth(px)),
        MediaFeatureComparison::LessThanEqual => Ok(MediaClause::MaxWidth(px)),
        _ => Err(BreakpointError::UnsupportedFeature(css_text(feature))),
    }
}

fn css_text<T: ToCss>(value: &T) -> String {
    value
        .to_css_string(PrinterOptions::default())
        .unwrap_or_default()
}

impl fmt::Display for MediaCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " and ")?;
            }
            match clause {
                MediaClause::MinWidth(px) => write!(f, "(min-width: {px}px)")?,
                MediaClause::MaxWidth(px) => write!(f, "(max-width: {px}px)")?,
            }
        }
        Ok(())
    }
}

/// Named media condition
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointRule {
    pub name: String,
    pub condition: MediaCondition,
}

/// Set of rules looked up by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BreakpointRules {
    rules: BTreeMap<String, BreakpointRule>,
}

impl BreakpointRules {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every condition in `map`
    pub fn from_map(map: &BTreeMap<String, String>) -> Result<Self, EngineError> {
        let mut rules = Self::new();
        for (name, condition) in map {
            let condition = condition
                .parse::<MediaCondition>()
                .map_err(|source| EngineError::Breakpoint {
                    name: name.clone(),
                    source,
                })?;
            rules.insert(BreakpointRule {
                name: name.clone(),
                condition,
            });
        }
        Ok(rules)
    }

    pub fn insert(&mut self, rule: BreakpointRule) {
        self.rules.insert(rule.name.clone(), rule);
    }

    pub fn get(&self, name: &str) -> Option<&BreakpointRule> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
