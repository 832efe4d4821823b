//! Session options that scripts toggle with `set`, `enable` and `disable`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Controls whether implicit nodes are visible while matching.
///
/// Literals are parsed case-insensitively, so `asis` and `AsIs` are both
/// accepted.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display,
)]
#[strum(ascii_case_insensitive)]
pub enum TraversalKind {
    /// Match the tree exactly as the parser produced it.
    #[default]
    AsIs,
    /// Skip nodes that were not written in the source text.
    IgnoreUnlessSpelledInSource,
}

/// One kind of content a session may ask to be shown for bound nodes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, EnumString,
    Display,
)]
#[serde(rename_all = "kebab-case")]
#[strum(ascii_case_insensitive)]
pub enum OutputFeature {
    /// Pretty-printed bound nodes.
    #[strum(to_string = "print")]
    Print,
    /// Diagnostic locations for bound nodes.
    #[strum(to_string = "diag")]
    Diag,
    /// Detailed tree dumps for bound nodes.
    #[strum(to_string = "detailed-ast", serialize = "dump")]
    DetailedAst,
    /// Source locations and ranges for bound nodes.
    #[strum(to_string = "srcloc")]
    SrcLoc,
}

/// Errors encountered while parsing an [`OutputFeature`] from text.
pub type OutputFeatureParseError = strum::ParseError;

/// The set of enabled [`OutputFeature`]s.
///
/// The default set contains only [`OutputFeature::Diag`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputFeatures(BTreeSet<OutputFeature>);

impl Default for OutputFeatures {
    fn default() -> Self {
        Self::only(OutputFeature::Diag)
    }
}

impl OutputFeatures {
    /// Returns an empty feature set.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns a set holding exactly `feature`.
    #[must_use]
    pub fn only(feature: OutputFeature) -> Self {
        Self(BTreeSet::from([feature]))
    }

    /// Adds `feature`, keeping the others.
    pub fn enable(&mut self, feature: OutputFeature) {
        self.0.insert(feature);
    }

    /// Removes `feature`, keeping the others.
    pub fn disable(&mut self, feature: OutputFeature) {
        self.0.remove(&feature);
    }

    /// Returns whether `feature` is enabled.
    #[must_use]
    pub fn contains(&self, feature: OutputFeature) -> bool {
        self.0.contains(&feature)
    }

    /// Returns whether no feature is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the enabled features in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = OutputFeature> + '_ {
        self.0.iter().copied()
    }
}
