//! Command-line flag values and per-registry flag declarations
//!
//! A flag that was left at its default is still present in [`FlagValues`],
//! with `provided == false`. Batch-mode validation only cares about what the
//! user actually typed.

use std::collections::{BTreeMap, BTreeSet};

/// Payload of a single flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlagArg {
    Text(String),
    Switch(bool),
}

/// Resolved value of one flag and whether the user supplied it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue {
    pub value: FlagArg,
    pub provided: bool,
}

impl FlagValue {
    /// A text flag the user supplied
    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: FlagArg::Text(value.into()),
            provided: true,
        }
    }

    /// A boolean switch; only counts as provided when set
    pub fn switch(on: bool) -> Self {
        Self {
            value: FlagArg::Switch(on),
            provided: on,
        }
    }

    /// A flag left at its (empty) default
    pub fn absent() -> Self {
        Self {
            value: FlagArg::Text(String::new()),
            provided: false,
        }
    }

    /// Build from an optional CLI argument
    pub fn from_option<S: Into<String>>(value: Option<S>) -> Self {
        value.map(Self::text).unwrap_or_else(Self::absent)
    }
}

/// Flag name to resolved value, ordered by name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagValues(BTreeMap<String, FlagValue>);

impl FlagValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a flag, builder style
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: FlagValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FlagValue) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&FlagValue> {
        self.0.get(name)
    }

    /// Whether the user supplied this flag
    pub fn is_provided(&self, name: &str) -> bool {
        self.0.get(name).is_some_and(|v| v.provided)
    }

    /// Text value of a flag the user supplied
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(FlagValue {
                value: FlagArg::Text(text),
                provided: true,
            }) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Names of all flags the user supplied, in name order
    pub fn provided(&self) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(|(_, v)| v.provided)
            .map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FlagValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, FlagValue)> for FlagValues {
    fn from_iter<I: IntoIterator<Item = (S, FlagValue)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Flags a registry backend accepts in batch mode
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryFlags {
    pub required: BTreeSet<&'static str>,
    pub optional: BTreeSet<&'static str>,
}

impl RegistryFlags {
    pub fn new(required: &[&'static str], optional: &[&'static str]) -> Self {
        Self {
            required: required.iter().copied().collect(),
            optional: optional.iter().copied().collect(),
        }
    }

    /// Whether the flag is either required or optional
    pub fn supports(&self, flag: &str) -> bool {
        self.required.contains(flag) || self.optional.contains(flag)
    }

    /// First required flag (by name) the user did not supply
    pub fn missing_required(&self, values: &FlagValues) -> Option<&'static str> {
        self.required
            .iter()
            .copied()
            .find(|flag| !values.is_provided(flag))
    }

    /// First supplied flag (by name) this backend does not know about
    pub fn first_unsupported<'a>(&self, values: &'a FlagValues) -> Option<&'a str> {
        values.provided().find(|flag| !self.supports(flag))
    }
}
