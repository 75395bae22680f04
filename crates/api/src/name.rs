//! Name-related types.

use crate::*;
use std::sync::Arc;

// Names are stored as Arc<str> rather than String. Consumers clone names
// into every request they express and into every delivered result, so the
// storage needs to be cheap to clone, and the accessors only ever hand
// out &str slices.

/// A validated hierarchical NDN name, e.g. `/app/sensors/temp1`.
///
/// A name is a `/`-rooted sequence of components. The root name `/` has
/// zero components. The textual form must be non-empty, begin with `/`,
/// and contain no ASCII spaces (space is the list-payload separator on
/// the wire).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(Arc<str>);

impl serde::Serialize for Name {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Name {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s: String = serde::Deserialize::deserialize(deserializer)?;
        Name::new(s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::fmt::Debug for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{self}")
    }
}

impl std::str::FromStr for Name {
    type Err = ImError;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        Self::new(src)
    }
}

impl std::convert::TryFrom<String> for Name {
    type Error = ImError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl Name {
    /// Construct a new validated Name.
    pub fn new<S: AsRef<str>>(src: S) -> ImResult<Self> {
        let src = src.as_ref();
        if src.is_empty() {
            return Err(ImError::invalid_name("empty name"));
        }
        if !src.starts_with('/') {
            return Err(ImError::invalid_name(format!(
                "name must begin with '/': {src}"
            )));
        }
        if src.contains(' ') {
            return Err(ImError::invalid_name(format!(
                "name must not contain spaces: {src}"
            )));
        }
        Ok(Self(src.into()))
    }

    /// The root name `/`, which has zero components.
    pub fn root() -> Self {
        Self("/".into())
    }

    /// Get the string representation of this name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterate over the components of this name, in order.
    ///
    /// Empty segments produced by adjacent separators are not components.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|c| !c.is_empty())
    }

    /// The number of components in this name.
    pub fn component_count(&self) -> usize {
        self.components().count()
    }

    /// Append a raw suffix string to this name.
    ///
    /// The suffix is appended without inserting a separator, so element
    /// identifiers taken off the wire (which carry their own leading `/`)
    /// attach exactly as sent. The result is re-validated.
    pub fn join(&self, suffix: &str) -> ImResult<Name> {
        Name::new(format!("{}{}", self.0, suffix))
    }

    /// Drop the first `n` components of this name, keeping the rest in
    /// their original order. Dropping every component (or more) yields
    /// the root name `/`.
    pub fn strip_components(&self, n: usize) -> Name {
        let rest = self.components().skip(n).collect::<Vec<_>>();
        if rest.is_empty() {
            return Name::root();
        }
        Self(format!("/{}", rest.join("/")).into())
    }
}
