//! Partial version patterns with wildcard components.

use crate::error::{Error, Result};

/// Characters stripped from both ends of a version specification.
const NOISE: &[char] = &['g', 'o', 'v', '/'];

/// One positional component of a [`VersionPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Component {
    /// Matches only the identical string (`"01"` does not match `"1"`).
    Literal(String),
    /// Matches anything.
    Wildcard,
}

impl Component {
    pub fn matches(&self, part: &str) -> bool {
        match self {
            Component::Literal(value) => value == part,
            Component::Wildcard => true,
        }
    }
}

/// Parsed version specification: major, minor and patch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionPattern {
    components: [Component; 3],
}

impl VersionPattern {
    /// Parse a specification such as `1`, `1.22`, `1.22.3`, `go1.22` or `v1.21/`.
    ///
    /// Any non-empty remainder is accepted; components are not validated as
    /// numbers. Parts beyond the third are ignored.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim().trim_matches(NOISE);
        if trimmed.is_empty() {
            return Err(Error::InvalidVersionFormat(input.to_string()));
        }

        let mut components = [Component::Wildcard, Component::Wildcard, Component::Wildcard];
        for (slot, part) in components.iter_mut().zip(trimmed.split('.')) {
            *slot = Component::Literal(part.to_string());
        }

        Ok(Self { components })
    }

    /// A pattern that matches every version.
    pub fn any() -> Self {
        Self {
            components: [Component::Wildcard, Component::Wildcard, Component::Wildcard],
        }
    }

    /// Whether a literal component carries a pre-release suffix, as in
    /// `1.23rc1` or `1.22beta2`.
    pub fn names_prerelease(&self) -> bool {
        self.components.iter().any(|component| match component {
            Component::Literal(value) => !value.chars().all(|c| c.is_ascii_digit()),
            Component::Wildcard => false,
        })
    }

    /// Check a candidate's split components against this pattern.
    ///
    /// Only the positions the candidate supplies are checked, so `["1"]`
    /// satisfies `1.22.3`.
    pub fn matches<S: AsRef<str>>(&self, parts: &[S]) -> bool {
        self.components
            .iter()
            .zip(parts)
            .all(|(component, part)| component.matches(part.as_ref()))
    }
}

impl std::str::FromStr for VersionPattern {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> { VersionPattern::parse(s) }
}

impl std::fmt::Display for VersionPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, component) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            match component {
                Component::Literal(value) => write!(f, "{}", value)?,
                Component::Wildcard => write!(f, "*")?,
            }
        }
        Ok(())
    }
}
