//! Candidates and their ranking.

/// Anything that carries a raw version string and can be matched against a
/// [`VersionPattern`](crate::VersionPattern).
pub trait Versioned {
    fn raw_version(&self) -> &str;
}

/// A labeled version: a remote release or an installed directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Candidate {
    label: String,
}

impl Candidate {
    pub fn new(label: impl Into<String>) -> Self { Self { label: label.into() } }

    pub fn label(&self) -> &str { &self.label }
}

impl Versioned for Candidate {
    fn raw_version(&self) -> &str { &self.label }
}

impl Versioned for String {
    fn raw_version(&self) -> &str { self }
}

impl<T: Versioned + ?Sized> Versioned for &T {
    fn raw_version(&self) -> &str { (**self).raw_version() }
}

/// Split a raw version into its dot-separated components, dropping a leading
/// `go`/`v` prefix (`go1.22.3` -> `["1", "22", "3"]`).
pub fn split_components(raw: &str) -> Vec<&str> {
    raw.trim()
        .trim_start_matches(['g', 'o', 'v'])
        .split('.')
        .collect()
}

/// Ranking key among matching candidates.
///
/// Ordered by major, minor, patch (numeric value of each component's leading
/// digits, absent components count as zero), then stable above pre-release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Priority {
    numbers: [u64; 3],
    stable:  bool,
}

impl Priority {
    pub fn of(raw: &str) -> Self {
        let mut numbers = [0u64; 3];
        let mut stable = true;

        for (slot, part) in numbers.iter_mut().zip(split_components(raw)) {
            let digits = part.len() - part.trim_start_matches(|c: char| c.is_ascii_digit()).len();
            *slot = part[..digits].parse().unwrap_or(0);
            if digits != part.len() {
                stable = false;
            }
        }

        Self { numbers, stable }
    }

    pub fn is_stable(&self) -> bool { self.stable }
}
