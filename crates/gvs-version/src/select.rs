use crate::candidate::{Priority, Versioned, split_components};
use crate::error::{Error, Result};
use crate::pattern::VersionPattern;

/// Candidates satisfying `pattern`, in listing order.
pub fn matching<'a, 'p, T: Versioned>(
    candidates: &'a [T],
    pattern: &'p VersionPattern,
) -> impl Iterator<Item = &'a T> {
    candidates
        .iter()
        .filter(move |c| pattern.matches(&split_components(c.raw_version())))
}

/// Select the highest-priority candidate matching `pattern`.
///
/// Unless the pattern itself names a pre-release, stable candidates rank
/// above every pre-release, so `1` prefers `1.25.3` over `1.26rc1`. A
/// pre-release is only chosen when no stable candidate matches.
///
/// Ties keep listing order: the first of the equally ranked candidates wins.
pub fn select_best<'a, T: Versioned>(candidates: &'a [T], pattern: &VersionPattern) -> Result<&'a T> {
    let prerelease_ok = pattern.names_prerelease();
    let mut best: Option<(&T, (bool, Priority))> = None;

    for candidate in matching(candidates, pattern) {
        let priority = Priority::of(candidate.raw_version());
        let priority = (prerelease_ok || priority.is_stable(), priority);
        match best {
            Some((_, current)) if current >= priority => {}
            _ => best = Some((candidate, priority)),
        }
    }

    best.map(|(candidate, _)| candidate)
        .ok_or_else(|| Error::NoMatch(pattern.to_string()))
}
