//! Loose semantic version comparison for `semver_*` audience matches

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?$")
        .expect("version pattern is valid")
});

/// A parsed version: numeric core parts plus an optional pre-release tag.
/// Build metadata is accepted and ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    parts: Vec<u64>,
    pre_release: Option<String>,
}

impl Version {
    pub fn parse(input: &str) -> Option<Self> {
        let captures = VERSION_PATTERN.captures(input.trim())?;
        let parts = captures
            .get(1)?
            .as_str()
            .split('.')
            .map(|part| part.parse::<u64>().ok())
            .collect::<Option<Vec<_>>>()?;
        let pre_release = captures.get(2).map(|m| m.as_str().to_string());

        Some(Self { parts, pre_release })
    }

    /// Compare a user's version against a condition version.
    ///
    /// Only as many core parts as the condition specifies are compared, so
    /// a condition of `"2"` is equal to `"2.9.1"`.
    pub fn compare_to_target(&self, target: &Version) -> Ordering {
        for (index, target_part) in target.parts.iter().enumerate() {
            let Some(part) = self.parts.get(index) else {
                return Ordering::Less;
            };
            match part.cmp(target_part) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        match (&self.pre_release, &target.pre_release) {
            (None, None) => Ordering::Equal,
            // Partial targets ignore pre-release tags on the user side
            (Some(_), None) if self.parts.len() > target.parts.len() => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(ours), Some(theirs)) => compare_pre_release(ours, theirs),
        }
    }
}

fn compare_pre_release(ours: &str, theirs: &str) -> Ordering {
    let mut left = ours.split('.');
    let mut right = theirs.split('.');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(a), Some(b)) => {
                let ordering = match (a.parse::<u64>(), b.parse::<u64>()) {
                    (Ok(x), Ok(y)) => x.cmp(&y),
                    (Ok(_), Err(_)) => Ordering::Less,
                    (Err(_), Ok(_)) => Ordering::Greater,
                    (Err(_), Err(_)) => a.cmp(b),
                };
                if ordering != Ordering::Equal {
                    return ordering;
                }
            }
        }
    }
}

/// Compare two version strings; `None` if either is not a valid version
pub fn compare(user_version: &str, target_version: &str) -> Option<Ordering> {
    let user = Version::parse(user_version)?;
    let target = Version::parse(target_version)?;
    Some(user.compare_to_target(&target))
}
