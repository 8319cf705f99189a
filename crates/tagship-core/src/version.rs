//! Release version arithmetic.
//!
//! Every release is a patch increment over the previous one. Prerelease and
//! build metadata never carry over into the next version.

use semver::Version;

/// Parse a version, tolerating a leading `v` (`v1.2.3` and `1.2.3`).
pub fn parse_version(raw: &str) -> crate::Result<Version> {
    let trimmed = raw.trim();
    let bare = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(bare).map_err(|e| crate::Error::InvalidVersion {
        value: raw.to_owned(),
        source: e,
    })
}

/// The version following `current`: same major and minor, patch + 1.
pub fn next_patch(current: &Version) -> crate::Result<Version> {
    let patch = current
        .patch
        .checked_add(1)
        .ok_or_else(|| crate::Error::VersionOverflow(current.clone()))?;
    Ok(Version::new(current.major, current.minor, patch))
}

/// Highest semantic version among `tags`. Tags that don't parse are skipped.
pub fn latest_tag<'a, I>(tags: I) -> Option<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    tags.into_iter()
        .filter(|t| !t.trim().is_empty())
        .filter_map(|t| match parse_version(t) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::debug!(tag = t, error = %e, "skipping non-semver tag");
                None
            }
        })
        .max()
}

/// Next release version given the tags reachable from HEAD.
pub fn next_from_tags<'a, I>(tags: I) -> crate::Result<Version>
where
    I: IntoIterator<Item = &'a str>,
{
    let latest = latest_tag(tags).ok_or(crate::Error::NoReleaseTag)?;
    next_patch(&latest)
}

/// Git tag name for a release version.
pub fn tag_name(version: &Version) -> String {
    format!("v{version}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_v_prefix() {
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_version("1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_version(" v0.0.1\n").unwrap(), Version::new(0, 0, 1));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = parse_version("release-7").unwrap_err().to_string();
        assert!(err.contains("release-7"), "got: {err}");
    }

    #[test]
    fn next_patch_increments_patch_only() {
        let next = next_patch(&Version::new(1, 2, 3)).unwrap();
        assert_eq!(next, Version::new(1, 2, 4));
    }

    #[test]
    fn next_patch_drops_prerelease() {
        let current = Version::parse("2.0.0-rc.1+build.5").unwrap();
        assert_eq!(next_patch(&current).unwrap(), Version::new(2, 0, 1));
    }

    #[test]
    fn next_patch_overflow_errors() {
        let current = Version::new(1, 0, u64::MAX);
        assert!(matches!(
            next_patch(&current),
            Err(crate::Error::VersionOverflow(_))
        ));
    }

    #[test]
    fn latest_tag_picks_highest_semver_not_last() {
        let tags = ["v1.10.0", "v1.2.3", "v1.9.9", "nightly", ""];
        assert_eq!(latest_tag(tags), Some(Version::new(1, 10, 0)));
    }

    #[test]
    fn next_from_tags_scenario() {
        let tags = ["v1.2.2", "v1.2.3"];
        assert_eq!(next_from_tags(tags).unwrap(), Version::new(1, 2, 4));
    }

    #[test]
    fn next_from_tags_without_semver_tags_errors() {
        assert!(matches!(
            next_from_tags(["latest", "stable"]),
            Err(crate::Error::NoReleaseTag)
        ));
        assert!(matches!(
            next_from_tags(std::iter::empty()),
            Err(crate::Error::NoReleaseTag)
        ));
    }

    #[test]
    fn tag_name_has_v_prefix() {
        assert_eq!(tag_name(&Version::new(1, 2, 4)), "v1.2.4");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn parse_never_panics(s in "\\PC*") {
                let _ = parse_version(&s);
            }

            #[test]
            fn next_is_strictly_greater(
                major in 0u64..1000,
                minor in 0u64..1000,
                patch in 0u64..1_000_000,
            ) {
                let current = Version::new(major, minor, patch);
                let next = next_patch(&current).unwrap();
                prop_assert!(next > current);
                prop_assert_eq!(next.major, major);
                prop_assert_eq!(next.minor, minor);
            }

            #[test]
            fn latest_tag_is_max_of_versions(
                versions in proptest::collection::vec((0u64..50, 0u64..50, 0u64..50), 1..20),
            ) {
                let tags: Vec<String> = versions
                    .iter()
                    .map(|(a, b, c)| format!("v{a}.{b}.{c}"))
                    .collect();
                let expected = versions
                    .iter()
                    .map(|(a, b, c)| Version::new(*a, *b, *c))
                    .max();
                prop_assert_eq!(latest_tag(tags.iter().map(String::as_str)), expected);
            }
        }
    }
}
