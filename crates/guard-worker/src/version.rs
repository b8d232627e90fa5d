//! Semantic version comparison for the compatibility handshake.

/// Parse `X.Y.Z` into a comparable triple; pre-release suffixes after `-`
/// are ignored for the floor check.
pub fn parse_version(version: &str) -> Option<(u64, u64, u64)> {
    let core = version.split('-').next().unwrap_or(version);
    let mut parts = core.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next().unwrap_or("0").parse().ok()?;
    Some((major, minor, patch))
}

/// Whether `version` satisfies the requested minimum.
///
/// An unparsable floor counts as not satisfied; callers surface that as a
/// version mismatch rather than guessing.
pub fn satisfies_min(version: &str, min_version: &str) -> bool {
    match (parse_version(version), parse_version(min_version)) {
        (Some(have), Some(want)) => have >= want,
        _ => false,
    }
}
