use semver::Version;

use crate::error::Error;

/// Parse the version a resolution is requested for.
///
/// A leading `v` is accepted and missing minor or patch components count as
/// zero, so `v0.9` is `0.9.0`.
pub fn parse_version(version: &str) -> Result<Version, Error> {
    let trimmed = version.strip_prefix('v').unwrap_or(version);
    let padded = match trimmed.split('.').count() {
        1 => format!("{trimmed}.0.0"),
        2 => format!("{trimmed}.0"),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded).map_err(|source| Error::InvalidVersion {
        version: version.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0.12.0", Version::new(0, 12, 0))]
    #[case("v1.2.3", Version::new(1, 2, 3))]
    #[case("0.9", Version::new(0, 9, 0))]
    #[case("v2", Version::new(2, 0, 0))]
    fn test_parse_version(#[case] input: &str, #[case] expected: Version) {
        assert_eq!(parse_version(input).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("latest")]
    #[case("1.x")]
    #[case("1.2.3.4")]
    fn test_parse_version_invalid(#[case] input: &str) {
        let err = parse_version(input).unwrap_err();
        assert!(matches!(err, Error::InvalidVersion { ref version, .. } if version == input));
    }
}
