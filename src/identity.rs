//! Package identity: the four strings every stage interpolates.

use crate::error::{Error, Result};

/// Name, version, release and architecture of the package being built.
///
/// Values are used verbatim in the spec file and the artifact glob. Only
/// emptiness is checked; characters that would break spec syntax are the
/// caller's responsibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageIdentity {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
}

impl PackageIdentity {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        release: impl Into<String>,
        arch: impl Into<String>,
    ) -> Result<Self> {
        let identity = Self {
            name: name.into(),
            version: version.into(),
            release: release.into(),
            arch: arch.into(),
        };

        for (field, value) in [
            ("name", &identity.name),
            ("version", &identity.version),
            ("release", &identity.release),
            ("arch", &identity.arch),
        ] {
            if value.trim().is_empty() {
                return Err(Error::EmptyField { field });
            }
        }

        Ok(identity)
    }

    /// `name-version-release`, the prefix rpmbuild gives every artifact.
    pub fn nvr(&self) -> String {
        format!("{}-{}-{}", self.name, self.version, self.release)
    }

    /// File name of the rendered spec inside `SPECS/`.
    pub fn spec_file_name(&self) -> String {
        format!("{}.spec", self.name)
    }
}
