//! Descriptor writer: renders the RPM spec file.
//!
//! The default template only carries metadata. The `%prep`, `%build`,
//! `%install`, `%files` and `%changelog` bodies are placeholders; mkrpm does
//! not synthesize build or install steps. Callers that need real steps
//! replace individual bodies with [`SpecTemplate::section`].

use std::collections::BTreeMap;
use std::fmt::{self, Write};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::debug;

use crate::common::write_file_with_dirs;
use crate::config::DEFAULT_LICENSE;
use crate::error::{Error, Result};
use crate::identity::PackageIdentity;
use crate::stage::WorkTree;

/// Replaceable spec sections, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Section {
    Prep,
    Build,
    Install,
    Files,
    Changelog,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Prep,
        Section::Build,
        Section::Install,
        Section::Files,
        Section::Changelog,
    ];

    pub fn header(self) -> &'static str {
        match self {
            Section::Prep => "%prep",
            Section::Build => "%build",
            Section::Install => "%install",
            Section::Files => "%files",
            Section::Changelog => "%changelog",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            Section::Prep => "%setup -q\n",
            Section::Build => "# Add build commands here\n",
            Section::Install => "rm -rf %{buildroot}\n# Add install commands here\n",
            Section::Files => "# Add file list here\n",
            Section::Changelog => "# Add changelog entries here\n",
        }
    }
}

impl FromStr for Section {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let name = s.trim().trim_start_matches('%').to_ascii_lowercase();
        Section::ALL
            .into_iter()
            .find(|section| section.header()[1..] == name)
            .ok_or_else(|| "expected one of: prep, build, install, files, changelog".to_string())
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.header()[1..])
    }
}

/// Spec file template: metadata overrides plus optional section bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecTemplate {
    license: String,
    summary: Option<String>,
    sections: BTreeMap<Section, String>,
}

impl Default for SpecTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_LICENSE)
    }
}

impl SpecTemplate {
    pub fn new(license: impl Into<String>) -> Self {
        Self {
            license: license.into(),
            summary: None,
            sections: BTreeMap::new(),
        }
    }

    /// Replace the default `%{name} RPM package` summary.
    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    /// Replace the placeholder body of one section.
    pub fn section(mut self, section: Section, body: impl Into<String>) -> Self {
        self.sections.insert(section, body.into());
        self
    }

    /// Replace the placeholder body of one section with a file's contents.
    pub fn section_from_file(self, section: Section, path: &Path) -> Result<Self> {
        let body = fs::read_to_string(path).map_err(|source| Error::SectionRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.section(section, body))
    }

    /// Render the spec file for `identity`.
    ///
    /// Each identity value is written once, in the `%define` lines and
    /// `BuildArch`; everything else refers to the macros.
    pub fn render(&self, identity: &PackageIdentity) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail.
        let _ = writeln!(out, "%define name {}", identity.name);
        let _ = writeln!(out, "%define version {}", identity.version);
        let _ = writeln!(out, "%define release {}", identity.release);
        out.push_str("%define buildroot %{_tmppath}/%{name}-%{version}-root\n\n");

        let _ = writeln!(
            out,
            "Summary: {}",
            self.summary.as_deref().unwrap_or("%{name} RPM package")
        );
        out.push_str("Name: %{name}\n");
        out.push_str("Version: %{version}\n");
        out.push_str("Release: %{release}\n");
        let _ = writeln!(out, "License: {}", self.license);
        let _ = writeln!(out, "BuildArch: {}", identity.arch);

        out.push_str("\n%description\nThis is a %{name} RPM package.\n");

        for section in Section::ALL {
            let body = self
                .sections
                .get(&section)
                .map(String::as_str)
                .unwrap_or_else(|| section.placeholder());
            let _ = write!(out, "\n{}\n{}", section.header(), body);
            if !body.is_empty() && !body.ends_with('\n') {
                out.push('\n');
            }
        }

        out
    }
}

/// Write a rendered spec into the tree's `SPECS/<name>.spec`.
pub fn write_descriptor(
    tree: &WorkTree,
    identity: &PackageIdentity,
    content: &str,
) -> Result<PathBuf> {
    let path = tree.specs().join(identity.spec_file_name());
    write_file_with_dirs(&path, content).map_err(|source| Error::DescriptorWrite {
        path: path.clone(),
        source,
    })?;
    debug!("wrote {} ({} bytes)", path.display(), content.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn demo() -> PackageIdentity {
        PackageIdentity::new("demo", "2.4.1", "7", "x86_64").unwrap()
    }

    /// Lines before `%description`.
    fn metadata_block(spec: &str) -> &str {
        &spec[..spec.find("%description").unwrap()]
    }

    #[test]
    fn test_identity_values_appear_once_in_metadata() {
        let spec = SpecTemplate::default().render(&demo());
        let meta = metadata_block(&spec);

        for value in ["demo", "2.4.1", "7", "x86_64"] {
            assert_eq!(meta.matches(value).count(), 1, "{} in:\n{}", value, meta);
        }
        assert!(meta.contains("%define name demo\n"));
        assert!(meta.contains("%define version 2.4.1\n"));
        assert!(meta.contains("%define release 7\n"));
        assert!(meta.contains("BuildArch: x86_64\n"));
        assert!(meta.contains("License: MIT\n"));
    }

    #[test]
    fn test_metadata_field_order() {
        let spec = SpecTemplate::default().render(&demo());
        let fields = ["Summary:", "Name:", "Version:", "Release:", "License:", "BuildArch:"];
        let positions: Vec<usize> = fields.iter().map(|f| spec.find(f).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{}", spec);
    }

    #[test]
    fn test_section_headers_in_order() {
        let spec = SpecTemplate::default().render(&demo());
        let headers = [
            "\n%description\n",
            "\n%prep\n",
            "\n%build\n",
            "\n%install\n",
            "\n%files\n",
            "\n%changelog\n",
        ];
        let positions: Vec<usize> = headers
            .iter()
            .map(|h| spec.find(h).unwrap_or_else(|| panic!("missing {:?}", h)))
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_default_placeholders() {
        let spec = SpecTemplate::default().render(&demo());
        assert!(spec.contains("%prep\n%setup -q\n"));
        assert!(spec.contains("%install\nrm -rf %{buildroot}\n# Add install commands here\n"));
        assert!(spec.contains("%files\n# Add file list here\n"));
        assert!(spec.ends_with("%changelog\n# Add changelog entries here\n"));
    }

    #[test]
    fn test_values_are_verbatim() {
        let id = PackageIdentity::new("a b", "1:2.0", "1%{?dist}", "noarch").unwrap();
        let spec = SpecTemplate::default().render(&id);
        assert!(spec.contains("%define name a b\n"));
        assert!(spec.contains("%define version 1:2.0\n"));
        assert!(spec.contains("%define release 1%{?dist}\n"));
    }

    #[test]
    fn test_overrides() {
        let spec = SpecTemplate::new("Apache-2.0")
            .summary("Demo tool")
            .section(Section::Install, "install -D -m 0755 app.bin %{buildroot}/usr/bin/app")
            .section(Section::Files, "/usr/bin/app\n")
            .render(&demo());

        assert!(spec.contains("Summary: Demo tool\n"));
        assert!(spec.contains("License: Apache-2.0\n"));
        assert!(spec.contains(
            "%install\ninstall -D -m 0755 app.bin %{buildroot}/usr/bin/app\n\n%files\n/usr/bin/app\n"
        ));
        // Untouched sections keep their placeholders
        assert!(spec.contains("%build\n# Add build commands here\n"));
    }

    #[test]
    fn test_section_parse() {
        assert_eq!("install".parse::<Section>().unwrap(), Section::Install);
        assert_eq!("%files".parse::<Section>().unwrap(), Section::Files);
        assert_eq!("Changelog".parse::<Section>().unwrap(), Section::Changelog);
        assert!("description".parse::<Section>().is_err());
        assert_eq!(Section::Prep.to_string(), "prep");
    }

    #[test]
    fn test_section_from_missing_file() {
        let err = SpecTemplate::default()
            .section_from_file(Section::Build, Path::new("/nonexistent/build.sh"))
            .unwrap_err();
        assert!(matches!(err, Error::SectionRead { .. }));
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn test_write_descriptor() {
        let temp = TempDir::new().unwrap();
        let tree = WorkTree::new(temp.path());
        let spec = SpecTemplate::default().render(&demo());

        let path = write_descriptor(&tree, &demo(), &spec).unwrap();

        assert_eq!(path, temp.path().join("rpmbuild/SPECS/demo.spec"));
        assert_eq!(fs::read_to_string(&path).unwrap(), spec);
    }
}
