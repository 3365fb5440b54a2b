//! Package format classification.
//!
//! Every artifact name and every installed-package probe resolves to the same
//! `PackageFormat` tag set so results from both sides stay comparable.

pub mod probe;

/// Native or universal package format a file or installed package belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageFormat {
    /// Debian/Ubuntu family (.deb)
    Debian,
    /// Fedora/RHEL/OpenSUSE family (.rpm)
    Rpm,
    /// Arch Linux family (.pkg.tar.zst / .pkg.tar.xz)
    Arch,
    /// Flatpak bundles and refs
    Flatpak,
    /// Snap packages
    Snap,
    /// Standalone AppImage binaries
    AppImage,
    /// Anything we cannot classify
    Unknown,
}

/// Filename suffix table, checked in order. First match wins.
const SUFFIX_TABLE: &[(&str, PackageFormat)] = &[
    (".deb", PackageFormat::Debian),
    (".rpm", PackageFormat::Rpm),
    (".flatpak", PackageFormat::Flatpak),
    (".flatpakref", PackageFormat::Flatpak),
    (".snap", PackageFormat::Snap),
    (".pkg.tar.zst", PackageFormat::Arch),
    (".pkg.tar.xz", PackageFormat::Arch),
    (".appimage", PackageFormat::AppImage),
];

/// Classify a published file name by its suffix (case-insensitive).
///
/// Total function: unknown suffixes are a valid `Unknown` result, not an error.
pub fn classify(filename: &str) -> PackageFormat {
    let lower = filename.to_lowercase();
    SUFFIX_TABLE
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, format)| *format)
        .unwrap_or(PackageFormat::Unknown)
}

impl PackageFormat {
    /// Human-readable label for display.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Debian => "Debian Package (.deb)",
            Self::Rpm => "RPM Package (.rpm)",
            Self::Arch => "Arch Package",
            Self::Flatpak => "Flatpak",
            Self::Snap => "Snap Package",
            Self::AppImage => "AppImage",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_suffixes() {
        assert_eq!(classify("app_1.0.0_amd64.deb"), PackageFormat::Debian);
        assert_eq!(classify("app-1.0.0-1.x86_64.rpm"), PackageFormat::Rpm);
        assert_eq!(classify("app.flatpak"), PackageFormat::Flatpak);
        assert_eq!(classify("app.flatpakref"), PackageFormat::Flatpak);
        assert_eq!(classify("app_1.0.0_amd64.snap"), PackageFormat::Snap);
        assert_eq!(classify("app-1.0.0-1-x86_64.pkg.tar.zst"), PackageFormat::Arch);
        assert_eq!(classify("app-1.0.0-1-x86_64.pkg.tar.xz"), PackageFormat::Arch);
        assert_eq!(classify("App-1.0.0-x86_64.AppImage"), PackageFormat::AppImage);
    }

    #[test]
    fn test_classify_is_case_insensitive() {
        assert_eq!(classify("App_1.0.0_all.DEB"), PackageFormat::Debian);
        assert_eq!(classify("APP-1.0.0.RPM"), PackageFormat::Rpm);
    }

    #[test]
    fn test_classify_unknown_suffixes() {
        assert_eq!(classify("tool.tar.gz"), PackageFormat::Unknown);
        assert_eq!(classify("checksums.txt"), PackageFormat::Unknown);
        assert_eq!(classify("app.pkg.tar.gz"), PackageFormat::Unknown);
        assert_eq!(classify(""), PackageFormat::Unknown);
    }

    #[test]
    fn test_display_names() {
        assert_eq!(PackageFormat::Debian.display_name(), "Debian Package (.deb)");
        assert_eq!(PackageFormat::Unknown.display_name(), "Unknown");
    }
}
