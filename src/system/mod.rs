//! Host system detection: preferred native package format and CPU
//! architecture keywords for asset matching.

use crate::package::PackageFormat;

/// Native package manager tools in preference order.
const NATIVE_TOOLS: &[(&str, PackageFormat)] = &[
    ("dpkg", PackageFormat::Debian),
    ("pacman", PackageFormat::Arch),
    ("rpm", PackageFormat::Rpm),
];

/// The native package format this host installs from.
///
/// Assumes one native ecosystem per host; Flatpak/Snap/AppImage are probe-only
/// and never selected as an install target.
pub fn preferred_format() -> PackageFormat {
    for (tool, format) in NATIVE_TOOLS {
        if which::which(tool).is_ok() {
            return *format;
        }
    }
    PackageFormat::Unknown
}

/// Architecture keywords matching the running host.
pub fn arch_keywords() -> Vec<&'static str> {
    arch_keywords_for(std::env::consts::ARCH)
}

/// Keywords (including common aliases) for a given architecture tag.
pub fn arch_keywords_for(arch: &'static str) -> Vec<&'static str> {
    match arch {
        "x86_64" => vec!["x86_64", "amd64", "x64"],
        "aarch64" => vec!["aarch64", "arm64", "armv8"],
        other => vec![other],
    }
}
