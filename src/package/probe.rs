//! Installed-package probing across the supported package managers.
//!
//! Each manager implements the same [`PackageQuery`] capability so the probe
//! loop stays a flat iteration and tests can substitute fakes for the real
//! command invocations. A query that fails for any reason (tool missing,
//! non-zero exit, unparseable output) means "not found by this manager",
//! never an error.

use duct::cmd;

use super::PackageFormat;

/// Result of a successful probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledPackage {
    pub version: String,
    pub format: PackageFormat,
}

/// One package manager's "query installed version" capability.
pub trait PackageQuery {
    fn format(&self) -> PackageFormat;

    /// Returns the installed version of `name`, or None if this manager does
    /// not know the package (or is not present on the system at all).
    fn query_version(&self, name: &str) -> Option<String>;
}

/// Candidate names to try for a tracked application.
///
/// "My App" probes as ["My App", "my app", "my-app"]; duplicates and empty
/// strings are skipped.
pub fn name_variants(name: &str) -> Vec<String> {
    let lower = name.to_lowercase();
    let kebab = lower.replace(' ', "-");

    let mut variants = Vec::new();
    for candidate in [name.to_string(), lower, kebab] {
        if !candidate.is_empty() && !variants.contains(&candidate) {
            variants.push(candidate);
        }
    }
    variants
}

/// Probe the system package managers for an installed version of `name`.
pub fn probe(name: &str) -> Option<InstalledPackage> {
    probe_with(&default_queries(), name)
}

/// Probe using an explicit set of queries. Each name variant is tried against
/// every manager in order; the first hit wins.
pub fn probe_with(queries: &[Box<dyn PackageQuery>], name: &str) -> Option<InstalledPackage> {
    for candidate in name_variants(name) {
        for query in queries {
            if let Some(version) = query.query_version(&candidate) {
                return Some(InstalledPackage {
                    version,
                    format: query.format(),
                });
            }
        }
    }
    None
}

/// The real managers, in probe priority order.
pub fn default_queries() -> Vec<Box<dyn PackageQuery>> {
    vec![
        Box::new(SnapQuery),
        Box::new(FlatpakQuery),
        Box::new(DpkgQuery),
        Box::new(PacmanQuery),
        Box::new(RpmQuery),
    ]
}

pub struct SnapQuery;

impl PackageQuery for SnapQuery {
    fn format(&self) -> PackageFormat {
        PackageFormat::Snap
    }

    fn query_version(&self, name: &str) -> Option<String> {
        // `snap list <name>` prints a header line, then the package row
        let output = cmd("snap", ["list", name]).stderr_null().read().ok()?;
        let row = output.lines().nth(1)?;
        row.split_whitespace().nth(1).map(|v| v.to_string())
    }
}

pub struct FlatpakQuery;

impl PackageQuery for FlatpakQuery {
    fn format(&self) -> PackageFormat {
        PackageFormat::Flatpak
    }

    fn query_version(&self, name: &str) -> Option<String> {
        let output = cmd(
            "flatpak",
            ["list", "--app", "--columns=application,name,version"],
        )
        .stderr_null()
        .read()
        .ok()?;

        let wanted = name.to_lowercase();
        for line in output.lines() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 3 {
                continue;
            }
            let app_id = fields[0].to_lowercase();
            let app_name = fields[1].to_lowercase();
            // Match on the display name or the app id's last segment
            // (org.example.MyApp -> myapp)
            let id_tail = app_id.rsplit('.').next().unwrap_or_default();
            if app_name == wanted || id_tail == wanted {
                return Some(fields[2].to_string());
            }
        }
        None
    }
}

pub struct DpkgQuery;

impl PackageQuery for DpkgQuery {
    fn format(&self) -> PackageFormat {
        PackageFormat::Debian
    }

    fn query_version(&self, name: &str) -> Option<String> {
        let output = cmd("dpkg-query", ["-W", "-f=${Version}", name])
            .stderr_null()
            .read()
            .ok()?;
        let version = output.trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}

pub struct PacmanQuery;

impl PackageQuery for PacmanQuery {
    fn format(&self) -> PackageFormat {
        PackageFormat::Arch
    }

    fn query_version(&self, name: &str) -> Option<String> {
        // `pacman -Q <name>` prints "name version"
        let output = cmd("pacman", ["-Q", name]).stderr_null().read().ok()?;
        output.split_whitespace().nth(1).map(|v| v.to_string())
    }
}

pub struct RpmQuery;

impl PackageQuery for RpmQuery {
    fn format(&self) -> PackageFormat {
        PackageFormat::Rpm
    }

    fn query_version(&self, name: &str) -> Option<String> {
        let output = cmd("rpm", ["-q", "--qf", "%{VERSION}", name])
            .stderr_null()
            .read()
            .ok()?;
        let version = output.trim();
        (!version.is_empty()).then(|| version.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeQuery {
        format: PackageFormat,
        installed: Option<(&'static str, &'static str)>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl FakeQuery {
        fn not_found(format: PackageFormat, seen: Rc<RefCell<Vec<String>>>) -> Box<dyn PackageQuery> {
            Box::new(Self {
                format,
                installed: None,
                seen,
            })
        }

        fn with_package(
            format: PackageFormat,
            name: &'static str,
            version: &'static str,
            seen: Rc<RefCell<Vec<String>>>,
        ) -> Box<dyn PackageQuery> {
            Box::new(Self {
                format,
                installed: Some((name, version)),
                seen,
            })
        }
    }

    impl PackageQuery for FakeQuery {
        fn format(&self) -> PackageFormat {
            self.format
        }

        fn query_version(&self, name: &str) -> Option<String> {
            self.seen.borrow_mut().push(name.to_string());
            match self.installed {
                Some((installed, version)) if installed == name => Some(version.to_string()),
                _ => None,
            }
        }
    }

    #[test]
    fn test_name_variants_for_spaced_name() {
        assert_eq!(name_variants("My App"), vec!["My App", "my app", "my-app"]);
    }

    #[test]
    fn test_name_variants_deduplicates() {
        assert_eq!(name_variants("htop"), vec!["htop"]);
        assert_eq!(name_variants("Helix"), vec!["Helix", "helix"]);
    }

    #[test]
    fn test_name_variants_empty_input() {
        assert!(name_variants("").is_empty());
    }

    #[test]
    fn test_probe_tries_every_variant_against_every_manager() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let queries = vec![
            FakeQuery::not_found(PackageFormat::Snap, seen.clone()),
            FakeQuery::not_found(PackageFormat::Debian, seen.clone()),
        ];

        assert!(probe_with(&queries, "My App").is_none());
        assert_eq!(
            *seen.borrow(),
            vec!["My App", "My App", "my app", "my app", "my-app", "my-app"]
        );
    }

    #[test]
    fn test_probe_returns_first_hit_with_manager_format() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let queries = vec![
            FakeQuery::not_found(PackageFormat::Snap, seen.clone()),
            FakeQuery::with_package(PackageFormat::Debian, "my-app", "2.1.0", seen.clone()),
            FakeQuery::with_package(PackageFormat::Rpm, "my-app", "9.9.9", seen.clone()),
        ];

        let result = probe_with(&queries, "My App").expect("should find my-app");
        assert_eq!(result.version, "2.1.0");
        assert_eq!(result.format, PackageFormat::Debian);
        // The probe stops at the dpkg hit: "my-app" was asked of snap and
        // dpkg, never of rpm
        let seen = seen.borrow();
        assert_eq!(seen.iter().filter(|n| n.as_str() == "my-app").count(), 2);
    }

    #[test]
    fn test_probe_earlier_manager_wins_for_same_variant() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let queries = vec![
            FakeQuery::with_package(PackageFormat::Snap, "helix", "1.0", seen.clone()),
            FakeQuery::with_package(PackageFormat::Arch, "helix", "2.0", seen.clone()),
        ];

        let result = probe_with(&queries, "Helix").expect("should find helix");
        assert_eq!(result.format, PackageFormat::Snap);
        assert_eq!(result.version, "1.0");
    }
}
