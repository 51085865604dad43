/// Operating system family of the host, used to pick the analyzer binary name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Bsd,
    Darwin,
    Solaris,
    Linux,
    Unknown,
}

impl OsFamily {
    /// Map a `std::env::consts::OS` value onto its family.
    pub fn from_os(os: &str) -> Self {
        match os {
            "windows" => OsFamily::Windows,
            "freebsd" | "openbsd" | "netbsd" | "dragonfly" => OsFamily::Bsd,
            "macos" | "ios" => OsFamily::Darwin,
            "solaris" | "illumos" => OsFamily::Solaris,
            "linux" | "android" => OsFamily::Linux,
            _ => OsFamily::Unknown,
        }
    }
}

/// Source of host information.
///
/// Injected into the hook so binary selection can be tested for every family.
pub trait HostPlatform {
    fn family(&self) -> OsFamily;
}

/// The platform this binary was compiled for.
#[derive(Debug, Default, Clone, Copy)]
pub struct CurrentPlatform;

impl HostPlatform for CurrentPlatform {
    fn family(&self) -> OsFamily {
        OsFamily::from_os(std::env::consts::OS)
    }
}

impl HostPlatform for OsFamily {
    fn family(&self) -> OsFamily {
        *self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_os_windows() {
        assert_eq!(OsFamily::from_os("windows"), OsFamily::Windows);
    }

    #[test]
    fn from_os_bsd_variants() {
        for os in ["freebsd", "openbsd", "netbsd", "dragonfly"] {
            assert_eq!(OsFamily::from_os(os), OsFamily::Bsd, "{os}");
        }
    }

    #[test]
    fn from_os_darwin_and_linux() {
        assert_eq!(OsFamily::from_os("macos"), OsFamily::Darwin);
        assert_eq!(OsFamily::from_os("linux"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os("illumos"), OsFamily::Solaris);
    }

    #[test]
    fn from_os_unrecognized_is_unknown() {
        assert_eq!(OsFamily::from_os("haiku"), OsFamily::Unknown);
    }

    #[test]
    fn fixed_family_reports_itself() {
        assert_eq!(OsFamily::Windows.family(), OsFamily::Windows);
    }

    #[test]
    #[cfg(target_os = "linux")]
    fn current_platform_on_linux() {
        assert_eq!(CurrentPlatform.family(), OsFamily::Linux);
    }
}
