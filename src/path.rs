use std::path::{Component, Path, PathBuf};

use crate::platform::{HostPlatform, OsFamily};

/// Name of the analyzer configuration file at the project root.
pub const CONFIG_FILE_NAME: &str = "phpmd.xml";

/// Join `root` with `segments` and collapse `.` and `..` components.
///
/// Purely lexical, the filesystem is never consulted. A `..` that would climb
/// above the root of an absolute path is dropped.
pub fn resolve(root: &Path, segments: &[&str]) -> PathBuf {
    let mut joined = root.to_path_buf();
    for segment in segments {
        joined.push(segment);
    }

    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let at_anchor = matches!(
                    resolved.components().next_back(),
                    None | Some(Component::RootDir | Component::Prefix(_) | Component::ParentDir)
                );
                if !at_anchor {
                    resolved.pop();
                } else if !resolved.has_root() {
                    resolved.push("..");
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Path of `phpmd.xml` under the project root.
pub fn config_path(root: &Path) -> PathBuf {
    resolve(root, &[CONFIG_FILE_NAME])
}

/// Analyzer executable name for the given OS family.
pub fn binary_name(family: OsFamily) -> &'static str {
    match family {
        OsFamily::Windows => "phpmd.bat",
        _ => "phpmd",
    }
}

/// Path of the analyzer executable installed under `vendor/bin`.
pub fn binary_path(root: &Path, platform: &impl HostPlatform) -> PathBuf {
    resolve(root, &["vendor", "bin", binary_name(platform.family())])
}
