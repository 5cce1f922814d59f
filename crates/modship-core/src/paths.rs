use std::path::{Component, Path, PathBuf};

/// Lexically normalize a path: fold `.` and `..` components without
/// touching the filesystem.
///
/// A `..` with nothing left to pop is dropped (clamped), so a path can
/// never normalize to something above the filesystem root.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // pop only retains the root prefix, which is what we want
                let popped = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if popped {
                    out.pop();
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `path` stays inside `root` after lexical normalization.
///
/// This is the access-boundary check for id resolution; it must never
/// probe the filesystem, since it runs before existence checks.
#[must_use]
pub fn is_within(root: &Path, path: &Path) -> bool {
    normalize(path).starts_with(normalize(root))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_dot_segments() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
    }

    #[test]
    fn normalize_clamps_at_root() {
        assert_eq!(normalize(Path::new("/a/../../..")), PathBuf::from("/"));
    }

    #[test]
    fn is_within_accepts_children() {
        assert!(is_within(Path::new("/srv/app"), Path::new("/srv/app/lib/x")));
    }

    #[test]
    fn is_within_rejects_escapes() {
        assert!(!is_within(Path::new("/srv/app"), Path::new("/srv/app/../etc")));
        assert!(!is_within(Path::new("/srv/app"), Path::new("/srv/other")));
    }
}
