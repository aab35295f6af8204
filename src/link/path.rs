use super::LinkError;
use crate::url::encode_os_segment;
use std::path::{Component, Path, PathBuf};

/// Repository-relative, percent-encoded path of `file` with a leading `/`.
///
/// Relative paths are taken relative to `work_dir`, which itself may be
/// relative to the process working directory. `.` and `..` are folded
/// lexically, so the file does not need to exist.
pub fn relative_file_path(root: &Path, work_dir: &Path, file: &Path) -> Result<String, LinkError> {
    if file.as_os_str().is_empty() {
        return Err(LinkError::NoActiveFile);
    }

    // A relative base would lose leading `..` components during folding
    let work_dir = std::path::absolute(work_dir).unwrap_or_else(|_| work_dir.to_path_buf());
    let absolute = normalize(&work_dir.join(file));
    let root = normalize(root);

    let relative = match absolute.strip_prefix(&root) {
        Ok(relative) => relative.to_path_buf(),
        Err(_) => strip_canonical(&root, &absolute)
            .ok_or_else(|| LinkError::FileOutsideRepository { path: absolute.clone() })?,
    };

    let segments: Vec<String> = relative
        .components()
        .map(|c| encode_os_segment(c.as_os_str()))
        .collect();

    // Linking the root itself means there is no file
    if segments.is_empty() {
        return Err(LinkError::NoActiveFile);
    }

    Ok(format!("/{}", segments.join("/")))
}

/// Retry the prefix match on canonical paths, for symlinked checkouts such as
/// `/tmp` -> `/private/tmp`.
fn strip_canonical(root: &Path, absolute: &Path) -> Option<PathBuf> {
    let root = root.canonicalize().ok()?;
    let absolute = absolute.canonicalize().ok()?;
    absolute.strip_prefix(root).ok().map(Path::to_path_buf)
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    normalized
}
