//! Path normalization
//!
//! String-level path handling shared by the resolver, the policy engine and
//! the traversal operations. Nothing in here touches the filesystem.

/// Unify separators and collapse repeated slashes.
///
/// Backslashes become forward slashes and any run of `/` becomes a single one.
/// The function is idempotent.
pub fn clean(path: &str) -> String {
    let mut cleaned = String::with_capacity(path.len());
    let mut previous_slash = false;

    for ch in path.chars() {
        let ch = if ch == '\\' { '/' } else { ch };
        if ch == '/' {
            if previous_slash {
                continue;
            }
            previous_slash = true;
        } else {
            previous_slash = false;
        }
        cleaned.push(ch);
    }

    cleaned
}

/// Strip trailing separators, keeping a lone `/` intact
pub fn trim_trailing(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && path.starts_with('/') {
        "/"
    } else {
        trimmed
    }
}

/// Express `absolute` relative to `root`.
///
/// `root` must be a strict prefix of `absolute` ending on a component
/// boundary, so `/a/b` is not a prefix of `/a/bc/x`. The result is cleaned and
/// starts with `/`; an empty string means either "not under root" or "the root
/// itself".
pub fn to_relative(absolute: &str, root: &str) -> String {
    let root = root.trim_end_matches('/');

    let Some(rest) = absolute.strip_prefix(root) else {
        return String::new();
    };

    if rest.is_empty() {
        return String::new();
    }

    if !root.is_empty() && !rest.starts_with(['/', '\\']) {
        return String::new();
    }

    clean(&format!("/{rest}"))
}

/// Build the public-facing path of `absolute` under `dynamic_root`
pub fn to_dynamic(absolute: &str, dynamic_root: &str, root: &str) -> String {
    clean(&format!("{}/{}", dynamic_root, to_relative(absolute, root)))
}

/// Whether `path` designates the root folder itself
pub fn is_root_folder(path: &str, root: &str) -> bool {
    path.trim_end_matches('/') == root.trim_end_matches('/')
}

/// Last component of a path, ignoring trailing separators
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed.rsplit(['/', '\\']).next().unwrap_or(trimmed)
}

/// Text after the last dot of the basename, empty when there is none
pub fn extension(path: &str) -> &str {
    let name = basename(path);
    match name.rfind('.') {
        Some(idx) => &name[idx + 1..],
        None => "",
    }
}
