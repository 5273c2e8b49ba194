use std::path::{Component, Path, PathBuf};
use tokio::fs;

/// Avatar extensions in lookup order.
pub const AVATAR_FORMATS: [&str; 6] = ["png", "jpg", "jpeg", "gif", "webp", "svg"];

pub const CACHE_ONE_HOUR: &str = "public, max-age=3600";
pub const NO_CACHE: &str = "no-cache";

pub fn content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css; charset=utf-8",
        "json" => "application/json",
        "txt" => "text/plain; charset=utf-8",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

pub fn cache_control(path: &Path) -> &'static str {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html"));
    if is_html { NO_CACHE } else { CACHE_ONE_HOUR }
}

/// Maps a request path onto a file below `root`.
///
/// Returns `None` for anything that could leave `root` (`..`, absolute
/// segments, drive prefixes) or for an empty path.
pub fn resolve(root: &Path, request_path: &str) -> Option<PathBuf> {
    let relative = Path::new(request_path.trim_start_matches('/'));
    let mut resolved = root.to_path_buf();
    let mut depth = 0;

    for component in relative.components() {
        match component {
            Component::Normal(part) => {
                resolved.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    (depth > 0).then_some(resolved)
}

/// First `avatar.<ext>` found in `dir`, following [`AVATAR_FORMATS`].
pub async fn find_avatar(dir: &Path) -> Option<PathBuf> {
    for format in AVATAR_FORMATS {
        let candidate = dir.join(format!("avatar.{format}"));
        if let Ok(meta) = fs::metadata(&candidate).await {
            if meta.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
