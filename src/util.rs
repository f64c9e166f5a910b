use std::path::Path;

/// `path` relative to `base` when it lies inside it.
pub fn display_path(path: &Path, base: Option<&Path>) -> String {
    if let Some(base) = base {
        if let Ok(relative) = path.strip_prefix(base) {
            return relative.display().to_string();
        }
    }
    path.display().to_string()
}

pub fn truncate_bytes(bytes: &[u8], max_bytes: usize) -> String {
    let text = String::from_utf8_lossy(bytes);
    truncate_string(&text, max_bytes)
}

pub fn truncate_string(text: &str, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text.to_string();
    }
    let mut truncated = String::new();
    for ch in text.chars() {
        if truncated.len() + ch.len_utf8() > max_bytes {
            break;
        }
        truncated.push(ch);
    }
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn display_path_strips_base() {
        let base = PathBuf::from("/work/out");
        assert_eq!(
            display_path(&base.join("login/index.html"), Some(&base)),
            "login/index.html"
        );
        assert_eq!(
            display_path(Path::new("/elsewhere/x"), Some(&base)),
            "/elsewhere/x"
        );
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("héllo", 2), "h");
        assert_eq!(truncate_bytes(b"abcdef", 3), "abc");
    }
}
