/// Makes a title safe to use as a single path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let cleaned = cleaned.trim();

    match cleaned {
        "" | "." | ".." => "_".to_string(),
        other => other.to_string(),
    }
}

/// Human-readable size in MB, or `N/A` when unknown.
pub fn format_filesize(bytes: Option<u64>) -> String {
    match bytes {
        Some(b) if b > 0 => format!("{:.1}MB", b as f64 / 1024.0 / 1024.0),
        _ => "N/A".to_string(),
    }
}
