use std::path::Path;

/// Read the repository list, one `owner/name` per line.
pub fn load(path: &Path) -> std::io::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(parse(&content))
}

/// Trim every line and drop the blank ones.
pub fn parse(content: &str) -> Vec<String> {
    content
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
