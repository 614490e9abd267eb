//! Branch name validation.

/// Validates a branch name before it is turned into `refs/heads/<name>`.
///
/// Returns the reason for rejection when the name is not usable.
pub fn validate_branch_name(name: &str) -> Result<(), &'static str> {
    if name.is_empty() {
        return Err("branch name cannot be empty");
    }

    if name.starts_with('/') || name.ends_with('/') {
        return Err("branch name cannot start or end with '/'");
    }

    if name.starts_with('-') {
        return Err("branch name cannot start with '-'");
    }

    if name.contains("..") {
        return Err("branch name cannot contain '..'");
    }

    if name.contains("//") {
        return Err("branch name cannot contain '//'");
    }

    if name.ends_with(".lock") || name.ends_with('.') {
        return Err("branch name cannot end with '.lock' or '.'");
    }

    if name.contains("@{") {
        return Err("branch name cannot contain '@{'");
    }

    for c in name.chars() {
        if c.is_control()
            || c == ' '
            || c == '~'
            || c == '^'
            || c == ':'
            || c == '?'
            || c == '*'
            || c == '['
            || c == '\\'
        {
            return Err("branch name contains invalid characters");
        }
    }

    Ok(())
}
