use similar::TextDiff;

/// Returned instead of a diff when both sides are identical.
pub const NO_DIFFERENCES: &str = "(no differences)";

const CONTEXT_LINES: usize = 3;

/// Line-based unified diff of `old` against `new`.
pub fn unified_diff(old: &str, new: &str, old_label: &str, new_label: &str) -> String {
    if old == new {
        return NO_DIFFERENCES.to_string();
    }

    TextDiff::from_lines(old, new)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(old_label, new_label)
        .to_string()
}
