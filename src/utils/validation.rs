//! Input validation utilities
//!
//! Screens user-supplied relative paths before they reach the resolver.

/// Longest relative path accepted from a caller
pub const MAX_PATH_LENGTH: usize = 4096;

/// Validate that a relative path is non-empty, free of control characters
/// and has no `.` or `..` segments
pub fn is_valid_input(input: &str) -> bool {
    !input.trim().is_empty()
        && input.len() <= MAX_PATH_LENGTH
        && !input.contains(['\0', '\r', '\n'])
        && !has_dot_segment(input)
}

fn has_dot_segment(input: &str) -> bool {
    input
        .trim()
        .split(['/', '\\'])
        .any(|segment| segment == "." || segment == "..")
}

/// Sanitize user input
pub fn sanitize_input(input: &str) -> String {
    input.trim().to_string()
}
