/// Reduces a plate to uppercase ASCII alphanumerics, the form palindromes are compared in.
pub fn normalize_plate(candidate: &str) -> String {
    candidate
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// True when the normalized plate has at least two characters and reads the same reversed.
pub fn is_palindrome(candidate: &str) -> bool {
    let normalized = normalize_plate(candidate);
    if normalized.len() < 2 {
        return false;
    }

    // normalized form is ASCII, so bytes are characters
    normalized.bytes().eq(normalized.bytes().rev())
}

/// Display form of a plate. Regional layouts vary too much to re-space, so only
/// whitespace is dropped.
pub fn format_license_plate(plate: &str) -> String {
    plate
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
