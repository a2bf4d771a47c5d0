//! Fuzzy matching for station names.

/// True if `input` occurs anywhere in `candidate`, ignoring case.
///
/// The candidate is trimmed from the left one character at a time until the
/// input is a prefix of what remains, or the remainder is shorter than the
/// input. An empty input matches everything.
pub fn matches(input: &str, candidate: &str) -> bool {
    let input = input.to_lowercase();
    let candidate = candidate.to_lowercase();
    let input_len = input.chars().count();

    let mut rest = candidate.as_str();
    let mut rest_len = candidate.chars().count();

    while input_len <= rest_len {
        if rest.starts_with(&input) {
            return true;
        }
        let mut chars = rest.chars();
        chars.next();
        rest = chars.as_str();
        rest_len -= 1;
    }
    false
}
