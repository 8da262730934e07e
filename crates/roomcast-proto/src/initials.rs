//! Avatar initials derived from a display name.

/// Placeholder used when no usable name is available.
pub const UNKNOWN_INITIALS: &str = "??";

/// Compute the avatar initials for a display name.
///
/// - blank or missing names give [`UNKNOWN_INITIALS`]
/// - a single word gives its first two characters, or only the first one
///   when the word looks like an email address
/// - several words give the first letter of the first and last word,
///   restricted to ASCII letters and digits; when nothing survives that
///   filter the first two characters of the first word are used
///
/// ```
/// use roomcast_proto::compute_initials;
///
/// assert_eq!(compute_initials(Some("Ana Souza")), "AS");
/// assert_eq!(compute_initials(Some("joao")), "JO");
/// assert_eq!(compute_initials(Some("maria@example.com")), "M");
/// assert_eq!(compute_initials(None), "??");
/// ```
pub fn compute_initials(name: Option<&str>) -> String {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return UNKNOWN_INITIALS.to_string();
    };

    let parts: Vec<&str> = name.split_whitespace().collect();
    match parts.as_slice() {
        [] => UNKNOWN_INITIALS.to_string(),
        [single] => {
            if single.contains('@') {
                single
                    .chars()
                    .next()
                    .map(|c| c.to_uppercase().collect())
                    .unwrap_or_else(|| UNKNOWN_INITIALS.to_string())
            } else {
                leading(single, 2).to_uppercase()
            }
        }
        [first, .., last] => {
            let combination: String = first
                .chars()
                .take(1)
                .chain(last.chars().take(1))
                .filter(char::is_ascii_alphanumeric)
                .collect();
            if combination.is_empty() {
                leading(first, 2).to_uppercase()
            } else {
                combination.to_uppercase()
            }
        }
    }
}

fn leading(word: &str, count: usize) -> &str {
    match word.char_indices().nth(count) {
        Some((idx, _)) => &word[..idx],
        None => word,
    }
}
