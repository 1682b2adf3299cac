/// Split a string into lowercase alphanumeric tokens.
///
/// Any character outside `[a-zA-Z0-9]` is a delimiter. This is the token
/// definition used both for the word log and for information-value scoring.
pub fn tokenize(s: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            current.push(ch.to_ascii_lowercase());
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
