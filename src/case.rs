/// Rebuild `new` with the capitalization pattern of `current`
///
/// Each character of `new` takes the case of the character at the same
/// position in `current`. When `new` is longer than `current`, the rest of
/// `new` is uppercased if every inspected character of `current` was
/// uppercase, and lowercased otherwise. Characters of `current` beyond the
/// length of `new` are ignored.
///
/// # Arguments
/// * `current` - The text that was matched in the source
/// * `new` - The replacement term
///
/// # Returns
/// * `String` - `new` with the case of `current` applied
pub fn match_case(current: &str, new: &str) -> String {
    let mut result = String::with_capacity(new.len());
    let mut all_upper = true;
    let mut new_chars = new.chars();

    for c in current.chars() {
        let Some(n) = new_chars.next() else {
            break;
        };
        if c.is_uppercase() {
            result.extend(n.to_uppercase());
        } else {
            result.extend(n.to_lowercase());
            all_upper = false;
        }
    }

    let tail = new_chars.as_str();
    if all_upper {
        result.push_str(&tail.to_uppercase());
    } else {
        result.push_str(&tail.to_lowercase());
    }

    result
}
