/// Build the name shown for a track from its file name.
///
/// Drops the extension, then any leading run of track-number groups such as
/// `"01 "`, `"01 - "` or `"1. 2. "`, then surrounding whitespace.
/// Falls back to the stem when nothing would be left.
pub fn display_name(file_name: &str) -> String {
    let stem = strip_extension(file_name);
    let stripped = strip_number_prefix(stem).trim();
    if stripped.is_empty() {
        stem.trim().to_string()
    } else {
        stripped.to_string()
    }
}

fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(pos) if pos > 0 && pos + 1 < name.len() && !name[pos + 1..].contains('/') => {
            &name[..pos]
        }
        _ => name,
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == '.' || c == '-'
}

/// Remove every leading `digits + separators` group.
fn strip_number_prefix(s: &str) -> &str {
    let mut rest = s;
    loop {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return rest;
        }
        let after_digits = &rest[digits..];
        let seps = after_digits.len() - after_digits.trim_start_matches(is_separator).len();
        if seps == 0 {
            return rest;
        }
        rest = &after_digits[seps..];
    }
}
