//! Name cleaning for CSS custom properties and download file names.

/// Derive a CSS custom property name (without the leading `--`).
///
/// Characters outside `[a-zA-Z0-9-_]` become `-` and the result is
/// lowercased. With `remove_duplicates`, empty segments are dropped and
/// immediately repeated words collapse (`a-a-b` → `a-b`, `a-b-a` unchanged).
/// The prefix is concatenated as-is; with `remove_duplicates`, a leading name
/// word equal to the prefix's last word is dropped first.
pub fn clean_variable_name(name: &str, prefix: &str, remove_duplicates: bool) -> String {
    let mut clean = replace_invalid(name);

    if remove_duplicates {
        let mut unique: Vec<&str> = Vec::new();
        for word in words(&clean) {
            if unique.last() != Some(&word) {
                unique.push(word);
            }
        }
        clean = unique.join("-");
    }

    if remove_duplicates && !prefix.is_empty() && !clean.is_empty() {
        let prefix_clean = replace_invalid(prefix);
        let prefix_last = words(&prefix_clean).last().copied();
        let mut name_words = words(&clean);

        if prefix_last.is_some() && prefix_last == name_words.first().copied() {
            name_words.remove(0);
            return format!("{prefix}{}", name_words.join("-"));
        }
    }

    format!("{prefix}{clean}")
}

/// Replace every non-alphanumeric character with `_` for use in file names.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else {
            // One replacement per UTF-16 unit, as the host counts characters.
            out.extend(std::iter::repeat('_').take(c.len_utf16()));
        }
    }
    out
}

fn replace_invalid(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
            out.push(c.to_ascii_lowercase());
        } else {
            out.extend(std::iter::repeat('-').take(c.len_utf16()));
        }
    }
    out
}

fn words(s: &str) -> Vec<&str> {
    s.split('-').filter(|w| !w.is_empty()).collect()
}
