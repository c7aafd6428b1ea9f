//! Filename sanitizing for names derived from URLs and response headers.

/// Longest filename most Linux filesystems accept, in bytes.
const NAME_MAX: usize = 255;

/// Rewrites `name` into something safe to create in the download directory.
///
/// Path separators, control characters, and whitespace become `_` (runs
/// collapse to one), leading and trailing junk is trimmed, and the result
/// is capped at [`NAME_MAX`] bytes on a character boundary. May return an
/// empty string; callers fall back to a default name in that case.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        let mapped = match c {
            '/' | '\\' => '_',
            c if c.is_control() => '_',
            ' ' | '\t' => '_',
            c => c,
        };
        if mapped == '_' && out.ends_with('_') {
            continue;
        }
        out.push(mapped);
    }

    let trimmed = out.trim_matches(|c| matches!(c, ' ' | '\t' | '.' | '_'));

    let mut capped = String::with_capacity(trimmed.len().min(NAME_MAX));
    for c in trimmed.chars() {
        if capped.len() + c.len_utf8() > NAME_MAX {
            break;
        }
        capped.push(c);
    }
    capped
}
