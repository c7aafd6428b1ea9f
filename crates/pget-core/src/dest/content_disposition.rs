//! Content-Disposition filename extraction (`filename` and RFC 5987 `filename*`).

/// Pulls the save-as filename out of a raw `Content-Disposition` value.
///
/// `filename*=utf-8''<pct-encoded>` wins over plain `filename=`; quoted
/// values are unquoted with `\"` and `\\` unescaped. Returns `None` when
/// neither parameter yields a non-empty name.
pub fn parse_content_disposition_filename(header_value: &str) -> Option<String> {
    let mut plain: Option<String> = None;

    for param in header_value.split(';') {
        let Some((name, value)) = param.split_once('=') else {
            continue;
        };
        let name = name.trim().to_ascii_lowercase();
        let value = value.trim();

        if name == "filename*" {
            if let Some(decoded) = decode_ext_value(value) {
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        } else if name == "filename" {
            let unquoted = unquote(value);
            if !unquoted.is_empty() {
                plain = Some(unquoted);
            }
        }
    }

    plain
}

/// RFC 5987 ext-value with the UTF-8 charset and no language tag:
/// `utf-8''caf%C3%A9.txt`. Other charsets are not decoded.
fn decode_ext_value(value: &str) -> Option<String> {
    let prefix = value.get(..7)?;
    if !prefix.eq_ignore_ascii_case("utf-8''") {
        return None;
    }
    Some(percent_decode(&value[7..]))
}

/// Strips surrounding quotes and unescapes `\"` and `\\`. Bare tokens pass
/// through unchanged.
fn unquote(value: &str) -> String {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' && matches!(chars.peek(), Some('"') | Some('\\')) {
            out.push(chars.next().unwrap());
        } else {
            out.push(c);
        }
    }
    out
}

/// Lenient percent-decoding: malformed escapes are kept literally.
fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match (
            bytes[i],
            bytes.get(i + 1).and_then(hex),
            bytes.get(i + 2).and_then(hex),
        ) {
            (b'%', Some(hi), Some(lo)) => {
                out.push(hi << 4 | lo);
                i += 3;
            }
            (b, _, _) => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex(b: &u8) -> Option<u8> {
    match *b {
        b'0'..=b'9' => Some(*b - b'0'),
        b'a'..=b'f' => Some(*b - b'a' + 10),
        b'A'..=b'F' => Some(*b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_filename() {
        let r = parse_content_disposition_filename("attachment; filename=\"report.pdf\"");
        assert_eq!(r.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn bare_token_filename() {
        let r = parse_content_disposition_filename("attachment; filename=report.pdf");
        assert_eq!(r.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn escaped_quotes_inside_quoted_value() {
        let r = parse_content_disposition_filename(r#"attachment; filename="a \"b\" c.txt""#);
        assert_eq!(r.as_deref(), Some(r#"a "b" c.txt"#));
    }

    #[test]
    fn ext_value_decodes_utf8() {
        let r = parse_content_disposition_filename("attachment; filename*=UTF-8''caf%C3%A9.txt");
        assert_eq!(r.as_deref(), Some("café.txt"));
    }

    #[test]
    fn ext_value_wins_over_plain() {
        let r = parse_content_disposition_filename(
            "attachment; filename=\"fallback.bin\"; filename*=utf-8''real%20name.dat",
        );
        assert_eq!(r.as_deref(), Some("real name.dat"));
    }

    #[test]
    fn unknown_charset_falls_back_to_plain() {
        let r = parse_content_disposition_filename(
            "attachment; filename*=iso-8859-1''n%E4me.txt; filename=\"plain.txt\"",
        );
        assert_eq!(r.as_deref(), Some("plain.txt"));
    }

    #[test]
    fn nothing_usable() {
        assert_eq!(parse_content_disposition_filename("inline"), None);
        assert_eq!(parse_content_disposition_filename("attachment; filename=\"\""), None);
    }

    #[test]
    fn malformed_percent_escape_kept_literally() {
        let r = parse_content_disposition_filename("attachment; filename*=utf-8''bad%zzname");
        assert_eq!(r.as_deref(), Some("bad%zzname"));
    }
}
