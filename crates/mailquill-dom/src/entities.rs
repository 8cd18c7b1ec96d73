//! Minimal HTML entity decoding.
//!
//! Prefill text arrives from the host document with entities intact; the
//! modal needs the literal characters. Covers the named entities the mail
//! surface actually emits plus numeric references.

/// Decode HTML entities in `input`.
///
/// Unknown entities are passed through verbatim rather than dropped.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        rest = &rest[pos..];
        match decode_one(rest) {
            Some((decoded, consumed)) => {
                out.push_str(&decoded);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Try to decode a single entity at the start of `s` (which begins with
/// `&`). Returns the decoded text and the number of bytes consumed.
fn decode_one(s: &str) -> Option<(String, usize)> {
    let end = s.find(';')?;
    if end < 2 || end > 10 {
        return None;
    }
    let body = &s[1..end];
    let decoded = match body {
        "amp" => "&".to_string(),
        "lt" => "<".to_string(),
        "gt" => ">".to_string(),
        "quot" => "\"".to_string(),
        "apos" => "'".to_string(),
        "nbsp" => "\u{a0}".to_string(),
        _ => {
            let code = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X"))
            {
                u32::from_str_radix(hex, 16).ok()?
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok()?
            } else {
                return None;
            };
            char::from_u32(code)?.to_string()
        }
    };
    Some((decoded, end + 1))
}
