//! XML escaping for substitution values.

use std::borrow::Cow;

/// Returns true if `c` is allowed in an XML 1.0 document.
///
/// Surrogates cannot occur in a `char`, so the only excluded characters are
/// the C0 controls other than tab, line feed and carriage return, and the
/// two noncharacters U+FFFE and U+FFFF.
pub fn is_xml_char(c: char) -> bool {
    match c {
        '\t' | '\n' | '\r' => true,
        '\u{0}'..='\u{1F}' => false,
        '\u{FFFE}' | '\u{FFFF}' => false,
        _ => true,
    }
}

fn entity(c: char) -> Option<&'static str> {
    match c {
        '&' => Some("&amp;"),
        '<' => Some("&lt;"),
        '>' => Some("&gt;"),
        '"' => Some("&quot;"),
        '\'' => Some("&apos;"),
        _ => None,
    }
}

/// Escapes `value` for use in XML text or attribute content.
///
/// Returns the value unchanged (borrowed) when nothing needs escaping. A
/// character that XML cannot represent, even as a character reference, is
/// returned as the error.
///
/// ```rust
/// use slidefill::template::escape_xml;
///
/// assert_eq!(escape_xml("A & B").unwrap(), "A &amp; B");
/// assert_eq!(escape_xml("plain").unwrap(), "plain");
/// assert_eq!(escape_xml("bell\u{7}"), Err('\u{7}'));
/// ```
pub fn escape_xml(value: &str) -> Result<Cow<'_, str>, char> {
    let Some(first) = value.find(|c: char| entity(c).is_some() || !is_xml_char(c)) else {
        return Ok(Cow::Borrowed(value));
    };

    let mut out = String::with_capacity(value.len() + 16);
    out.push_str(&value[..first]);
    for c in value[first..].chars() {
        if !is_xml_char(c) {
            return Err(c);
        }
        match entity(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    Ok(Cow::Owned(out))
}
