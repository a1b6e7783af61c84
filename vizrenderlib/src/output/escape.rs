//! String escaping shared by the renderers.

use std::fmt::Write;

/// Quote and escape a string as a JSON string literal.
///
/// Output is pure ASCII: every non-ASCII character is written as `\uXXXX`
/// UTF-16 code units. `<`, `>`, `&` and `'` are escaped as well so that a
/// JSONP body can never terminate the `<script>` element that loads it.
pub fn json_quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '<' | '>' | '&' | '\'' => push_unicode_escape(&mut out, c),
            c if c.is_ascii_control() || !c.is_ascii() => push_unicode_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

fn push_unicode_escape(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        // Writing to a String cannot fail.
        let _ = write!(out, "\\u{:04x}", unit);
    }
}

/// Escape text for an HTML element body or attribute value.
pub fn html_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Quote a delimited-text field when it contains the delimiter, a double
/// quote or a line break. Embedded quotes are doubled.
pub fn delimited_field(value: &str, delimiter: char) -> String {
    if value.contains(delimiter) || value.contains(['"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_quote_plain() {
        assert_eq!(json_quote("aaa"), "\"aaa\"");
        assert_eq!(json_quote(""), "\"\"");
    }

    #[test]
    fn test_json_quote_specials() {
        assert_eq!(json_quote("a\"b\\c"), r#""a\"b\\c""#);
        assert_eq!(json_quote("line\nnext\ttab\r"), r#""line\nnext\ttab\r""#);
        assert_eq!(json_quote("\u{1}"), r#""\u0001""#);
        assert_eq!(json_quote("\u{7f}"), r#""\u007f""#);
    }

    #[test]
    fn test_json_quote_script_breakers() {
        assert_eq!(
            json_quote("</script>&'"),
            r#""\u003c/script\u003e\u0026\u0027""#
        );
    }

    #[test]
    fn test_json_quote_non_ascii() {
        assert_eq!(json_quote("é"), r#""\u00e9""#);
        // Characters outside the BMP become a surrogate pair.
        assert_eq!(json_quote("😀"), r#""\ud83d\ude00""#);
    }

    #[test]
    fn test_json_quote_is_valid_json() {
        let input = "mixed \"quotes\", <tags> & ünïcödé\n";
        let parsed: String = serde_json::from_str(&json_quote(input)).unwrap();
        assert_eq!(parsed, input);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_delimited_field_quoting() {
        assert_eq!(delimited_field("plain", ','), "plain");
        assert_eq!(delimited_field("a,b", ','), "\"a,b\"");
        assert_eq!(delimited_field("a,b", '\t'), "a,b");
        assert_eq!(delimited_field("a\tb", '\t'), "\"a\tb\"");
        assert_eq!(delimited_field("say \"hi\"", ','), "\"say \"\"hi\"\"\"");
        assert_eq!(delimited_field("two\nlines", ','), "\"two\nlines\"");
        assert_eq!(delimited_field("cr\r", ','), "\"cr\r\"");
        assert_eq!(delimited_field("", ','), "");
    }
}
