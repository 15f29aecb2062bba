//! Query string decoding.

use std::collections::HashMap;

use percent_encoding::percent_decode_str;

/// Percent-decode one URI component.
///
/// `+` is left as is. Invalid UTF-8 sequences decode to U+FFFD instead of
/// failing.
pub fn decode_component(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

/// Parse `a=1&b=x%20y&flag` into a map, merging into `into`.
///
/// A leading `?` is ignored. Each pair splits on its first `=`; a pair
/// without one maps to an empty value. Empty pairs are skipped and later
/// keys overwrite earlier ones.
pub fn parse_query_into(query: &str, into: &mut HashMap<String, String>) {
    let query = query.strip_prefix('?').unwrap_or(query);
    for pair in query.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        into.insert(decode_component(key), decode_component(value));
    }
}

pub fn parse_query(query: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    parse_query_into(query, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_pairs() {
        let q = parse_query("?a=1&b=two");
        assert_eq!(q.len(), 2);
        assert_eq!(q["a"], "1");
        assert_eq!(q["b"], "two");
    }

    #[test]
    fn test_split_on_first_equals() {
        let q = parse_query("expr=a=b");
        assert_eq!(q["expr"], "a=b");
    }

    #[test]
    fn test_missing_value_is_empty() {
        let q = parse_query("flag&x=");
        assert_eq!(q["flag"], "");
        assert_eq!(q["x"], "");
    }

    #[test]
    fn test_percent_decoding_keeps_plus() {
        let q = parse_query("name%20full=Ann%20Lee&sum=1+1");
        assert_eq!(q["name full"], "Ann Lee");
        assert_eq!(q["sum"], "1+1");
    }

    #[test]
    fn test_empty_and_blank_pairs() {
        assert!(parse_query("").is_empty());
        assert!(parse_query("?").is_empty());
        assert_eq!(parse_query("a=1&&b=2").len(), 2);
    }

    #[test]
    fn test_invalid_utf8_is_lossy() {
        assert_eq!(decode_component("%FF"), "\u{FFFD}");
    }
}
