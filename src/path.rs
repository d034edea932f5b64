use memchr::{memchr2, memchr3, memmem};
use smallvec::SmallVec;
use smol_str::SmolStr;

use crate::{Error, Result};

/// One unit of a decoded path: an object key or an array index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(SmolStr),
    Index(usize),
}

impl Segment {
    pub fn is_index(&self) -> bool {
        matches!(self, Segment::Index(_))
    }

    /// Classify a fragment. `usize` parsing is the single numeric
    /// convention everywhere: `"01"` is index 1, `"-1"` and `"+1"` fail
    /// the parse and stay names.
    pub fn classify(fragment: &str) -> Segment {
        match fragment.parse::<usize>() {
            Ok(index) => Segment::Index(index),
            Err(_) => Segment::Key(SmolStr::new(fragment)),
        }
    }
}

pub type Segments = SmallVec<[Segment; 8]>;

/// True when the key uses any bracket/dot path syntax at all.
pub(crate) fn has_path_syntax(key: &str) -> bool {
    memchr2(b'.', b'[', key.as_bytes()).is_some()
}

/// Fragments of `key` between `.`, `[` and `]`, empties included.
fn fragments(key: &str) -> impl Iterator<Item = &str> {
    let mut start = 0;
    std::iter::from_fn(move || {
        if start > key.len() {
            return None;
        }
        match memchr3(b'.', b'[', b']', &key.as_bytes()[start..]) {
            Some(offset) => {
                let fragment = &key[start..start + offset];
                start += offset + 1;
                Some(fragment)
            }
            None => {
                let fragment = &key[start..];
                start = key.len() + 1;
                Some(fragment)
            }
        }
    })
}

/// Lenient split used by the flat-key normalizer: empty fragments are
/// silently dropped and nothing fails.
pub fn split_key(key: &str) -> Segments {
    fragments(key)
        .filter(|fragment| !fragment.is_empty())
        .map(Segment::classify)
        .collect()
}

/// Strict parse used by the accessors. Rejects empty paths, literal
/// consecutive dots, and paths with no segments at all. Bracket forms
/// (`a[0].b`) pass: the gap between `]` and `.` is structural.
pub fn parse_path(path: &str) -> Result<Segments> {
    if path.is_empty() {
        return Err(Error::invalid_path(path, "empty path"));
    }
    if memmem::find(path.as_bytes(), b"..").is_some() {
        return Err(Error::invalid_path(path, "consecutive separators"));
    }
    let segments = split_key(path);
    if segments.is_empty() {
        return Err(Error::invalid_path(path, "no segments"));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn key(name: &str) -> Segment {
        Segment::Key(SmolStr::new(name))
    }

    #[rstest]
    #[case("a[0]", vec![key("a"), Segment::Index(0)])]
    #[case("a.0", vec![key("a"), Segment::Index(0)])]
    #[case("a[0].b", vec![key("a"), Segment::Index(0), key("b")])]
    #[case("user.address[2].street", vec![key("user"), key("address"), Segment::Index(2), key("street")])]
    #[case("tags[]", vec![key("tags")])]
    #[case("a..b", vec![key("a"), key("b")])]
    #[case("...", vec![])]
    fn test_split_key(#[case] input: &str, #[case] expected: Vec<Segment>) {
        assert_eq!(split_key(input).into_vec(), expected);
    }

    #[rstest]
    #[case("01", Segment::Index(1))]
    #[case("0", Segment::Index(0))]
    #[case("-1", key("-1"))]
    #[case("+1", key("+1"))]
    #[case("name", key("name"))]
    #[case("4a", key("4a"))]
    fn test_classify(#[case] fragment: &str, #[case] expected: Segment) {
        assert_eq!(Segment::classify(fragment), expected);
    }

    #[rstest]
    #[case("a.b[0].c")]
    #[case("a[0]")]
    #[case("a")]
    fn test_parse_path_accepts(#[case] path: &str) {
        assert!(parse_path(path).is_ok());
    }

    #[rstest]
    #[case("")]
    #[case("user..name")]
    #[case("..")]
    #[case("[]")]
    fn test_parse_path_rejects(#[case] path: &str) {
        let err = parse_path(path).unwrap_err();
        assert!(err.is_invalid_path());
    }

    #[rstest]
    fn test_has_path_syntax() {
        assert!(has_path_syntax("a.b"));
        assert!(has_path_syntax("a[0]"));
        assert!(!has_path_syntax("plain_key"));
        assert!(!has_path_syntax("close]only"));
    }
}
