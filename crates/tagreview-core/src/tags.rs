//! Release tag selection and ranking.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How release tags are ranked when picking the most recent ones.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TagOrder {
    /// Compare the version after the prefix component-wise, numbers as
    /// integers (`v10.0.0` ranks above `v2.0.0`).
    #[default]
    Numeric,
    /// Compare the tag name minus its first three characters as a plain
    /// string, the historical behavior of this report.
    Lexicographic,
}

impl std::fmt::Display for TagOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Numeric => write!(f, "numeric"),
            Self::Lexicographic => write!(f, "lexicographic"),
        }
    }
}

/// One dot-separated piece of a version string.
///
/// Fields compare in order: pieces without a leading number rank lowest,
/// then the number, then a bare number above the same number with a suffix
/// (`0` above `0-rc1`), then the suffix text.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct Component<'a> {
    number: Option<u64>,
    bare: bool,
    suffix: &'a str,
}

impl<'a> Component<'a> {
    fn parse(part: &'a str) -> Self {
        let split = part
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(part.len());
        let (digits, suffix) = part.split_at(split);
        Self {
            number: digits.parse().ok(),
            bare: suffix.is_empty(),
            suffix,
        }
    }
}

fn numeric_key<'a>(tag: &'a str, prefix: &str) -> Vec<Component<'a>> {
    tag.strip_prefix(prefix)
        .unwrap_or(tag)
        .split('.')
        .map(Component::parse)
        .collect()
}

fn lexicographic_key(tag: &str) -> &str {
    tag.char_indices().nth(3).map_or("", |(i, _)| &tag[i..])
}

/// Compare two tags under `order`, greatest first when used with `sort_by`.
fn compare(order: TagOrder, prefix: &str, a: &str, b: &str) -> Ordering {
    let by_key = match order {
        TagOrder::Numeric => numeric_key(b, prefix).cmp(&numeric_key(a, prefix)),
        TagOrder::Lexicographic => lexicographic_key(b).cmp(lexicographic_key(a)),
    };
    by_key.then_with(|| b.cmp(a))
}

/// Select the `limit` highest-ranked tags starting with `prefix`, best first.
///
/// Tags without the prefix never appear in the result.
pub fn rank_tags<I, S>(tags: I, prefix: &str, order: TagOrder, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut release_tags: Vec<String> = tags
        .into_iter()
        .map(Into::into)
        .filter(|tag| tag.starts_with(prefix))
        .collect();

    release_tags.sort_by(|a, b| compare(order, prefix, a, b));
    release_tags.truncate(limit);
    release_tags
}
