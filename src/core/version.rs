use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

const RELEASE_RANK: u8 = 5;

/// A version string with a total order.
///
/// Identity is the exact (trimmed) string: `1.0` and `1` are different
/// releases. Ordering tokenises the string into numeric and qualifier items and
/// compares them position by position, so `1.2 < 1.10` and
/// `1.0-alpha < 1.0-rc1 < 1.0 < 1.0-sp`. Two versions that compare equal
/// item-wise (`1` and `1.0`) are ordered by their raw strings so that `Ord`
/// agrees with `Eq`; use [`Version::semantic_cmp`] to ignore that tie-break.
#[derive(Debug, Clone)]
pub struct Version {
    raw: String,
    items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    /// Digits with leading zeros stripped; zero is the empty string.
    Number(String),
    /// Lowercased qualifier with aliases folded; release is the empty string.
    Qualifier(String),
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into().trim().to_string();
        let items = tokenize(&raw);
        Self { raw, items }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn semantic_cmp(&self, other: &Self) -> Ordering {
        compare_items(&self.items, &other.items)
    }

    pub fn is_semantically_equal(&self, other: &Self) -> bool {
        self.semantic_cmp(other) == Ordering::Equal
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.semantic_cmp(other)
            .then_with(|| self.raw.cmp(&other.raw))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for Version {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Version {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<String> for Version {
    fn from(raw: String) -> Self {
        Self::new(raw)
    }
}

impl Item {
    fn number(digits: &str) -> Self {
        Item::Number(digits.trim_start_matches('0').to_string())
    }

    fn qualifier(text: &str) -> Self {
        let lower = text.to_ascii_lowercase();
        let folded = match lower.as_str() {
            "a" => "alpha",
            "b" => "beta",
            "m" => "milestone",
            "cr" => "rc",
            "ga" | "final" | "release" => "",
            other => other,
        };
        Item::Qualifier(folded.to_string())
    }

    fn is_null(&self) -> bool {
        match self {
            Item::Number(digits) => digits.is_empty(),
            Item::Qualifier(text) => text.is_empty(),
        }
    }

    fn cmp_item(&self, other: &Item) -> Ordering {
        match (self, other) {
            (Item::Number(a), Item::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Item::Number(_), Item::Qualifier(_)) => Ordering::Greater,
            (Item::Qualifier(_), Item::Number(_)) => Ordering::Less,
            (Item::Qualifier(a), Item::Qualifier(b)) => (qualifier_rank(a), a.as_str())
                .cmp(&(qualifier_rank(b), b.as_str())),
        }
    }

    fn cmp_null(&self) -> Ordering {
        match self {
            Item::Number(digits) if digits.is_empty() => Ordering::Equal,
            Item::Number(_) => Ordering::Greater,
            Item::Qualifier(text) => qualifier_rank(text).cmp(&RELEASE_RANK),
        }
    }
}

fn qualifier_rank(qualifier: &str) -> u8 {
    match qualifier {
        "alpha" => 0,
        "beta" => 1,
        "milestone" => 2,
        "rc" => 3,
        "snapshot" => 4,
        "" => RELEASE_RANK,
        "sp" => 6,
        _ => 7,
    }
}

fn tokenize(raw: &str) -> Vec<Item> {
    let mut items = Vec::new();
    let mut current = String::new();
    let mut digits = false;

    for ch in raw.chars() {
        if matches!(ch, '.' | '-' | '_') {
            flush(&mut items, &mut current, digits);
            continue;
        }
        let is_digit = ch.is_ascii_digit();
        if !current.is_empty() && is_digit != digits {
            flush(&mut items, &mut current, digits);
        }
        digits = is_digit;
        current.push(ch);
    }
    flush(&mut items, &mut current, digits);

    while items.last().is_some_and(Item::is_null) {
        items.pop();
    }
    items
}

fn flush(items: &mut Vec<Item>, current: &mut String, digits: bool) {
    if current.is_empty() {
        return;
    }
    if digits {
        items.push(Item::number(current));
    } else {
        // zeros ahead of a qualifier carry no weight: 1.0.0-rc1 == 1-rc1
        while matches!(items.last(), Some(Item::Number(n)) if n.is_empty()) {
            items.pop();
        }
        items.push(Item::qualifier(current));
    }
    current.clear();
}

fn compare_items(left: &[Item], right: &[Item]) -> Ordering {
    let len = left.len().max(right.len());
    for idx in 0..len {
        let ord = match (left.get(idx), right.get(idx)) {
            (Some(a), Some(b)) => a.cmp_item(b),
            (Some(a), None) => a.cmp_null(),
            (None, Some(b)) => b.cmp_null().reverse(),
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}
