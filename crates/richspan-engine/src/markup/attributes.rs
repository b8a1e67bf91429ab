use std::collections::HashMap;

/// Declarations parsed from a `style` attribute, keyed by property name.
pub type StyleMap = HashMap<String, String>;

/// Attributes of an opening tag, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pairs: Vec<(String, String)>,
}

impl Attributes {
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            pairs: pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Value of the first attribute called `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The parsed `style` attribute, empty when there is none.
    pub fn style_map(&self) -> StyleMap {
        self.get("style").map(parse_style_attribute).unwrap_or_default()
    }
}

/// Parse `key:value;key:value`.
///
/// Empty declarations and declarations without exactly one `:` are skipped.
/// Keys are lower-cased, both sides trimmed, and a later key wins.
pub fn parse_style_attribute(style: &str) -> StyleMap {
    let mut map = StyleMap::new();
    for declaration in style.split(';') {
        let declaration = declaration.trim();
        if declaration.is_empty() {
            continue;
        }
        let mut parts = declaration.split(':');
        let (Some(key), Some(value), None) = (parts.next(), parts.next(), parts.next()) else {
            continue;
        };
        let key = key.trim().to_ascii_lowercase();
        if key.is_empty() {
            continue;
        }
        map.insert(key, value.trim().to_string());
    }
    map
}
