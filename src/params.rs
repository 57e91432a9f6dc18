use std::fmt;

/// Single query parameter value.
///
/// The upstream API takes everything as a string on the wire, but callers
/// naturally hold some filters (page sizes, codes) as numbers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(number) => write!(f, "{number}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// Ordered query parameter container.
///
/// Setting a key that is already present replaces its value, so extra
/// parameters merged in later win over defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a parameter, replacing any existing value for the same key.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        let key = key.into();
        let value = value.into().to_string();
        if let Some(pair) = self.0.iter_mut().find(|(existing, _)| *existing == key) {
            pair.1 = value;
        } else {
            self.0.push((key, value));
        }
        self
    }

    /// Folds every pair of `extra` into `self`, later values winning.
    pub fn merge(self, extra: QueryParams) -> Self {
        extra
            .0
            .into_iter()
            .fold(self, |params, (key, value)| params.set(key, value))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value.as_str())
    }

    /// Borrows the pairs in insertion order, ready for `reqwest`'s `query`.
    pub fn pairs(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn set_keeps_insertion_order() {
        let params = QueryParams::new()
            .set("estado", "publicada")
            .set("ticket", "abc");
        assert_eq!(
            params.pairs(),
            [
                ("estado".to_owned(), "publicada".to_owned()),
                ("ticket".to_owned(), "abc".to_owned()),
            ]
        );
    }

    #[test]
    fn set_replaces_existing_key() {
        let params = QueryParams::new()
            .set("estado", "publicada")
            .set("estado", "cerrada");
        assert_eq!(params.get("estado"), Some("cerrada"));
        assert_eq!(params.pairs().len(), 1);
    }

    #[test]
    fn merge_lets_extras_override() {
        let base = QueryParams::new()
            .set("estado", "publicada")
            .set("ticket", "abc");
        let merged = base.merge(QueryParams::new().set("estado", "cerrada").set("fecha", "02022024"));
        assert_eq!(merged.get("estado"), Some("cerrada"));
        assert_eq!(merged.get("ticket"), Some("abc"));
        assert_eq!(merged.get("fecha"), Some("02022024"));
    }

    #[test]
    fn numbers_render_as_strings() {
        let params = QueryParams::new().set("pagina", 3u32);
        assert_eq!(params.get("pagina"), Some("3"));
    }
}
