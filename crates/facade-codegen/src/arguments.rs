use indexmap::IndexMap;

/// Values bound to template placeholders, keyed by placeholder name.
///
/// A key may be bound to `None`, which renders as nothing. Keys that are not bound at all
/// make formatting fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Arguments {
    values: IndexMap<String, Option<String>>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), Some(value.into()));
        self
    }

    pub fn set_null(&mut self, key: impl Into<String>) -> &mut Self {
        self.values.insert(key.into(), None);
        self
    }

    pub fn set_optional(&mut self, key: impl Into<String>, value: Option<impl Into<String>>) -> &mut Self {
        self.values.insert(key.into(), value.map(Into::into));
        self
    }

    /// `None` if the key is not bound, `Some(None)` if it is bound to null.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.values.get(key).map(|value| value.as_deref())
    }
}

impl<K, V> FromIterator<(K, V)> for Arguments
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut arguments = Self::new();

        for (key, value) in iter {
            arguments.set(key, value);
        }

        arguments
    }
}
