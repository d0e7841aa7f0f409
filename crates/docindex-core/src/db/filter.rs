use crate::value::Value;
use serde::{
    Deserialize, Deserializer,
    de::{MapAccess, Visitor},
};
use std::fmt;

///
/// Filter
///
/// Conjunction of field equality clauses. Clauses are evaluated in the order
/// they were added; deserializing from a map keeps the source order.
///

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    clauses: Vec<(String, Value)>,
}

impl Filter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Add an equality clause.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(field, value);
        self
    }

    pub fn push(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.clauses.push((field.into(), value.into()));
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.clauses.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.clauses
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut filter = Self::new();
        for (field, value) in iter {
            filter.push(field, value);
        }

        filter
    }
}

impl<'de> Deserialize<'de> for Filter {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct FilterVisitor;

        impl<'de> Visitor<'de> for FilterVisitor {
            type Value = Filter;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of field names to scalar values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Filter, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut filter = Filter::new();
                while let Some((field, value)) = map.next_entry::<String, Value>()? {
                    filter.push(field, value);
                }

                Ok(filter)
            }
        }

        deserializer.deserialize_map(FilterVisitor)
    }
}
