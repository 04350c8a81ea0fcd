use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

/// A catalog row as an opaque field map. Only the fields a run asks for are ever read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductRecord {
    fields: BTreeMap<String, String>,
}

impl ProductRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    /// Returns the field value, treating an empty string the same as an absent field.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str).filter(|value| !value.is_empty())
    }

    pub fn product_id(&self) -> Option<ProductId> {
        self.get(PRODUCT_ID_FIELD).map(|id| ProductId(id.to_string()))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ProductRecord
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { fields: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

pub const PRODUCT_ID_FIELD: &str = "productId";
pub const GENDER_FIELD: &str = "gender";
pub const ARTICLE_TYPE_FIELD: &str = "articleType";
pub const BASE_COLOUR_FIELD: &str = "baseColour";
pub const USAGE_FIELD: &str = "usage";

#[cfg(test)]
mod tests {
    use super::{ProductId, ProductRecord};

    #[test]
    fn empty_values_read_as_missing() {
        let record = ProductRecord::new().with_field("gender", "").with_field("usage", "Casual");

        assert_eq!(record.get("gender"), None);
        assert_eq!(record.get("usage"), Some("Casual"));
        assert_eq!(record.get("articleType"), None);
    }

    #[test]
    fn whitespace_values_are_kept_verbatim() {
        let record = ProductRecord::new().with_field("gender", " ");

        assert_eq!(record.get("gender"), Some(" "));
    }

    #[test]
    fn product_id_reads_the_catalog_key_field() {
        let record: ProductRecord =
            [("productId", "15970"), ("gender", "Men")].into_iter().collect();

        assert_eq!(record.product_id(), Some(ProductId("15970".to_string())));
        assert_eq!(record.len(), 2);
    }

    #[test]
    fn serializes_as_a_flat_object() {
        let record = ProductRecord::new().with_field("gender", "Women");
        let json = serde_json::to_string(&record).expect("serialize record");

        assert_eq!(json, r#"{"gender":"Women"}"#);
    }
}
