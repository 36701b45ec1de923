use indexmap::IndexMap;

/// A stored entry: field name to value, in the order the fields were written.
pub type Record = IndexMap<String, String>;

/// Builds a record from `(field, value)` pairs, keeping their order.
///
/// # Examples
///
/// ```
/// use cm_core::record::from_pairs;
///
/// let record = from_pairs([("command", "ls -la"), ("tag", "fs")]);
/// assert_eq!(record.get("tag").map(String::as_str), Some("fs"));
/// ```
pub fn from_pairs<K, V, I>(pairs: I) -> Record
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(field, value)| (field.into(), value.into()))
        .collect()
}

pub fn field_equals(record: &Record, field: &str, value: &str) -> bool {
    record.get(field).is_some_and(|existing| existing == value)
}
