// Flat key/value view of a result record, consumed by the CSV exporter

pub trait FlatRecord {
    /// Ordered `(column, value)` pairs. Every record of a type yields the same columns.
    fn fields(&self) -> Vec<(&'static str, String)>;
}

/// Formats an optional field, leaving it blank when absent.
pub fn opt_field<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}
