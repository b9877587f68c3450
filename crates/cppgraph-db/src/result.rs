//! Result handling: a thin, typed view over the store's tabular output.

use cozo::{DataValue, NamedRows};

use crate::error::DbError;

/// One query's tabular result.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<DataValue>>,
}

impl From<NamedRows> for QueryResult {
    fn from(named: NamedRows) -> Self {
        Self {
            headers: named.headers,
            rows: named.rows,
        }
    }
}

impl QueryResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Position of a named column.
    pub fn column(&self, name: &str) -> Result<usize, DbError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DbError::ResultShape(format!("no column `{name}`")))
    }

    /// The single integer a count-style query returns.
    pub fn single_int(&self) -> Result<i64, DbError> {
        self.rows
            .first()
            .and_then(|r| r.first())
            .and_then(DataValue::get_int)
            .ok_or_else(|| DbError::ResultShape("expected one integer cell".into()))
    }

    /// All values of one column as strings; non-string cells are skipped.
    pub fn string_column(&self, name: &str) -> Result<Vec<String>, DbError> {
        let idx = self.column(name)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|r| r.get(idx).and_then(|v| v.get_str()).map(str::to_owned))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> QueryResult {
        QueryResult {
            headers: vec!["name".into(), "count".into()],
            rows: vec![
                vec![DataValue::from("Animal"), DataValue::from(2_i64)],
                vec![DataValue::from("Dog"), DataValue::from(1_i64)],
            ],
        }
    }

    #[test]
    fn column_lookup_and_extraction() {
        let r = sample();
        assert_eq!(r.column("count").unwrap(), 1);
        assert_eq!(
            r.string_column("name").unwrap(),
            vec!["Animal".to_owned(), "Dog".to_owned()]
        );
        assert!(r.column("missing").is_err());
    }
}
