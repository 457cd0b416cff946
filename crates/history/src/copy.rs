use colsnap_common::{Column, ColumnData};

/// Errors from duplicating column data.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    #[error("column `{column}` holds a `{type_name}` buffer that cannot be duplicated")]
    Uncopyable { column: String, type_name: String },
}

/// Copy one column so the result shares no bulk storage with `column`.
///
/// Columns are classified with [`Column::is_bulk_buffer`]. Bulk buffers are
/// duplicated element-wise. Anything else is copied by reference: string
/// and opaque payloads stay shared behind their `Arc`.
pub fn deep_copy_column(name: &str, column: &Column) -> Result<Column, CopyError> {
    if !column.is_bulk_buffer() {
        return Ok(column.clone());
    }
    let copy = match column {
        Column::Values(v) => Column::Values(v.to_vec()),
        Column::Float64(v) => Column::Float64(v.to_vec()),
        Column::Float32(v) => Column::Float32(v.to_vec()),
        Column::Int64(v) => Column::Int64(v.to_vec()),
        Column::Int32(v) => Column::Int32(v.to_vec()),
        Column::UInt8(v) => Column::UInt8(v.to_vec()),
        Column::Bool(v) => Column::Bool(v.to_vec()),
        Column::Foreign(buf) => {
            let dup = buf.try_duplicate().ok_or_else(|| CopyError::Uncopyable {
                column: name.to_string(),
                type_name: buf.type_name().to_string(),
            })?;
            Column::Foreign(dup)
        }
        // Non-bulk columns returned above.
        Column::Scalar(_) => column.clone(),
    };
    Ok(copy)
}

/// Copy every column of a source's data.
///
/// Fails on the first uncopyable column; nothing partial is returned.
pub fn capture_columns(data: &ColumnData) -> Result<ColumnData, CopyError> {
    data.iter()
        .map(|(name, column)| -> Result<(String, Column), CopyError> {
            Ok((name.clone(), deep_copy_column(name, column)?))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use colsnap_common::{ForeignBuffer, Value};
    use std::cell::RefCell;
    use std::sync::Arc;

    /// A foreign buffer with interior mutability, so aliasing would show.
    #[derive(Debug)]
    struct Cells(RefCell<Vec<u16>>);

    impl ForeignBuffer for Cells {
        fn type_name(&self) -> &str {
            "cells"
        }
        fn len(&self) -> usize {
            self.0.borrow().len()
        }
        fn try_duplicate(&self) -> Option<Arc<dyn ForeignBuffer>> {
            Some(Arc::new(Cells(RefCell::new(self.0.borrow().clone()))))
        }
    }

    #[derive(Debug)]
    struct Pinned;

    impl ForeignBuffer for Pinned {
        fn type_name(&self) -> &str {
            "pinned"
        }
        fn len(&self) -> usize {
            0
        }
        fn try_duplicate(&self) -> Option<Arc<dyn ForeignBuffer>> {
            None
        }
    }

    #[test]
    fn typed_buffer_copy_is_independent() {
        let mut live = Column::Float64(vec![1.0, 2.0]);
        let copy = deep_copy_column("x", &live).unwrap();
        if let Column::Float64(v) = &mut live {
            v[0] = 99.0;
        }
        assert_eq!(copy, Column::Float64(vec![1.0, 2.0]));
    }

    #[test]
    fn value_sequence_copies_container_but_shares_strings() {
        let live = Column::values(["a", "b"]);
        let copy = deep_copy_column("y", &live).unwrap();
        assert_eq!(copy, live);
        match (&live, &copy) {
            (Column::Values(a), Column::Values(b)) => {
                assert_ne!(a.as_ptr(), b.as_ptr());
                match (&a[0], &b[0]) {
                    (Value::Str(sa), Value::Str(sb)) => assert!(Arc::ptr_eq(sa, sb)),
                    _ => panic!("expected strings"),
                }
            }
            _ => panic!("expected value columns"),
        }
    }

    #[test]
    fn scalar_column_is_reference_copied() {
        let payload: Arc<str> = Arc::from("units: metres");
        let live = Column::Scalar(Value::Str(Arc::clone(&payload)));
        let copy = deep_copy_column("meta", &live).unwrap();
        match copy {
            Column::Scalar(Value::Str(p)) => assert!(Arc::ptr_eq(&p, &payload)),
            other => panic!("unexpected copy {other:?}"),
        }
    }

    fn shares_storage(a: &Column, b: &Column) -> bool {
        match (a, b) {
            (Column::Values(x), Column::Values(y)) => x.as_ptr() == y.as_ptr(),
            (Column::Float64(x), Column::Float64(y)) => x.as_ptr() == y.as_ptr(),
            (Column::UInt8(x), Column::UInt8(y)) => x.as_ptr() == y.as_ptr(),
            (Column::Scalar(Value::Str(x)), Column::Scalar(Value::Str(y))) => Arc::ptr_eq(x, y),
            _ => false,
        }
    }

    #[test]
    fn only_non_bulk_columns_share_storage() {
        let columns = [
            Column::values(["a"]),
            Column::Float64(vec![1.0]),
            Column::UInt8(vec![7]),
            Column::Scalar(Value::from("m")),
        ];
        for live in &columns {
            let copy = deep_copy_column("c", live).unwrap();
            assert_eq!(&copy, live);
            assert_eq!(shares_storage(live, &copy), !live.is_bulk_buffer());
        }
    }

    #[test]
    fn foreign_buffer_is_duplicated() {
        let buf = Arc::new(Cells(RefCell::new(vec![1, 2, 3])));
        let live = Column::Foreign(buf.clone());
        let copy = deep_copy_column("raw", &live).unwrap();
        buf.0.borrow_mut()[0] = 42;
        assert_ne!(copy, live);
        assert_eq!(copy.len(), 3);
    }

    #[test]
    fn uncopyable_foreign_buffer_is_an_error() {
        let live = Column::Foreign(Arc::new(Pinned));
        let err = deep_copy_column("gpu", &live).unwrap_err();
        let CopyError::Uncopyable { column, type_name } = err;
        assert_eq!(column, "gpu");
        assert_eq!(type_name, "pinned");
    }

    #[test]
    fn capture_columns_copies_every_column() {
        let mut data = ColumnData::new();
        data.insert("x".into(), Column::Int64(vec![1, 2, 3]));
        data.insert("y".into(), Column::values(["a", "b", "c"]));
        let copy = capture_columns(&data).unwrap();
        assert_eq!(copy, data);
    }

    #[test]
    fn capture_columns_fails_on_any_uncopyable_column() {
        let mut data = ColumnData::new();
        data.insert("ok".into(), Column::Int64(vec![1]));
        data.insert("bad".into(), Column::Foreign(Arc::new(Pinned)));
        assert!(capture_columns(&data).is_err());
    }
}
