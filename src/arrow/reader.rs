// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Reading Parquet files into Arrow record batches.
//!
//! [`FileReader`] drives one array reader tree per projected top-level
//! field and assembles the results into a batch sharing the projected
//! schema. Field materialization can fan out over a bounded set of worker
//! threads; outputs land in slots indexed by field position, so the column
//! order is deterministic regardless of scheduling.

use std::cmp;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use arrow::array::{new_empty_array, Array, ArrayRef};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use log::debug;

use crate::arrow::array_reader::{build_reader_tree, FileColumnIterator,
                                 PrimitiveArrayReader};
use crate::arrow::schema::parquet_to_arrow_schema_by_columns;
use crate::column::reader::{ColumnReader, TypedColumnReader};
use crate::data_type::*;
use crate::errors::{ParquetError, Result};
use crate::file::properties::ReaderProperties;
use crate::file::reader::FileReader as ParquetFileReader;
use crate::util::memory::MemoryPoolRef;

/// Reads the columns of a Parquet file as Arrow arrays and record batches.
pub struct FileReader {
  reader: Arc<dyn ParquetFileReader>,
  pool: MemoryPoolRef,
  num_threads: usize,
}

impl FileReader {
  pub fn new(reader: Arc<dyn ParquetFileReader>, pool: MemoryPoolRef) -> Self {
    Self::with_properties(reader, pool, ReaderProperties::default())
  }

  pub fn with_properties(
    reader: Arc<dyn ParquetFileReader>,
    pool: MemoryPoolRef,
    properties: ReaderProperties
  ) -> Self {
    Self { reader, pool, num_threads: properties.num_threads() }
  }

  /// The Arrow schema of the full file, key-value metadata included.
  pub fn schema(&self) -> Result<SchemaRef> {
    let metadata = self.reader.metadata().file_metadata();
    let indices = (0..metadata.schema_descr().num_columns()).collect();
    Ok(Arc::new(parquet_to_arrow_schema_by_columns(
      metadata.schema_descr(), &indices, metadata.key_value_metadata())?))
  }

  pub fn num_row_groups(&self) -> usize {
    self.reader.metadata().num_row_groups()
  }

  /// Worker count for subsequent `read_table`/`read_row_group` calls.
  pub fn set_num_threads(&mut self, num_threads: usize) {
    self.num_threads = num_threads;
  }

  /// Read leaf column `i` across all row groups as a flat array. Nesting,
  /// if any, is not reconstructed here; use `read_schema_field` for that.
  pub fn read_column(&self, i: usize) -> Result<ArrayRef> {
    let metadata = self.reader.metadata();
    let num_columns = metadata.file_metadata().schema_descr().num_columns();
    if i >= num_columns {
      return Err(invalid_err!(
        "column index {} out of range, file has {} columns", i, num_columns));
    }

    let mut batch_size: i64 = 0;
    for j in 0..metadata.num_row_groups() {
      batch_size += metadata.row_group(j).column(i).num_values();
    }

    let iterator = FileColumnIterator::all_row_groups(i, self.reader.clone());
    let mut reader = PrimitiveArrayReader::new(self.pool.clone(), iterator, None)?;
    let array = match reader.next_batch(batch_size as usize)? {
      Some(array) => array,
      None => new_empty_array(reader.field().data_type()),
    };
    Ok(array)
  }

  /// Read top-level schema field `field_idx`, restricted to the leaves in
  /// `projection` (all leaves when `None`).
  pub fn read_schema_field(
    &self, field_idx: usize, projection: Option<&[usize]>
  ) -> Result<ArrayRef> {
    let num_fields = self.reader.metadata().file_metadata().schema_descr().num_fields();
    if field_idx >= num_fields {
      return Err(invalid_err!(
        "field index {} out of range, schema has {} fields", field_idx, num_fields));
    }
    let indices = self.validate_projection(projection)?;
    self.read_field_array(field_idx, &indices, None)?
      .ok_or_else(|| invalid_err!(
        "no projected columns in schema field {}", field_idx))
  }

  /// Read row group `i` as a record batch, restricted to `projection`.
  pub fn read_row_group(
    &self, i: usize, projection: Option<&[usize]>
  ) -> Result<RecordBatch> {
    let num_row_groups = self.num_row_groups();
    if i >= num_row_groups {
      return Err(invalid_err!(
        "row group index {} out of range, file has {} row groups",
        i, num_row_groups));
    }
    self.read_fields(projection, Some(i))
  }

  /// Read the whole file as a record batch, restricted to `projection`.
  pub fn read_table(&self, projection: Option<&[usize]>) -> Result<RecordBatch> {
    self.read_fields(projection, None)
  }

  /// Decode the selected columns (all when `columns` is empty) without
  /// materializing arrays, returning the row count. Fails when the columns
  /// disagree on the number of rows.
  pub fn scan_contents(&self, columns: &[usize], batch_size: usize) -> Result<i64> {
    let num_columns =
      self.reader.metadata().file_metadata().schema_descr().num_columns();
    let selected: Vec<usize> = if columns.is_empty() {
      (0..num_columns).collect()
    } else {
      for &i in columns {
        if i >= num_columns {
          return Err(invalid_err!(
            "column index {} out of range, file has {} columns", i, num_columns));
        }
      }
      columns.to_vec()
    };

    let mut total_rows: Option<i64> = None;
    for &column_idx in &selected {
      let rows = self.scan_column(column_idx, batch_size)?;
      match total_rows {
        None => total_rows = Some(rows),
        Some(expected) if expected != rows => {
          return Err(invalid_err!(
            "column {} holds {} rows where {} were expected",
            column_idx, rows, expected));
        },
        _ => {}
      }
    }
    Ok(total_rows.unwrap_or(0))
  }

  fn validate_projection(
    &self, projection: Option<&[usize]>
  ) -> Result<HashSet<usize>> {
    let num_columns =
      self.reader.metadata().file_metadata().schema_descr().num_columns();
    match projection {
      None => Ok((0..num_columns).collect()),
      Some(indices) => {
        for &i in indices {
          if i >= num_columns {
            return Err(invalid_err!(
              "column index {} out of range, file has {} columns", i, num_columns));
          }
        }
        Ok(indices.iter().cloned().collect())
      }
    }
  }

  // The subtree may hold as many value slots as its longest projected leaf
  // column; level counts bound slot counts, so the per-leaf level totals
  // are a safe batch size.
  fn batch_size_for_field(
    &self, field_idx: usize, indices: &HashSet<usize>, row_group: Option<usize>
  ) -> usize {
    let metadata = self.reader.metadata();
    let descr = metadata.file_metadata().schema_descr();
    let mut batch_size: i64 = 0;
    for &column_idx in indices {
      if descr.column_root_idx(column_idx) != field_idx {
        continue;
      }
      let column_values: i64 = match row_group {
        Some(i) => metadata.row_group(i).column(column_idx).num_values(),
        None => (0..metadata.num_row_groups())
          .map(|j| metadata.row_group(j).column(column_idx).num_values())
          .sum(),
      };
      batch_size = cmp::max(batch_size, column_values);
    }
    batch_size as usize
  }

  fn read_field_array(
    &self, field_idx: usize, indices: &HashSet<usize>, row_group: Option<usize>
  ) -> Result<Option<ArrayRef>> {
    let mut tree = match build_reader_tree(
      self.reader.clone(), self.pool.clone(), field_idx, indices, row_group)? {
      Some(tree) => tree,
      None => return Ok(None),
    };
    let batch_size = self.batch_size_for_field(field_idx, indices, row_group);
    let array = match tree.next_batch(batch_size)? {
      Some(array) => array,
      // no row groups to draw from; materialize the empty shape
      None => new_empty_array(tree.field().data_type()),
    };
    Ok(Some(array))
  }

  fn read_fields(
    &self, projection: Option<&[usize]>, row_group: Option<usize>
  ) -> Result<RecordBatch> {
    let indices = self.validate_projection(projection)?;
    let metadata = self.reader.metadata().file_metadata();

    // top-level fields holding at least one projected leaf, in field order
    let mut field_indices: Vec<usize> =
      indices.iter().map(|&i| metadata.schema_descr().column_root_idx(i)).collect();
    field_indices.sort_unstable();
    field_indices.dedup();

    let schema = Arc::new(parquet_to_arrow_schema_by_columns(
      metadata.schema_descr(), &indices, metadata.key_value_metadata())?);

    let num_fields = field_indices.len();
    let columns: Vec<Mutex<Option<ArrayRef>>> =
      (0..num_fields).map(|_| Mutex::new(None)).collect();

    let read_field = |i: usize| -> Result<()> {
      let array = self.read_field_array(field_indices[i], &indices, row_group)?
        .ok_or_else(|| invalid_err!(
          "no projected columns in schema field {}", field_indices[i]))?;
      *columns[i].lock().unwrap() = Some(array);
      Ok(())
    };

    let num_threads = cmp::min(cmp::max(self.num_threads, 1), cmp::max(num_fields, 1));
    if num_threads <= 1 {
      for i in 0..num_fields {
        read_field(i)?;
      }
    } else {
      debug!("materializing {} fields on {} worker threads", num_fields, num_threads);
      parallel_for(num_threads, num_fields, &read_field)?;
    }

    let arrays: Vec<ArrayRef> = columns.into_iter()
      .map(|slot| slot.into_inner().unwrap().unwrap())
      .collect();
    let num_rows = arrays.first().map(|a| a.len()).unwrap_or(0);
    let options = RecordBatchOptions::new().with_row_count(Some(num_rows));
    Ok(RecordBatch::try_new_with_options(schema, arrays, &options)?)
  }

  fn scan_column(&self, column_idx: usize, batch_size: usize) -> Result<i64> {
    let descr = self.reader.metadata()
      .file_metadata().schema_descr().column(column_idx);
    let max_def = descr.max_def_level();
    let max_rep = descr.max_rep_level();
    let mut iterator =
      FileColumnIterator::all_row_groups(column_idx, self.reader.clone());
    let mut rows = 0i64;
    while let Some(mut column_reader) = iterator.next()? {
      rows += match column_reader {
        ColumnReader::BoolColumnReader(ref mut r) => {
          scan_typed::<BoolType>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::Int32ColumnReader(ref mut r) => {
          scan_typed::<Int32Type>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::Int64ColumnReader(ref mut r) => {
          scan_typed::<Int64Type>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::Int96ColumnReader(ref mut r) => {
          scan_typed::<Int96Type>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::FloatColumnReader(ref mut r) => {
          scan_typed::<FloatType>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::DoubleColumnReader(ref mut r) => {
          scan_typed::<DoubleType>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::ByteArrayColumnReader(ref mut r) => {
          scan_typed::<ByteArrayType>(r.as_mut(), max_def, max_rep, batch_size)?
        },
        ColumnReader::FixedLenByteArrayColumnReader(ref mut r) => {
          scan_typed::<FixedLenByteArrayType>(r.as_mut(), max_def, max_rep, batch_size)?
        },
      };
    }
    Ok(rows)
  }
}

// Rows are delimited by repetition level 0; a column without repetition
// levels contributes one row per level entry.
fn scan_typed<T: DataType>(
  reader: &mut dyn TypedColumnReader<T>,
  max_def: i16,
  max_rep: i16,
  batch_size: usize
) -> Result<i64> {
  let mut values: Vec<T::T> = vec![Default::default(); batch_size];
  let mut def_levels = vec![0i16; if max_def > 0 { batch_size } else { 0 }];
  let mut rep_levels = vec![0i16; if max_rep > 0 { batch_size } else { 0 }];
  let mut rows = 0i64;
  loop {
    let def = if max_def > 0 { Some(&mut def_levels[..]) } else { None };
    let rep = if max_rep > 0 { Some(&mut rep_levels[..]) } else { None };
    let (values_read, levels_read) =
      reader.read_batch(batch_size, def, rep, &mut values[..])?;
    if values_read == 0 && levels_read == 0 {
      break;
    }
    rows += if max_rep > 0 {
      rep_levels[..levels_read].iter().filter(|&&r| r == 0).count() as i64
    } else {
      cmp::max(levels_read, values_read) as i64
    };
    if !reader.has_next()? {
      break;
    }
  }
  Ok(rows)
}

// Workers claim task ids from a shared monotonically increasing counter
// until it passes `num_tasks`. On failure the first error is latched and
// remaining tasks short-circuit before starting; in-flight tasks run to
// their next check and exit.
fn parallel_for<F>(num_threads: usize, num_tasks: usize, func: &F) -> Result<()>
where
  F: Fn(usize) -> Result<()> + Sync,
{
  let task_counter = AtomicUsize::new(0);
  let error_occurred = AtomicBool::new(false);
  let first_error: Mutex<Option<ParquetError>> = Mutex::new(None);

  thread::scope(|s| {
    for _ in 0..num_threads {
      s.spawn(|| {
        while !error_occurred.load(Ordering::Acquire) {
          let task_id = task_counter.fetch_add(1, Ordering::SeqCst);
          if task_id >= num_tasks {
            break;
          }
          if let Err(e) = func(task_id) {
            let mut slot = first_error.lock().unwrap();
            if slot.is_none() {
              *slot = Some(e);
            }
            error_occurred.store(true, Ordering::Release);
            break;
          }
        }
      });
    }
  });

  match first_error.into_inner().unwrap() {
    Some(e) => {
      debug!("parallel field read failed: {}", e);
      Err(e)
    },
    None => Ok(()),
  }
}
