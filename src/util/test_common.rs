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

//! Shared test scaffolding: schema building shortcuts, random data
//! helpers and in-memory implementations of the file/column reader traits
//! serving pre-encoded `(value, def_level, rep_level)` triples.

use std::cmp;
use std::sync::Arc;

use rand::distributions::uniform::SampleUniform;
use rand::distributions::{Distribution, Standard};
use rand::{thread_rng, Rng};

use crate::basic::{LogicalType, Repetition, Type as PhysicalType};
use crate::column::reader::{ColumnReader, TypedColumnReader};
use crate::data_type::*;
use crate::errors::Result;
use crate::file::metadata::{ColumnChunkMetaData, FileMetaData, KeyValue,
                            ParquetMetaData, RowGroupMetaData};
use crate::file::reader::{FileReader, RowGroupReader};
use crate::schema::types::{ColumnDescPtr, SchemaDescPtr, Type, TypePtr};
use crate::util::bit_util;

// ----------------------------------------------------------------------
// Schema shortcuts

pub fn message(fields: Vec<TypePtr>) -> TypePtr {
  Arc::new(Type::new_group_type(
    "schema", None, LogicalType::NONE, fields, None).unwrap())
}

pub fn leaf(name: &str, physical: PhysicalType, logical: LogicalType) -> TypePtr {
  Arc::new(Type::new_primitive_type(
    name, Repetition::REQUIRED, physical, logical, 0, 10, 0, None).unwrap())
}

pub fn optional_leaf(
  name: &str, physical: PhysicalType, logical: LogicalType
) -> TypePtr {
  Arc::new(Type::new_primitive_type(
    name, Repetition::OPTIONAL, physical, logical, 0, 10, 0, None).unwrap())
}

pub fn fixed_len_leaf(name: &str, type_length: i32) -> TypePtr {
  Arc::new(Type::new_primitive_type(
    name, Repetition::OPTIONAL, PhysicalType::FIXED_LEN_BYTE_ARRAY,
    LogicalType::NONE, type_length, 10, 0, None).unwrap())
}

/// An optional plain group, read back as a struct.
pub fn group(name: &str, fields: Vec<TypePtr>) -> TypePtr {
  Arc::new(Type::new_group_type(
    name, Some(Repetition::OPTIONAL), LogicalType::NONE, fields, None).unwrap())
}

/// `optional group <name> (LIST) { repeated group list { <element> } }`
pub fn list_of(name: &str, element: TypePtr) -> TypePtr {
  let repeated = Arc::new(Type::new_group_type(
    "list", Some(Repetition::REPEATED), LogicalType::NONE,
    vec![element], None).unwrap());
  Arc::new(Type::new_group_type(
    name, Some(Repetition::OPTIONAL), LogicalType::LIST,
    vec![repeated], None).unwrap())
}

/// `optional group <name> (MAP) { repeated group key_value { key; value; } }`
pub fn map_of(name: &str, key: TypePtr, value: TypePtr) -> TypePtr {
  let key_value = Arc::new(Type::new_group_type(
    "key_value", Some(Repetition::REPEATED), LogicalType::NONE,
    vec![key, value], None).unwrap());
  Arc::new(Type::new_group_type(
    name, Some(Repetition::OPTIONAL), LogicalType::MAP,
    vec![key_value], None).unwrap())
}

// ----------------------------------------------------------------------
// Random data helpers

pub fn random_bytes(n: usize) -> Vec<u8> {
  let mut result = vec!();
  let mut rng = thread_rng();
  for _ in 0..n {
    result.push(rng.gen_range(0..255));
  }
  result
}

pub fn random_bools(n: usize) -> Vec<bool> {
  let mut result = vec!();
  let mut rng = thread_rng();
  for _ in 0..n {
    result.push(rng.gen::<bool>());
  }
  result
}

pub fn random_numbers<T>(n: usize) -> Vec<T>
where
  Standard: Distribution<T>,
{
  let mut result = vec!();
  let mut rng = thread_rng();
  for _ in 0..n {
    result.push(rng.gen::<T>());
  }
  result
}

pub fn random_numbers_range<T>(n: usize, low: T, high: T) -> Vec<T>
where
  T: PartialOrd + SampleUniform + Copy,
{
  let mut result = vec!();
  let mut rng = thread_rng();
  for _ in 0..n {
    result.push(rng.gen_range(low..high));
  }
  result
}

// ----------------------------------------------------------------------
// In-memory file

/// Decoded values of one column chunk, one vector variant per physical
/// type. BYTE_ARRAY and FIXED_LEN_BYTE_ARRAY both use `Bytes`.
#[derive(Clone)]
pub enum ColumnData {
  Bool(Vec<bool>),
  Int32(Vec<i32>),
  Int64(Vec<i64>),
  Int96(Vec<Int96>),
  Float(Vec<f32>),
  Double(Vec<f64>),
  Bytes(Vec<ByteArray>),
}

impl ColumnData {
  fn len(&self) -> usize {
    match self {
      ColumnData::Bool(v) => v.len(),
      ColumnData::Int32(v) => v.len(),
      ColumnData::Int64(v) => v.len(),
      ColumnData::Int96(v) => v.len(),
      ColumnData::Float(v) => v.len(),
      ColumnData::Double(v) => v.len(),
      ColumnData::Bytes(v) => v.len(),
    }
  }
}

/// One column chunk: defined leaf values plus the level streams encoding
/// nulls and nesting.
#[derive(Clone)]
pub struct ColumnChunkData {
  pub values: ColumnData,
  pub def_levels: Option<Vec<i16>>,
  pub rep_levels: Option<Vec<i16>>,
}

impl ColumnChunkData {
  pub fn new(
    values: ColumnData,
    def_levels: Option<Vec<i16>>,
    rep_levels: Option<Vec<i16>>
  ) -> Self {
    ColumnChunkData { values, def_levels, rep_levels }
  }

  fn num_levels(&self) -> usize {
    self.def_levels.as_ref().map(|d| d.len()).unwrap_or(self.values.len())
  }

  fn num_rows(&self) -> i64 {
    match &self.rep_levels {
      Some(rep) => rep.iter().filter(|&&r| r == 0).count() as i64,
      None => self.num_levels() as i64,
    }
  }
}

/// Assembles an [`InMemoryFileReader`] together with consistent metadata.
pub struct TestFile {
  schema: TypePtr,
  key_value_metadata: Option<Vec<KeyValue>>,
  row_groups: Vec<Vec<ColumnChunkData>>,
}

impl TestFile {
  pub fn new(schema: TypePtr) -> Self {
    TestFile { schema, key_value_metadata: None, row_groups: vec![] }
  }

  pub fn with_key_value_metadata(mut self, kv: Vec<KeyValue>) -> Self {
    self.key_value_metadata = Some(kv);
    self
  }

  pub fn add_row_group(mut self, columns: Vec<ColumnChunkData>) -> Self {
    self.row_groups.push(columns);
    self
  }

  pub fn into_reader(self) -> Arc<InMemoryFileReader> {
    let file_metadata = FileMetaData::new(
      1,
      self.row_groups.iter()
        .map(|rg| rg.first().map(|c| c.num_rows()).unwrap_or(0))
        .sum(),
      Some("in-memory test writer".to_owned()),
      self.key_value_metadata,
      self.schema);

    let descr = file_metadata.schema_descr_ptr();
    let mut row_group_metadata = vec![];
    for columns in &self.row_groups {
      assert_eq!(columns.len(), descr.num_columns(),
                 "row group must provide data for every leaf column");
      let chunks = columns.iter().enumerate().map(|(i, chunk)| {
        ColumnChunkMetaData::new(
          descr.column(i).physical_type(),
          descr.column(i).path().clone(),
          chunk.num_levels() as i64,
          0, 0)
      }).collect();
      let num_rows = columns.first().map(|c| c.num_rows()).unwrap_or(0);
      row_group_metadata.push(RowGroupMetaData::new(chunks, num_rows, 0));
    }

    Arc::new(InMemoryFileReader {
      metadata: ParquetMetaData::new(file_metadata, row_group_metadata),
      row_groups: self.row_groups,
    })
  }
}

/// A [`FileReader`] serving decoded column chunks straight from memory.
pub struct InMemoryFileReader {
  metadata: ParquetMetaData,
  row_groups: Vec<Vec<ColumnChunkData>>,
}

impl FileReader for InMemoryFileReader {
  fn metadata(&self) -> &ParquetMetaData {
    &self.metadata
  }

  fn get_row_group<'a>(&'a self, i: usize) -> Result<Box<dyn RowGroupReader + 'a>> {
    if i >= self.row_groups.len() {
      return Err(invalid_err!(
        "row group index {} out of range, file has {} row groups",
        i, self.row_groups.len()));
    }
    Ok(Box::new(InMemoryRowGroupReader {
      metadata: self.metadata.row_group(i),
      schema_descr: self.metadata.file_metadata().schema_descr_ptr(),
      columns: &self.row_groups[i],
    }))
  }
}

struct InMemoryRowGroupReader<'a> {
  metadata: &'a RowGroupMetaData,
  schema_descr: SchemaDescPtr,
  columns: &'a [ColumnChunkData],
}

impl RowGroupReader for InMemoryRowGroupReader<'_> {
  fn metadata(&self) -> &RowGroupMetaData {
    self.metadata
  }

  fn get_column_reader(&self, i: usize) -> Result<ColumnReader> {
    let descr = self.schema_descr.column(i);
    let chunk = self.columns.get(i)
      .ok_or_else(|| invalid_err!("no data for column {}", i))?
      .clone();
    make_column_reader(descr, chunk)
  }
}

fn make_column_reader(
  descr: ColumnDescPtr, chunk: ColumnChunkData
) -> Result<ColumnReader> {
  let ColumnChunkData { values, def_levels, rep_levels } = chunk;
  let reader = match (descr.physical_type(), values) {
    (PhysicalType::BOOLEAN, ColumnData::Bool(v)) => {
      ColumnReader::BoolColumnReader(Box::new(
        InMemoryColumnReader::<BoolType>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::INT32, ColumnData::Int32(v)) => {
      ColumnReader::Int32ColumnReader(Box::new(
        InMemoryColumnReader::<Int32Type>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::INT64, ColumnData::Int64(v)) => {
      ColumnReader::Int64ColumnReader(Box::new(
        InMemoryColumnReader::<Int64Type>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::INT96, ColumnData::Int96(v)) => {
      ColumnReader::Int96ColumnReader(Box::new(
        InMemoryColumnReader::<Int96Type>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::FLOAT, ColumnData::Float(v)) => {
      ColumnReader::FloatColumnReader(Box::new(
        InMemoryColumnReader::<FloatType>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::DOUBLE, ColumnData::Double(v)) => {
      ColumnReader::DoubleColumnReader(Box::new(
        InMemoryColumnReader::<DoubleType>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::BYTE_ARRAY, ColumnData::Bytes(v)) => {
      ColumnReader::ByteArrayColumnReader(Box::new(
        InMemoryColumnReader::<ByteArrayType>::new(descr, v, def_levels, rep_levels)))
    },
    (PhysicalType::FIXED_LEN_BYTE_ARRAY, ColumnData::Bytes(v)) => {
      ColumnReader::FixedLenByteArrayColumnReader(Box::new(
        InMemoryColumnReader::<FixedLenByteArrayType>::new(
          descr, v, def_levels, rep_levels)))
    },
    (physical, _) => {
      return Err(invalid_err!(
        "column data does not match physical type {} of column {}",
        physical, descr.name()));
    }
  };
  Ok(reader)
}

/// A [`TypedColumnReader`] over one in-memory chunk, implementing both the
/// contiguous and the spaced batch contract.
pub struct InMemoryColumnReader<T: DataType> {
  descr: ColumnDescPtr,
  values: Vec<T::T>,
  def_levels: Option<Vec<i16>>,
  rep_levels: Option<Vec<i16>>,
  level_pos: usize,
  value_pos: usize,
}

impl<T: DataType> InMemoryColumnReader<T> {
  pub fn new(
    descr: ColumnDescPtr,
    values: Vec<T::T>,
    def_levels: Option<Vec<i16>>,
    rep_levels: Option<Vec<i16>>
  ) -> Self {
    if let (Some(def), Some(rep)) = (&def_levels, &rep_levels) {
      assert_eq!(def.len(), rep.len(),
                 "definition and repetition levels must pair up");
    }
    Self { descr, values, def_levels, rep_levels, level_pos: 0, value_pos: 0 }
  }

  fn num_levels(&self) -> usize {
    self.def_levels.as_ref().map(|d| d.len()).unwrap_or(self.values.len())
  }
}

impl<T: DataType> TypedColumnReader<T> for InMemoryColumnReader<T> {
  fn read_batch(
    &mut self,
    batch_size: usize,
    mut def_levels: Option<&mut [i16]>,
    rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
  ) -> Result<(usize, usize)> {
    let n = cmp::min(batch_size, self.num_levels() - self.level_pos);
    let mut values_read = 0;

    match &self.def_levels {
      None => {
        for i in 0..n {
          values[i] = self.values[self.value_pos + i].clone();
        }
        self.value_pos += n;
        values_read = n;
      },
      Some(def) => {
        let max_def = self.descr.max_def_level();
        for i in 0..n {
          let d = def[self.level_pos + i];
          if let Some(out) = def_levels.as_mut() {
            out[i] = d;
          }
          if d == max_def {
            values[values_read] = self.values[self.value_pos].clone();
            self.value_pos += 1;
            values_read += 1;
          }
        }
      }
    }

    if let (Some(rep), Some(out)) = (&self.rep_levels, rep_levels) {
      out[..n].copy_from_slice(&rep[self.level_pos..self.level_pos + n]);
    }
    self.level_pos += n;
    Ok((values_read, n))
  }

  fn read_batch_spaced(
    &mut self,
    batch_size: usize,
    def_levels: &mut [i16],
    rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
    valid_bits: &mut [u8],
    valid_bits_offset: usize,
  ) -> Result<(usize, usize, usize)> {
    let def = self.def_levels.as_ref()
      .ok_or_else(|| io_err!("column {} has no definition levels", self.descr.name()))?;
    let max_def = self.descr.max_def_level();
    let top_parent = self.descr.top_parent_def_level();

    let n = cmp::min(batch_size, def.len() - self.level_pos);
    let mut slots = 0;
    let mut null_count = 0;
    for i in 0..n {
      let d = def[self.level_pos + i];
      def_levels[i] = d;
      if d == max_def {
        values[slots] = self.values[self.value_pos].clone();
        self.value_pos += 1;
        bit_util::set_array_bit(valid_bits, valid_bits_offset + slots);
        slots += 1;
      } else if d >= top_parent {
        // a null at or under this leaf; levels below `top_parent` belong
        // to an empty or absent enclosing list and yield no slot
        null_count += 1;
        slots += 1;
      }
    }

    if let (Some(rep), Some(out)) = (&self.rep_levels, rep_levels) {
      out[..n].copy_from_slice(&rep[self.level_pos..self.level_pos + n]);
    }
    self.level_pos += n;
    Ok((n, slots, null_count))
  }

  fn has_next(&mut self) -> Result<bool> {
    Ok(self.level_pos < self.num_levels())
  }
}
