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

//! The array reader tree: one [`PrimitiveArrayReader`] per projected leaf,
//! wrapped by [`ListArrayReader`]/[`StructArrayReader`] nodes that rebuild
//! nesting and null positions from the definition/repetition level streams.
//!
//! A leaf reader always produces a flat array; all list reconstruction
//! (offsets and list-level null bitmaps) happens in `ListArrayReader`.

use std::cmp;
use std::collections::HashSet;
use std::mem;
use std::str;
use std::sync::Arc;

use arrow::array::{make_array, Array, ArrayData, ArrayRef, BinaryBuilder,
                   FixedSizeBinaryBuilder, StringBuilder};
use arrow::buffer::{Buffer, MutableBuffer};
use arrow::datatypes::{ArrowNativeType, DataType as ArrowType, Field, TimeUnit};
use log::debug;

use crate::arrow::schema::{list_element_node, map_key_value_node,
                           parquet_to_arrow_field};
use crate::basic::{LogicalType, Repetition};
use crate::column::reader::ColumnReader;
use crate::data_type::*;
use crate::errors::Result;
use crate::file::metadata::ParquetMetaData;
use crate::file::reader::FileReader;
use crate::schema::types::{ColumnDescPtr, Type, TypePtr};
use crate::util::bit_util;
use crate::util::memory::MemoryPoolRef;

const MILLISECONDS_IN_DAY: i64 = 86_400_000;

// ----------------------------------------------------------------------
// Iteration utilities

/// Yields the [`ColumnReader`]s of one leaf column in row-group order,
/// decoupling row-group iteration from batch accumulation so a read can
/// cover the whole file or a single row group.
pub struct FileColumnIterator {
  column_index: usize,
  reader: Arc<dyn FileReader>,
  next_row_group: usize,
  end_row_group: usize,
}

impl FileColumnIterator {
  /// Iterate the column across all row groups of the file.
  pub fn all_row_groups(column_index: usize, reader: Arc<dyn FileReader>) -> Self {
    let end_row_group = reader.metadata().num_row_groups();
    Self { column_index, reader, next_row_group: 0, end_row_group }
  }

  /// Iterate the column within row group `row_group` only.
  pub fn single_row_group(
    column_index: usize, reader: Arc<dyn FileReader>, row_group: usize
  ) -> Self {
    Self {
      column_index, reader,
      next_row_group: row_group,
      end_row_group: row_group + 1
    }
  }

  pub fn next(&mut self) -> Result<Option<ColumnReader>> {
    if self.next_row_group >= self.end_row_group {
      return Ok(None);
    }
    let row_group = self.reader.get_row_group(self.next_row_group)?;
    let column_reader = row_group.get_column_reader(self.column_index)?;
    self.next_row_group += 1;
    Ok(Some(column_reader))
  }

  pub fn column_index(&self) -> usize {
    self.column_index
  }

  pub fn descr(&self) -> ColumnDescPtr {
    self.metadata().file_metadata().schema_descr().column(self.column_index)
  }

  pub fn metadata(&self) -> &ParquetMetaData {
    self.reader.metadata()
  }
}

// ----------------------------------------------------------------------
// Array readers

/// A node of the array reader tree. The three kinds expose one capability
/// set; parents consume the level streams their children expose alongside
/// each batch.
pub enum ArrayReader {
  Primitive(PrimitiveArrayReader),
  List(Box<ListArrayReader>),
  Struct(StructArrayReader),
}

impl ArrayReader {
  /// Read the next batch of at most `batch_size` value slots.
  /// Returns `None` once the reader was already drained across all of its
  /// row groups before the call.
  pub fn next_batch(&mut self, batch_size: usize) -> Result<Option<ArrayRef>> {
    match self {
      ArrayReader::Primitive(r) => r.next_batch(batch_size),
      ArrayReader::List(r) => r.next_batch(batch_size),
      ArrayReader::Struct(r) => r.next_batch(batch_size),
    }
  }

  /// Definition levels of the last batch, one entry per slot this node
  /// contributes. `None` when the node cannot hold nulls.
  pub fn get_def_levels(&self) -> Option<&[i16]> {
    match self {
      ArrayReader::Primitive(r) => r.get_def_levels(),
      ArrayReader::List(r) => r.get_def_levels(),
      ArrayReader::Struct(r) => r.get_def_levels(),
    }
  }

  /// Repetition levels of the last batch, aligned with `get_def_levels`.
  pub fn get_rep_levels(&self) -> Option<&[i16]> {
    match self {
      ArrayReader::Primitive(r) => r.get_rep_levels(),
      ArrayReader::List(r) => r.get_rep_levels(),
      ArrayReader::Struct(r) => r.get_rep_levels(),
    }
  }

  pub fn max_def_level(&self) -> i16 {
    match self {
      ArrayReader::Primitive(r) => r.max_def_level(),
      ArrayReader::List(r) => r.max_def_level(),
      ArrayReader::Struct(r) => r.max_def_level(),
    }
  }

  pub fn max_rep_level(&self) -> i16 {
    match self {
      ArrayReader::Primitive(r) => r.max_rep_level(),
      ArrayReader::List(r) => r.max_rep_level(),
      ArrayReader::Struct(r) => r.max_rep_level(),
    }
  }

  pub fn field(&self) -> &Field {
    match self {
      ArrayReader::Primitive(r) => r.field(),
      ArrayReader::List(r) => r.field(),
      ArrayReader::Struct(r) => r.field(),
    }
  }
}

// ----------------------------------------------------------------------
// Primitive reader

// Appends variable-length byte values to the matching Arrow builder.
trait VarBinaryAppender {
  fn append_value(&mut self, value: &ByteArray) -> Result<()>;
  fn append_null(&mut self);
  fn finish_array(&mut self) -> ArrayRef;
}

struct Utf8Appender {
  builder: StringBuilder,
}

impl VarBinaryAppender for Utf8Appender {
  fn append_value(&mut self, value: &ByteArray) -> Result<()> {
    let s = str::from_utf8(value.data())
      .map_err(|e| invalid_err!("invalid UTF-8 in BYTE_ARRAY column: {}", e))?;
    self.builder.append_value(s);
    Ok(())
  }

  fn append_null(&mut self) {
    self.builder.append_null();
  }

  fn finish_array(&mut self) -> ArrayRef {
    Arc::new(self.builder.finish())
  }
}

struct BinaryAppender {
  builder: BinaryBuilder,
}

impl VarBinaryAppender for BinaryAppender {
  fn append_value(&mut self, value: &ByteArray) -> Result<()> {
    self.builder.append_value(value.data());
    Ok(())
  }

  fn append_null(&mut self) {
    self.builder.append_null();
  }

  fn finish_array(&mut self) -> ArrayRef {
    Arc::new(self.builder.finish())
  }
}

struct FixedLenAppender {
  builder: FixedSizeBinaryBuilder,
}

impl VarBinaryAppender for FixedLenAppender {
  fn append_value(&mut self, value: &ByteArray) -> Result<()> {
    self.builder.append_value(value.data())?;
    Ok(())
  }

  fn append_null(&mut self) {
    self.builder.append_null();
  }

  fn finish_array(&mut self) -> ArrayRef {
    Arc::new(self.builder.finish())
  }
}

/// Accumulates one leaf column into a flat Arrow array, advancing through
/// row groups as each chunk drains. Never produces nesting; the surrounding
/// list/struct readers rebuild it from the level streams kept here.
pub struct PrimitiveArrayReader {
  pool: MemoryPoolRef,
  input: FileColumnIterator,
  descr: ColumnDescPtr,
  field: Field,
  column_reader: Option<ColumnReader>,
  def_levels: Vec<i16>,
  rep_levels: Vec<i16>,
}

impl PrimitiveArrayReader {
  /// `arrow_type` overrides the target type derived from the Parquet leaf,
  /// e.g. to read an INT32 DATE column as `Date64`.
  pub fn new(
    pool: MemoryPoolRef,
    mut input: FileColumnIterator,
    arrow_type: Option<ArrowType>
  ) -> Result<Self> {
    let descr = input.descr();
    let field = match arrow_type {
      Some(t) => Field::new(descr.name(), t, descr.is_optional()),
      None => parquet_to_arrow_field(descr.as_ref())?,
    };
    let column_reader = input.next()?;
    Ok(Self {
      pool,
      input,
      descr,
      field,
      column_reader,
      def_levels: vec![],
      rep_levels: vec![],
    })
  }

  pub fn field(&self) -> &Field {
    &self.field
  }

  pub fn max_def_level(&self) -> i16 {
    self.descr.max_def_level()
  }

  pub fn max_rep_level(&self) -> i16 {
    self.descr.max_rep_level()
  }

  pub fn get_def_levels(&self) -> Option<&[i16]> {
    if self.descr.max_def_level() > 0 {
      Some(&self.def_levels)
    } else {
      None
    }
  }

  pub fn get_rep_levels(&self) -> Option<&[i16]> {
    if self.descr.max_rep_level() > 0 {
      Some(&self.rep_levels)
    } else {
      None
    }
  }

  pub fn next_batch(&mut self, batch_size: usize) -> Result<Option<ArrayRef>> {
    if self.column_reader.is_none() {
      // Exhausted all row groups.
      return Ok(None);
    }

    let array = match self.field.data_type().clone() {
      ArrowType::Boolean => self.read_bool_batch(batch_size)?,
      t @ ArrowType::Int32 => self.read_direct_batch::<Int32Type>(batch_size, t)?,
      t @ ArrowType::Int64 => self.read_direct_batch::<Int64Type>(batch_size, t)?,
      t @ ArrowType::Float32 => self.read_direct_batch::<FloatType>(batch_size, t)?,
      t @ ArrowType::Float64 => self.read_direct_batch::<DoubleType>(batch_size, t)?,
      t @ ArrowType::Date32 => self.read_direct_batch::<Int32Type>(batch_size, t)?,
      t @ ArrowType::Time32(TimeUnit::Millisecond) => {
        self.read_direct_batch::<Int32Type>(batch_size, t)?
      },
      t @ ArrowType::Time64(TimeUnit::Microsecond) => {
        self.read_direct_batch::<Int64Type>(batch_size, t)?
      },
      t @ ArrowType::Timestamp(TimeUnit::Millisecond, _) |
      t @ ArrowType::Timestamp(TimeUnit::Microsecond, _) => {
        self.read_direct_batch::<Int64Type>(batch_size, t)?
      },
      t @ ArrowType::Timestamp(TimeUnit::Nanosecond, _) => {
        self.read_convert_batch::<Int96Type, i64, _>(
          batch_size, t, |v| v.to_nanos())?
      },
      t @ ArrowType::Int8 => {
        self.read_convert_batch::<Int32Type, i8, _>(batch_size, t, |v| *v as i8)?
      },
      t @ ArrowType::Int16 => {
        self.read_convert_batch::<Int32Type, i16, _>(batch_size, t, |v| *v as i16)?
      },
      t @ ArrowType::UInt8 => {
        self.read_convert_batch::<Int32Type, u8, _>(batch_size, t, |v| *v as u8)?
      },
      t @ ArrowType::UInt16 => {
        self.read_convert_batch::<Int32Type, u16, _>(batch_size, t, |v| *v as u16)?
      },
      t @ ArrowType::UInt32 => {
        self.read_convert_batch::<Int32Type, u32, _>(batch_size, t, |v| *v as u32)?
      },
      t @ ArrowType::UInt64 => {
        self.read_convert_batch::<Int64Type, u64, _>(batch_size, t, |v| *v as u64)?
      },
      t @ ArrowType::Date64 => {
        self.read_convert_batch::<Int32Type, i64, _>(
          batch_size, t, |v| *v as i64 * MILLISECONDS_IN_DAY)?
      },
      ArrowType::Utf8 => {
        let mut appender = Utf8Appender { builder: StringBuilder::new() };
        let max_def = self.descr.max_def_level();
        let top_parent = self.descr.top_parent_def_level();
        self.read_binary_batch::<ByteArrayType>(
          batch_size, &mut appender, &move |d| d >= top_parent && d < max_def)?;
        appender.finish_array()
      },
      ArrowType::Binary => {
        let mut appender = BinaryAppender { builder: BinaryBuilder::new() };
        let max_def = self.descr.max_def_level();
        let top_parent = self.descr.top_parent_def_level();
        self.read_binary_batch::<ByteArrayType>(
          batch_size, &mut appender, &move |d| d >= top_parent && d < max_def)?;
        appender.finish_array()
      },
      ArrowType::FixedSizeBinary(byte_width) => {
        let mut appender =
          FixedLenAppender { builder: FixedSizeBinaryBuilder::new(byte_width) };
        let max_def = self.descr.max_def_level();
        let top_parent = self.descr.top_parent_def_level();
        let repeated_parent = self.descr.has_repeated_parent();
        // With a repeated parent only max_def - 1 marks a null element; other
        // sub-maximum levels mean the enclosing list is empty or absent.
        let is_null_slot = move |d: i16| {
          if repeated_parent {
            max_def > top_parent && d == max_def - 1
          } else {
            d >= top_parent && d < max_def
          }
        };
        self.read_binary_batch::<FixedLenByteArrayType>(
          batch_size, &mut appender, &is_null_slot)?;
        appender.finish_array()
      },
      t => {
        return Err(nyi_err!("reading columns of type {} is not supported", t));
      }
    };

    Ok(Some(array))
  }

  fn advance_row_group(&mut self) -> Result<()> {
    self.column_reader = self.input.next()?;
    if self.column_reader.is_some() {
      debug!("column {} advanced to next row group", self.input.column_index());
    }
    Ok(())
  }

  fn init_levels(&mut self, batch_size: usize) {
    self.def_levels.clear();
    self.rep_levels.clear();
    if self.descr.max_def_level() > 0 {
      self.def_levels.resize(batch_size, 0);
    }
    if self.descr.max_rep_level() > 0 {
      self.rep_levels.resize(batch_size, 0);
    }
  }

  fn finish_levels(&mut self, total_levels: usize) {
    self.def_levels.truncate(total_levels);
    self.rep_levels.truncate(
      if self.descr.max_rep_level() > 0 { total_levels } else { 0 });
  }

  fn init_valid_bits(&mut self, batch_size: usize) -> Result<Option<MutableBuffer>> {
    if self.descr.max_def_level() > 0 {
      let num_bytes = bit_util::ceil(batch_size + 1, 8);
      self.pool.allocate(num_bytes)?;
      Ok(Some(MutableBuffer::from_len_zeroed(num_bytes)))
    } else {
      Ok(None)
    }
  }

  // Fast path: the decoder writes directly into the output buffer slice.
  fn read_direct_batch<P>(
    &mut self, batch_size: usize, data_type: ArrowType
  ) -> Result<ArrayRef>
  where
    P: DataType,
    P::T: ArrowNativeType,
  {
    let elem_size = mem::size_of::<P::T>();
    let max_def = self.descr.max_def_level();
    let max_rep = self.descr.max_rep_level();

    self.pool.allocate(batch_size * elem_size)?;
    let mut data = MutableBuffer::from_len_zeroed(batch_size * elem_size);
    let mut valid_bits = self.init_valid_bits(batch_size)?;
    self.init_levels(batch_size);

    let mut values_to_read = batch_size;
    let mut total_levels = 0usize;
    let mut valid_bits_idx = 0usize;

    while values_to_read > 0 && self.column_reader.is_some() {
      let reader = P::get_column_reader(self.column_reader.as_mut().unwrap())
        .ok_or_else(|| invalid_err!(
          "column reader does not match physical type {}", P::get_physical_type()))?;
      let out = &mut data.typed_data_mut::<P::T>()[valid_bits_idx..];
      let (levels_read, values_read) = if max_def == 0 {
        let (values_read, levels_read) =
          reader.read_batch(values_to_read, None, None, out)?;
        (levels_read, values_read)
      } else {
        let rep_levels = if max_rep > 0 {
          Some(&mut self.rep_levels[total_levels..])
        } else {
          None
        };
        let (levels_read, values_read, _null_count) = reader.read_batch_spaced(
          values_to_read, &mut self.def_levels[total_levels..], rep_levels, out,
          valid_bits.as_mut().unwrap().as_slice_mut(), valid_bits_idx)?;
        (levels_read, values_read)
      };
      let has_more = reader.has_next()?;
      if levels_read == 0 && values_read == 0 && has_more {
        return Err(io_err!("column reader made no progress"));
      }
      total_levels += levels_read;
      valid_bits_idx += values_read;
      values_to_read -= values_read;
      if !has_more {
        self.advance_row_group()?;
      }
    }

    self.finish_levels(total_levels);
    self.finalize_primitive(data, valid_bits, data_type, elem_size,
                            batch_size, valid_bits_idx)
  }

  // Slow path: decode into a scratch buffer of physical values, then place
  // converted values into the defined slots.
  fn read_convert_batch<P, O, F>(
    &mut self, batch_size: usize, data_type: ArrowType, convert: F
  ) -> Result<ArrayRef>
  where
    P: DataType,
    O: ArrowNativeType,
    F: Fn(&P::T) -> O,
  {
    let elem_size = mem::size_of::<O>();
    let max_def = self.descr.max_def_level();
    let max_rep = self.descr.max_rep_level();

    self.pool.allocate(batch_size * elem_size)?;
    let mut data = MutableBuffer::from_len_zeroed(batch_size * elem_size);
    let mut valid_bits = self.init_valid_bits(batch_size)?;
    self.init_levels(batch_size);

    self.pool.allocate(batch_size * P::get_type_size())?;
    let mut values: Vec<P::T> = vec![Default::default(); batch_size];

    let mut values_to_read = batch_size;
    let mut total_levels = 0usize;
    let mut valid_bits_idx = 0usize;

    while values_to_read > 0 && self.column_reader.is_some() {
      let reader = P::get_column_reader(self.column_reader.as_mut().unwrap())
        .ok_or_else(|| invalid_err!(
          "column reader does not match physical type {}", P::get_physical_type()))?;
      let (levels_read, values_read) = if max_def == 0 {
        let (values_read, levels_read) = reader.read_batch(
          values_to_read, None, None, &mut values[..values_to_read])?;
        let out = data.typed_data_mut::<O>();
        for i in 0..values_read {
          out[valid_bits_idx + i] = convert(&values[i]);
        }
        (levels_read, values_read)
      } else {
        let rep_levels = if max_rep > 0 {
          Some(&mut self.rep_levels[total_levels..])
        } else {
          None
        };
        let valid = valid_bits.as_mut().unwrap();
        let (levels_read, values_read, _null_count) = reader.read_batch_spaced(
          values_to_read, &mut self.def_levels[total_levels..], rep_levels,
          &mut values[..values_to_read], valid.as_slice_mut(), valid_bits_idx)?;
        let out = data.typed_data_mut::<O>();
        let valid_slice = valid.as_slice();
        for i in 0..values_read {
          if bit_util::get_array_bit(valid_slice, valid_bits_idx + i) {
            out[valid_bits_idx + i] = convert(&values[i]);
          }
        }
        (levels_read, values_read)
      };
      let has_more = reader.has_next()?;
      if levels_read == 0 && values_read == 0 && has_more {
        return Err(io_err!("column reader made no progress"));
      }
      total_levels += levels_read;
      valid_bits_idx += values_read;
      values_to_read -= values_read;
      if !has_more {
        self.advance_row_group()?;
      }
    }

    self.pool.free(batch_size * P::get_type_size());
    self.finish_levels(total_levels);
    self.finalize_primitive(data, valid_bits, data_type, elem_size,
                            batch_size, valid_bits_idx)
  }

  // Booleans expand one value per bit into bit-packed output storage.
  fn read_bool_batch(&mut self, batch_size: usize) -> Result<ArrayRef> {
    let max_def = self.descr.max_def_level();
    let max_rep = self.descr.max_rep_level();

    let data_bytes = bit_util::ceil(batch_size, 8);
    self.pool.allocate(data_bytes + batch_size)?;
    let mut data = MutableBuffer::from_len_zeroed(data_bytes);
    let mut valid_bits = self.init_valid_bits(batch_size)?;
    self.init_levels(batch_size);

    let mut values: Vec<bool> = vec![false; batch_size];

    let mut values_to_read = batch_size;
    let mut total_levels = 0usize;
    let mut valid_bits_idx = 0usize;

    while values_to_read > 0 && self.column_reader.is_some() {
      let reader = BoolType::get_column_reader(self.column_reader.as_mut().unwrap())
        .ok_or_else(|| invalid_err!("column reader does not match physical type BOOLEAN"))?;
      let (levels_read, values_read) = if max_def == 0 {
        let (values_read, levels_read) = reader.read_batch(
          values_to_read, None, None, &mut values[..values_to_read])?;
        for i in 0..values_read {
          if values[i] {
            bit_util::set_array_bit(data.as_slice_mut(), valid_bits_idx + i);
          }
        }
        (levels_read, values_read)
      } else {
        let rep_levels = if max_rep > 0 {
          Some(&mut self.rep_levels[total_levels..])
        } else {
          None
        };
        let valid = valid_bits.as_mut().unwrap();
        let (levels_read, values_read, _null_count) = reader.read_batch_spaced(
          values_to_read, &mut self.def_levels[total_levels..], rep_levels,
          &mut values[..values_to_read], valid.as_slice_mut(), valid_bits_idx)?;
        let valid_slice = valid.as_slice();
        for i in 0..values_read {
          if bit_util::get_array_bit(valid_slice, valid_bits_idx + i) && values[i] {
            bit_util::set_array_bit(data.as_slice_mut(), valid_bits_idx + i);
          }
        }
        (levels_read, values_read)
      };
      let has_more = reader.has_next()?;
      if levels_read == 0 && values_read == 0 && has_more {
        return Err(io_err!("column reader made no progress"));
      }
      total_levels += levels_read;
      valid_bits_idx += values_read;
      values_to_read -= values_read;
      if !has_more {
        self.advance_row_group()?;
      }
    }

    self.pool.free(batch_size);
    self.finish_levels(total_levels);

    self.pool.reallocate(data_bytes, bit_util::ceil(valid_bits_idx, 8))?;
    data.truncate(bit_util::ceil(valid_bits_idx, 8));

    let mut builder = ArrayData::builder(ArrowType::Boolean)
      .len(valid_bits_idx)
      .add_buffer(data.into());
    if let Some(valid) = valid_bits {
      let shrunk = self.shrink_valid_bits(valid, batch_size, valid_bits_idx)?;
      self.pool.free(shrunk.len());
      builder = builder.null_bit_buffer(Some(shrunk));
    }
    self.pool.free(bit_util::ceil(valid_bits_idx, 8));
    Ok(make_array(builder.build()?))
  }

  // BYTE_ARRAY / FIXED_LEN_BYTE_ARRAY path: non-spaced reads into a scratch
  // buffer, slot decisions made from the raw definition levels.
  fn read_binary_batch<P>(
    &mut self,
    batch_size: usize,
    appender: &mut dyn VarBinaryAppender,
    is_null_slot: &dyn Fn(i16) -> bool
  ) -> Result<()>
  where
    P: DataType<T = ByteArray>,
  {
    let max_def = self.descr.max_def_level();
    let max_rep = self.descr.max_rep_level();

    self.init_levels(batch_size);
    self.pool.allocate(batch_size * mem::size_of::<ByteArray>())?;
    let mut values: Vec<ByteArray> = vec![ByteArray::new(); batch_size];

    let mut values_to_read = batch_size;
    let mut total_levels = 0usize;

    while values_to_read > 0 && self.column_reader.is_some() {
      let reader = P::get_column_reader(self.column_reader.as_mut().unwrap())
        .ok_or_else(|| invalid_err!(
          "column reader does not match physical type {}", P::get_physical_type()))?;
      let def_levels = if max_def > 0 {
        Some(&mut self.def_levels[total_levels..])
      } else {
        None
      };
      let rep_levels = if max_rep > 0 {
        Some(&mut self.rep_levels[total_levels..])
      } else {
        None
      };
      let (values_read, levels_read) = reader.read_batch(
        values_to_read, def_levels, rep_levels, &mut values[..values_to_read])?;
      let has_more = reader.has_next()?;
      if levels_read == 0 && values_read == 0 && has_more {
        return Err(io_err!("column reader made no progress"));
      }

      if max_def == 0 {
        for value in values.iter().take(values_read) {
          appender.append_value(value)?;
        }
      } else {
        let mut values_idx = 0;
        for i in 0..levels_read {
          let d = self.def_levels[total_levels + i];
          if d == max_def {
            appender.append_value(&values[values_idx])?;
            values_idx += 1;
          } else if is_null_slot(d) {
            appender.append_null();
          }
        }
        total_levels += levels_read;
      }

      values_to_read -= levels_read;
      if !has_more {
        self.advance_row_group()?;
      }
    }

    self.pool.free(batch_size * mem::size_of::<ByteArray>());
    self.finish_levels(total_levels);
    Ok(())
  }

  fn shrink_valid_bits(
    &self, mut valid: MutableBuffer, batch_size: usize, num_values: usize
  ) -> Result<Buffer> {
    // only pay for the copy when utilization dropped below 80%
    if num_values < batch_size * 4 / 5 {
      let allocated = valid.len();
      valid.truncate(bit_util::ceil(num_values, 8));
      self.pool.reallocate(allocated, valid.len())?;
    }
    Ok(valid.into())
  }

  fn finalize_primitive(
    &mut self,
    mut data: MutableBuffer,
    valid_bits: Option<MutableBuffer>,
    data_type: ArrowType,
    elem_size: usize,
    batch_size: usize,
    num_values: usize
  ) -> Result<ArrayRef> {
    // shrink the data region to what was actually produced
    self.pool.reallocate(batch_size * elem_size, num_values * elem_size)?;
    data.truncate(num_values * elem_size);

    let mut builder = ArrayData::builder(data_type)
      .len(num_values)
      .add_buffer(data.into());
    let mut valid_bytes = 0;
    if let Some(valid) = valid_bits {
      let shrunk = self.shrink_valid_bits(valid, batch_size, num_values)?;
      valid_bytes = shrunk.len();
      builder = builder.null_bit_buffer(Some(shrunk));
    }

    // ownership moves to the array; release the pool charges
    self.pool.free(num_values * elem_size);
    self.pool.free(valid_bytes);

    Ok(make_array(builder.build()?))
  }
}

// ----------------------------------------------------------------------
// List reader

/// Rebuilds one list nesting depth: synthesizes this node's level streams
/// by grouping the child's streams into per-list runs, then derives the
/// offsets and the list-level null bitmap.
pub struct ListArrayReader {
  child: Box<ArrayReader>,
  field: Field,
  list_def_level: i16,
  list_rep_level: i16,
  // The smallest definition level at which a slot still belongs to this
  // node; anything below was absorbed by an enclosing repeated ancestor.
  min_space_def_level: i16,
  def_levels: Vec<i16>,
  rep_levels: Vec<i16>,
}

impl ListArrayReader {
  pub fn new(
    child: ArrayReader,
    name: &str,
    nullable: bool,
    list_def_level: i16,
    list_rep_level: i16,
    min_space_def_level: i16
  ) -> Self {
    let field = Field::new(
      name, ArrowType::List(Arc::new(child.field().clone())), nullable);
    Self {
      child: Box::new(child),
      field,
      list_def_level,
      list_rep_level,
      min_space_def_level,
      def_levels: vec![],
      rep_levels: vec![],
    }
  }

  pub fn field(&self) -> &Field {
    &self.field
  }

  pub fn max_def_level(&self) -> i16 {
    self.list_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.list_rep_level
  }

  pub fn get_def_levels(&self) -> Option<&[i16]> {
    Some(&self.def_levels)
  }

  pub fn get_rep_levels(&self) -> Option<&[i16]> {
    Some(&self.rep_levels)
  }

  pub fn next_batch(&mut self, batch_size: usize) -> Result<Option<ArrayRef>> {
    // Invalidate the level streams of the former batch
    self.def_levels.clear();
    self.rep_levels.clear();

    let child_array = match self.child.next_batch(batch_size)? {
      Some(array) => array,
      // child drained its row groups, so this node is drained as well
      None => return Ok(None),
    };

    self.compute_level_streams()?;
    let (null_bitmap, null_count, num_lists) = self.def_levels_to_null_bitmap();
    let offsets = self.rep_levels_to_offsets()?;

    debug_assert_eq!(offsets.len(), num_lists + 1);
    if *offsets.last().unwrap() as usize != child_array.len() {
      return Err(invalid_err!(
        "list offsets cover {} child values but the child array holds {}",
        offsets.last().unwrap(), child_array.len()));
    }

    let mut builder = ArrayData::builder(self.field.data_type().clone())
      .len(num_lists)
      .add_buffer(Buffer::from_vec(offsets))
      .add_child_data(child_array.to_data());
    if null_count > 0 {
      builder = builder.null_bit_buffer(null_bitmap);
    }
    Ok(Some(make_array(builder.build()?)))
  }

  // Groups the child's streams into runs, one per list at this depth: a run
  // starts where the child repetition level drops below the child's maximum
  // and extends over the following entries that stay at or above it. The
  // list's definition level is the run maximum clamped to `list_def_level`;
  // its repetition level is the run minimum clamped to `list_rep_level`.
  fn compute_level_streams(&mut self) -> Result<()> {
    let child_def = self.child.get_def_levels()
      .ok_or_else(|| invalid_err!("list child reader exposes no definition levels"))?;
    let child_rep = self.child.get_rep_levels()
      .ok_or_else(|| invalid_err!("list child reader exposes no repetition levels"))?;
    if child_def.len() != child_rep.len() {
      return Err(invalid_err!(
        "child level streams differ in length ({} definition vs {} repetition)",
        child_def.len(), child_rep.len()));
    }
    let child_max_rep = self.child.max_rep_level();

    let mut i = 0;
    while i < child_def.len() {
      let mut def = child_def[i];
      let mut rep = child_rep[i];
      i += 1;
      while i < child_def.len() && child_rep[i] >= child_max_rep {
        def = cmp::max(def, child_def[i]);
        rep = cmp::min(rep, child_rep[i]);
        i += 1;
      }
      self.def_levels.push(cmp::min(def, self.list_def_level));
      self.rep_levels.push(cmp::min(rep, self.list_rep_level));
    }
    Ok(())
  }

  fn def_levels_to_null_bitmap(&self) -> (Option<Buffer>, usize, usize) {
    let num_slots = self.def_levels.iter()
      .filter(|&&d| d >= self.min_space_def_level)
      .count();
    let mut bitmap = MutableBuffer::from_len_zeroed(bit_util::ceil(num_slots, 8));
    let mut idx = 0;
    let mut null_count = 0;
    for &d in &self.def_levels {
      if d >= self.list_def_level {
        bit_util::set_array_bit(bitmap.as_slice_mut(), idx);
        idx += 1;
      } else if d >= self.min_space_def_level {
        null_count += 1;
        idx += 1;
      }
      // below min_space_def_level the slot was absorbed by an ancestor
    }
    (Some(bitmap.into()), null_count, num_slots)
  }

  // Walk this node's synthesized definition levels in lock-step with the
  // child's raw streams, counting consumed child values, and emit one
  // cumulative offset per surviving slot plus the closing offset.
  fn rep_levels_to_offsets(&self) -> Result<Vec<i32>> {
    let child_def = self.child.get_def_levels()
      .ok_or_else(|| invalid_err!("list child reader exposes no definition levels"))?;
    let child_rep = self.child.get_rep_levels()
      .ok_or_else(|| invalid_err!("list child reader exposes no repetition levels"))?;

    let mut offsets = Vec::with_capacity(self.def_levels.len() + 1);
    offsets.push(0i32);
    let mut child_val_idx: i32 = 0;
    let mut child_level_idx: usize = 0;
    for &d in &self.def_levels {
      // The offset only advances when the list is defined and non-empty
      if d == self.list_def_level
         && child_level_idx < child_def.len()
         && child_def[child_level_idx] > self.list_def_level {
        // Walk over the values belonging to the current list
        loop {
          child_level_idx += 1;
          child_val_idx += 1;
          if child_level_idx >= child_rep.len()
             || child_rep[child_level_idx] <= self.list_rep_level {
            break;
          }
        }
      } else {
        // Undefined or empty list value
        child_level_idx += 1;
      }

      if d >= self.min_space_def_level {
        offsets.push(child_val_idx);
      }
    }
    Ok(offsets)
  }
}

// ----------------------------------------------------------------------
// Struct reader

/// Combines N children sharing one record granularity; the struct's own
/// level streams are derived elementwise from the children's streams.
pub struct StructArrayReader {
  children: Vec<ArrayReader>,
  field: Field,
  struct_def_level: i16,
  struct_rep_level: i16,
  // Definition levels below this mark slots absorbed by a repeated
  // ancestor; levels in `[top_parent_def_level, struct_def_level)` mark a
  // null struct.
  top_parent_def_level: i16,
  def_levels: Option<Vec<i16>>,
  rep_levels: Option<Vec<i16>>,
}

impl StructArrayReader {
  pub fn new(
    children: Vec<ArrayReader>,
    name: &str,
    nullable: bool,
    struct_def_level: i16,
    struct_rep_level: i16,
    top_parent_def_level: i16
  ) -> Self {
    let fields: Vec<Field> =
      children.iter().map(|c| c.field().clone()).collect();
    let field = Field::new(name, ArrowType::Struct(fields.into()), nullable);
    Self {
      children,
      field,
      struct_def_level,
      struct_rep_level,
      top_parent_def_level,
      def_levels: None,
      rep_levels: None,
    }
  }

  pub fn field(&self) -> &Field {
    &self.field
  }

  pub fn max_def_level(&self) -> i16 {
    self.struct_def_level
  }

  pub fn max_rep_level(&self) -> i16 {
    self.struct_rep_level
  }

  pub fn get_def_levels(&self) -> Option<&[i16]> {
    self.def_levels.as_deref()
  }

  pub fn get_rep_levels(&self) -> Option<&[i16]> {
    self.rep_levels.as_deref()
  }

  pub fn next_batch(&mut self, batch_size: usize) -> Result<Option<ArrayRef>> {
    self.def_levels = None;
    self.rep_levels = None;

    let mut arrays = vec![];
    for child in self.children.iter_mut() {
      match child.next_batch(batch_size)? {
        Some(array) => arrays.push(array),
        // a child only drains when every child drained its row groups
        None => return Ok(None),
      }
    }

    let child_length = arrays[0].len();
    for array in &arrays {
      if array.len() != child_length {
        return Err(invalid_err!(
          "struct children produced arrays of different lengths ({} vs {})",
          child_length, array.len()));
      }
    }

    self.compute_def_levels()?;
    self.compute_rep_levels()?;
    let (null_bitmap, null_count) = self.def_levels_to_null_bitmap(child_length)?;

    let child_data = arrays.iter().map(|a| a.to_data()).collect();
    let mut builder = ArrayData::builder(self.field.data_type().clone())
      .len(child_length)
      .child_data(child_data);
    if null_count > 0 {
      builder = builder.null_bit_buffer(null_bitmap);
    }
    Ok(Some(make_array(builder.build()?)))
  }

  // When a struct is defined, every child's definition level is at least
  // the struct's; when it is not, every child stays below it. The struct's
  // level for a slot is the maximum over children of the child level
  // clamped to the struct's own. Children that cannot hold nulls carry no
  // stream and do not participate.
  fn compute_def_levels(&mut self) -> Result<()> {
    let mut result: Option<Vec<i16>> = None;
    for child in &self.children {
      let child_def = match child.get_def_levels() {
        Some(levels) => levels,
        None => continue,
      };
      match result {
        None => {
          result = Some(child_def.iter()
            .map(|&d| cmp::min(d, self.struct_def_level))
            .collect());
        },
        Some(ref mut levels) => {
          if levels.len() != child_def.len() {
            return Err(invalid_err!(
              "struct children produced level streams of different lengths ({} vs {})",
              levels.len(), child_def.len()));
          }
          for (i, &d) in child_def.iter().enumerate() {
            if (levels[i] >= self.struct_def_level) != (d >= self.struct_def_level) {
              return Err(invalid_err!(
                "struct children disagree on definition at position {} ({} vs {})",
                i, levels[i], d));
            }
            levels[i] = cmp::max(levels[i], cmp::min(d, self.struct_def_level));
          }
        }
      }
    }
    self.def_levels = result;
    Ok(())
  }

  fn compute_rep_levels(&mut self) -> Result<()> {
    let mut result: Option<Vec<i16>> = None;
    for child in &self.children {
      let child_rep = match child.get_rep_levels() {
        Some(levels) => levels,
        None => continue,
      };
      match result {
        None => result = Some(child_rep.to_vec()),
        Some(ref mut levels) => {
          if levels.len() != child_rep.len() {
            return Err(invalid_err!(
              "struct children produced level streams of different lengths ({} vs {})",
              levels.len(), child_rep.len()));
          }
          for (i, &r) in child_rep.iter().enumerate() {
            levels[i] = cmp::min(levels[i], r);
          }
        }
      }
    }
    self.rep_levels = result;
    Ok(())
  }

  fn def_levels_to_null_bitmap(
    &self, child_length: usize
  ) -> Result<(Option<Buffer>, usize)> {
    let levels = match &self.def_levels {
      // all children are non-nullable, so the struct can never be null
      None => return Ok((None, 0)),
      Some(levels) => levels,
    };

    let num_slots = levels.iter()
      .filter(|&&d| d >= self.top_parent_def_level)
      .count();
    if num_slots != child_length {
      return Err(invalid_err!(
        "struct level stream yields {} slots but children hold {} entries",
        num_slots, child_length));
    }

    let mut bitmap = MutableBuffer::from_len_zeroed(bit_util::ceil(num_slots, 8));
    let mut idx = 0;
    let mut null_count = 0;
    for &d in levels {
      if d >= self.struct_def_level {
        bit_util::set_array_bit(bitmap.as_slice_mut(), idx);
        idx += 1;
      } else if d >= self.top_parent_def_level {
        null_count += 1;
        idx += 1;
      }
      // otherwise the slot was absorbed by a repeated ancestor
    }
    Ok((Some(bitmap.into()), null_count))
  }
}

// ----------------------------------------------------------------------
// Reader tree construction

/// Build the array reader tree for top-level schema field `field_idx`,
/// materializing exactly the leaves named in `column_indices`. Returns
/// `None` when no projected leaf lives in the field's subtree.
pub fn build_reader_tree(
  reader: Arc<dyn FileReader>,
  pool: MemoryPoolRef,
  field_idx: usize,
  column_indices: &HashSet<usize>,
  row_group: Option<usize>
) -> Result<Option<ArrayReader>> {
  let descr = reader.metadata().file_metadata().schema_descr_ptr();
  let node = descr.root_schema().get_fields()[field_idx].clone();
  let mut builder = ReaderTreeBuilder {
    reader,
    pool,
    column_indices,
    row_group,
    next_leaf: descr.first_column_of_field(field_idx),
  };
  builder.build(&node, 0, 0, 0)
}

struct ReaderTreeBuilder<'a> {
  reader: Arc<dyn FileReader>,
  pool: MemoryPoolRef,
  column_indices: &'a HashSet<usize>,
  row_group: Option<usize>,
  // Advances over every leaf in the subtree, projected or not, so indices
  // stay aligned with the schema DFS order.
  next_leaf: usize,
}

impl<'a> ReaderTreeBuilder<'a> {
  // `top_parent_def_level` carries the definition level reached just after
  // the most recent repeated ancestor; it distinguishes slots absorbed by
  // that ancestor from local nulls.
  fn build(
    &mut self,
    node: &TypePtr,
    parent_def_level: i16,
    parent_rep_level: i16,
    top_parent_def_level: i16
  ) -> Result<Option<ArrayReader>> {
    let info = node.get_basic_info();
    let def_level = if info.repetition() == Repetition::REQUIRED {
      parent_def_level
    } else {
      parent_def_level + 1
    };
    let nullable = info.repetition() == Repetition::OPTIONAL;

    match node.as_ref() {
      Type::PrimitiveType { .. } => {
        if info.repetition() == Repetition::REPEATED {
          return Err(nyi_err!(
            "unannotated repeated field {} is not supported", node.name()));
        }
        let column_index = self.next_leaf;
        self.next_leaf += 1;
        if !self.column_indices.contains(&column_index) {
          return Ok(None);
        }
        let iterator = match self.row_group {
          Some(i) => FileColumnIterator::single_row_group(
            column_index, self.reader.clone(), i),
          None => FileColumnIterator::all_row_groups(
            column_index, self.reader.clone()),
        };
        let reader = PrimitiveArrayReader::new(self.pool.clone(), iterator, None)?;
        Ok(Some(ArrayReader::Primitive(reader)))
      },
      Type::GroupType { .. } => match info.logical_type() {
        LogicalType::LIST => {
          let element = list_element_node(node)?.clone();
          // the repeated element frame adds one definition and one
          // repetition level
          let child = self.build(
            &element, def_level + 1, parent_rep_level + 1, def_level + 1)?;
          Ok(child.map(|c| {
            ArrayReader::List(Box::new(ListArrayReader::new(
              c, node.name(), nullable,
              def_level, parent_rep_level, top_parent_def_level)))
          }))
        },
        LogicalType::MAP | LogicalType::MAP_KEY_VALUE => {
          // A map is encoded as a list of {key, value} structs: the
          // repeated middle group is read as a struct.
          let key_value = map_key_value_node(node)?.clone();
          let child = self.build_struct(
            &key_value, def_level + 1, parent_rep_level + 1, def_level + 1)?;
          Ok(child.map(|c| {
            ArrayReader::List(Box::new(ListArrayReader::new(
              c, node.name(), nullable,
              def_level, parent_rep_level, top_parent_def_level)))
          }))
        },
        _ => {
          if info.repetition() == Repetition::REPEATED {
            return Err(nyi_err!(
              "unannotated repeated group {} is not supported", node.name()));
          }
          self.build_struct(node, def_level, parent_rep_level, top_parent_def_level)
        }
      }
    }
  }

  fn build_struct(
    &mut self,
    node: &TypePtr,
    def_level: i16,
    rep_level: i16,
    top_parent_def_level: i16
  ) -> Result<Option<ArrayReader>> {
    let mut children = vec![];
    for field in node.get_fields() {
      if let Some(child) =
        self.build(field, def_level, rep_level, top_parent_def_level)? {
        children.push(child);
      }
    }
    if children.is_empty() {
      return Ok(None);
    }
    let nullable =
      node.get_basic_info().repetition() == Repetition::OPTIONAL;
    Ok(Some(ArrayReader::Struct(StructArrayReader::new(
      children, node.name(), nullable,
      def_level, rep_level, top_parent_def_level))))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use arrow::array::{Array, Date64Array, Int32Array};

  use crate::basic::Type as PhysicalType;
  use crate::util::memory::DefaultMemoryPool;
  use crate::util::test_common::*;

  fn pool() -> MemoryPoolRef {
    Arc::new(DefaultMemoryPool::new())
  }

  fn two_row_group_file() -> Arc<InMemoryFileReader> {
    TestFile::new(message(vec![
      leaf("a", PhysicalType::INT32, LogicalType::NONE),
    ]))
    .add_row_group(vec![ColumnChunkData::new(
      ColumnData::Int32(vec![1, 2]), None, None)])
    .add_row_group(vec![ColumnChunkData::new(
      ColumnData::Int32(vec![3]), None, None)])
    .into_reader()
  }

  #[test]
  fn test_file_column_iterator_all_row_groups() {
    let reader = two_row_group_file();
    let mut iterator = FileColumnIterator::all_row_groups(0, reader);
    assert_eq!(iterator.column_index(), 0);
    assert!(iterator.next().unwrap().is_some());
    assert!(iterator.next().unwrap().is_some());
    assert!(iterator.next().unwrap().is_none());
    assert!(iterator.next().unwrap().is_none());
  }

  #[test]
  fn test_file_column_iterator_single_row_group() {
    let reader = two_row_group_file();
    let mut iterator = FileColumnIterator::single_row_group(0, reader, 1);
    assert!(iterator.next().unwrap().is_some());
    assert!(iterator.next().unwrap().is_none());
  }

  #[test]
  fn test_primitive_reader_drains_row_groups() {
    let reader = two_row_group_file();
    let iterator = FileColumnIterator::all_row_groups(0, reader);
    let mut reader = PrimitiveArrayReader::new(pool(), iterator, None).unwrap();

    let array = reader.next_batch(3).unwrap().unwrap();
    let array = array.as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(array.values(), &[1, 2, 3]);

    // a second call on the drained reader reports exhaustion
    assert!(reader.next_batch(3).unwrap().is_none());
  }

  #[test]
  fn test_primitive_reader_single_row_group() {
    let reader = two_row_group_file();
    let iterator = FileColumnIterator::single_row_group(0, reader, 1);
    let mut reader = PrimitiveArrayReader::new(pool(), iterator, None).unwrap();

    let array = reader.next_batch(8).unwrap().unwrap();
    let array = array.as_any().downcast_ref::<Int32Array>().unwrap();
    assert_eq!(array.values(), &[3]);
  }

  #[test]
  fn test_date64_from_int32_days() {
    let reader = TestFile::new(message(vec![
      leaf("d", PhysicalType::INT32, LogicalType::DATE),
    ]))
    .add_row_group(vec![ColumnChunkData::new(
      ColumnData::Int32(vec![0, 1, 100]), None, None)])
    .into_reader();

    let iterator = FileColumnIterator::all_row_groups(0, reader);
    let mut reader =
      PrimitiveArrayReader::new(pool(), iterator, Some(ArrowType::Date64)).unwrap();

    let array = reader.next_batch(3).unwrap().unwrap();
    let array = array.as_any().downcast_ref::<Date64Array>().unwrap();
    assert_eq!(array.value(0), 0);
    assert_eq!(array.value(1), 86_400_000);
    assert_eq!(array.value(2), 8_640_000_000);
  }

  #[test]
  fn test_build_reader_tree_respects_projection() {
    let reader = TestFile::new(message(vec![
      group("s", vec![
        optional_leaf("a", PhysicalType::INT32, LogicalType::NONE),
        optional_leaf("b", PhysicalType::INT64, LogicalType::NONE),
      ]),
    ]))
    .add_row_group(vec![
      ColumnChunkData::new(ColumnData::Int32(vec![1]), Some(vec![2]), None),
      ColumnChunkData::new(ColumnData::Int64(vec![9]), Some(vec![2]), None),
    ])
    .into_reader();

    let empty = HashSet::new();
    assert!(build_reader_tree(reader.clone(), pool(), 0, &empty, None)
      .unwrap()
      .is_none());

    let only_b: HashSet<usize> = vec![1].into_iter().collect();
    let tree = build_reader_tree(reader.clone(), pool(), 0, &only_b, None)
      .unwrap()
      .unwrap();
    match &tree {
      ArrayReader::Struct(s) => {
        assert_eq!(s.field().name(), "s");
        assert_eq!(s.max_def_level(), 1);
        assert_eq!(s.max_rep_level(), 0);
      },
      _ => panic!("expected a struct reader"),
    }
    match tree.field().data_type() {
      ArrowType::Struct(fields) => {
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].name(), "b");
      },
      other => panic!("expected a struct type, got {}", other),
    }
  }

  #[test]
  fn test_list_reader_level_streams_are_clamped() {
    // rows: [[10, 20], [], null, [30]]
    let reader = TestFile::new(message(vec![
      list_of("l", leaf("item", PhysicalType::INT32, LogicalType::NONE)),
    ]))
    .add_row_group(vec![ColumnChunkData::new(
      ColumnData::Int32(vec![10, 20, 30]),
      Some(vec![2, 2, 1, 0, 2]),
      Some(vec![0, 1, 0, 0, 0]))])
    .into_reader();

    let all: HashSet<usize> = vec![0].into_iter().collect();
    let mut tree =
      build_reader_tree(reader, pool(), 0, &all, None).unwrap().unwrap();
    assert_eq!(tree.max_def_level(), 1);
    assert_eq!(tree.max_rep_level(), 0);

    let array = tree.next_batch(5).unwrap().unwrap();
    assert_eq!(array.len(), 4);

    // one entry per list, clamped to this node's level bounds
    assert_eq!(tree.get_def_levels(), Some(&[1, 1, 0, 1][..]));
    assert_eq!(tree.get_rep_levels(), Some(&[0, 0, 0, 0][..]));
  }

  #[test]
  fn test_unannotated_repeated_group_is_rejected() {
    let repeated = Arc::new(Type::new_group_type(
      "r", Some(Repetition::REPEATED), LogicalType::NONE,
      vec![leaf("x", PhysicalType::INT32, LogicalType::NONE)], None).unwrap());
    let reader = TestFile::new(message(vec![repeated]))
      .into_reader();

    let all: HashSet<usize> = vec![0].into_iter().collect();
    match build_reader_tree(reader, pool(), 0, &all, None) {
      Err(crate::errors::ParquetError::NotImplemented(_)) => {},
      other => panic!("expected NotImplemented, got {:?}", other.map(|_| ())),
    }
  }
}
