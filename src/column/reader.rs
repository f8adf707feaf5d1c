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

//! Contains the column reader API: the seam between this crate and the
//! page-level decoding stack.

use crate::data_type::*;
use crate::errors::Result;

/// A batched reader over one column chunk of a particular physical type,
/// decoding `(value, def_level, rep_level)` triples.
///
/// Implementations sit on top of page decoding, decompression and
/// dictionary handling, none of which is visible at this interface. Errors
/// crossing it are reported in the `Io` category.
pub trait TypedColumnReader<T: DataType> {
  /// Read up to `batch_size` level entries from the chunk.
  ///
  /// Values are written contiguously to the front of `values`: only defined
  /// leaf values are produced, so fewer values than levels may be written
  /// when nulls are present. Definition and repetition levels are written to
  /// `def_levels`/`rep_levels` when provided; a column with
  /// `max_def_level == 0` (resp. `max_rep_level == 0`) has no levels of that
  /// kind and the buffer is ignored.
  ///
  /// Returns `(values_read, levels_read)`. For a column without levels the
  /// two are equal.
  fn read_batch(
    &mut self,
    batch_size: usize,
    def_levels: Option<&mut [i16]>,
    rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
  ) -> Result<(usize, usize)>;

  /// Read up to `batch_size` level entries, spacing the decoded values.
  ///
  /// Each level entry that corresponds to an output slot occupies one
  /// position in `values`, in order: defined leaf values are written there
  /// and their validity bit (at `valid_bits_offset` + slot position within
  /// this call) is set in `valid_bits`; null slots leave the value position
  /// untouched and the bit clear. Level entries absorbed by an empty or
  /// absent enclosing list produce no slot at all.
  ///
  /// `def_levels` must hold at least `batch_size` entries; `rep_levels` is
  /// required when `max_rep_level > 0`.
  ///
  /// Returns `(levels_read, values_read, null_count)` where `values_read`
  /// counts slots, null slots included.
  fn read_batch_spaced(
    &mut self,
    batch_size: usize,
    def_levels: &mut [i16],
    rep_levels: Option<&mut [i16]>,
    values: &mut [T::T],
    valid_bits: &mut [u8],
    valid_bits_offset: usize,
  ) -> Result<(usize, usize, usize)>;

  /// Whether the chunk has more level entries to read.
  fn has_next(&mut self) -> Result<bool>;
}

/// A column reader for a leaf column of any physical type. Use
/// [`DataType::get_column_reader`] to recover the typed reader.
pub enum ColumnReader {
  BoolColumnReader(Box<dyn TypedColumnReader<BoolType>>),
  Int32ColumnReader(Box<dyn TypedColumnReader<Int32Type>>),
  Int64ColumnReader(Box<dyn TypedColumnReader<Int64Type>>),
  Int96ColumnReader(Box<dyn TypedColumnReader<Int96Type>>),
  FloatColumnReader(Box<dyn TypedColumnReader<FloatType>>),
  DoubleColumnReader(Box<dyn TypedColumnReader<DoubleType>>),
  ByteArrayColumnReader(Box<dyn TypedColumnReader<ByteArrayType>>),
  FixedLenByteArrayColumnReader(Box<dyn TypedColumnReader<FixedLenByteArrayType>>),
}
