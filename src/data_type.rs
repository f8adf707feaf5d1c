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

use std::fmt;
use std::mem;

use crate::basic::Type;
use crate::column::reader::{ColumnReader, TypedColumnReader};
use crate::util::memory::BytePtr;

// ----------------------------------------------------------------------
// Types connect Parquet physical types with Rust-specific types

/// Number of days between the Julian day epoch and the Unix epoch.
const JULIAN_DAY_OF_EPOCH: i64 = 2_440_588;
const NANOSECONDS_IN_DAY: i64 = 86_400_000_000_000;

/// A legacy 12-byte timestamp value: nanoseconds within the day in the two
/// low words, Julian day number in the high word.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Int96 {
  value: [u32; 3],
}

impl Int96 {
  pub fn new(v0: u32, v1: u32, v2: u32) -> Self {
    Int96 { value: [v0, v1, v2] }
  }

  pub fn data(&self) -> &[u32] {
    &self.value
  }

  pub fn set_data(&mut self, v0: u32, v1: u32, v2: u32) {
    self.value = [v0, v1, v2];
  }

  /// Nanoseconds since the Unix epoch.
  pub fn to_nanos(&self) -> i64 {
    let nanoseconds = ((self.value[1] as i64) << 32) | (self.value[0] as i64);
    let days = self.value[2] as i64;
    (days - JULIAN_DAY_OF_EPOCH) * NANOSECONDS_IN_DAY + nanoseconds
  }
}

impl fmt::Display for Int96 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self.value)
  }
}

/// A variable-length byte value, sharing its backing storage.
/// Also used for FIXED_LEN_BYTE_ARRAY values; the column descriptor carries
/// the fixed width.
#[derive(Clone, Debug, Default)]
pub struct ByteArray {
  data: Option<BytePtr>,
}

impl ByteArray {
  pub fn new() -> Self {
    ByteArray { data: None }
  }

  pub fn len(&self) -> usize {
    self.data.as_ref().map(|d| d.len()).unwrap_or(0)
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn data(&self) -> &[u8] {
    self.data.as_ref().map(|d| d.slice()).unwrap_or(&[])
  }

  pub fn set_data(&mut self, data: BytePtr) {
    self.data = Some(data);
  }
}

impl From<Vec<u8>> for ByteArray {
  fn from(data: Vec<u8>) -> Self {
    ByteArray { data: Some(BytePtr::new(data)) }
  }
}

impl From<&str> for ByteArray {
  fn from(data: &str) -> Self {
    ByteArray::from(data.as_bytes().to_vec())
  }
}

impl PartialEq for ByteArray {
  fn eq(&self, other: &ByteArray) -> bool {
    self.data() == other.data()
  }
}

/// Connects a Parquet physical type with its in-memory value representation
/// and with the matching variant of the [`ColumnReader`] enum.
pub trait DataType: 'static {
  type T: PartialEq + fmt::Debug + Default + Clone + Send;

  fn get_physical_type() -> Type;

  fn get_type_size() -> usize;

  /// Borrow the typed reader out of a `ColumnReader`, or `None` if the
  /// variant does not match `Self`.
  fn get_column_reader(
    reader: &mut ColumnReader
  ) -> Option<&mut dyn TypedColumnReader<Self>> where Self: Sized;
}

macro_rules! make_type {
  ($name:ident, $physical_ty:path, $variant:ident, $native_ty:ty, $size:expr) => {
    pub struct $name {
    }

    impl DataType for $name {
      type T = $native_ty;

      fn get_physical_type() -> Type {
        $physical_ty
      }

      fn get_type_size() -> usize {
        $size
      }

      fn get_column_reader(
        reader: &mut ColumnReader
      ) -> Option<&mut dyn TypedColumnReader<Self>> {
        match reader {
          ColumnReader::$variant(ref mut r) => Some(r.as_mut()),
          _ => None
        }
      }
    }
  };
}

/// Generate struct definitions for all physical types

make_type!(BoolType, Type::BOOLEAN, BoolColumnReader, bool, 1);
make_type!(Int32Type, Type::INT32, Int32ColumnReader, i32, 4);
make_type!(Int64Type, Type::INT64, Int64ColumnReader, i64, 8);
make_type!(Int96Type, Type::INT96, Int96ColumnReader, Int96,
           mem::size_of::<Int96>());
make_type!(FloatType, Type::FLOAT, FloatColumnReader, f32, 4);
make_type!(DoubleType, Type::DOUBLE, DoubleColumnReader, f64, 8);
make_type!(ByteArrayType, Type::BYTE_ARRAY, ByteArrayColumnReader, ByteArray,
           mem::size_of::<ByteArray>());
make_type!(FixedLenByteArrayType, Type::FIXED_LEN_BYTE_ARRAY,
           FixedLenByteArrayColumnReader, ByteArray, mem::size_of::<ByteArray>());
