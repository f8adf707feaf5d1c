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

use std::sync::Arc;

use crate::basic::Type;
use crate::schema::types::{ColumnPath, SchemaDescPtr, SchemaDescriptor,
                           Type as SchemaType, TypePtr};

/// A key-value metadata pair stored in the file footer, propagated into the
/// metadata of the converted output schema.
#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
  pub key: String,
  pub value: Option<String>,
}

impl KeyValue {
  pub fn new(key: String, value: Option<String>) -> Self {
    KeyValue { key, value }
  }
}

pub struct ParquetMetaData {
  file_metadata: FileMetaData,
  row_groups: Vec<RowGroupMetaData>
}

impl ParquetMetaData {
  pub fn new(file_metadata: FileMetaData, row_groups: Vec<RowGroupMetaData>) -> Self {
    ParquetMetaData { file_metadata, row_groups }
  }

  pub fn file_metadata(&self) -> &FileMetaData {
    &self.file_metadata
  }

  pub fn num_row_groups(&self) -> usize {
    self.row_groups.len()
  }

  pub fn row_group(&self, i: usize) -> &RowGroupMetaData {
    &self.row_groups[i]
  }

  pub fn row_groups(&self) -> &[RowGroupMetaData] {
    &self.row_groups
  }
}

/// Metadata for a Parquet file
pub struct FileMetaData {
  version: i32,
  num_rows: i64,
  created_by: Option<String>,
  key_value_metadata: Option<Vec<KeyValue>>,
  schema: TypePtr,
  schema_descr: SchemaDescPtr
}

impl FileMetaData {
  pub fn new(version: i32, num_rows: i64, created_by: Option<String>,
             key_value_metadata: Option<Vec<KeyValue>>,
             schema: TypePtr) -> Self {
    let schema_descr = Arc::new(SchemaDescriptor::new(schema.clone()));
    FileMetaData {
      version, num_rows, created_by, key_value_metadata, schema, schema_descr
    }
  }

  pub fn version(&self) -> i32 {
    self.version
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn created_by(&self) -> &Option<String> {
    &self.created_by
  }

  pub fn key_value_metadata(&self) -> &Option<Vec<KeyValue>> {
    &self.key_value_metadata
  }

  pub fn schema(&self) -> &SchemaType {
    self.schema.as_ref()
  }

  pub fn schema_descr(&self) -> &SchemaDescriptor {
    &self.schema_descr
  }

  pub fn schema_descr_ptr(&self) -> SchemaDescPtr {
    self.schema_descr.clone()
  }
}

/// Metadata for a row group
pub struct RowGroupMetaData {
  columns: Vec<ColumnChunkMetaData>,
  num_rows: i64,
  total_byte_size: i64
}

impl RowGroupMetaData {
  pub fn new(columns: Vec<ColumnChunkMetaData>, num_rows: i64,
             total_byte_size: i64) -> Self {
    RowGroupMetaData { columns, num_rows, total_byte_size }
  }

  pub fn num_columns(&self) -> usize {
    self.columns.len()
  }

  pub fn column(&self, i: usize) -> &ColumnChunkMetaData {
    &self.columns[i]
  }

  pub fn columns(&self) -> &[ColumnChunkMetaData] {
    &self.columns
  }

  pub fn num_rows(&self) -> i64 {
    self.num_rows
  }

  pub fn total_byte_size(&self) -> i64 {
    self.total_byte_size
  }
}

/// Metadata for a column chunk
pub struct ColumnChunkMetaData {
  column_type: Type,
  column_path: ColumnPath,
  num_values: i64,
  total_compressed_size: i64,
  total_uncompressed_size: i64
}

impl ColumnChunkMetaData {
  pub fn new(column_type: Type, column_path: ColumnPath, num_values: i64,
             total_compressed_size: i64, total_uncompressed_size: i64) -> Self {
    ColumnChunkMetaData {
      column_type, column_path, num_values,
      total_compressed_size, total_uncompressed_size
    }
  }

  /// Type of this column. Must be primitive.
  pub fn column_type(&self) -> Type {
    self.column_type
  }

  /// Path (or identifier) of this column
  pub fn column_path(&self) -> &ColumnPath {
    &self.column_path
  }

  /// Total number of values in this column chunk, one per definition level
  /// entry. This includes nulls and drives the batch sizing of reads.
  pub fn num_values(&self) -> i64 {
    self.num_values
  }

  /// Get the total compressed data size of this column chunk
  pub fn compressed_size(&self) -> i64 {
    self.total_compressed_size
  }

  /// Get the total uncompressed data size of this column chunk
  pub fn uncompressed_size(&self) -> i64 {
    self.total_uncompressed_size
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::basic::{LogicalType, Repetition};
  use crate::schema::types::Type as SchemaType;

  fn file_metadata() -> FileMetaData {
    let a = Arc::new(SchemaType::new_primitive_type(
      "a", Repetition::REQUIRED, Type::INT32,
      LogicalType::NONE, 0, 0, 0, None).unwrap());
    let schema = Arc::new(SchemaType::new_group_type(
      "schema", None, LogicalType::NONE, vec![a], None).unwrap());
    FileMetaData::new(
      1, 5, Some("test".to_owned()),
      Some(vec![KeyValue::new("origin".to_owned(), Some("unit".to_owned()))]),
      schema)
  }

  #[test]
  fn test_file_metadata() {
    let md = file_metadata();
    assert_eq!(md.version(), 1);
    assert_eq!(md.num_rows(), 5);
    assert_eq!(md.created_by().as_deref(), Some("test"));
    assert_eq!(md.schema_descr().num_columns(), 1);
    let kv = md.key_value_metadata().as_ref().unwrap();
    assert_eq!(kv[0].key, "origin");
  }

  #[test]
  fn test_row_group_metadata() {
    let md = file_metadata();
    let chunk = ColumnChunkMetaData::new(
      Type::INT32, md.schema_descr().column(0).path().clone(), 5, 120, 160);
    assert_eq!(chunk.column_type(), Type::INT32);
    assert_eq!(chunk.num_values(), 5);
    assert_eq!(chunk.compressed_size(), 120);
    assert_eq!(chunk.uncompressed_size(), 160);

    let rg = RowGroupMetaData::new(vec![chunk], 5, 160);
    assert_eq!(rg.num_columns(), 1);
    assert_eq!(rg.num_rows(), 5);
    assert_eq!(rg.column(0).column_path().string(), "a");

    let parquet_md = ParquetMetaData::new(md, vec![rg]);
    assert_eq!(parquet_md.num_row_groups(), 1);
    assert_eq!(parquet_md.row_group(0).num_rows(), 5);
  }
}
