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

use crate::column::reader::ColumnReader;
use crate::errors::Result;
use crate::file::metadata::{ParquetMetaData, RowGroupMetaData};

// ----------------------------------------------------------------------
// APIs for file & row group readers

/// Parquet file reader API. With this, a user can get metadata information
/// about the Parquet file, and a reader for each row group.
///
/// This is the boundary to the out-of-scope decoding stack: implementations
/// own footer parsing, page decompression and value decoding. Field
/// materialization may fan out over worker threads, each opening its own
/// row-group readers, so implementations must be shareable.
pub trait FileReader: Send + Sync {
  /// Get metadata information about this file.
  fn metadata(&self) -> &ParquetMetaData;

  /// Get the `i`th row group reader. Note this doesn't do bound check.
  fn get_row_group<'a>(&'a self, i: usize) -> Result<Box<dyn RowGroupReader + 'a>>;
}

/// Parquet row group reader API. With this, a user can get metadata
/// information about the row group, as well as a level/value reader for
/// each individual column chunk.
pub trait RowGroupReader {
  /// Get metadata information about this row group.
  fn metadata(&self) -> &RowGroupMetaData;

  /// Get the level/value reader for the `i`th column chunk.
  fn get_column_reader(&self, i: usize) -> Result<ColumnReader>;
}
