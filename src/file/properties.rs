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

//! Reader properties.
//!
//! # Usage
//!
//! ```rust
//! use parquet_arrow::file::properties::ReaderProperties;
//!
//! let props = ReaderProperties::builder()
//!   .set_num_threads(4)
//!   .build();
//! assert_eq!(props.num_threads(), 4);
//! ```

const DEFAULT_NUM_THREADS: usize = 1;

/// Configuration for table reads.
#[derive(Clone, Debug)]
pub struct ReaderProperties {
  num_threads: usize,
}

impl ReaderProperties {
  pub fn builder() -> ReaderPropertiesBuilder {
    ReaderPropertiesBuilder::new()
  }

  /// Number of worker threads used to materialize top-level fields in
  /// `read_table`/`read_row_group`. `1` means sequential.
  pub fn num_threads(&self) -> usize {
    self.num_threads
  }
}

impl Default for ReaderProperties {
  fn default() -> Self {
    Self::builder().build()
  }
}

pub struct ReaderPropertiesBuilder {
  num_threads: usize,
}

impl ReaderPropertiesBuilder {
  fn new() -> Self {
    Self { num_threads: DEFAULT_NUM_THREADS }
  }

  pub fn set_num_threads(mut self, num_threads: usize) -> Self {
    self.num_threads = num_threads;
    self
  }

  pub fn build(self) -> ReaderProperties {
    ReaderProperties { num_threads: self.num_threads }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_properties() {
    let props = ReaderProperties::default();
    assert_eq!(props.num_threads(), 1);
  }

  #[test]
  fn test_builder() {
    let props = ReaderProperties::builder().set_num_threads(8).build();
    assert_eq!(props.num_threads(), 8);
  }
}
