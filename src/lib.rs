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

//! Reconstruction of Arrow in-memory tables from Parquet's Dremel-style
//! (repetition, definition) level encoding.
//!
//! The page-level decoder, footer parsing, compression and dictionary
//! handling are consumed through the traits in [`file::reader`] and
//! [`column::reader`]; this crate owns everything above that seam: per-leaf
//! batch accumulation, null-aware reconstruction of arbitrarily nested
//! list/struct/map shapes, and row-group orchestration with an optional
//! bounded worker pool.
//!
//! The entry point is [`arrow::reader::FileReader`]:
//!
//! ```ignore
//! let reader = FileReader::new(parquet_reader, pool);
//! let table = reader.read_table(None)?;
//! ```

#![allow(non_camel_case_types)]

#[macro_use]
pub mod errors;

pub mod basic;
pub mod data_type;

pub mod schema;
pub mod file;
pub mod column;
pub mod util;

pub mod arrow;
