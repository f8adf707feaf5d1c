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

//! Materialization of Parquet columns as Arrow arrays and record batches.
//!
//! [`reader::FileReader`] drives one array reader tree per projected
//! top-level field; [`array_reader`] holds the tree itself — a primitive
//! reader per leaf plus list/struct readers that re-derive nesting and
//! nulls from the definition/repetition level streams.

pub mod array_reader;
pub mod reader;
pub mod schema;

pub use self::reader::FileReader;
pub use self::schema::{parquet_to_arrow_field, parquet_to_arrow_schema,
                       parquet_to_arrow_schema_by_columns};
