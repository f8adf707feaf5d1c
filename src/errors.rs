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

use std::io;
use std::result;

use arrow::error::ArrowError;
use quick_error::quick_error;

quick_error! {
  #[derive(Debug)]
  pub enum ParquetError {
    /// A caller-supplied argument is out of range or inconsistent, e.g. a
    /// projection index outside the leaf column set.
    Invalid(message: String) {
      display("Invalid argument: {}", message)
    }
    /// The requested logical type or schema shape is not supported.
    NotImplemented(message: String) {
      display("Not yet implemented: {}", message)
    }
    /// A fault propagated from the underlying column decoder or I/O source.
    Io(message: String) {
      display("IO error: {}", message)
      from(e: io::Error) -> (format!("underlying IO error: {}", e))
    }
    /// A memory pool refused an allocation or resize.
    OutOfMemory(message: String) {
      display("Out of memory: {}", message)
    }
    /// An error raised while assembling Arrow arrays or batches.
    Arrow(message: String) {
      display("Arrow error: {}", message)
      from(e: ArrowError) -> (format!("{}", e))
    }
  }
}

pub type Result<T> = result::Result<T, ParquetError>;

/// Convenient macros for the different error categories

macro_rules! invalid_err {
  ($fmt:expr) => (crate::errors::ParquetError::Invalid($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (
    crate::errors::ParquetError::Invalid(format!($fmt, $($args),*)));
}

macro_rules! nyi_err {
  ($fmt:expr) => (crate::errors::ParquetError::NotImplemented($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (
    crate::errors::ParquetError::NotImplemented(format!($fmt, $($args),*)));
}

macro_rules! io_err {
  ($fmt:expr) => (crate::errors::ParquetError::Io($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (
    crate::errors::ParquetError::Io(format!($fmt, $($args),*)));
}

macro_rules! oom_err {
  ($fmt:expr) => (crate::errors::ParquetError::OutOfMemory($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (
    crate::errors::ParquetError::OutOfMemory(format!($fmt, $($args),*)));
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_display() {
    assert_eq!(
      invalid_err!("column index {} out of range", 7).to_string(),
      "Invalid argument: column index 7 out of range");
    assert_eq!(nyi_err!("DECIMAL").to_string(), "Not yet implemented: DECIMAL");
    assert_eq!(io_err!("short read").to_string(), "IO error: short read");
    assert_eq!(
      oom_err!("pool exhausted").to_string(),
      "Out of memory: pool exhausted");
  }

  #[test]
  fn test_from_io_error() {
    let err: ParquetError = io::Error::new(io::ErrorKind::Other, "boom").into();
    match err {
      ParquetError::Io(msg) => assert!(msg.contains("boom")),
      _ => panic!("expected an IO error"),
    }
  }
}
