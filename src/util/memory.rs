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
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::errors::Result;

// ----------------------------------------------------------------------
// Memory pool

/// Accounting for the byte regions the readers keep in flight.
///
/// Field materialization may run on several worker threads against one
/// shared pool, so implementations must be thread-safe. The pool only
/// tracks sizes; the buffers themselves are ordinary allocations.
pub trait MemoryPool: Send + Sync + fmt::Debug {
  /// Charge `size` bytes to the pool. Fails with `OutOfMemory` when a
  /// capacity limit would be exceeded.
  fn allocate(&self, size: usize) -> Result<()>;

  /// Adjust a previous charge of `old_size` bytes to `new_size` bytes.
  fn reallocate(&self, old_size: usize, new_size: usize) -> Result<()>;

  /// Return `size` previously charged bytes to the pool.
  fn free(&self, size: usize);

  /// Bytes currently charged.
  fn bytes_allocated(&self) -> usize;

  /// High-water mark of bytes charged.
  fn max_allocated(&self) -> usize;
}

pub type MemoryPoolRef = Arc<dyn MemoryPool>;

/// Atomics-backed pool with an optional capacity limit.
#[derive(Debug)]
pub struct DefaultMemoryPool {
  limit: usize,
  cur_bytes_allocated: AtomicUsize,
  max_bytes_allocated: AtomicUsize
}

impl DefaultMemoryPool {
  pub fn new() -> Self {
    Self::with_limit(usize::MAX)
  }

  /// A pool refusing to go beyond `limit` bytes in flight.
  pub fn with_limit(limit: usize) -> Self {
    Self {
      limit: limit,
      cur_bytes_allocated: AtomicUsize::new(0),
      max_bytes_allocated: AtomicUsize::new(0)
    }
  }
}

impl Default for DefaultMemoryPool {
  fn default() -> Self {
    Self::new()
  }
}

impl MemoryPool for DefaultMemoryPool {
  fn allocate(&self, size: usize) -> Result<()> {
    let new_total = self.cur_bytes_allocated.fetch_add(size, Ordering::SeqCst) + size;
    if new_total > self.limit {
      self.cur_bytes_allocated.fetch_sub(size, Ordering::SeqCst);
      return Err(oom_err!(
        "allocation of {} bytes exceeds memory pool limit of {} ({} in use)",
        size, self.limit, new_total - size));
    }
    self.max_bytes_allocated.fetch_max(new_total, Ordering::SeqCst);
    Ok(())
  }

  fn reallocate(&self, old_size: usize, new_size: usize) -> Result<()> {
    if new_size > old_size {
      self.allocate(new_size - old_size)
    } else {
      self.free(old_size - new_size);
      Ok(())
    }
  }

  fn free(&self, size: usize) {
    let prev = self.cur_bytes_allocated.fetch_sub(size, Ordering::SeqCst);
    debug_assert!(prev >= size, "freeing more bytes than allocated");
  }

  fn bytes_allocated(&self) -> usize {
    self.cur_bytes_allocated.load(Ordering::SeqCst)
  }

  fn max_allocated(&self) -> usize {
    self.max_bytes_allocated.load(Ordering::SeqCst)
  }
}

// ----------------------------------------------------------------------
// Immutable buffer (BytePtr)

/// A slice of a reference-counted, read-only byte array. Sub-slices can be
/// created cheaply; the backing array is released once all slices are
/// dropped. Shareable across reader worker threads.
#[derive(Clone, Debug, PartialEq)]
pub struct BytePtr {
  data: Arc<Vec<u8>>,
  start: usize,
  len: usize
}

impl BytePtr {
  pub fn new(v: Vec<u8>) -> Self {
    let len = v.len();
    Self { data: Arc::new(v), start: 0, len: len }
  }

  pub fn start(&self) -> usize {
    self.start
  }

  pub fn len(&self) -> usize {
    self.len
  }

  pub fn is_empty(&self) -> bool {
    self.len == 0
  }

  pub fn all(&self) -> BytePtr {
    BytePtr { data: self.data.clone(), start: self.start, len: self.len }
  }

  pub fn start_from(&self, start: usize) -> BytePtr {
    assert!(start <= self.len);
    BytePtr { data: self.data.clone(), start: self.start + start, len: self.len - start }
  }

  pub fn range(&self, start: usize, len: usize) -> BytePtr {
    assert!(start + len <= self.len);
    BytePtr { data: self.data.clone(), start: self.start + start, len: len }
  }

  pub fn slice(&self) -> &[u8] {
    &self.data[self.start..self.start + self.len]
  }
}

impl Display for BytePtr {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{:?}", self.slice())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::errors::ParquetError;

  #[test]
  fn test_pool_accounting() {
    let pool = DefaultMemoryPool::new();
    assert_eq!(pool.bytes_allocated(), 0);

    pool.allocate(100).unwrap();
    assert_eq!(pool.bytes_allocated(), 100);
    assert_eq!(pool.max_allocated(), 100);

    pool.allocate(50).unwrap();
    assert_eq!(pool.bytes_allocated(), 150);

    pool.free(100);
    assert_eq!(pool.bytes_allocated(), 50);
    assert_eq!(pool.max_allocated(), 150);

    pool.reallocate(50, 80).unwrap();
    assert_eq!(pool.bytes_allocated(), 80);
    pool.reallocate(80, 10).unwrap();
    assert_eq!(pool.bytes_allocated(), 10);
  }

  #[test]
  fn test_pool_limit() {
    let pool = DefaultMemoryPool::with_limit(128);
    pool.allocate(100).unwrap();
    let result = pool.allocate(100);
    match result {
      Err(ParquetError::OutOfMemory(_)) => {},
      other => panic!("expected OutOfMemory, got {:?}", other),
    }
    // the failed allocation must not leak into the accounting
    assert_eq!(pool.bytes_allocated(), 100);
    pool.allocate(28).unwrap();
    assert_eq!(pool.bytes_allocated(), 128);
  }

  #[test]
  fn test_pool_shared_across_threads() {
    let pool: MemoryPoolRef = Arc::new(DefaultMemoryPool::new());
    let mut handles = vec![];
    for _ in 0..4 {
      let pool = pool.clone();
      handles.push(std::thread::spawn(move || {
        for _ in 0..100 {
          pool.allocate(8).unwrap();
          pool.free(8);
        }
      }));
    }
    for h in handles {
      h.join().unwrap();
    }
    assert_eq!(pool.bytes_allocated(), 0);
  }

  #[test]
  fn test_byte_ptr() {
    let values = (0..50).collect();
    let ptr = BytePtr::new(values);
    assert_eq!(ptr.len(), 50);
    assert_eq!(ptr.start(), 0);

    let ptr2 = ptr.all();
    assert_eq!(ptr2.len(), 50);
    assert_eq!(ptr2.start(), 0);

    let ptr3 = ptr.start_from(20);
    assert_eq!(ptr3.len(), 30);
    assert_eq!(ptr3.start(), 20);

    let ptr4 = ptr3.range(10, 10);
    assert_eq!(ptr4.len(), 10);
    assert_eq!(ptr4.start(), 30);

    let expected: Vec<u8> = (30..40).collect();
    assert_eq!(ptr4.slice(), expected.as_slice());
  }
}
