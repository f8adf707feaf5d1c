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

//! Helpers for the LSB-first validity bitmaps and bit-packed boolean data
//! produced by the readers.

/// Returns the ceiling of `value / divisor`.
#[inline]
pub fn ceil(value: usize, divisor: usize) -> usize {
  (value + divisor - 1) / divisor
}

#[inline]
pub fn set_array_bit(bits: &mut [u8], i: usize) {
  bits[i / 8] |= 1 << (i % 8);
}

#[inline]
pub fn unset_array_bit(bits: &mut [u8], i: usize) {
  bits[i / 8] &= !(1 << (i % 8));
}

#[inline]
pub fn get_array_bit(bits: &[u8], i: usize) -> bool {
  bits[i / 8] & (1 << (i % 8)) != 0
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_ceil() {
    assert_eq!(ceil(0, 8), 0);
    assert_eq!(ceil(1, 8), 1);
    assert_eq!(ceil(8, 8), 1);
    assert_eq!(ceil(9, 8), 2);
    assert_eq!(ceil(16, 8), 2);
    assert_eq!(ceil(17, 8), 3);
  }

  #[test]
  fn test_set_array_bit() {
    let mut buffer = vec![0, 0, 0];
    set_array_bit(&mut buffer[..], 1);
    assert_eq!(buffer, vec![2, 0, 0]);
    set_array_bit(&mut buffer[..], 4);
    assert_eq!(buffer, vec![18, 0, 0]);
    unset_array_bit(&mut buffer[..], 1);
    assert_eq!(buffer, vec![16, 0, 0]);
    set_array_bit(&mut buffer[..], 10);
    assert_eq!(buffer, vec![16, 4, 0]);
    set_array_bit(&mut buffer[..], 10);
    assert_eq!(buffer, vec![16, 4, 0]);
    set_array_bit(&mut buffer[..], 11);
    assert_eq!(buffer, vec![16, 12, 0]);
    unset_array_bit(&mut buffer[..], 10);
    assert_eq!(buffer, vec![16, 8, 0]);
  }

  #[test]
  fn test_get_array_bit() {
    let mut buffer = vec![0, 0];
    assert!(!get_array_bit(&buffer[..], 0));
    set_array_bit(&mut buffer[..], 0);
    assert!(get_array_bit(&buffer[..], 0));
    set_array_bit(&mut buffer[..], 9);
    assert!(!get_array_bit(&buffer[..], 8));
    assert!(get_array_bit(&buffer[..], 9));
  }
}
