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

//! Operations on serialized filters.
//!
//! Consumers that only ever store and pass around the portable byte form (a database column,
//! a blob in an object store) can query and update it without handling a [`BloomFilter`].

use super::BloomFilter;
use crate::error::Error;

/// Deserializes `bytes` and tests whether `key` is possibly in the filter.
///
/// # Examples
///
/// ```
/// # use pbloom::bloom::BloomFilter;
/// # use pbloom::bloom::contains_serialized;
/// let mut filter = BloomFilter::with_accuracy(1000, 0.01).unwrap();
/// filter.insert("hello");
/// let bytes = filter.serialize().unwrap();
///
/// assert!(contains_serialized(&bytes, "hello").unwrap());
/// assert!(contains_serialized(&[], "hello").is_err());
/// ```
pub fn contains_serialized(bytes: &[u8], key: impl AsRef<[u8]>) -> Result<bool, Error> {
    BloomFilter::deserialize(bytes).map(|filter| filter.contains(key))
}

/// Deserializes `bytes`, inserts `key` and returns the re-serialized filter.
pub fn insert_serialized(bytes: &[u8], key: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    let mut filter = BloomFilter::deserialize(bytes)?;
    filter.insert(key);
    filter.serialize()
}

/// Creates an empty filter sized by accuracy and returns it serialized.
///
/// # Examples
///
/// ```
/// # use pbloom::bloom::create_serialized;
/// # use pbloom::bloom::insert_serialized;
/// # use pbloom::bloom::contains_serialized;
/// let bytes = create_serialized(1000, 0.01).unwrap();
/// let bytes = insert_serialized(&bytes, "hello").unwrap();
/// assert!(contains_serialized(&bytes, "hello").unwrap());
/// ```
pub fn create_serialized(entries: i64, fp_rate: f64) -> Result<Vec<u8>, Error> {
    BloomFilter::with_accuracy(entries, fp_rate)?.serialize()
}
