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

//! Portable Bloom filter for probabilistic set membership testing.
//!
//! A Bloom filter is a space-efficient probabilistic data structure used to test whether
//! a key is a member of a set. False positive matches are possible, but false negatives
//! are not. In other words, a query returns either "possibly in set" or "definitely not in set".
//!
//! # Properties
//!
//! - **No false negatives**: If a key was inserted, `contains()` will always return `true`
//! - **Possible false positives**: `contains()` may return `true` for keys never inserted
//! - **Fixed size**: The bitmap never grows, shrinks or loses bits
//! - **Portable**: Keys are hashed as bytes and the serialized form is plain MessagePack, so
//!   a filter built by one implementation can be queried by another
//!
//! # Usage
//!
//! ```rust
//! use pbloom::bloom::BloomFilter;
//!
//! // Create a filter optimized for 1000 keys with 1% false positive rate
//! let mut filter = BloomFilter::with_accuracy(1000, 0.01).unwrap();
//!
//! filter.insert("apple");
//! filter.insert(b"banana");
//!
//! assert!(filter.contains("apple")); // true - definitely inserted
//! assert!(!filter.contains("grape")); // false - never inserted (probably)
//!
//! // Ship it somewhere else
//! let bytes = filter.serialize().unwrap();
//! let restored = BloomFilter::deserialize(&bytes).unwrap();
//! assert!(restored.contains("banana"));
//! ```
//!
//! # Creating Filters
//!
//! ## By Accuracy
//!
//! ```rust
//! # use pbloom::bloom::BloomFilter;
//! let filter = BloomFilter::with_accuracy(
//!     10_000, // Expected entries
//!     0.01,   // Target false positive rate (1%)
//! )
//! .unwrap();
//! ```
//!
//! ## By Size
//!
//! ```rust
//! # use pbloom::bloom::BloomFilter;
//! let filter = BloomFilter::with_size(
//!     1_000, // Expected entries
//!     128,   // Bitmap size in bytes
//! )
//! .unwrap();
//! assert_eq!(filter.num_hashes(), 1);
//! ```
//!
//! ## From Existing Bits
//!
//! ```rust
//! # use pbloom::bloom::BloomFilter;
//! let filter = BloomFilter::from_bits(vec![0u8; 1199], 7).unwrap();
//! ```
//!
//! # Wire Format
//!
//! Version [`SERIAL_VERSION`] 1:
//!
//! | Field      | Encoding                                     |
//! |------------|----------------------------------------------|
//! | bitmap     | MessagePack `bin` (bin8, bin16 or bin32)     |
//! | num_hashes | MessagePack `uint 8` (`0xcc`)                |
//!
//! Keys are hashed with MurmurHash3 x64 128-bit and seed [`HASH_SEED`]. The digest is split
//! into two 64-bit halves `h1` and `h2`, and round `i` sets bit `(h1 + i * h2) mod m`, where
//! bit `j` is `bitmap[j / 8] & (1 << (j % 8))`.
//!
//! # References
//!
//! - Bloom, Burton H. (1970). "Space/time trade-offs in hash coding with allowable errors"
//! - Kirsch and Mitzenmacher (2008). "Less Hashing, Same Performance: Building a Better Bloom
//!   Filter"

mod builder;
mod serialized;
mod sketch;

pub use self::builder::BloomFilterBuilder;
pub use self::builder::MAX_NUM_HASHES;
pub use self::builder::MAX_SIZE_BYTES;
pub use self::builder::MIN_NUM_HASHES;
pub use self::serialized::contains_serialized;
pub use self::serialized::create_serialized;
pub use self::serialized::insert_serialized;
pub use self::sketch::BloomFilter;
pub use self::sketch::SERIAL_VERSION;
pub use crate::hash::HASH_SEED;
