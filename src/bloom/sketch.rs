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

use tracing::trace;

use super::BloomFilterBuilder;
use crate::codec::SketchBytes;
use crate::codec::SketchSlice;
use crate::error::Error;
use crate::hash::base_hashes;

/// Version of the wire contract: the two-field MessagePack layout together with the
/// MurmurHash3 x64 128-bit (seed [`HASH_SEED`](crate::bloom::HASH_SEED)) hash scheme.
pub const SERIAL_VERSION: u8 = 1;

// bin32 header (5 bytes) plus a uint 8 (2 bytes).
const MAX_FRAMING_BYTES: usize = 7;

/// A Bloom filter for probabilistic set membership testing.
///
/// Provides fast membership queries with:
/// - No false negatives (inserted keys always return `true`)
/// - Tunable false positive rate
/// - Constant space usage, fixed at construction
///
/// Bits are only ever set, never cleared. Keys are hashed as raw bytes, so a filter built
/// here answers the same way as any other implementation of the same wire contract.
///
/// `insert` needs `&mut self` while `contains` only needs `&self`, so a populated filter can
/// be shared between threads (for example behind an `Arc`) for concurrent queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BloomFilter {
    /// Bitmap; bit `i` lives in `bits[i / 8]` under mask `1 << (i % 8)`
    pub(super) bits: Vec<u8>,
    /// Number of hash rounds per key (k)
    pub(super) num_hashes: u8,
}

impl BloomFilter {
    /// Creates an empty filter of exactly `size` bytes sized for `entries` keys.
    ///
    /// See [`BloomFilterBuilder::with_size`] for the derivation and errors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::with_size(1000, 128).unwrap();
    /// assert_eq!(filter.size_bytes(), 128);
    /// assert_eq!(filter.num_hashes(), 1);
    /// ```
    pub fn with_size(entries: i64, size: i64) -> Result<Self, Error> {
        BloomFilterBuilder::with_size(entries, size).map(BloomFilterBuilder::build)
    }

    /// Creates an empty filter sized for `entries` keys at false positive rate `fp_rate`.
    ///
    /// See [`BloomFilterBuilder::with_accuracy`] for the derivation and errors.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::with_accuracy(500, 0.05).unwrap();
    /// assert_eq!(filter.size_bytes(), 390);
    /// assert_eq!(filter.num_hashes(), 4);
    /// ```
    pub fn with_accuracy(entries: i64, fp_rate: f64) -> Result<Self, Error> {
        BloomFilterBuilder::with_accuracy(entries, fp_rate).map(BloomFilterBuilder::build)
    }

    /// Creates a filter from an existing bitmap and number of hash rounds.
    ///
    /// Use this to rebuild a filter whose dimensions were chosen elsewhere. Unlike the sizing
    /// constructors, any `num_hashes` from 1 to 255 is accepted as is. Query and insert cost
    /// grow linearly with it, and nothing is gained past `(m / n) * ln 2` rounds.
    ///
    /// # Errors
    ///
    /// - [`EmptyBits`](crate::error::ErrorKind::EmptyBits) if `bits` is empty
    /// - [`InvalidHashCount`](crate::error::ErrorKind::InvalidHashCount) if `num_hashes` is 0
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::from_bits(vec![0xff, 0x00, 0xaa], 3).unwrap();
    /// assert_eq!(filter.capacity(), 24);
    /// ```
    pub fn from_bits(bits: Vec<u8>, num_hashes: u8) -> Result<Self, Error> {
        if bits.is_empty() {
            return Err(Error::empty_bits());
        }
        if num_hashes == 0 {
            return Err(Error::invalid_hash_count());
        }
        Ok(BloomFilter { bits, num_hashes })
    }

    // ========================================================================
    // Query Operations
    // ========================================================================

    /// Tests whether a key is possibly in the set.
    ///
    /// Returns:
    /// - `true`: Key was **possibly** inserted (or false positive)
    /// - `false`: Key was **definitely not** inserted
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_accuracy(100, 0.01).unwrap();
    /// filter.insert("apple");
    ///
    /// assert!(filter.contains("apple")); // true - was inserted
    /// assert!(!filter.contains("grape")); // false - never inserted (probably)
    /// ```
    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        let (h1, h2) = base_hashes(key.as_ref());
        self.check_bits(h1, h2)
    }

    /// Tests and inserts a key in a single operation.
    ///
    /// Returns whether the key was possibly already in the set before insertion, hashing
    /// the key only once.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_accuracy(100, 0.01).unwrap();
    ///
    /// assert!(!filter.contains_and_insert("apple")); // first insertion
    /// assert!(filter.contains_and_insert("apple")); // now it's in the set
    /// ```
    pub fn contains_and_insert(&mut self, key: impl AsRef<[u8]>) -> bool {
        let (h1, h2) = base_hashes(key.as_ref());
        let was_present = self.check_bits(h1, h2);
        self.set_bits(h1, h2);
        was_present
    }

    // ========================================================================
    // Update Operations
    // ========================================================================

    /// Inserts a key into the filter.
    ///
    /// After insertion, `contains(key)` will always return `true`. Inserting the same key
    /// again leaves the bitmap unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let mut filter = BloomFilter::with_accuracy(100, 0.01).unwrap();
    ///
    /// filter.insert("apple");
    /// filter.insert(b"\x00\x01");
    /// filter.insert(42_u64.to_le_bytes());
    ///
    /// assert!(filter.contains("apple"));
    /// assert!(filter.contains(42_u64.to_le_bytes()));
    /// ```
    pub fn insert(&mut self, key: impl AsRef<[u8]>) {
        let (h1, h2) = base_hashes(key.as_ref());
        self.set_bits(h1, h2);
    }

    // ========================================================================
    // Statistics and Properties
    // ========================================================================

    /// Returns whether no bit has been set yet.
    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&byte| byte == 0)
    }

    /// Returns the number of bits set to 1.
    ///
    /// Useful for monitoring filter saturation.
    pub fn bits_used(&self) -> u64 {
        self.bits.iter().map(|byte| u64::from(byte.count_ones())).sum()
    }

    /// Returns the total number of bits in the filter (m).
    pub fn capacity(&self) -> u64 {
        self.bits.len() as u64 * 8
    }

    /// Returns the size of the bitmap in bytes.
    pub fn size_bytes(&self) -> usize {
        self.bits.len()
    }

    /// Returns the number of hash rounds per key (k).
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Returns the bitmap.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bits
    }

    /// Consumes the filter and returns its bitmap.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bits
    }

    /// Returns the current load factor (fraction of bits set).
    ///
    /// Values near 0.5 indicate the filter has reached the load it was sized for.
    pub fn load_factor(&self) -> f64 {
        self.bits_used() as f64 / self.capacity() as f64
    }

    /// Estimates the current false positive probability.
    ///
    /// A key never inserted is reported present when all of its `k` bits happen to be set,
    /// which for a uniformly filled bitmap happens with probability `load_factor ^ k`.
    pub fn estimated_fpp(&self) -> f64 {
        self.load_factor().powi(i32::from(self.num_hashes))
    }

    // ========================================================================
    // Serialization
    // ========================================================================

    /// Serializes the filter to its portable byte form.
    ///
    /// The output is a MessagePack `bin` holding the bitmap followed by a MessagePack
    /// `uint 8` holding the number of hash rounds.
    ///
    /// # Errors
    ///
    /// Returns [`EncodingError`](crate::error::ErrorKind::EncodingError) if the bitmap does not
    /// fit a MessagePack `bin32`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let filter = BloomFilter::from_bits(vec![0x0f, 0xf0, 0xaa], 5).unwrap();
    /// let bytes = filter.serialize().unwrap();
    /// assert_eq!(bytes, [0xc4, 0x03, 0x0f, 0xf0, 0xaa, 0xcc, 0x05]);
    /// ```
    pub fn serialize(&self) -> Result<Vec<u8>, Error> {
        let mut bytes = SketchBytes::with_capacity(self.bits.len() + MAX_FRAMING_BYTES);
        bytes.write_bin(&self.bits)?;
        bytes.write_u8(self.num_hashes)?;
        Ok(bytes.into_bytes())
    }

    /// Deserializes a filter from its portable byte form.
    ///
    /// Any MessagePack integer encoding of the hash count is accepted as long as it fits a
    /// `u8`. Bytes left over after the two fields are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `bytes` is empty ([`EmptyInput`](crate::error::ErrorKind::EmptyInput))
    /// - the data is truncated, carries other MessagePack types, or has trailing bytes
    ///   ([`MalformedEncoding`](crate::error::ErrorKind::MalformedEncoding))
    /// - the decoded bitmap is empty or the hash count is zero (same as [`Self::from_bits`])
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilter;
    /// let mut original = BloomFilter::with_accuracy(100, 0.01).unwrap();
    /// original.insert("test");
    ///
    /// let bytes = original.serialize().unwrap();
    /// let restored = BloomFilter::deserialize(&bytes).unwrap();
    /// assert_eq!(original, restored);
    /// assert!(restored.contains("test"));
    /// ```
    pub fn deserialize(bytes: &[u8]) -> Result<Self, Error> {
        Self::decode(bytes).inspect_err(|err| {
            trace!(%err, len = bytes.len(), "rejected serialized bloom filter");
        })
    }

    fn decode(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.is_empty() {
            return Err(Error::empty_input());
        }

        let mut cursor = SketchSlice::new(bytes);
        let bits = cursor
            .read_bin()
            .map_err(|err| err.with_context("field", "bits"))?;
        let num_hashes = cursor
            .read_u8()
            .map_err(|err| err.with_context("field", "num_hashes"))?;

        let trailing = cursor.remaining();
        if trailing != 0 {
            return Err(
                Error::malformed("unexpected bytes after the hash count")
                    .with_context("trailing", trailing),
            );
        }

        Self::from_bits(bits, num_hashes)
    }

    // ========================================================================
    // Internal Helpers
    // ========================================================================

    /// Checks if all k bits are set for the given hash values.
    fn check_bits(&self, h1: u64, h2: u64) -> bool {
        (0..self.num_hashes).all(|i| self.get_bit(self.compute_bit_index(h1, h2, i)))
    }

    /// Sets all k bits for the given hash values.
    fn set_bits(&mut self, h1: u64, h2: u64) {
        for i in 0..self.num_hashes {
            let bit_index = self.compute_bit_index(h1, h2, i);
            self.set_bit(bit_index);
        }
    }

    /// Computes a bit index using double hashing (Kirsch-Mitzenmacher).
    /// Formula: (h1 + i * h2) mod capacity
    fn compute_bit_index(&self, h1: u64, h2: u64, i: u8) -> u64 {
        let hash = h1.wrapping_add(u64::from(i).wrapping_mul(h2));
        hash % self.capacity()
    }

    fn get_bit(&self, bit_index: u64) -> bool {
        let mask = 1u8 << (bit_index % 8);
        self.bits[(bit_index / 8) as usize] & mask != 0
    }

    fn set_bit(&mut self, bit_index: u64) {
        let mask = 1u8 << (bit_index % 8);
        self.bits[(bit_index / 8) as usize] |= mask;
    }
}
