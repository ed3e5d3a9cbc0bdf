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

use std::f64::consts::LN_2;

use tracing::debug;

use super::BloomFilter;
use crate::error::Error;

/// Largest bitmap, in bytes, a filter may have: the length prefix of a MessagePack `bin32`.
pub const MAX_SIZE_BYTES: u64 = u32::MAX as u64;
/// Smallest number of hash rounds a derived filter is given.
pub const MIN_NUM_HASHES: u8 = 1;
/// Largest number of hash rounds a derived filter is given.
pub const MAX_NUM_HASHES: u8 = u8::MAX;

/// Builder for creating [`BloomFilter`] instances from sizing parameters.
///
/// Provides two construction modes:
/// - [`with_accuracy()`](Self::with_accuracy): expected entries and target false positive rate
/// - [`with_size()`](Self::with_size): expected entries and an exact bitmap size in bytes
///
/// Both validate their inputs and derive the filter dimensions up front, so the dimensions
/// can be inspected before [`build()`](Self::build) allocates the bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloomFilterBuilder {
    size_bytes: usize,
    num_hashes: u8,
}

impl BloomFilterBuilder {
    /// Creates a builder for a filter of exactly `size` bytes holding about `entries` keys.
    ///
    /// The number of hash rounds is `ceil((m / entries) * ln 2)` with `m = size * 8`.
    ///
    /// # Errors
    ///
    /// - [`InvalidEntries`](crate::error::ErrorKind::InvalidEntries) if `entries <= 0`
    /// - [`InvalidSize`](crate::error::ErrorKind::InvalidSize) if `size <= 0` or `size` exceeds
    ///   [`MAX_SIZE_BYTES`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilterBuilder;
    /// let builder = BloomFilterBuilder::with_size(500, 128).unwrap();
    /// assert_eq!(builder.size_bytes(), 128);
    /// assert_eq!(builder.num_hashes(), 2);
    /// ```
    pub fn with_size(entries: i64, size: i64) -> Result<Self, Error> {
        if entries <= 0 {
            return Err(Error::invalid_entries(entries));
        }
        if size <= 0 {
            return Err(Error::invalid_size("size must be positive", size));
        }
        if size as u64 > MAX_SIZE_BYTES {
            return Err(Error::invalid_size(
                format!("size must not exceed {MAX_SIZE_BYTES} bytes"),
                size,
            ));
        }

        let num_bits = size as u64 * 8;
        let num_hashes = Self::suggest_num_hashes_from_size(entries, num_bits);
        debug!(entries, size, num_hashes, "sized bloom filter by size");

        Ok(BloomFilterBuilder {
            size_bytes: size as usize,
            num_hashes,
        })
    }

    /// Creates a builder with the smallest byte-aligned filter that holds `entries` keys at
    /// the target false positive rate.
    ///
    /// The bit count is `ceil(-entries * ln(fp_rate) / ln(2)^2)` rounded up to a multiple of 8,
    /// and the number of hash rounds is `round((m / entries) * ln 2)`.
    ///
    /// # Errors
    ///
    /// - [`InvalidEntries`](crate::error::ErrorKind::InvalidEntries) if `entries <= 0`
    /// - [`InvalidFpRate`](crate::error::ErrorKind::InvalidFpRate) if `fp_rate` is not strictly
    ///   between 0 and 1, or the resulting filter would exceed [`MAX_SIZE_BYTES`]
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilterBuilder;
    /// let builder = BloomFilterBuilder::with_accuracy(1000, 0.01).unwrap();
    /// assert_eq!(builder.size_bytes(), 1199);
    /// assert_eq!(builder.num_hashes(), 7);
    /// ```
    pub fn with_accuracy(entries: i64, fp_rate: f64) -> Result<Self, Error> {
        if entries <= 0 {
            return Err(Error::invalid_entries(entries));
        }
        // Written as a negation so that NaN is rejected too.
        if !(fp_rate > 0.0 && fp_rate < 1.0) {
            return Err(Error::invalid_fp_rate(
                "false positive rate must be between 0 and 1 (exclusive)",
                fp_rate,
            ));
        }

        let num_bits = Self::suggest_num_bits(entries, fp_rate);
        if num_bits / 8 > MAX_SIZE_BYTES {
            return Err(Error::invalid_fp_rate(
                format!("filter would exceed {MAX_SIZE_BYTES} bytes"),
                fp_rate,
            )
            .with_context("entries", entries)
            .with_context("num_bits", num_bits));
        }

        let num_hashes = Self::suggest_num_hashes_from_accuracy(entries, num_bits);
        debug!(entries, fp_rate, num_bits, num_hashes, "sized bloom filter by accuracy");

        Ok(BloomFilterBuilder {
            size_bytes: (num_bits / 8) as usize,
            num_hashes,
        })
    }

    /// Returns the bitmap size in bytes the built filter will have.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Returns the number of hash rounds the built filter will use.
    pub fn num_hashes(&self) -> u8 {
        self.num_hashes
    }

    /// Builds an empty Bloom filter with the derived dimensions.
    pub fn build(self) -> BloomFilter {
        BloomFilter {
            bits: vec![0u8; self.size_bytes],
            num_hashes: self.num_hashes,
        }
    }

    /// Suggests the number of bits for `entries` keys at false positive rate `fp_rate`.
    ///
    /// Formula: `m = -n * ln(p) / (ln(2)^2)`, rounded up to a whole number of bytes.
    ///
    /// The result saturates at `u64::MAX` for absurd inputs; callers are expected to have
    /// validated `entries > 0` and `0 < fp_rate < 1`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_bits(1000, 0.01), 9592);
    /// assert_eq!(BloomFilterBuilder::suggest_num_bits(500, 0.05), 3120);
    /// ```
    pub fn suggest_num_bits(entries: i64, fp_rate: f64) -> u64 {
        let n = entries as f64;
        let bits = -n * fp_rate.ln() / (LN_2 * LN_2);
        ((bits / 8.0).ceil() * 8.0) as u64
    }

    /// Suggests the number of hash rounds for a filter sized by accuracy.
    ///
    /// Formula: `k = round((m / n) * ln(2))`, clamped to `[1, 255]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_accuracy(1000, 9592), 7);
    /// ```
    pub fn suggest_num_hashes_from_accuracy(entries: i64, num_bits: u64) -> u8 {
        let k = (num_bits as f64 / entries as f64 * LN_2).round();
        k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u8
    }

    /// Suggests the number of hash rounds for a filter sized by bytes.
    ///
    /// Formula: `k = ceil((m / n) * ln(2))`, clamped to `[1, 255]`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use pbloom::bloom::BloomFilterBuilder;
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_size(1000, 1024), 1);
    /// assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_size(500, 1024), 2);
    /// ```
    pub fn suggest_num_hashes_from_size(entries: i64, num_bits: u64) -> u8 {
        let k = (num_bits as f64 / entries as f64 * LN_2).ceil();
        k.clamp(f64::from(MIN_NUM_HASHES), f64::from(MAX_NUM_HASHES)) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_suggest_num_bits_rounds_up_to_bytes() {
        // 9585.06 bits before rounding
        assert_eq!(BloomFilterBuilder::suggest_num_bits(1000, 0.01), 9592);
        // 3117.6 bits before rounding
        assert_eq!(BloomFilterBuilder::suggest_num_bits(500, 0.05), 3120);
        assert_eq!(BloomFilterBuilder::suggest_num_bits(1, 0.5), 8);
    }

    #[test]
    fn test_num_hashes_rounding_direction() {
        // (m / n) * ln 2 = 6.6487
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_accuracy(1000, 9592), 7);
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_size(1000, 9592), 7);
        // (m / n) * ln 2 = 4.3254
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_accuracy(500, 3120), 4);
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_size(500, 3120), 5);
    }

    #[test]
    fn test_num_hashes_clamped() {
        // would round to 0
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_accuracy(1000, 224), 1);
        // would be 710
        assert_eq!(BloomFilterBuilder::suggest_num_hashes_from_size(1, 1024), 255);
    }

    #[test]
    fn test_high_fp_rate_still_hashes_once() {
        let builder = BloomFilterBuilder::with_accuracy(1000, 0.9).unwrap();
        assert_eq!(builder.num_hashes(), 1);
        assert_eq!(builder.size_bytes(), 28);
    }

    #[test]
    fn test_size_limit() {
        let err = BloomFilterBuilder::with_size(1, MAX_SIZE_BYTES as i64 + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSize);

        let err = BloomFilterBuilder::with_accuracy(i64::MAX, 1e-300).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFpRate);
    }

    #[test]
    fn test_nan_fp_rate() {
        let err = BloomFilterBuilder::with_accuracy(1000, f64::NAN).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidFpRate);
    }

    #[test]
    fn test_build_allocates_zeroed_bitmap() {
        let filter = BloomFilterBuilder::with_size(10, 16).unwrap().build();
        assert_eq!(filter.as_bytes(), &[0u8; 16]);
        assert_eq!(filter.num_hashes(), 9);
    }
}
