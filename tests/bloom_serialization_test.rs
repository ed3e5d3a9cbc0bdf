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

use googletest::assert_that;
use googletest::prelude::contains_substring;
use googletest::prelude::eq;
use pbloom::bloom::BloomFilter;
use pbloom::bloom::contains_serialized;
use pbloom::bloom::create_serialized;
use pbloom::bloom::insert_serialized;
use pbloom::error::ErrorKind;
use sha2::Digest;
use sha2::Sha256;

#[test]
fn test_serialize_known_bytes() {
    let filter = BloomFilter::from_bits(vec![0x0f, 0xf0, 0xaa], 5).unwrap();
    let bytes = filter.serialize().unwrap();
    assert_eq!(bytes, [0xc4, 0x03, 0x0f, 0xf0, 0xaa, 0xcc, 0x05]);

    let restored = BloomFilter::deserialize(&bytes).unwrap();
    assert_that!(restored.num_hashes(), eq(5));
    assert_eq!(restored.as_bytes(), &[0x0f, 0xf0, 0xaa]);
}

#[test]
fn test_serialize_deserialize_empty() {
    let filter = BloomFilter::with_accuracy(100, 0.01).unwrap();
    let bytes = filter.serialize().unwrap();
    let restored = BloomFilter::deserialize(&bytes).unwrap();

    assert_eq!(filter, restored);
    assert!(restored.is_empty());
}

#[test]
fn test_serialize_deserialize_with_data() {
    let mut filter = BloomFilter::with_accuracy(1000, 0.01).unwrap();
    let keys = ["alpha", "beta", "gamma", "delta", "epsilon"];
    for key in keys {
        filter.insert(key);
    }

    let bytes = filter.serialize().unwrap();
    let restored = BloomFilter::deserialize(&bytes).unwrap();

    assert_eq!(filter.num_hashes(), restored.num_hashes());
    assert_eq!(filter.as_bytes(), restored.as_bytes());
    for key in keys {
        assert!(restored.contains(key), "{key} should survive a round trip");
    }
    for key in ["zeta", "eta", "theta"] {
        assert_eq!(filter.contains(key), restored.contains(key), "{key}");
        assert!(!restored.contains(key), "{key} should be absent");
    }
}

#[test]
fn test_bin_width_follows_bitmap_length() {
    let cases = [
        ("bin8", 255, vec![0xc4_u8, 0xff]),
        ("bin16", 256, vec![0xc5, 0x01, 0x00]),
        ("bin16 max", 65535, vec![0xc5, 0xff, 0xff]),
        ("bin32", 65536, vec![0xc6, 0x00, 0x01, 0x00, 0x00]),
    ];

    for (title, len, header) in cases {
        let filter = BloomFilter::from_bits(vec![0u8; len], 3).unwrap();
        let bytes = filter.serialize().unwrap();
        assert_eq!(&bytes[..header.len()], header.as_slice(), "{title}");
        assert_eq!(bytes.len(), header.len() + len + 2, "{title}");
        assert_eq!(&bytes[bytes.len() - 2..], &[0xcc, 0x03], "{title}");
        assert_eq!(BloomFilter::deserialize(&bytes).unwrap(), filter, "{title}");
    }
}

#[test]
fn test_portable_digest() {
    // Any implementation of the format produces exactly these bytes for this filter.
    let mut filter = BloomFilter::from_bits(vec![0u8; 1199], 7).unwrap();
    for i in 0..1000 {
        filter.insert(i.to_string());
    }

    let bytes = filter.serialize().unwrap();
    assert_eq!(&bytes[..3], &[0xc5, 0x04, 0xaf]);
    assert_eq!(&bytes[bytes.len() - 2..], &[0xcc, 0x07]);
    assert_eq!(
        hex::encode(Sha256::digest(&bytes)),
        "b38258a2d43384e9d346f0a18f5f430fe3098fec322c97b6569d0aa1f7de610d"
    );
}

#[test]
fn test_deserialize_empty_input() {
    let err = BloomFilter::deserialize(&[]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::EmptyInput));
}

#[test]
fn test_deserialize_malformed_input() {
    let cases: [(&str, &[u8]); 8] = [
        ("negative fixints", &[0xff, 0xff]),
        ("truncated bin header", &[0xc5, 0x04]),
        ("truncated bitmap", &[0xc4, 0x05]),
        ("random bytes", b"random bytes"),
        ("missing hash count", &[0xc4, 0x01, 0xff]),
        ("hash count is a string", &[0xc4, 0x01, 0xff, 0xa1, 0x37]),
        ("hash count out of range", &[0xc4, 0x01, 0xff, 0xcd, 0x01, 0x00]),
        ("trailing garbage", &[0xc4, 0x01, 0xff, 0xcc, 0x07, 0xc0]),
    ];

    for (title, data) in cases {
        let err = BloomFilter::deserialize(data).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedEncoding, "{title}");
    }
}

#[test]
fn test_deserialize_reports_failing_field() {
    let err = BloomFilter::deserialize(&[0xc4, 0x01, 0xff]).unwrap_err();
    let rendered = err.to_string();
    assert_that!(rendered.as_str(), contains_substring("field: num_hashes"));

    let err = BloomFilter::deserialize(b"random bytes").unwrap_err();
    let rendered = err.to_string();
    assert_that!(rendered.as_str(), contains_substring("field: bits"));
}

#[test]
fn test_deserialize_validates_decoded_filter() {
    let err = BloomFilter::deserialize(&[0xc4, 0x00, 0xcc, 0x07]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::EmptyBits));

    let err = BloomFilter::deserialize(&[0xc4, 0x02, 0xff, 0xff, 0xcc, 0x00]).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidHashCount));
}

#[test]
fn test_serialized_helpers() {
    let bytes = create_serialized(1000, 0.01).unwrap();
    assert!(!contains_serialized(&bytes, "hello").unwrap());

    let bytes = insert_serialized(&bytes, "hello").unwrap();
    assert!(contains_serialized(&bytes, "hello").unwrap());

    let filter = BloomFilter::deserialize(&bytes).unwrap();
    assert_eq!(filter.size_bytes(), 1199);
    assert_eq!(filter.num_hashes(), 7);
    assert!(filter.contains("hello"));
}

#[test]
fn test_serialized_helpers_propagate_errors() {
    let err = contains_serialized(&[0xff, 0xff], "hello").unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::MalformedEncoding));

    let err = insert_serialized(&[], "hello").unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::EmptyInput));

    let err = create_serialized(1000, 1.0).unwrap_err();
    assert_that!(err.kind(), eq(ErrorKind::InvalidFpRate));
}
