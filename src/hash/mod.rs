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

mod murmurhash;

pub(crate) use self::murmurhash::base_hashes;

/// Seed passed to MurmurHash3 when hashing keys.
///
/// The seed is part of the wire contract: a filter built with one seed answers garbage when
/// queried with another, even though the serialized bytes decode fine. Every implementation
/// that reads or writes [`SERIAL_VERSION`](crate::bloom::SERIAL_VERSION) 1 filters uses 0.
pub const HASH_SEED: u32 = 0;
