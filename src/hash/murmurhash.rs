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

use super::HASH_SEED;

/// Returns the two 64-bit base hashes of `key`.
///
/// Both values come from a single MurmurHash3 x64 128-bit digest: `h1` is the first half of the
/// digest and `h2` the second, as produced by the reference `MurmurHash3_x64_128`.
pub(crate) fn base_hashes(key: &[u8]) -> (u64, u64) {
    mur3::murmurhash3_x64_128(key, HASH_SEED)
}
