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

//! MessagePack primitives used by the filter wire format.

use std::io::Cursor;

use rmp::decode;
use rmp::encode;

use crate::error::Error;

/// A growable byte buffer that MessagePack values are appended to.
pub(crate) struct SketchBytes {
    bytes: Vec<u8>,
}

impl SketchBytes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes `buf` as a MessagePack `bin`, using the narrowest of bin8, bin16 and bin32.
    pub fn write_bin(&mut self, buf: &[u8]) -> Result<(), Error> {
        let len = u32::try_from(buf.len()).map_err(|_| {
            Error::encoding("byte string is too long for a MessagePack bin")
                .with_context("len", buf.len())
        })?;
        encode::write_bin_len(&mut self.bytes, len)
            .map_err(|err| Error::encoding("failed to write bin header").set_source(err))?;
        self.bytes.extend_from_slice(buf);
        Ok(())
    }

    /// Writes `n` as a MessagePack `uint 8` (marker `0xcc`), never as a positive fixint.
    pub fn write_u8(&mut self, n: u8) -> Result<(), Error> {
        encode::write_u8(&mut self.bytes, n)
            .map_err(|err| Error::encoding("failed to write uint 8").set_source(err))
    }
}

/// A reader over a byte slice that decodes MessagePack values.
pub(crate) struct SketchSlice<'a> {
    slice: Cursor<&'a [u8]>,
}

impl<'a> SketchSlice<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        SketchSlice {
            slice: Cursor::new(slice),
        }
    }

    /// Returns the number of bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        let len = self.slice.get_ref().len();
        len.saturating_sub(self.slice.position() as usize)
    }

    /// Reads a MessagePack `bin` of any width and returns a copy of its payload.
    pub fn read_bin(&mut self) -> Result<Vec<u8>, Error> {
        let len = decode::read_bin_len(&mut self.slice)
            .map_err(|err| Error::malformed("expected a MessagePack bin").set_source(err))?
            as usize;

        // Checked before allocating so a forged length cannot reserve gigabytes.
        let remaining = self.remaining();
        if len > remaining {
            return Err(Error::malformed("bin payload is truncated")
                .with_context("declared", len)
                .with_context("remaining", remaining));
        }

        let start = self.slice.position() as usize;
        let payload = self.slice.get_ref()[start..start + len].to_vec();
        self.slice.set_position((start + len) as u64);
        Ok(payload)
    }

    /// Reads any MessagePack integer whose value fits in a `u8`.
    pub fn read_u8(&mut self) -> Result<u8, Error> {
        decode::read_int(&mut self.slice).map_err(|err| {
            Error::malformed("expected an integer in the range of u8").set_source(err)
        })
    }
}
