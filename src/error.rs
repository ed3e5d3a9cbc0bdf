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

//! Error types for Bloom filter operations

use std::fmt;

/// ErrorKind is all kinds of Error of pbloom.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The expected number of entries is not positive.
    InvalidEntries,
    /// The requested filter size in bytes is not positive or too large.
    InvalidSize,
    /// The target false positive rate is not within `(0, 1)`.
    InvalidFpRate,
    /// The bitmap supplied to a filter is empty.
    EmptyBits,
    /// The number of hash rounds is zero.
    InvalidHashCount,
    /// There is nothing to deserialize.
    EmptyInput,
    /// The serialized bytes could not be decoded into a filter.
    MalformedEncoding,
    /// The filter could not be encoded.
    EncodingError,
}

impl ErrorKind {
    /// Convert this error kind instance into static str.
    pub const fn into_static(self) -> &'static str {
        match self {
            ErrorKind::InvalidEntries => "InvalidEntries",
            ErrorKind::InvalidSize => "InvalidSize",
            ErrorKind::InvalidFpRate => "InvalidFpRate",
            ErrorKind::EmptyBits => "EmptyBits",
            ErrorKind::InvalidHashCount => "InvalidHashCount",
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::MalformedEncoding => "MalformedEncoding",
            ErrorKind::EncodingError => "EncodingError",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.into_static())
    }
}

/// Error is the error struct returned by all pbloom functions.
///
/// # Examples
///
/// ```
/// # use pbloom::error::Error;
/// # use pbloom::error::ErrorKind;
/// let err = Error::new(ErrorKind::InvalidEntries, "entries must be positive");
/// assert_eq!(err.kind(), ErrorKind::InvalidEntries);
/// assert_eq!(err.message(), "entries must be positive");
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new Error with error kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            context: Vec::default(),
            source: None,
        }
    }

    /// Add more context in error.
    pub fn with_context(mut self, key: &'static str, value: impl ToString) -> Self {
        self.context.push((key, value.to_string()));
        self
    }

    /// Set source for error.
    ///
    /// # Panics
    ///
    /// Panics if the source has been set.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::error::Error as _;
    /// use pbloom::error::{Error, ErrorKind};
    ///
    /// let mut error = Error::new(ErrorKind::MalformedEncoding, "failed to decode filter");
    /// assert!(error.source().is_none());
    /// error = error.set_source(std::io::Error::new(std::io::ErrorKind::Other, "IO error"));
    /// assert!(error.source().is_some());
    /// ```
    pub fn set_source(mut self, src: impl Into<anyhow::Error>) -> Self {
        assert!(self.source.is_none(), "the source error has been set");
        self.source = Some(src.into());
        self
    }

    /// Return error's kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Return error's message.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }
}

// Convenient constructors used within pbloom crate.
impl Error {
    pub(crate) fn invalid_entries(entries: i64) -> Self {
        Self::new(ErrorKind::InvalidEntries, "number of entries must be positive")
            .with_context("entries", entries)
    }

    pub(crate) fn invalid_size(msg: impl Into<String>, size: i64) -> Self {
        Self::new(ErrorKind::InvalidSize, msg).with_context("size", size)
    }

    pub(crate) fn invalid_fp_rate(msg: impl Into<String>, fp_rate: f64) -> Self {
        Self::new(ErrorKind::InvalidFpRate, msg).with_context("fp_rate", fp_rate)
    }

    pub(crate) fn empty_bits() -> Self {
        Self::new(ErrorKind::EmptyBits, "bitmap must not be empty")
    }

    pub(crate) fn invalid_hash_count() -> Self {
        Self::new(
            ErrorKind::InvalidHashCount,
            "number of hash functions must be positive",
        )
    }

    pub(crate) fn empty_input() -> Self {
        Self::new(ErrorKind::EmptyInput, "serialized filter is empty")
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedEncoding, msg)
    }

    pub(crate) fn encoding(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::EncodingError, msg)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // If alternate has been specified, we will print like Debug.
        if f.alternate() {
            let mut de = f.debug_struct("Error");
            de.field("kind", &self.kind);
            de.field("message", &self.message);
            de.field("context", &self.context);
            de.field("source", &self.source);
            return de.finish();
        }

        write!(f, "{}", self.kind)?;
        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }
        writeln!(f)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "Context:")?;
            for (k, v) in self.context.iter() {
                writeln!(f, "   {k}: {v}")?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "Source:")?;
            writeln!(f, "   {source:#}")?;
        }

        Ok(())
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;

        if !self.context.is_empty() {
            write!(f, ", context: {{ ")?;
            write!(
                f,
                "{}",
                self.context
                    .iter()
                    .map(|(k, v)| format!("{k}: {v}"))
                    .collect::<Vec<_>>()
                    .join(", ")
            )?;
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        if let Some(source) = &self.source {
            write!(f, ", source: {source}")?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|v| v.as_ref())
    }
}
