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

//! Utility functions and types.

use std::fmt::Debug;

use percent_encoding::utf8_percent_encode;
use percent_encoding::AsciiSet;
use percent_encoding::NON_ALPHANUMERIC;

/// AsciiSet for [RFC 3986](https://www.rfc-editor.org/rfc/rfc3986#section-2.3) strict encoding.
///
/// - Encode every byte except the unreserved characters: 'A'-'Z', 'a'-'z', '0'-'9', '-', '.', '_', and '~'.
pub static STRICT_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent encode input with [`STRICT_ENCODE_SET`], hex digits are upper case.
///
/// ```
/// use reqseal_core::utils::percent_encode_strict;
///
/// assert_eq!(percent_encode_strict("a b/c~"), "a%20b%2Fc~");
/// ```
pub fn percent_encode_strict(input: &str) -> String {
    utf8_percent_encode(input, &STRICT_ENCODE_SET).to_string()
}

/// Trim the input and collapse every inner run of whitespace into one space.
///
/// ```
/// use reqseal_core::utils::compress_whitespace;
///
/// assert_eq!(compress_whitespace("  a   b\t\tc "), "a b c");
/// ```
pub fn compress_whitespace(input: &str) -> String {
    let mut s = String::with_capacity(input.len());

    for (idx, word) in input.split_ascii_whitespace().enumerate() {
        if idx != 0 {
            s.push(' ');
        }
        s.push_str(word);
    }

    s
}

/// Sort pairs by key with ordinal (byte wise) comparison.
///
/// The sort is stable: pairs sharing a key keep their insertion order.
pub fn sort_ordinal<V>(pairs: &mut [(String, V)]) {
    pairs.sort_by(|(l, _), (r, _)| l.as_bytes().cmp(r.as_bytes()));
}

/// Redacts a string by replacing all but the first and last three characters with asterisks.
///
/// - If the input string has fewer than 12 characters, it should be entirely redacted.
/// - If the input string has 12 or more characters, only the first three and the last three.
///
/// This design is to allow users to distinguish between different redacted strings but avoid
/// leaking sensitive information.
pub struct Redact<'a>(&'a str);

impl<'a> From<&'a str> for Redact<'a> {
    fn from(value: &'a str) -> Self {
        Redact(value)
    }
}

impl<'a> From<&'a String> for Redact<'a> {
    fn from(value: &'a String) -> Self {
        Redact(value.as_str())
    }
}

impl<'a> From<&'a Option<String>> for Redact<'a> {
    fn from(value: &'a Option<String>) -> Self {
        match value {
            None => Redact(""),
            Some(v) => Redact(v),
        }
    }
}

impl Debug for Redact<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let length = self.0.len();
        if length == 0 {
            f.write_str("EMPTY")
        } else if length < 12 || !self.0.is_char_boundary(3) || !self.0.is_char_boundary(length - 3)
        {
            f.write_str("***")
        } else {
            f.write_str(&self.0[..3])?;
            f.write_str("***")?;
            f.write_str(&self.0[length - 3..])
        }
    }
}
