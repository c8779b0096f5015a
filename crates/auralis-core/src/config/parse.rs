// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Lenient parsers for tunable values.
//!
//! Every parser returns `None` instead of guessing, so callers fall back to
//! the default.

/// Parses `1/true/yes/on` and `0/false/no/off`, ignoring case and surrounding whitespace.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parses a finite float, rejecting trailing garbage.
pub fn parse_f32(text: &str) -> Option<f32> {
    text.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

/// Parses an integer pair written `WxH`, `W x H` or `W,H`.
pub fn parse_int_pair(text: &str) -> Option<(i32, i32)> {
    let text = text.trim();
    let (first, second) = text
        .split_once(',')
        .or_else(|| text.split_once(['x', 'X']))?;
    Some((first.trim().parse().ok()?, second.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_accepts_common_spellings() {
        for yes in ["1", "true", "YES", " On "] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["0", "False", "no", "OFF\n"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("enabled"), None);
        assert_eq!(parse_bool(""), None);
    }

    #[test]
    fn test_parse_f32_rejects_garbage() {
        assert_eq!(parse_f32(" 0.85 "), Some(0.85));
        assert_eq!(parse_f32("-1.5"), Some(-1.5));
        assert_eq!(parse_f32("1.0m"), None);
        assert_eq!(parse_f32(""), None);
        assert_eq!(parse_f32("inf"), None);
    }

    #[test]
    fn test_parse_int_pair_forms() {
        assert_eq!(parse_int_pair("64x48"), Some((64, 48)));
        assert_eq!(parse_int_pair("96 x 72"), Some((96, 72)));
        assert_eq!(parse_int_pair("32X24"), Some((32, 24)));
        assert_eq!(parse_int_pair("128,96"), Some((128, 96)));
        assert_eq!(parse_int_pair("64"), None);
        assert_eq!(parse_int_pair("axb"), None);
    }
}
