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

//! Text shown on the HUD. The glyph set is upper-case printable ASCII.

/// Longest preset or track label, in characters.
pub const LABEL_MAX_CHARS: usize = 56;

/// Normalizes `raw` for the HUD font.
///
/// Line breaks and tabs become spaces, anything else outside printable
/// ASCII becomes `?`, runs of spaces collapse and the ends are trimmed. An
/// empty result reads `NONE`. Text longer than `max_chars` is cut and ends
/// in `...`.
pub fn sanitize_hud_text(raw: &str, max_chars: usize) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_space = false;
    for ch in raw.chars() {
        let ch = match ch {
            '\n' | '\r' | '\t' => ' ',
            ' '..='~' => ch.to_ascii_uppercase(),
            _ => '?',
        };
        if ch == ' ' {
            if last_was_space {
                continue;
            }
            last_was_space = true;
        } else {
            last_was_space = false;
        }
        out.push(ch);
    }

    let mut out = out.trim_matches(' ').to_string();
    if out.is_empty() {
        out.push_str("NONE");
    }

    // Only ASCII is left, so byte and char counts agree.
    if out.len() > max_chars {
        if max_chars <= 3 {
            out.truncate(max_chars);
        } else {
            out.truncate(max_chars - 3);
            out.push_str("...");
        }
    }
    out
}

fn basename(path: &str) -> &str {
    match path.rfind(['/', '\\']) {
        Some(slash) if slash + 1 < path.len() => &path[slash + 1..],
        _ => path,
    }
}

fn strip_extension(name: &str) -> &str {
    name.rfind('.').map_or(name, |dot| &name[..dot])
}

/// Display name of a preset file: its stem, with `__` read as a separator
/// and `_` as a space.
pub fn preset_label(path: &str) -> String {
    let name = strip_extension(basename(path))
        .replace("__", " - ")
        .replace('_', " ");
    sanitize_hud_text(&name, LABEL_MAX_CHARS)
}

/// Display name of a track reported by the host; paths and URLs are reduced
/// to their last segment.
pub fn track_label(raw: &str) -> String {
    let label = if raw.is_empty() { "none" } else { raw };
    let label = if label.starts_with("http://") || label.starts_with("https://") {
        let name = basename(label);
        if name.is_empty() {
            label
        } else {
            name
        }
    } else if label.contains(['/', '\\']) {
        basename(label)
    } else {
        label
    };
    sanitize_hud_text(label, LABEL_MAX_CHARS)
}
