/* This file is part of the learnvid project
*
*  Copyright (C) 2026 the learnvid contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/

//! Recognising pasted video links.
//!
//! Every function in here is total over arbitrary strings: a link that can't be
//! understood yields `None` or `false`, never a panic.

use std::sync::LazyLock;

use regex::Regex;

pub const YOUTUBE_THUMBNAIL_BASE: &str = "https://img.youtube.com/vi";

// Regexes
// Order matters, the first one that matches wins.

static YOUTUBE_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| [
    Regex::new(r"(?:youtube\.com/watch\?v=|youtu\.be/)([a-zA-Z0-9_-]{11})").expect("youtube watch/short link regex should be valid"),
    Regex::new(r"youtube\.com/embed/([a-zA-Z0-9_-]{11})").expect("youtube embed link regex should be valid"),
    Regex::new(r"youtube\.com/v/([a-zA-Z0-9_-]{11})").expect("youtube /v/ link regex should be valid"),
]);
static INSTAGRAM_REEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"instagram\.com/reel/([a-zA-Z0-9_-]+)").expect("instagram reel regex should be valid"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum Platform {
    YouTube,
    Instagram,
}

impl Platform {
    /// Guesses the platform from the host names mentioned in the link
    ///
    /// This is a plain substring check, it says nothing about whether an id can be extracted.
    pub fn detect(url: &str) -> Option<Platform> {
        if url.contains("youtube.com") || url.contains("youtu.be") {
            Some(Platform::YouTube)
        } else if url.contains("instagram.com") {
            Some(Platform::Instagram)
        } else {
            None
        }
    }

    /// Whether a thumbnail URL can be derived from a video id alone
    pub fn has_derivable_thumbnail(self) -> bool {
        match self {
            Platform::YouTube => true,
            // reels have no predictable thumbnail CDN path
            Platform::Instagram => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoLink<'a> {
    pub platform: Platform,
    pub id: &'a str,
}

fn first_capture<'a>(pattern: &Regex, url: &'a str) -> Option<&'a str> {
    pattern.captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Matches the link against the known youtube shapes, then against instagram reels
pub fn parse_video_link(url: &str) -> Option<VideoLink<'_>> {
    if url.is_empty() {
        return None;
    }

    if let Some(id) = YOUTUBE_PATTERNS.iter().find_map(|p| first_capture(p, url)) {
        return Some(VideoLink { platform: Platform::YouTube, id });
    }

    first_capture(&INSTAGRAM_REEL_PATTERN, url).map(|id| VideoLink { platform: Platform::Instagram, id })
}

/// Extracts the platform-specific video id from a pasted link
pub fn extract_video_id(url: &str) -> Option<&str> {
    parse_video_link(url).map(|link| link.id)
}

/// Builds the thumbnail URL for a previously extracted video id
///
/// Only youtube links get one. The returned URL is not checked for existence.
pub fn generate_thumbnail_url(url: &str, video_id: &str) -> Option<String> {
    if url.is_empty() || video_id.is_empty() {
        return None;
    }

    match Platform::detect(url) {
        Some(platform) if platform.has_derivable_thumbnail() => Some(format!("{YOUTUBE_THUMBNAIL_BASE}/{video_id}/maxresdefault.jpg")),
        _ => None,
    }
}

/// [`extract_video_id`] followed by [`generate_thumbnail_url`]
pub fn thumbnail_for(url: &str) -> Option<String> {
    extract_video_id(url).and_then(|id| generate_thumbnail_url(url, id))
}

/// Lightweight hint for input fields
///
/// NOTE: this is looser than [`extract_video_id`]. A youtube link with a mangled id still
/// passes here while yielding no id there.
pub fn is_valid_video_url(url: &str) -> bool {
    url.contains("youtube.com") || url.contains("youtu.be") || url.contains("instagram.com/reel")
}

#[cfg(test)]
mod tests {
    use super::*;

    const RICKROLL: &str = "dQw4w9WgXcQ";

    #[test]
    fn youtube_watch_links() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ"), Some(RICKROLL));
        assert_eq!(extract_video_id("youtube.com/watch?v=dQw4w9WgXcQ&t=42s"), Some(RICKROLL));
    }

    #[test]
    fn youtu_be_links() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Some(RICKROLL));
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abcdef"), Some(RICKROLL));
    }

    #[test]
    fn youtube_embed_and_v_links() {
        assert_eq!(extract_video_id("https://www.youtube.com/embed/dQw4w9WgXcQ"), Some(RICKROLL));
        assert_eq!(extract_video_id("https://www.youtube.com/v/dQw4w9WgXcQ?version=3"), Some(RICKROLL));
    }

    #[test]
    fn instagram_reels() {
        assert_eq!(extract_video_id("https://www.instagram.com/reel/Cabc123XYZ/"), Some("Cabc123XYZ"));
        assert_eq!(
            parse_video_link("https://instagram.com/reel/a_b-c?igsh=xyz"),
            Some(VideoLink { platform: Platform::Instagram, id: "a_b-c" }),
        );
    }

    #[test]
    fn garbage_yields_nothing() {
        for input in ["", "not a url", "https://vimeo.com/12345", "\u{0}\u{7}\t\n", "https://instagram.com/p/Cabc123XYZ/"] {
            assert_eq!(extract_video_id(input), None, "{input:?}");
        }
        for input in ["", "not a url", "https://vimeo.com/12345", "\u{0}\u{7}\t\n"] {
            assert!(!is_valid_video_url(input), "{input:?}");
        }
    }

    #[test]
    fn ids_are_cut_to_eleven_characters() {
        assert_eq!(extract_video_id("https://youtu.be/dQw4w9WgXcQextra"), Some(RICKROLL));
    }

    #[test]
    fn matches_anywhere_in_text() {
        assert_eq!(extract_video_id("check this out: youtu.be/dQw4w9WgXcQ !!"), Some(RICKROLL));
    }

    #[test]
    fn earlier_patterns_win() {
        let both = "https://youtube.com/embed/AAAAAAAAAAA?next=youtube.com/watch?v=BBBBBBBBBBB";
        assert_eq!(extract_video_id(both), Some("BBBBBBBBBBB"));
        let yt_and_reel = "https://instagram.com/reel/xyz youtu.be/dQw4w9WgXcQ";
        assert_eq!(
            parse_video_link(yt_and_reel),
            Some(VideoLink { platform: Platform::YouTube, id: RICKROLL }),
        );
    }

    #[test]
    fn youtube_thumbnails() {
        assert_eq!(
            generate_thumbnail_url("https://youtu.be/dQw4w9WgXcQ", RICKROLL).as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"),
        );
        assert_eq!(
            thumbnail_for("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"),
        );
    }

    #[test]
    fn no_thumbnails_elsewhere() {
        assert_eq!(generate_thumbnail_url("https://www.instagram.com/reel/Cabc123XYZ/", "Cabc123XYZ"), None);
        assert_eq!(generate_thumbnail_url("https://vimeo.com/12345", "12345"), None);
        assert_eq!(generate_thumbnail_url("", "anything"), None);
        assert_eq!(generate_thumbnail_url("https://youtu.be/x", ""), None);
        assert_eq!(thumbnail_for("https://www.instagram.com/reel/Cabc123XYZ/"), None);
    }

    #[test]
    fn validity_is_looser_than_extraction() {
        let short = "https://www.youtube.com/watch?v=short";
        assert!(is_valid_video_url(short));
        assert_eq!(extract_video_id(short), None);

        assert!(is_valid_video_url("https://youtu.be/"));
        assert!(is_valid_video_url("https://instagram.com/reel/"));
        assert!(!is_valid_video_url("https://instagram.com/p/Cabc123XYZ/"));
    }

    #[test]
    fn platform_detection() {
        assert_eq!(Platform::detect("https://m.youtube.com/"), Some(Platform::YouTube));
        assert_eq!(Platform::detect("https://youtu.be/x"), Some(Platform::YouTube));
        assert_eq!(Platform::detect("https://www.instagram.com/p/x"), Some(Platform::Instagram));
        assert_eq!(Platform::detect("https://example.com"), None);
        assert_eq!(Platform::YouTube.to_string(), "YouTube");
    }

    #[test]
    fn repeated_calls_agree() {
        for input in ["https://youtu.be/dQw4w9WgXcQ", "https://www.instagram.com/reel/Cabc123XYZ/", "nope"] {
            assert_eq!(extract_video_id(input), extract_video_id(input));
            assert_eq!(thumbnail_for(input), thumbnail_for(input));
            assert_eq!(is_valid_video_url(input), is_valid_video_url(input));
        }
    }
}
