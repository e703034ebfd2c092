use regex::Regex;
use std::sync::LazyLock;

/// Words that carry no meaning when comparing playlist titles.
///
/// They are removed as substrings, so "Mixtape" becomes "tape".
pub const STOP_WORDS: [&str; 8] = [
    "playlist",
    "videos",
    "music",
    "songs",
    "collection",
    "mix",
    "favorites",
    "liked",
];

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("valid punctuation regex"));
static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Map a playlist title to the key used to detect duplicates.
///
/// Lower-cases the title, strips stop words and punctuation, then collapses
/// whitespace. Stripping can glue fragments back into a stop word
/// ("mu-sic"), so the stripping steps run until the text is stable.
pub fn normalize(title: &str) -> String {
    let mut current = title.to_string();

    loop {
        let mut next = current.to_lowercase();
        for word in STOP_WORDS {
            next = next.replace(word, "");
        }
        let next = PUNCTUATION.replace_all(&next, "").into_owned();

        if next == current {
            break;
        }
        current = next;
    }

    WHITESPACE.replace_all(&current, " ").trim().to_string()
}
