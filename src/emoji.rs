//! Static emotion-label → emoji mapping used when rendering sentiment output.

/// Look up the display glyph for an emotion label.
///
/// Returns the empty string for labels outside the fixed vocabulary, so
/// rendering never fails on a label the table does not know about.
pub fn emoji_for(label: &str) -> &'static str {
    match label {
        "disappointment" => "😞",
        "sadness" => "😢",
        "annoyance" => "😠",
        "neutral" => "😐",
        "disapproval" => "👎",
        "realization" => "😮",
        "nervousness" => "😬",
        "approval" => "👍",
        "joy" => "😄",
        "anger" => "😡",
        "embarrassment" => "😳",
        "caring" => "🤗",
        "remorse" => "😔",
        "disgust" => "🤢",
        "grief" => "😥",
        "confusion" => "😕",
        "relief" => "😌",
        "desire" => "😍",
        "admiration" => "😌",
        "optimism" => "😊",
        "fear" => "😨",
        "love" => "❤️",
        "excitement" => "🎉",
        "curiosity" => "🤔",
        "amusement" => "😄",
        "surprise" => "😲",
        "gratitude" => "🙏",
        "pride" => "🦁",
        _ => "",
    }
}
