//! Formatting of analysis results into the text shown in the UI.

use std::fmt::Write as _;
use std::str::FromStr;

use crate::emoji::emoji_for;
use crate::sentiment::LabelScore;

/// User-selected formatting mode for the sentiment output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOption {
    /// "Sentiment Only": label and emoji per line.
    SentimentOnly,
    /// "Sentiment + Score": label, emoji, and the confidence score.
    SentimentWithScore,
}

impl FromStr for DisplayOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sentiment Only" => Ok(DisplayOption::SentimentOnly),
            "Sentiment + Score" => Ok(DisplayOption::SentimentWithScore),
            other => Err(format!(
                "Unknown display option: {}. Use \"Sentiment Only\" or \"Sentiment + Score\"",
                other
            )),
        }
    }
}

/// Render the sentiment map as display text, one line per label.
///
/// Each line is "label emoji" or "label emoji: score" with the score fixed to
/// two decimal places. Labels outside the emoji table render with an empty
/// glyph. Pure function of its inputs; line order follows the slice.
pub fn render_sentiment(scores: &[LabelScore], option: DisplayOption) -> String {
    let mut out = String::new();
    for ls in scores {
        let emoji = emoji_for(&ls.label);
        match option {
            DisplayOption::SentimentOnly => {
                let _ = writeln!(out, "{} {}", ls.label, emoji);
            }
            DisplayOption::SentimentWithScore => {
                let _ = writeln!(out, "{} {}: {:.2}", ls.label, emoji, ls.score);
            }
        }
    }
    out
}

/// Render the detected language code for display (uppercased, empty when the
/// model reported none).
pub fn render_language(code: Option<&str>) -> String {
    code.map(|c| c.to_ascii_uppercase()).unwrap_or_default()
}
