//! Text statistics and content analysis.
//!
//! Everything here is computed locally and fast: token counts, hashtag and
//! mention tallies, vader sentiment, top keywords. AI-generated insights
//! are merged in where present and local values stand in where not, so the
//! report is complete with or without an upstream model.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vader_sentiment::SentimentIntensityAnalyzer;

use crate::insights::ContentInsights;

static TOKENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[A-Za-z0-9_']+").unwrap());
static HASHTAGS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\w+").unwrap());
static MENTIONS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\w+").unwrap());
static URLS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://\S+").unwrap());

const FALLBACK_CAPTION: &str = "Add a concise, benefit-led caption.";

/// Full analysis report for a piece of extracted text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub summary: Summary,
    pub engagement: Vec<String>,
    pub ai_generated: AiGenerated,
}

/// Numeric and statistical summary with inline reading hints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Summary {
    pub words: String,
    pub chars: String,
    pub avg_word_len: String,
    pub hashtags: String,
    pub mentions: String,
    pub urls: String,
    pub tone: String,
    pub sentiment: SentimentReport,
    pub top_keywords: Vec<(String, usize)>,
    pub gemini_confidence: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    pub compound: String,
    pub pos: String,
    pub neu: String,
    pub neg: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiGenerated {
    pub caption: String,
    pub recommended_hashtags: Vec<String>,
}

/// Analyze extracted text, merging in AI insights where available.
///
/// Returns `None` for empty or whitespace-only input.
pub fn analyze_text(text: &str, insights: &ContentInsights) -> Option<Analysis> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let analyzer = SentimentIntensityAnalyzer::new();
    let scores = analyzer.polarity_scores(text);
    let compound = scores.get("compound").copied().unwrap_or(0.0);
    let pos = scores.get("pos").copied().unwrap_or(0.0);
    let neu = scores.get("neu").copied().unwrap_or(0.0);
    let neg = scores.get("neg").copied().unwrap_or(0.0);

    let words: Vec<&str> = TOKENS.find_iter(text).map(|m| m.as_str()).collect();
    let word_count = words.len();
    let hashtag_count = HASHTAGS.find_iter(text).count();
    let mention_count = MENTIONS.find_iter(text).count();
    let url_count = URLS.find_iter(text).count();

    let local_tone = if compound > 0.05 {
        "Positive"
    } else if compound < -0.05 {
        "Negative"
    } else {
        "Neutral"
    };

    let words_msg = if word_count < 50 {
        format!("{word_count} (very short - may lack context)")
    } else if word_count > 300 {
        format!("{word_count} (long - consider trimming for attention)")
    } else {
        format!("{word_count} (medium length - good for LinkedIn)")
    };

    let letter_total: usize = words.iter().map(|w| w.len()).sum();
    let avg_len = round2(letter_total as f64 / word_count.max(1) as f64);
    let avg_len_msg = if avg_len < 5.0 {
        format!("{} - Easy to read", fmt_score(avg_len))
    } else if avg_len < 7.0 {
        format!("{} - Moderate complexity", fmt_score(avg_len))
    } else {
        format!("{} - Complex, may reduce engagement", fmt_score(avg_len))
    };

    let mut hashtags_msg = hashtag_count.to_string();
    if hashtag_count == 0 {
        hashtags_msg.push_str(" - Missing hashtags");
    } else if hashtag_count < 3 {
        hashtags_msg.push_str(" - Could add more for reach");
    } else {
        hashtags_msg.push_str(" - Good use");
    }

    let mut mentions_msg = mention_count.to_string();
    if mention_count > 0 {
        mentions_msg.push_str(" - Strong collaboration tagging");
    }

    let mut urls_msg = url_count.to_string();
    if url_count > 2 {
        urls_msg.push_str(" - May appear promotional if all are kept");
    }

    let sentiment = SentimentReport {
        compound: format!("{} (Overall tone: {local_tone})", fmt_score(compound)),
        pos: {
            let mut msg = fmt_score(pos);
            if pos > 0.0 {
                msg.push_str(" - Slightly positive");
            }
            msg
        },
        neu: {
            let mut msg = fmt_score(neu);
            if neu > 0.7 {
                msg.push_str(" - Mostly neutral");
            }
            msg
        },
        neg: {
            let mut msg = fmt_score(neg);
            if neg == 0.0 {
                msg.push_str(" - No negativity");
            }
            msg
        },
    };

    let caption = insights
        .caption
        .clone()
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| FALLBACK_CAPTION.to_string());
    let tone = insights
        .tone
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(capitalize)
        .unwrap_or_else(|| local_tone.to_string());
    let gemini_confidence = insights
        .confidence
        .map(Value::from)
        .unwrap_or_else(|| Value::String(String::new()));

    Some(Analysis {
        summary: Summary {
            words: words_msg,
            chars: text.chars().count().to_string(),
            avg_word_len: avg_len_msg,
            hashtags: hashtags_msg,
            mentions: mentions_msg,
            urls: urls_msg,
            tone,
            sentiment,
            top_keywords: top_keywords(&words),
            gemini_confidence,
        },
        engagement: insights.suggestions.clone(),
        ai_generated: AiGenerated {
            caption,
            recommended_hashtags: insights.hashtags.clone(),
        },
    })
}

/// Top 8 lowercase keywords (length > 2) by frequency. Ties keep
/// first-appearance order.
fn top_keywords(words: &[&str]) -> Vec<(String, usize)> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for word in words.iter().filter(|w| w.len() > 2) {
        let key = word.to_lowercase();
        match counts.get_mut(&key) {
            Some(n) => *n += 1,
            None => {
                counts.insert(key.clone(), 1);
                order.push(key);
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts.get(&word).copied().unwrap_or(0);
            (word, count)
        })
        .collect();
    // Stable sort: equal counts stay in first-seen order.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(8);
    ranked
}

/// Render a score as text. Integral values keep one decimal place
/// ("0.0" rather than "0"), everything else prints exact-shortest.
fn fmt_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// First letter uppercased, the rest lowercased.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn no_insights() -> ContentInsights {
        ContentInsights::default()
    }

    fn analyze(text: &str) -> Analysis {
        analyze_text(text, &no_insights()).expect("analysis for non-empty text")
    }

    // ── empty input ─────────────────────────────────────────────────────

    #[test]
    fn test_empty_text_yields_none() {
        assert!(analyze_text("", &no_insights()).is_none());
        assert!(analyze_text("   \n\t ", &no_insights()).is_none());
    }

    // ── word count messages ─────────────────────────────────────────────

    #[test]
    fn test_short_text_flagged() {
        let analysis = analyze("a few words only");
        assert_eq!(analysis.summary.words, "4 (very short - may lack context)");
    }

    #[test]
    fn test_medium_text_flagged() {
        let text = "word ".repeat(100);
        let analysis = analyze(&text);
        assert_eq!(analysis.summary.words, "100 (medium length - good for LinkedIn)");
    }

    #[test]
    fn test_long_text_flagged() {
        let text = "word ".repeat(301);
        let analysis = analyze(&text);
        assert_eq!(analysis.summary.words, "301 (long - consider trimming for attention)");
    }

    // ── character and word length ───────────────────────────────────────

    #[test]
    fn test_chars_counts_characters_not_bytes() {
        let analysis = analyze("déjà vu");
        assert_eq!(analysis.summary.chars, "7");
    }

    #[test]
    fn test_avg_word_len_easy() {
        let analysis = analyze("the cat sat on the mat");
        assert!(analysis.summary.avg_word_len.ends_with("- Easy to read"));
    }

    #[test]
    fn test_avg_word_len_complex() {
        let analysis = analyze("extraordinary circumlocution notwithstanding heterogeneous");
        assert!(
            analysis
                .summary
                .avg_word_len
                .ends_with("- Complex, may reduce engagement")
        );
    }

    #[test]
    fn test_avg_word_len_integral_keeps_decimal() {
        // Four-letter words average exactly 4.0.
        let analysis = analyze("word word word");
        assert_eq!(analysis.summary.avg_word_len, "4.0 - Easy to read");
    }

    // ── hashtag / mention / url messages ────────────────────────────────

    #[test]
    fn test_no_hashtags_flagged_missing() {
        let analysis = analyze("no tags here");
        assert_eq!(analysis.summary.hashtags, "0 - Missing hashtags");
    }

    #[test]
    fn test_few_hashtags_flagged() {
        let analysis = analyze("post about #rust and #code");
        assert_eq!(analysis.summary.hashtags, "2 - Could add more for reach");
    }

    #[test]
    fn test_enough_hashtags_flagged_good() {
        let analysis = analyze("#one #two #three");
        assert_eq!(analysis.summary.hashtags, "3 - Good use");
    }

    #[test]
    fn test_mentions_flagged_when_present() {
        let analysis = analyze("thanks @alice and @bob");
        assert_eq!(analysis.summary.mentions, "2 - Strong collaboration tagging");
        let analysis = analyze("nobody tagged");
        assert_eq!(analysis.summary.mentions, "0");
    }

    #[test]
    fn test_many_urls_flagged_promotional() {
        let analysis = analyze("https://a.com https://b.com https://c.com");
        assert_eq!(analysis.summary.urls, "3 - May appear promotional if all are kept");
        let analysis = analyze("see https://a.com");
        assert_eq!(analysis.summary.urls, "1");
    }

    // ── sentiment and tone ──────────────────────────────────────────────

    #[test]
    fn test_positive_text_tone() {
        let analysis = analyze("I love this wonderful amazing fantastic project");
        assert_eq!(analysis.summary.tone, "Positive");
        assert!(analysis.summary.sentiment.compound.contains("(Overall tone: Positive)"));
    }

    #[test]
    fn test_negative_text_tone() {
        let analysis = analyze("I hate this terrible awful broken mess");
        assert_eq!(analysis.summary.tone, "Negative");
    }

    #[test]
    fn test_neutral_text_tone_and_score_rendering() {
        let analysis = analyze("the table has four legs");
        assert_eq!(analysis.summary.tone, "Neutral");
        assert_eq!(analysis.summary.sentiment.compound, "0.0 (Overall tone: Neutral)");
        assert_eq!(analysis.summary.sentiment.neg, "0.0 - No negativity");
    }

    // ── keywords ────────────────────────────────────────────────────────

    #[test]
    fn test_top_keywords_ranked_by_frequency() {
        let ranked = top_keywords(&["rust", "code", "rust", "rust", "code", "fun"]);
        assert_eq!(
            ranked,
            vec![
                ("rust".to_string(), 3),
                ("code".to_string(), 2),
                ("fun".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_top_keywords_ties_keep_first_seen_order() {
        let ranked = top_keywords(&["zebra", "apple", "zebra", "apple"]);
        assert_eq!(
            ranked,
            vec![("zebra".to_string(), 2), ("apple".to_string(), 2)]
        );
    }

    #[test]
    fn test_top_keywords_skip_short_and_lowercase() {
        let ranked = top_keywords(&["Go", "is", "RUST", "Rust"]);
        assert_eq!(ranked, vec![("rust".to_string(), 2)]);
    }

    #[test]
    fn test_top_keywords_capped_at_eight() {
        let words: Vec<String> = (0..12).map(|i| format!("word{i}")).collect();
        let refs: Vec<&str> = words.iter().map(String::as_str).collect();
        assert_eq!(top_keywords(&refs).len(), 8);
    }

    // ── AI merge ────────────────────────────────────────────────────────

    #[test]
    fn test_caption_falls_back_without_insights() {
        let analysis = analyze("plain text");
        assert_eq!(analysis.ai_generated.caption, FALLBACK_CAPTION);
        assert!(analysis.ai_generated.recommended_hashtags.is_empty());
        assert!(analysis.engagement.is_empty());
    }

    #[test]
    fn test_empty_caption_also_falls_back() {
        let insights = ContentInsights {
            caption: Some(String::new()),
            ..ContentInsights::default()
        };
        let analysis = analyze_text("plain text", &insights).unwrap();
        assert_eq!(analysis.ai_generated.caption, FALLBACK_CAPTION);
    }

    #[test]
    fn test_insights_merged_into_report() {
        let insights = ContentInsights {
            caption: Some("Great hook".to_string()),
            hashtags: vec!["#rust".to_string()],
            suggestions: vec!["add a question".to_string()],
            tone: Some("positive".to_string()),
            confidence: Some(0.8),
        };
        let analysis = analyze_text("I hate this terrible mess", &insights).unwrap();
        assert_eq!(analysis.ai_generated.caption, "Great hook");
        assert_eq!(analysis.ai_generated.recommended_hashtags, vec!["#rust"]);
        assert_eq!(analysis.engagement, vec!["add a question"]);
        // Model tone wins over the local label, capitalized.
        assert_eq!(analysis.summary.tone, "Positive");
        assert_eq!(analysis.summary.gemini_confidence, Value::from(0.8));
    }

    #[test]
    fn test_model_tone_capitalized() {
        assert_eq!(capitalize("positive"), "Positive");
        assert_eq!(capitalize("NEGATIVE"), "Negative");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_confidence_blank_when_absent() {
        let analysis = analyze("plain text");
        assert_eq!(analysis.summary.gemini_confidence, Value::String(String::new()));
    }

    // ── serialization shape ─────────────────────────────────────────────

    #[test]
    fn test_keywords_serialize_as_pairs() {
        let analysis = analyze("rust rust code");
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["summary"]["top_keywords"][0][0], "rust");
        assert_eq!(value["summary"]["top_keywords"][0][1], 2);
    }
}
