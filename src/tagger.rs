//! Keyword-dictionary auto-tagger.
//!
//! Tags come from four sources, in this order: `#hashtags` written in the
//! content, the topic dictionary, the emotion dictionary and the local time
//! of day / day of week. A category is suggested from a separate keyword
//! table by counting hits.
//!
//! ASCII keywords must match on word boundaries so that `ui` does not fire
//! on `build`; other keywords (Japanese) match as plain substrings.

use chrono::{Datelike, Local, NaiveDateTime, Timelike, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::entity::Category;

type Dictionary = &'static [(&'static str, &'static [&'static str])];

static HASHTAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"#(\w+)").expect("hashtag regex"));

const TOPIC_TAGS: Dictionary = &[
    ("work", &["work", "meeting", "project", "deadline", "task", "office", "boss", "colleague", "business trip", "overtime", "仕事", "会議", "締切", "出張"]),
    ("programming", &["programming", "code", "coding", "debug", "bug", "api", "database", "frontend", "backend", "rust", "javascript", "python", "react", "git", "github", "プログラミング", "開発", "コード"]),
    ("design", &["design", "ui", "ux", "layout", "logo", "icon", "font", "typography", "color", "デザイン"]),
    ("sales", &["sales", "customer", "client", "proposal", "presentation", "contract", "revenue", "営業", "顧客", "商談"]),
    ("private", &["private", "hobby", "holiday", "vacation", "movie", "music", "game", "プライベート", "趣味", "映画", "音楽"]),
    ("family", &["family", "parents", "father", "mother", "brother", "sister", "kids", "son", "daughter", "家族", "両親"]),
    ("friends", &["friend", "friends", "party", "hangout", "友達", "友人", "飲み会"]),
    ("travel", &["travel", "trip", "sightseeing", "hotel", "flight", "train", "drive", "旅行", "観光", "温泉"]),
    ("food", &["food", "lunch", "dinner", "breakfast", "restaurant", "cafe", "cooking", "recipe", "食事", "料理", "ランチ"]),
    ("health", &["health", "exercise", "gym", "running", "jogging", "walking", "yoga", "workout", "diet", "doctor", "hospital", "健康", "運動", "ジョギング"]),
    ("study", &["study", "learn", "learning", "exam", "certification", "book", "reading", "seminar", "course", "勉強", "読書", "資格"]),
    ("shopping", &["shopping", "buy", "purchase", "store", "sale", "price", "買い物", "購入"]),
    ("groceries", &["groceries", "vegetables", "meat", "fish", "rice", "bread", "milk", "eggs", "supermarket", "食材", "牛乳", "パン", "卵"]),
    ("clothes", &["clothes", "fashion", "shirt", "pants", "shoes", "bag", "服", "靴"]),
    ("weather", &["weather", "sunny", "rain", "cloudy", "snow", "windy", "天気", "晴れ", "雨"]),
];

const EMOTION_TAGS: Dictionary = &[
    ("positive", &["happy", "glad", "great", "awesome", "wonderful", "thanks", "thank you", "success", "achieved", "嬉しい", "楽しい", "幸せ", "ありがとう", "素晴らしい"]),
    ("negative", &["sad", "tired", "exhausted", "stress", "worried", "failed", "problem", "trouble", "悲しい", "つらい", "疲れた", "ストレス"]),
    ("surprise", &["surprised", "amazing", "unbelievable", "wow", "びっくり", "驚いた", "すごい"]),
];

const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Work, &["work", "meeting", "project", "deadline", "office", "boss", "colleague", "sales", "programming", "仕事", "会議", "プロジェクト", "締切"]),
    (Category::Private, &["family", "friend", "hobby", "holiday", "movie", "music", "game", "travel", "家族", "友達", "趣味", "旅行"]),
    (Category::Idea, &["idea", "brainstorm", "concept", "plan", "invent", "inspiration", "アイデア", "企画", "ひらめき"]),
    (Category::Shopping, &["shopping", "buy", "purchase", "store", "sale", "groceries", "clothes", "買い物", "購入"]),
];

#[derive(Debug, Clone, PartialEq)]
pub struct AutoTagResult {
    pub tags: Vec<String>,
    pub suggested_category: Category,
}

impl AutoTagResult {
    pub fn empty() -> Self {
        Self {
            tags: Vec::new(),
            suggested_category: Category::Other,
        }
    }
}

pub fn auto_tag(content: &str) -> AutoTagResult {
    auto_tag_at(content, Local::now().naive_local())
}

pub fn auto_tag_at(content: &str, now: NaiveDateTime) -> AutoTagResult {
    let mut tags: Vec<String> = Vec::new();
    let text = content.to_lowercase();

    for tag in extract_hashtags(content) {
        push_unique(&mut tags, tag);
    }
    for tag in dictionary_hits(&text, TOPIC_TAGS) {
        push_unique(&mut tags, tag.to_string());
    }
    for tag in dictionary_hits(&text, EMOTION_TAGS) {
        push_unique(&mut tags, tag.to_string());
    }
    for tag in time_tags(now) {
        push_unique(&mut tags, tag.to_string());
    }

    AutoTagResult {
        tags,
        suggested_category: suggest_category(&text),
    }
}

pub fn extract_hashtags(content: &str) -> Vec<String> {
    HASHTAG
        .captures_iter(content)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Highest keyword-hit count wins; ties go to the earlier category.
pub fn suggest_category(text: &str) -> Category {
    let mut best = Category::Other;
    let mut best_score = 0;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score = keywords
            .iter()
            .filter(|k| contains_keyword(text, k))
            .count();
        if score > best_score {
            best_score = score;
            best = *category;
        }
    }
    best
}

fn dictionary_hits(text: &str, dictionary: Dictionary) -> Vec<&'static str> {
    dictionary
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| contains_keyword(text, k)))
        .map(|(tag, _)| *tag)
        .collect()
}

fn time_tags(now: NaiveDateTime) -> [&'static str; 2] {
    let part_of_day = match now.hour() {
        5..=11 => "morning",
        12..=16 => "afternoon",
        17..=21 => "evening",
        _ => "night",
    };
    let week_part = match now.weekday() {
        Weekday::Sat | Weekday::Sun => "weekend",
        _ => "weekday",
    };
    [part_of_day, week_part]
}

/// ASCII keywords must start a word ("ui" misses "build"); suffixes such as
/// plurals still match. Other scripts match anywhere.
fn contains_keyword(text: &str, keyword: &str) -> bool {
    if !keyword.is_ascii() {
        return text.contains(keyword);
    }
    text.match_indices(keyword).any(|(start, _)| {
        !text[..start]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_alphanumeric())
    })
}

fn push_unique(tags: &mut Vec<String>, tag: String) {
    if !tags.contains(&tag) {
        tags.push(tag);
    }
}
