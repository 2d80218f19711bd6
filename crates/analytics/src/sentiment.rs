//! Lexical comment sentiment and word frequency.
//!
//! Comments are tokenized into lowercase words and scanned against a
//! [`SentimentLexicon`] mapping words and phrases to polarity weights. Matching
//! is whole-word (a lexicon entry never matches inside a longer word) and
//! greedy longest-phrase-first, so a phrase entry consumes its words and they
//! are not counted again individually.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use tubelens_proto::CommentRecord;

use crate::config::SentimentConfig;
use crate::error::AnalyticsError;
use crate::format::truncate_with_ellipsis;

const SEED_POSITIVE: &[&str] = &[
    "good", "great", "awesome", "amazing", "love", "loved", "excellent", "perfect", "best",
    "wonderful", "fantastic", "nice", "beautiful", "cool", "thanks", "thank", "helpful",
    "brilliant", "incredible", "enjoyed", "favorite", "favourite", "masterpiece", "well done",
];

const SEED_NEGATIVE: &[&str] = &[
    "bad", "hate", "terrible", "awful", "worst", "stupid", "boring", "sucks", "disappointing",
    "disappointed", "useless", "garbage", "trash", "horrible", "annoying", "clickbait",
    "dislike", "cringe", "waste of time",
];

const STOP_WORDS: &[&str] = &[
    "about", "after", "again", "also", "because", "been", "before", "being", "cant", "could",
    "didnt", "does", "doesnt", "dont", "each", "even", "every", "from", "have", "here", "into",
    "just", "like", "more", "much", "only", "other", "over", "really", "should", "some", "such",
    "than", "that", "their", "them", "then", "there", "these", "they", "this", "those", "very",
    "were", "what", "when", "where", "which", "while", "will", "with", "would", "your", "youre",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

/// Split text into lowercase words.
///
/// Apostrophes are dropped (`don't` becomes `dont`); every other
/// non-alphanumeric character separates words.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            current.extend(c.to_lowercase());
        } else if c == '\'' || c == '\u{2019}' {
            continue;
        } else if !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

/// Accumulated polarity of one text.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SentimentScore {
    pub positive: f64,
    pub negative: f64,
}

impl SentimentScore {
    pub fn sentiment(&self) -> Sentiment {
        if self.positive > self.negative {
            Sentiment::Positive
        } else if self.negative > self.positive {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        }
    }
}

/// Table of words and phrases with polarity weights.
///
/// Positive weights count towards positive sentiment, negative weights towards
/// negative. Keys are stored normalized (tokenized, space-joined), so every
/// entry has exactly one polarity.
#[derive(Debug, Clone, PartialEq)]
pub struct SentimentLexicon {
    weights: HashMap<String, f64>,
    max_phrase_len: usize,
}

impl SentimentLexicon {
    pub fn empty() -> Self {
        Self {
            weights: HashMap::new(),
            max_phrase_len: 0,
        }
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, phrase: &str, weight: f64) -> Result<(), AnalyticsError> {
        if !weight.is_finite() || weight == 0.0 {
            return Err(AnalyticsError::InvalidWeight {
                phrase: phrase.to_string(),
                weight,
            });
        }

        let tokens = tokenize(phrase);
        if tokens.is_empty() {
            return Err(AnalyticsError::EmptyPhrase(phrase.to_string()));
        }

        self.max_phrase_len = self.max_phrase_len.max(tokens.len());
        self.weights.insert(tokens.join(" "), weight);
        Ok(())
    }

    /// Parse a JSON object mapping phrases to weights, e.g. `{"great": 1, "waste of time": -2}`.
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        // BTreeMap gives a deterministic winner when two keys normalize to the same phrase.
        let table: BTreeMap<String, f64> = serde_json::from_str(json)?;

        let mut lexicon = Self::empty();
        for (phrase, weight) in &table {
            lexicon.insert(phrase, *weight)?;
        }
        Ok(lexicon)
    }

    pub fn from_path(path: &Path) -> Result<Self, AnalyticsError> {
        let json = fs::read_to_string(path).map_err(|source| AnalyticsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Weight of an entry, looked up with the same normalization used on insert.
    pub fn weight(&self, phrase: &str) -> Option<f64> {
        self.weights.get(&tokenize(phrase).join(" ")).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Score a token sequence, matching the longest phrase at each position first.
    pub fn score(&self, tokens: &[String]) -> SentimentScore {
        let mut score = SentimentScore::default();
        let mut i = 0;

        while i < tokens.len() {
            let longest = self.max_phrase_len.min(tokens.len() - i);
            let matched = (1..=longest).rev().find_map(|n| {
                let phrase = tokens[i..i + n].join(" ");
                self.weights.get(&phrase).map(|weight| (n, *weight))
            });

            match matched {
                Some((n, weight)) => {
                    if weight > 0.0 {
                        score.positive += weight;
                    } else {
                        score.negative -= weight;
                    }
                    i += n;
                }
                None => i += 1,
            }
        }

        score
    }
}

impl Default for SentimentLexicon {
    /// The built-in seed lexicon: every entry weighs 1.0 or -1.0.
    fn default() -> Self {
        let mut lexicon = Self::empty();
        let entries = SEED_POSITIVE
            .iter()
            .map(|p| (*p, 1.0))
            .chain(SEED_NEGATIVE.iter().map(|p| (*p, -1.0)));
        for (phrase, weight) in entries {
            lexicon.weights.insert(phrase.to_string(), weight);
            lexicon.max_phrase_len = lexicon.max_phrase_len.max(phrase.split(' ').count());
        }
        lexicon
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentDistribution {
    pub fn record(&mut self, sentiment: Sentiment) {
        match sentiment {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Negative => self.negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// Word frequencies, most frequent first, ties in first-seen order.
///
/// Serializes as a JSON object whose keys keep that order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TopWords(Vec<(String, usize)>);

impl TopWords {
    pub fn as_slice(&self) -> &[(String, usize)] {
        &self.0
    }

    pub fn get(&self, word: &str) -> Option<usize> {
        self.0.iter().find(|(w, _)| w == word).map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TopWords {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.0.iter().map(|(word, count)| (word, count)))
    }
}

/// A sampled comment with its assigned sentiment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedComment {
    pub text: String,
    pub author: String,
    pub like_count: u64,
    pub sentiment: Sentiment,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentsAnalysis {
    pub comments: Vec<ClassifiedComment>,
    pub sentiment_distribution: SentimentDistribution,
    pub top_words: TopWords,
    pub total_comments: usize,
}

/// Rule-based classifier over a lexicon, plus word-frequency extraction.
#[derive(Debug, Clone)]
pub struct SentimentClassifier {
    lexicon: SentimentLexicon,
    stop_words: HashSet<String>,
    config: SentimentConfig,
}

impl SentimentClassifier {
    pub fn new(lexicon: SentimentLexicon, config: SentimentConfig) -> Self {
        Self {
            lexicon,
            stop_words: STOP_WORDS.iter().map(|w| w.to_string()).collect(),
            config,
        }
    }

    /// Replace the stop-word list.
    pub fn with_stop_words<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        self.stop_words = words.into_iter().map(|w| w.as_ref().to_lowercase()).collect();
        self
    }

    pub fn lexicon(&self) -> &SentimentLexicon {
        &self.lexicon
    }

    pub fn config(&self) -> &SentimentConfig {
        &self.config
    }

    pub fn score(&self, text: &str) -> SentimentScore {
        self.lexicon.score(&tokenize(text))
    }

    pub fn classify(&self, text: &str) -> Sentiment {
        self.score(text).sentiment()
    }

    /// Most frequent content words across `texts`.
    ///
    /// Stop words and words shorter than the configured minimum are skipped.
    pub fn top_words<'a, I>(&self, texts: I) -> TopWords
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut counts: Vec<(String, usize)> = Vec::new();

        for text in texts {
            for word in tokenize(text) {
                if word.chars().count() < self.config.min_word_len
                    || self.stop_words.contains(&word)
                {
                    continue;
                }
                match index.get(&word) {
                    Some(&i) => counts[i].1 += 1,
                    None => {
                        index.insert(word.clone(), counts.len());
                        counts.push((word, 1));
                    }
                }
            }
        }

        // Stable sort keeps first-seen order among equal counts.
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.truncate(self.config.top_words_limit);
        TopWords(counts)
    }

    /// Classify every comment and aggregate the results.
    pub fn analyze_comments(&self, comments: &[CommentRecord]) -> CommentsAnalysis {
        let mut distribution = SentimentDistribution::default();
        let mut sampled = Vec::with_capacity(comments.len().min(self.config.sample_size));

        for comment in comments {
            let sentiment = self.classify(&comment.text);
            distribution.record(sentiment);

            if sampled.len() < self.config.sample_size {
                sampled.push(ClassifiedComment {
                    text: truncate_with_ellipsis(&comment.text, self.config.excerpt_len),
                    author: comment.author.clone(),
                    like_count: comment.like_count,
                    sentiment,
                    published_at: comment.published_at,
                });
            }
        }

        tracing::debug!(
            total = comments.len(),
            positive = distribution.positive,
            negative = distribution.negative,
            "Classified comments"
        );

        CommentsAnalysis {
            comments: sampled,
            sentiment_distribution: distribution,
            top_words: self.top_words(comments.iter().map(|c| c.text.as_str())),
            total_comments: comments.len(),
        }
    }
}

impl Default for SentimentClassifier {
    fn default() -> Self {
        Self::new(SentimentLexicon::default(), SentimentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod tokenize_tests {
        use super::*;

        #[test]
        fn lowercases_and_strips_punctuation() {
            assert_eq!(tokenize("Great VIDEO!!! Loved it."), vec!["great", "video", "loved", "it"]);
        }

        #[test]
        fn drops_apostrophes() {
            assert_eq!(tokenize("Don't stop"), vec!["dont", "stop"]);
            assert_eq!(tokenize("it\u{2019}s fine"), vec!["its", "fine"]);
        }

        #[test]
        fn punctuation_separates_words() {
            assert_eq!(tokenize("good,bad/ugly"), vec!["good", "bad", "ugly"]);
        }

        #[test]
        fn empty_text_has_no_tokens() {
            assert!(tokenize("").is_empty());
            assert!(tokenize("  ?! ").is_empty());
        }
    }

    mod classify_tests {
        use super::*;

        #[test]
        fn positive_comment() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify("this video is amazing and great"), Sentiment::Positive);
        }

        #[test]
        fn negative_comment() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify("this is terrible and awful"), Sentiment::Negative);
        }

        #[test]
        fn no_matches_is_neutral() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify("okay video"), Sentiment::Neutral);
        }

        #[test]
        fn empty_string_is_neutral() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify(""), Sentiment::Neutral);
        }

        #[test]
        fn balanced_matches_are_neutral() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify("good start, bad ending"), Sentiment::Neutral);
        }

        #[test]
        fn matching_is_case_insensitive() {
            let classifier = SentimentClassifier::default();
            assert_eq!(classifier.classify("AWESOME"), Sentiment::Positive);
        }

        #[test]
        fn matching_is_whole_word() {
            let classifier = SentimentClassifier::default();
            // "bad" inside "badminton", "hate" inside "whatever"
            assert_eq!(classifier.classify("badminton whatever"), Sentiment::Neutral);
        }

        #[test]
        fn phrases_consume_their_words() {
            let mut lexicon = SentimentLexicon::empty();
            lexicon.insert("not good", -1.0).unwrap();
            lexicon.insert("good", 1.0).unwrap();

            let score = lexicon.score(&tokenize("not good at all"));
            assert_eq!(score, SentimentScore { positive: 0.0, negative: 1.0 });
        }

        #[test]
        fn weights_are_summed() {
            let mut lexicon = SentimentLexicon::empty();
            lexicon.insert("masterpiece", 3.0).unwrap();
            lexicon.insert("boring", -1.0).unwrap();
            let classifier = SentimentClassifier::new(lexicon, SentimentConfig::default());

            assert_eq!(
                classifier.classify("boring boring masterpiece"),
                Sentiment::Positive
            );
        }

        #[test]
        fn classifying_twice_is_identical() {
            let classifier = SentimentClassifier::default();
            let text = "love it but the ending was disappointing";
            assert_eq!(classifier.score(text), classifier.score(text));
        }
    }

    mod lexicon_tests {
        use super::*;

        #[test]
        fn seed_lexicon_is_disjoint() {
            let positive: HashSet<_> = SEED_POSITIVE.iter().collect();
            assert!(SEED_NEGATIVE.iter().all(|w| !positive.contains(w)));

            let lexicon = SentimentLexicon::default();
            assert_eq!(lexicon.len(), SEED_POSITIVE.len() + SEED_NEGATIVE.len());
            assert_eq!(lexicon.weight("great"), Some(1.0));
            assert_eq!(lexicon.weight("Waste of  TIME"), Some(-1.0));
        }

        #[test]
        fn from_json_normalizes_keys() {
            let lexicon = SentimentLexicon::from_json(r#"{"Superb!": 2.5, "meh": -0.5}"#).unwrap();
            assert_eq!(lexicon.weight("superb"), Some(2.5));
            assert_eq!(lexicon.weight("MEH"), Some(-0.5));
            assert_eq!(lexicon.len(), 2);
        }

        #[test]
        fn from_json_rejects_zero_weight() {
            let err = SentimentLexicon::from_json(r#"{"fine": 0}"#).unwrap_err();
            assert!(matches!(err, AnalyticsError::InvalidWeight { .. }));
        }

        #[test]
        fn from_json_rejects_empty_phrase() {
            let err = SentimentLexicon::from_json(r#"{"!!!": 1}"#).unwrap_err();
            assert!(matches!(err, AnalyticsError::EmptyPhrase(_)));
        }

        #[test]
        fn from_json_rejects_malformed_table() {
            assert!(matches!(
                SentimentLexicon::from_json(r#"["good"]"#),
                Err(AnalyticsError::InvalidLexicon(_))
            ));
        }

        #[test]
        fn from_path_reports_missing_file() {
            let err =
                SentimentLexicon::from_path(Path::new("/nonexistent/lexicon.json")).unwrap_err();
            assert!(matches!(err, AnalyticsError::Io { .. }));
        }
    }

    mod top_words_tests {
        use super::*;

        #[test]
        fn counts_content_words_only() {
            let classifier = SentimentClassifier::default();
            let words = classifier.top_words(["This song is great", "great song, this is it"]);

            assert_eq!(words.get("great"), Some(2));
            assert_eq!(words.get("song"), Some(2));
            assert_eq!(words.get("this"), None);
            assert_eq!(words.get("is"), None);
        }

        #[test]
        fn ties_keep_first_seen_order() {
            let classifier = SentimentClassifier::default();
            let words = classifier.top_words(["zebra apple mango", "mango"]);

            let order: Vec<_> = words.as_slice().iter().map(|(w, c)| (w.as_str(), *c)).collect();
            assert_eq!(order, vec![("mango", 2), ("zebra", 1), ("apple", 1)]);
        }

        #[test]
        fn truncates_to_limit() {
            let config = SentimentConfig {
                top_words_limit: 2,
                ..SentimentConfig::default()
            };
            let classifier = SentimentClassifier::new(SentimentLexicon::default(), config);
            let words = classifier.top_words(["alpha bravo charlie delta"]);

            assert_eq!(words.len(), 2);
        }

        #[test]
        fn custom_stop_words() {
            let classifier = SentimentClassifier::default().with_stop_words(["Zebra"]);
            let words = classifier.top_words(["zebra this"]);

            assert_eq!(words.get("zebra"), None);
            assert_eq!(words.get("this"), Some(1));
        }

        #[test]
        fn serializes_as_ordered_object() {
            let classifier = SentimentClassifier::default();
            let words = classifier.top_words(["zulu alpha alpha"]);

            let json = serde_json::to_string(&words).unwrap();
            assert_eq!(json, r#"{"alpha":2,"zulu":1}"#);
        }
    }

    mod analyze_tests {
        use super::*;

        #[test]
        fn aggregates_distribution_and_samples() {
            let classifier = SentimentClassifier::default();
            let comments = vec![
                CommentRecord::new("Amazing work, thanks!").with_likes(10),
                CommentRecord::new("worst upload ever"),
                CommentRecord::new("first"),
                CommentRecord::new(""),
            ];
            let analysis = classifier.analyze_comments(&comments);

            assert_eq!(analysis.total_comments, 4);
            assert_eq!(
                analysis.sentiment_distribution,
                SentimentDistribution { positive: 1, neutral: 2, negative: 1 }
            );
            assert_eq!(analysis.comments.len(), 4);
            assert_eq!(analysis.comments[0].sentiment, Sentiment::Positive);
            assert_eq!(analysis.comments[0].like_count, 10);
            assert_eq!(analysis.comments[1].sentiment, Sentiment::Negative);
        }

        #[test]
        fn samples_are_capped_and_truncated() {
            let config = SentimentConfig {
                sample_size: 2,
                excerpt_len: 5,
                ..SentimentConfig::default()
            };
            let classifier = SentimentClassifier::new(SentimentLexicon::default(), config);
            let comments: Vec<_> = (0..5)
                .map(|i| CommentRecord::new(format!("comment {i}")))
                .collect();
            let analysis = classifier.analyze_comments(&comments);

            assert_eq!(analysis.total_comments, 5);
            assert_eq!(analysis.sentiment_distribution.total(), 5);
            assert_eq!(analysis.comments.len(), 2);
            assert_eq!(analysis.comments[0].text, "comme...");
        }

        #[test]
        fn empty_comment_set_is_zero_valued() {
            let analysis = SentimentClassifier::default().analyze_comments(&[]);

            assert_eq!(analysis.total_comments, 0);
            assert_eq!(analysis.sentiment_distribution, SentimentDistribution::default());
            assert!(analysis.top_words.is_empty());
            assert!(analysis.comments.is_empty());
        }

        #[test]
        fn serializes_camel_case() {
            let analysis = SentimentClassifier::default()
                .analyze_comments(&[CommentRecord::new("great great stuff")]);
            let json = serde_json::to_value(&analysis).unwrap();

            assert_eq!(json["totalComments"], 1);
            assert_eq!(json["sentimentDistribution"]["positive"], 1);
            assert_eq!(json["topWords"]["great"], 2);
            assert_eq!(json["comments"][0]["sentiment"], "positive");
        }
    }
}
