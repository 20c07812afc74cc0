//! Lexicon-based polarity scorer for product and social text.

/// Word weights for product-trend text.
///
/// Keys are lowercase single words. Values in `(0.0, 1.0]` are positive,
/// in `[-1.0, 0.0)` are negative. The final score is clamped to `[-1.0, 1.0]`.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("great", 0.4),
    ("good", 0.3),
    ("excellent", 0.5),
    ("amazing", 0.5),
    ("awesome", 0.5),
    ("love", 0.5),
    ("loved", 0.5),
    ("best", 0.5),
    ("perfect", 0.5),
    ("recommend", 0.4),
    ("recommended", 0.4),
    ("quality", 0.3),
    ("durable", 0.4),
    ("sturdy", 0.3),
    ("beautiful", 0.4),
    ("stylish", 0.3),
    ("comfortable", 0.4),
    ("easy", 0.3),
    ("bargain", 0.4),
    ("viral", 0.3),
    ("trending", 0.3),
    ("popular", 0.3),
    ("obsessed", 0.4),
    ("satisfied", 0.4),
    ("happy", 0.4),
    // Negative signals
    ("bad", -0.4),
    ("terrible", -0.6),
    ("awful", -0.6),
    ("worst", -0.6),
    ("horrible", -0.6),
    ("broke", -0.5),
    ("broken", -0.5),
    ("flimsy", -0.5),
    ("cheap", -0.3),
    ("defective", -0.6),
    ("refund", -0.4),
    ("return", -0.3),
    ("returned", -0.4),
    ("scam", -0.7),
    ("fake", -0.6),
    ("disappointed", -0.5),
    ("disappointing", -0.5),
    ("useless", -0.6),
    ("waste", -0.5),
    ("overpriced", -0.4),
    ("avoid", -0.5),
    ("problem", -0.3),
    ("hate", -0.5),
    ("regret", -0.5),
];

/// Score a text string using the lexicon.
///
/// Splits text into lowercase words, sums matching weights, and clamps
/// the result to `[-1.0, 1.0]`. Returns `0.0` for empty or unknown text.
#[must_use]
pub fn polarity(text: &str) -> f64 {
    let mut score = 0.0_f64;
    for word in text.split_whitespace() {
        let w = word
            .trim_matches(|c: char| !c.is_alphabetic())
            .to_lowercase();
        for &(lex_word, weight) in LEXICON {
            if w == lex_word {
                score += weight;
                break;
            }
        }
    }
    score.clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_returns_zero() {
        assert_eq!(polarity(""), 0.0);
    }

    #[test]
    fn unknown_text_returns_zero() {
        assert_eq!(polarity("the quick brown fox"), 0.0);
    }

    #[test]
    fn positive_keyword_returns_positive() {
        let score = polarity("this carpet is great");
        assert!(score > 0.0, "expected positive score, got {score}");
    }

    #[test]
    fn negative_keyword_returns_negative() {
        let score = polarity("arrived broken, total scam");
        assert!(score < 0.0, "expected negative score, got {score}");
    }

    #[test]
    fn mixed_text_returns_intermediate() {
        // great (+0.4) + refund (-0.4) = 0.0 ± neighboring words
        let score = polarity("great color but I want a refund");
        assert!(
            score > -1.0 && score < 1.0,
            "expected intermediate score, got {score}"
        );
    }

    #[test]
    fn score_clamps_to_positive_one() {
        let text = "great excellent best love perfect amazing recommend quality";
        assert_eq!(polarity(text), 1.0);
    }

    #[test]
    fn score_clamps_to_negative_one() {
        let text = "terrible awful worst broken defective scam useless waste";
        assert_eq!(polarity(text), -1.0);
    }

    #[test]
    fn punctuation_stripped_from_words() {
        let score = polarity("great!");
        assert!(score > 0.0, "expected positive score for 'great!', got {score}");
    }
}
