// Flesch Reading Ease.
//
//   206.835 - 1.015 * (words / sentences) - 84.6 * (syllables / words)
//
// Higher is easier; plain conversational English lands around 60-80.
// Syllables are estimated from vowel groups, which is accurate enough to
// rank summaries against each other.

/// Flesch Reading Ease of `text`; 0.0 for text without words.
pub fn flesch_reading_ease(text: &str) -> f64 {
    let words: Vec<String> = words(text);
    if words.is_empty() {
        return 0.0;
    }

    let sentences = sentence_count(text).max(1) as f64;
    let syllables: usize = words.iter().map(|w| syllable_count(w)).sum();
    let n_words = words.len() as f64;

    206.835 - 1.015 * (n_words / sentences) - 84.6 * (syllables as f64 / n_words)
}

/// Words with surrounding punctuation removed, lowercased.
fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| {
            w.chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect()
}

/// Sentences are segments ending in `.`, `!` or `?` that contain at least
/// one alphanumeric character; trailing text without a terminator counts too.
pub fn sentence_count(text: &str) -> usize {
    text.split(['.', '!', '?'])
        .filter(|segment| segment.chars().any(char::is_alphanumeric))
        .count()
}

/// Estimate syllables by counting vowel groups. A trailing silent `e` is
/// dropped ("make"), but not in a consonant + "le" ending ("table").
/// Every word has at least one syllable.
pub fn syllable_count(word: &str) -> usize {
    let word = word.to_lowercase();
    let chars: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    if chars.is_empty() {
        return 1;
    }

    let is_vowel = |c: char| matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');

    let mut count = 0;
    let mut prev_vowel = false;
    for &c in &chars {
        let v = is_vowel(c);
        if v && !prev_vowel {
            count += 1;
        }
        prev_vowel = v;
    }

    let n = chars.len();
    if n > 2 && chars[n - 1] == 'e' && !is_vowel(chars[n - 2]) {
        let consonant_le = chars[n - 2] == 'l' && !is_vowel(chars[n - 3]);
        if !consonant_le {
            count -= 1;
        }
    }

    count.max(1)
}
