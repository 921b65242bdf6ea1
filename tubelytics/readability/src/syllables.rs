/// Letters treated as vowels when grouping syllables.
const VOWELS: [char; 6] = ['a', 'e', 'i', 'o', 'u', 'y'];

/// Estimates the syllables in one word by counting vowel groups.
///
/// A trailing `e` is treated as silent. The result is never below one, so
/// empty or symbol-only tokens still count as a single syllable.
#[must_use]
pub fn count_syllables(word: &str) -> usize {
    let lowered = word.to_lowercase();
    let mut count = 0usize;
    let mut last_was_vowel = false;
    for ch in lowered.chars() {
        let is_vowel = VOWELS.contains(&ch);
        if is_vowel && !last_was_vowel {
            count += 1;
        }
        last_was_vowel = is_vowel;
    }
    if lowered.ends_with('e') {
        count = count.saturating_sub(1);
    }
    count.max(1)
}

/// Sums [`count_syllables`] over `words`; zero for an empty slice.
#[must_use]
pub fn count_syllables_in_text<S: AsRef<str>>(words: &[S]) -> usize {
    words.iter().map(|word| count_syllables(word.as_ref())).sum()
}
