// SPDX-FileCopyrightText: 2026 Keyward Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Random password generation and shuffling.

use keyward_core::KeywardError;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;

pub const MIN_LENGTH: usize = 5;
pub const MAX_LENGTH: usize = 40;
pub const DEFAULT_LENGTH: usize = 19;

const UPPERCASE: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";
const NUMBERS: &str = "0123456789";
const SYMBOLS: &str = "!@#$%^&*()_+[]{}|;:,.<>?";

/// Used when the selected classes minus exclusions leave nothing to draw from.
const FALLBACK_POOL: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Knobs for [`generate`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    pub length: usize,
    pub uppercase: bool,
    pub lowercase: bool,
    pub numbers: bool,
    pub symbols: bool,
    /// Extra characters added to the pool.
    pub custom_chars: String,
    /// Characters removed from the pool.
    pub exclude_chars: String,
    /// Inserted verbatim at a random position.
    pub required: String,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            uppercase: true,
            lowercase: false,
            numbers: true,
            symbols: true,
            custom_chars: String::new(),
            exclude_chars: String::new(),
            required: String::new(),
        }
    }
}

impl GeneratorOptions {
    /// The character pool the filler is drawn from.
    ///
    /// Duplicates are kept, so repeating a custom character weights it.
    pub fn pool(&self) -> Vec<char> {
        let mut pool = String::new();
        if self.uppercase {
            pool.push_str(UPPERCASE);
        }
        if self.lowercase {
            pool.push_str(LOWERCASE);
        }
        if self.numbers {
            pool.push_str(NUMBERS);
        }
        if self.symbols {
            pool.push_str(SYMBOLS);
        }
        pool.push_str(&self.custom_chars);

        let chars: Vec<char> = pool
            .chars()
            .filter(|c| !self.exclude_chars.contains(*c))
            .collect();

        if chars.is_empty() {
            FALLBACK_POOL.chars().collect()
        } else {
            chars
        }
    }
}

/// Generate a password per `options`.
pub fn generate(options: &GeneratorOptions) -> Result<String, KeywardError> {
    if !(MIN_LENGTH..=MAX_LENGTH).contains(&options.length) {
        return Err(KeywardError::Validation(format!(
            "password length must be between {MIN_LENGTH} and {MAX_LENGTH}"
        )));
    }

    let required: Vec<char> = options.required.chars().collect();
    if required.len() > options.length {
        return Err(KeywardError::Validation(
            "the required text is longer than the password length".to_string(),
        ));
    }

    let pool = options.pool();
    let mut rng = rand::thread_rng();
    let filler: Vec<char> = (0..options.length - required.len())
        .map(|_| pool[rng.gen_range(0..pool.len())])
        .collect();

    let at = rng.gen_range(0..=filler.len());
    let password: String = filler[..at]
        .iter()
        .chain(required.iter())
        .chain(filler[at..].iter())
        .collect();

    Ok(password)
}

/// Shuffle the characters of an existing password.
pub fn shuffle(password: &str) -> Result<String, KeywardError> {
    if password.trim().is_empty() {
        return Err(KeywardError::Validation(
            "no password to shuffle".to_string(),
        ));
    }
    let mut chars: Vec<char> = password.chars().collect();
    chars.shuffle(&mut rand::thread_rng());
    Ok(chars.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_password_has_default_length_and_classes() {
        let pw = generate(&GeneratorOptions::default()).unwrap();
        assert_eq!(pw.chars().count(), DEFAULT_LENGTH);
        assert!(pw.chars().all(|c| !c.is_ascii_lowercase()));
    }

    #[test]
    fn length_bounds_are_enforced() {
        for length in [0, 4, 41] {
            let opts = GeneratorOptions {
                length,
                ..Default::default()
            };
            assert!(matches!(generate(&opts), Err(KeywardError::Validation(_))));
        }
        for length in [MIN_LENGTH, MAX_LENGTH] {
            let opts = GeneratorOptions {
                length,
                ..Default::default()
            };
            assert_eq!(generate(&opts).unwrap().chars().count(), length);
        }
    }

    #[test]
    fn required_text_appears_verbatim() {
        let opts = GeneratorOptions {
            required: "cat".to_string(),
            ..Default::default()
        };
        let pw = generate(&opts).unwrap();
        assert!(pw.contains("cat"));
        assert_eq!(pw.chars().count(), DEFAULT_LENGTH);
    }

    #[test]
    fn required_text_filling_the_whole_length() {
        let opts = GeneratorOptions {
            length: 5,
            required: "exact".to_string(),
            ..Default::default()
        };
        assert_eq!(generate(&opts).unwrap(), "exact");
    }

    #[test]
    fn required_longer_than_length_is_rejected() {
        let opts = GeneratorOptions {
            length: 5,
            required: "toolong".to_string(),
            ..Default::default()
        };
        assert!(matches!(generate(&opts), Err(KeywardError::Validation(_))));
    }

    #[test]
    fn excluded_chars_never_appear() {
        let opts = GeneratorOptions {
            length: 40,
            uppercase: false,
            symbols: false,
            exclude_chars: "0123456".to_string(),
            ..Default::default()
        };
        for _ in 0..20 {
            let pw = generate(&opts).unwrap();
            assert!(pw.chars().all(|c| "789".contains(c)), "{pw}");
        }
    }

    #[test]
    fn empty_pool_falls_back_to_alphanumerics() {
        let opts = GeneratorOptions {
            uppercase: false,
            lowercase: false,
            numbers: false,
            symbols: false,
            ..Default::default()
        };
        assert_eq!(opts.pool().len(), 62);
        let pw = generate(&opts).unwrap();
        assert!(pw.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn custom_chars_join_the_pool() {
        let opts = GeneratorOptions {
            uppercase: false,
            numbers: false,
            symbols: false,
            custom_chars: "é".to_string(),
            ..Default::default()
        };
        assert_eq!(generate(&opts).unwrap(), "é".repeat(DEFAULT_LENGTH));
    }

    #[test]
    fn shuffle_keeps_the_multiset() {
        let original = "Tr0ub4dor&3";
        let shuffled = shuffle(original).unwrap();
        let mut a: Vec<char> = original.chars().collect();
        let mut b: Vec<char> = shuffled.chars().collect();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_rejects_blank() {
        assert!(matches!(shuffle("  "), Err(KeywardError::Validation(_))));
    }

    #[test]
    fn options_deserialize_from_camel_case() {
        let opts: GeneratorOptions = serde_json::from_str(
            r#"{"length": 12, "lowercase": true, "excludeChars": "O0", "customChars": "~"}"#,
        )
        .unwrap();
        assert_eq!(opts.length, 12);
        assert!(opts.lowercase);
        assert!(opts.uppercase);
        assert_eq!(opts.exclude_chars, "O0");
        assert_eq!(opts.custom_chars, "~");
    }
}
