//! Key → display-title transforms.
//!
//! The default is *start case*: split a key into words and capitalise the
//! first letter of each (`"fooBar"` → `"Foo Bar"`, `"build_id"` →
//! `"Build Id"`).  Callers can override it with any [`TitleFormat`].

use std::fmt;
use std::sync::Arc;

/// A caller-supplied key formatter.
#[derive(Clone)]
pub struct TitleFormat(Arc<dyn Fn(&str) -> String + Send + Sync>);

impl TitleFormat {
    pub fn new(f: impl Fn(&str) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, key: &str) -> String {
        (self.0)(key)
    }
}

impl fmt::Debug for TitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TitleFormat(..)")
    }
}

/// Character class used for word splitting.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Class {
    Upper,
    Lower,
    Digit,
    Sep,
}

fn class_of(c: char) -> Class {
    if c.is_uppercase() {
        Class::Upper
    } else if c.is_numeric() {
        Class::Digit
    } else if c.is_alphabetic() {
        Class::Lower
    } else {
        Class::Sep
    }
}

/// Fold Latin-1 letters to plain ASCII (`é` → `e`, `ß` → `ss`) and drop
/// combining diacritical marks.
pub fn deburr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        let folded = match c {
            'À'..='Å' => "A",
            'à'..='å' => "a",
            'Ç' => "C",
            'ç' => "c",
            'Ð' => "D",
            'ð' => "d",
            'È'..='Ë' => "E",
            'è'..='ë' => "e",
            'Ì'..='Ï' => "I",
            'ì'..='ï' => "i",
            'Ñ' => "N",
            'ñ' => "n",
            'Ò'..='Ö' | 'Ø' => "O",
            'ò'..='ö' | 'ø' => "o",
            'Ù'..='Ü' => "U",
            'ù'..='ü' => "u",
            'Ý' => "Y",
            'ý' | 'ÿ' => "y",
            'Æ' => "Ae",
            'æ' => "ae",
            'Þ' => "Th",
            'þ' => "th",
            'ß' => "ss",
            '\u{0300}'..='\u{036f}' => "",
            _ => {
                out.push(c);
                continue;
            }
        };
        out.push_str(folded);
    }
    out
}

/// Length of an ordinal suffix (`st`, `nd`, `rd`, `th`) starting at `i`,
/// given the digit just before it.  The suffix must agree with the digit
/// (`1st`, `2nd`, `3rd`, `4th`..) and end the word: it is followed by the end
/// of input, a separator, or a letter of the opposite case (`2ndOwner`).
fn ordinal_suffix_at(chars: &[char], i: usize, digit: char) -> Option<usize> {
    let expected = match digit {
        '1' => "st",
        '2' => "nd",
        '3' => "rd",
        _ => "th",
    };
    let a = *chars.get(i)?;
    let b = *chars.get(i + 1)?;
    let suffix: String = [a, b].iter().collect();
    let lower = suffix == expected;
    let upper = suffix == expected.to_ascii_uppercase();
    if !lower && !upper {
        return None;
    }
    let ends_word = match chars.get(i + 2).map(|&n| class_of(n)) {
        None | Some(Class::Sep) => true,
        Some(Class::Upper) => lower,
        Some(Class::Lower) => upper,
        Some(Class::Digit) => false,
    };
    ends_word.then_some(2)
}

/// Split `s` into words.
///
/// Boundaries: any separator (non-alphanumeric), a lower→upper transition
/// (`fooBar`), the end of an acronym (`XMLHttp` → `XML`, `Http`), and any
/// letter↔digit transition (`v2` → `v`, `2`), except that ordinals stay
/// whole (`2ndOwner` → `2nd`, `Owner`).  Accents are folded first and
/// apostrophes dropped, so `don't` stays one word.
pub fn split_words(s: &str) -> Vec<String> {
    let chars: Vec<char> = deburr(s)
        .chars()
        .filter(|&c| c != '\'' && c != '\u{2019}')
        .collect();
    let mut words = Vec::new();
    let mut current = String::new();

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let class = class_of(c);
        if class == Class::Sep {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            i += 1;
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let prev_class = class_of(prev);
            if prev_class == Class::Digit {
                if let Some(len) = ordinal_suffix_at(&chars, i, prev) {
                    current.extend(&chars[i..i + len]);
                    words.push(std::mem::take(&mut current));
                    i += len;
                    continue;
                }
            }
            let next_is_lower = chars.get(i + 1).map(|&n| class_of(n)) == Some(Class::Lower);
            let boundary = match (prev_class, class) {
                (Class::Lower, Class::Upper) => true,
                (Class::Upper, Class::Upper) => next_is_lower,
                (Class::Digit, Class::Upper | Class::Lower) => true,
                (Class::Upper | Class::Lower, Class::Digit) => true,
                _ => false,
            };
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
        i += 1;
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Default key transform: capitalise each word and join with spaces.
///
/// Only the first character of a word changes; `"FOO_BAR"` stays
/// `"FOO BAR"`.
pub fn start_case(s: &str) -> String {
    split_words(s)
        .iter()
        .map(|w| upper_first(w))
        .collect::<Vec<_>>()
        .join(" ")
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
