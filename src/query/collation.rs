use std::cmp::Ordering;

/// Locale used when the configuration does not name one.
pub const DEFAULT_LOCALE: &str = "ru";

/// Orders two strings the way a reader of some locale expects.
pub trait Collator: Send + Sync {
    fn compare(&self, a: &str, b: &str) -> Ordering;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Script {
    Latin,
    Cyrillic,
    Other,
}

const ROOT_SCRIPTS: [Script; 3] = [Script::Latin, Script::Cyrillic, Script::Other];
const RUSSIAN_SCRIPTS: [Script; 3] = [Script::Cyrillic, Script::Latin, Script::Other];

// Accented Latin letters folded onto their base letter; the position in the
// string is the accent weight.
const LATIN_FOLDS: &[(char, &str)] = &[
    ('a', "àáâãäåāăą"),
    ('c', "çćĉċč"),
    ('d', "ď"),
    ('e', "èéêëēĕėęě"),
    ('g', "ĝğġģ"),
    ('h', "ĥ"),
    ('i', "ìíîïĩīĭį"),
    ('j', "ĵ"),
    ('k', "ķ"),
    ('l', "ĺļľł"),
    ('n', "ñńņň"),
    ('o', "òóôõöøōŏő"),
    ('r', "ŕŗř"),
    ('s', "śŝşš"),
    ('t', "ţť"),
    ('u', "ùúûüũūŭůűų"),
    ('w', "ŵ"),
    ('y', "ýÿŷ"),
    ('z', "źżž"),
];

/// Root order: punctuation, digits, then Latin before Cyrillic. Letters are
/// compared without case or accents first, accents second, case last with
/// uppercase first.
#[derive(Debug, Clone, Copy, Default)]
pub struct CaseInsensitive;

impl Collator for CaseInsensitive {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_with(a, b, &ROOT_SCRIPTS)
    }
}

/// Russian order: Cyrillic letters sort before Latin ones, and `ё` sorts as
/// `е` with an accent, directly after it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Russian;

impl Collator for Russian {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        compare_with(a, b, &RUSSIAN_SCRIPTS)
    }
}

/// Looks up the collator for a locale tag such as `ru` or `ru-RU`.
pub fn collator_for(locale: &str) -> Option<Box<dyn Collator>> {
    let language = locale
        .split(['-', '_'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    match language.as_str() {
        "ru" => Some(Box::new(Russian)),
        "en" | "und" | "root" => Some(Box::new(CaseInsensitive)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Weight {
    primary: (u8, char),
    accent: u8,
}

fn weight(ch: char, scripts: &[Script; 3]) -> Weight {
    let (script, base, accent) = match ch {
        'ё' => (Script::Cyrillic, 'е', 1),
        '\u{0400}'..='\u{04FF}' => (Script::Cyrillic, ch, 0),
        'a'..='z' => (Script::Latin, ch, 0),
        _ if ch.is_alphabetic() => match fold_latin(ch) {
            Some((base, accent)) => (Script::Latin, base, accent),
            None => (Script::Other, ch, 0),
        },
        _ if ch.is_numeric() => return Weight { primary: (1, ch), accent: 0 },
        _ => return Weight { primary: (0, ch), accent: 0 },
    };
    let rank = scripts.iter().position(|s| *s == script).unwrap_or(scripts.len()) as u8;
    Weight {
        primary: (2 + rank, base),
        accent,
    }
}

fn fold_latin(ch: char) -> Option<(char, u8)> {
    LATIN_FOLDS.iter().find_map(|(base, accented)| {
        accented
            .chars()
            .position(|candidate| candidate == ch)
            .map(|index| (*base, index as u8 + 1))
    })
}

// Three levels: base letters, then accents, then case (uppercase first).
fn compare_with(a: &str, b: &str, scripts: &[Script; 3]) -> Ordering {
    let weights = |s: &str| -> Vec<Weight> {
        s.chars()
            .flat_map(char::to_lowercase)
            .map(|ch| weight(ch, scripts))
            .collect()
    };
    let (left, right) = (weights(a), weights(b));
    left.iter()
        .map(|w| w.primary)
        .cmp(right.iter().map(|w| w.primary))
        .then_with(|| left.iter().map(|w| w.accent).cmp(right.iter().map(|w| w.accent)))
        .then_with(|| lower_flags(a).cmp(lower_flags(b)))
        .then_with(|| a.cmp(b))
}

fn lower_flags(s: &str) -> impl Iterator<Item = bool> + '_ {
    s.chars().map(|ch| !ch.is_uppercase())
}
