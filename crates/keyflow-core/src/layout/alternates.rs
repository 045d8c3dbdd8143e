//! Long-press alternate derivation.

use crate::unicode::{display_case, is_single_letter};

use super::{KeyFace, KeySpec, Script};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    Prepend,
    Append,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AugmentRule {
    base: char,
    variant: char,
    placement: Placement,
}

// е offers ё first; ь offers ъ last.
const CYRILLIC_RULES: &[AugmentRule] = &[
    AugmentRule {
        base: 'е',
        variant: 'ё',
        placement: Placement::Prepend,
    },
    AugmentRule {
        base: 'ь',
        variant: 'ъ',
        placement: Placement::Append,
    },
];

/// Script-specific variants layered on top of a key's declared alternates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Augmentation {
    rules: &'static [AugmentRule],
}

impl Augmentation {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn cyrillic() -> Self {
        Self {
            rules: CYRILLIC_RULES,
        }
    }

    pub fn for_script(script: Script) -> Self {
        match script {
            Script::Cyrillic => Self::cyrillic(),
            Script::Latin => Self::none(),
        }
    }

    fn rules_for<'a>(&'a self, label: &'a str) -> impl Iterator<Item = &'a AugmentRule> + 'a {
        let label = label.to_lowercase();
        self.rules
            .iter()
            .filter(move |rule| label.chars().eq(std::iter::once(rule.base)))
    }
}

fn contains_ignoring_case(options: &[String], value: &str) -> bool {
    let value = value.to_lowercase();
    options.iter().any(|o| o.to_lowercase() == value)
}

/// The ordered long-press options of `key`: declared alternates (trimmed,
/// empties and duplicates dropped), then the script's variant for this key
/// if it is not already offered.
pub fn derive_alternates(key: &KeySpec, augmentation: &Augmentation) -> Vec<String> {
    let mut options: Vec<String> = Vec::with_capacity(key.alternates.len() + 1);
    for alt in &key.alternates {
        let alt = alt.trim();
        if !alt.is_empty() && !options.iter().any(|o| o == alt) {
            options.push(alt.to_string());
        }
    }
    for rule in augmentation.rules_for(&key.base_label) {
        let variant = rule.variant.to_string();
        if contains_ignoring_case(&options, &variant) {
            continue;
        }
        match rule.placement {
            Placement::Prepend => options.insert(0, variant),
            Placement::Append => options.push(variant),
        }
    }
    options
}

/// Small glyph shown in the corner of an idle key: its first alternate.
pub fn hint_glyph(key: &KeySpec, augmentation: &Augmentation) -> Option<String> {
    derive_alternates(key, augmentation).into_iter().next()
}

pub fn key_face(key: &KeySpec, augmentation: &Augmentation, shift: bool) -> KeyFace {
    let hint = hint_glyph(key, augmentation).map(|hint| {
        if is_single_letter(&hint) {
            display_case(&hint, shift)
        } else {
            hint
        }
    });
    KeyFace {
        label: display_case(&key.base_label, shift),
        hint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(label: &str, alternates: &[&str]) -> KeySpec {
        KeySpec::new(label, alternates.iter().map(|s| s.to_string()).collect())
    }

    #[test]
    fn explicit_list_is_cleaned() {
        let k = key("a", &[" á", "", "à ", "á", "  "]);
        assert_eq!(derive_alternates(&k, &Augmentation::none()), ["á", "à"]);
    }

    #[test]
    fn diacritic_vowel_is_prepended() {
        let k = key("е", &["є"]);
        assert_eq!(derive_alternates(&k, &Augmentation::cyrillic()), ["ё", "є"]);
        let k = key("Е", &[]);
        assert_eq!(derive_alternates(&k, &Augmentation::cyrillic()), ["ё"]);
    }

    #[test]
    fn hard_sign_is_appended_once() {
        let k = key("ь", &["'"]);
        assert_eq!(derive_alternates(&k, &Augmentation::cyrillic()), ["'", "ъ"]);
        let k = key("ь", &["Ъ"]);
        assert_eq!(derive_alternates(&k, &Augmentation::cyrillic()), ["Ъ"]);
    }

    #[test]
    fn latin_script_has_no_augmentation() {
        let k = key("е", &[]);
        assert!(derive_alternates(&k, &Augmentation::none()).is_empty());
    }

    #[test]
    fn other_keys_untouched() {
        let k = key("ж", &[]);
        assert!(derive_alternates(&k, &Augmentation::cyrillic()).is_empty());
    }

    #[test]
    fn hint_is_first_merged_alternate() {
        let aug = Augmentation::cyrillic();
        assert_eq!(hint_glyph(&key("е", &["є"]), &aug).as_deref(), Some("ё"));
        assert_eq!(hint_glyph(&key("4", &["₽", "$"]), &aug).as_deref(), Some("₽"));
        assert_eq!(hint_glyph(&key("ж", &[]), &aug), None);
    }

    #[test]
    fn key_face_casing() {
        let aug = Augmentation::cyrillic();
        let face = key_face(&key("е", &[]), &aug, true);
        assert_eq!(face.label, "Е");
        assert_eq!(face.hint.as_deref(), Some("Ё"));

        let face = key_face(&key("1", &["!?"]), &aug, true);
        assert_eq!(face.label, "1");
        assert_eq!(face.hint.as_deref(), Some("!?"));
    }
}
