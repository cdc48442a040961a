use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Built-in roster used when no character file is supplied.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "SCREAMING-KEBAB-CASE", ascii_case_insensitive)]
pub enum KnownCharacter {
    Ryu,
    Ken,
    ChunLi,
    Guile,
    Luke,
    Jamie,
    Kimberly,
    Juri,
    #[strum(serialize = "DEE JAY")]
    DeeJay,
    Cammy,
    Manon,
    Marisa,
    #[strum(serialize = "JP")]
    Jp,
    Zangief,
    Lily,
    #[strum(serialize = "E. HONDA")]
    EHonda,
    Blanka,
    Dhalsim,
    Rashid,
    #[strum(serialize = "A.K.I.")]
    Aki,
    Ed,
    Akuma,
    #[strum(serialize = "M. BISON")]
    MBison,
    Terry,
    Mai,
    Elena,
}

pub fn default_roster() -> Vec<String> {
    KnownCharacter::iter().map(|c| c.to_string()).collect()
}

/// Display form for plain-text reports: `M. BISON` -> `M. Bison`,
/// `DEE JAY` -> `Dee Jay`. Dotted parts stay uppercase.
pub fn display_name(canonical: &str) -> String {
    canonical
        .split(' ')
        .map(|part| {
            if part.contains('.') {
                part.to_uppercase()
            } else {
                part.split('-').map(capitalize).collect::<Vec<_>>().join("-")
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
