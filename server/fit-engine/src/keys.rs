//! Attribute key canonicalization.

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical comparison form of an arbitrary key:
/// - NFD decomposition, combining marks dropped (diacritics)
/// - lowercase
/// - only ASCII letters and digits kept
///
/// Total and idempotent; empty input gives an empty string.
pub fn normalize_key(key: &str) -> String {
  key
    .nfd()
    .filter(|c| !is_combining_mark(*c))
    .flat_map(char::to_lowercase)
    .filter(char::is_ascii_alphanumeric)
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn case_diacritic_and_punctuation_insensitive() {
    let a = normalize_key("Pensamento Prático");
    assert_eq!(a, "pensamentopratico");
    assert_eq!(normalize_key("pensamento_pratico"), a);
    assert_eq!(normalize_key("PENSAMENTO-PRATICO"), a);
  }

  #[test]
  fn idempotent() {
    for key in ["Autodireção", "Self-Esteem", "  Consciência do Papel (CP) ", "ß", "demandas-3"] {
      let once = normalize_key(key);
      assert_eq!(normalize_key(&once), once);
    }
  }

  #[test]
  fn empty_and_punctuation_give_empty() {
    assert_eq!(normalize_key(""), "");
    assert_eq!(normalize_key("—/ _"), "");
  }

  #[test]
  fn keeps_digits() {
    assert_eq!(normalize_key("Apoio-2"), "apoio2");
  }

  #[test]
  fn drops_non_ascii_letters_without_decomposition() {
    assert_eq!(normalize_key("Øre"), "re");
  }
}
