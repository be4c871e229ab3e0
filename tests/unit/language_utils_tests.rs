/*!
 * Tests for ISO language code utilities
 */

use cve_translator::language_utils::{
    display_name, get_language_name, language_codes_match, normalize_to_part2t, validate_language_code,
};

#[test]
fn test_languageCodesMatch_withDifferentForms_shouldMatch() {
    assert!(language_codes_match("ja", "jpn"));
    assert!(language_codes_match("en", "eng"));
    assert!(language_codes_match("fr", "fre"));
    assert!(!language_codes_match("ja", "en"));
    assert!(!language_codes_match("xx", "xx"));
}

#[test]
fn test_normalizeToPart2t_shouldReturnTerminologyCode() {
    assert_eq!(normalize_to_part2t("ja").unwrap(), "jpn");
    assert_eq!(normalize_to_part2t("ger").unwrap(), "deu");
    assert!(normalize_to_part2t("zz").is_err());
}

#[test]
fn test_getLanguageName_shouldReturnEnglishName() {
    assert_eq!(get_language_name("ja").unwrap(), "Japanese");
    assert_eq!(display_name("en"), "English");
    assert_eq!(display_name("??"), "??");
}

#[test]
fn test_validateLanguageCode_withInvalidInput_shouldFail() {
    assert!(validate_language_code("").is_err());
    assert!(validate_language_code("english").is_err());
}
