/*!
 * Tests for term extraction, masking and preservation verification
 */

use std::collections::HashSet;

use cve_translator::preservation::{PreservationCodec, TermCategory, TermExtractor};

use crate::common::{ADVISORY_SENTENCE, SAMPLE_ADVISORY};

fn round_trip(text: &str) -> String {
    let extractor = TermExtractor::new();
    let codec = PreservationCodec::new();
    let map = codec.build_map(text, &extractor.extract(text));
    codec.restore(&codec.mask(text, &map), &map)
}

#[test]
fn test_extract_withAdvisorySentence_shouldFindExpectedTerms() {
    let terms = TermExtractor::new().extract(ADVISORY_SENTENCE);

    for expected in ["CVE-2025-41225", "CVSSv3", "8.8", "VMware", "8.0.3"] {
        assert!(terms.contains(expected), "missing {expected}");
    }
}

#[test]
fn test_extract_withSampleAdvisory_shouldCoverSeveralCategories() {
    let grouped = TermExtractor::new().extract(SAMPLE_ADVISORY).by_category();

    assert!(grouped.contains_key(&TermCategory::CveId));
    assert!(grouped.contains_key(&TermCategory::Url));
    assert!(grouped.contains_key(&TermCategory::Company));
    assert!(grouped.contains_key(&TermCategory::Product));
    assert!(grouped[&TermCategory::CveId].contains(&"VMSA-2025-0010".to_string()));
}

#[test]
fn test_extract_withPlainProse_shouldReturnEmptySet() {
    let terms = TermExtractor::new().extract("Please apply the update as soon as possible.");
    assert!(terms.is_empty());
}

#[test]
fn test_maskRestore_withoutTranslation_shouldReproduceText() {
    let samples = [
        ADVISORY_SENTENCE,
        SAMPLE_ADVISORY,
        "Hash 5d41402abc4b2a76b9719d911017c592 found in C:\\Windows\\System32\\drivers\\vmx.sys",
        "Contact security@vmware.com or visit https://www.vmware.com/security/advisories.html.",
        "Nothing technical here at all.",
        "Placeholders such as [KEEP:0000] appear near CVE-2025-41225.",
        "Templates use [KEEP:0000], ［KEEP1：0001］ and [KEEP2:0002] for VMware ESXi 7.0.3.",
        "",
    ];
    for text in samples {
        assert_eq!(round_trip(text), text);
    }
}

#[test]
fn test_buildMap_shouldAssignOneTokenPerDistinctTerm() {
    let extractor = TermExtractor::new();
    let terms = extractor.extract(SAMPLE_ADVISORY);
    let map = PreservationCodec::new().build_map(SAMPLE_ADVISORY, &terms);

    let tokens: HashSet<&str> = map.entries().iter().map(|e| e.token.as_str()).collect();
    assert_eq!(tokens.len(), terms.len());
    assert_eq!(map.len(), terms.len());
}

#[test]
fn test_mask_withOverlappingTerms_shouldNotExposeShorterTerm() {
    let text = "Update VMware ESXi 7.0.3 now; ESXi 8.0 is not affected.";
    let extractor = TermExtractor::new();
    let codec = PreservationCodec::new();
    let map = codec.build_map(text, &extractor.extract(text));
    let masked = codec.mask(text, &map);

    assert!(!masked.contains("ESXi"));
    assert!(!masked.contains("VMware"));
    assert!(!masked.contains("7.0.3"));
    assert_eq!(codec.restore(&masked, &map), text);
}

#[test]
fn test_verify_withIdenticalText_shouldSucceed() {
    let extractor = TermExtractor::new();
    assert!(extractor.verify(SAMPLE_ADVISORY, SAMPLE_ADVISORY));
}

#[test]
fn test_verify_withRemovedCve_shouldListMissingTerm() {
    let extractor = TermExtractor::new();
    let translated = ADVISORY_SENTENCE.replace("CVE-2025-41225", "この脆弱性");

    assert!(!extractor.verify(ADVISORY_SENTENCE, &translated));
    let stats = extractor.preservation_statistics(ADVISORY_SENTENCE, &translated);
    assert!(stats.missing_term_list.contains(&"CVE-2025-41225".to_string()));
    assert!(stats.preservation_rate < 1.0);
}

#[test]
fn test_verify_withRepeatedTerms_shouldUseSetContainment() {
    let extractor = TermExtractor::new();
    let original = "CVE-2025-41225 and again CVE-2025-41225.";
    let translated = "CVE-2025-41225 は一度だけ記載されます。";

    assert!(extractor.verify(original, translated));
}

#[test]
fn test_verify_withTermsJoinedToJapanese_shouldSucceed() {
    let extractor = TermExtractor::new();

    assert!(extractor.verify(
        "CVE-2025-41225 affects VMware products.",
        "CVE-2025-41225は VMware製品に影響します。"
    ));
    assert!(extractor.verify(
        "See https://www.vmware.com/security/advisories for VMware ESXi 7.0.3.",
        "VMware ESXi 7.0.3についてはhttps://www.vmware.com/security/advisoriesを参照してください。"
    ));
}

#[test]
fn test_isTranslatable_shouldSkipTechnicalOnlyBlocks() {
    let extractor = TermExtractor::new();

    assert!(extractor.is_translatable(ADVISORY_SENTENCE));
    assert!(!extractor.is_translatable("7.0.3"));
    assert!(!extractor.is_translatable("https://www.vmware.com/security"));
    assert!(!extractor.is_translatable("  "));
}
