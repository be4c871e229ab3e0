/*!
 * Recognizer rules for protected technical terms.
 *
 * Rules are evaluated in a fixed priority order: advisory identifiers first,
 * then scores and versions, then named entities, then generic technical
 * shapes. Each rule scans the whole text independently.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Category of a protected term
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermCategory {
    CveId,
    CvssScore,
    Version,
    Company,
    Product,
    Url,
    Email,
    FilePath,
    Ip,
    Mac,
    Hash,
    Port,
    Extension,
    RegistryKey,
}

impl TermCategory {
    /// All categories in extraction priority order
    pub const ALL: [TermCategory; 14] = [
        TermCategory::CveId,
        TermCategory::CvssScore,
        TermCategory::Version,
        TermCategory::Company,
        TermCategory::Product,
        TermCategory::Url,
        TermCategory::Email,
        TermCategory::FilePath,
        TermCategory::RegistryKey,
        TermCategory::Ip,
        TermCategory::Mac,
        TermCategory::Hash,
        TermCategory::Port,
        TermCategory::Extension,
    ];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::CveId => "CVE / advisory ID",
            Self::CvssScore => "CVSS score",
            Self::Version => "Version",
            Self::Company => "Company",
            Self::Product => "Product",
            Self::Url => "URL",
            Self::Email => "E-mail",
            Self::FilePath => "File path",
            Self::Ip => "IP address",
            Self::Mac => "MAC address",
            Self::Hash => "Hash",
            Self::Port => "Port",
            Self::Extension => "File extension",
            Self::RegistryKey => "Registry key",
        }
    }
}

impl std::fmt::Display for TermCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

const ASCII_WORD_BOUNDARY: &str = r"(?-u:\b)";

/// A single recognizer: a compiled pattern plus the capture group holding the term
#[derive(Debug)]
pub struct TermRule {
    /// Short rule name, used in logs and integrity reports
    pub name: &'static str,
    /// Category assigned to every match
    pub category: TermCategory,
    /// Compiled pattern
    pub regex: Regex,
    /// Capture group containing the term (0 = whole match)
    pub group: usize,
}

impl TermRule {
    fn new(name: &'static str, category: TermCategory, pattern: &str) -> Self {
        Self::with_group(name, category, pattern, 0)
    }

    /// `\b` is compiled as an ASCII word boundary: kana and kanji right
    /// next to a term must not hide it
    fn with_group(name: &'static str, category: TermCategory, pattern: &str, group: usize) -> Self {
        let pattern = pattern.replace(r"\b", ASCII_WORD_BOUNDARY);
        Self {
            name,
            category,
            regex: Regex::new(&pattern).expect("Invalid term rule regex"),
            group,
        }
    }
}

/// Vendors whose names are always protected
pub const COMPANY_NAMES: &[&str] = &[
    "VMware", "Microsoft", "Oracle", "Adobe", "Cisco", "Apple", "Google", "Amazon", "IBM",
    "Dell", "HP", "Intel", "AMD", "NVIDIA", "Broadcom",
];

/// Product names (multi-word names use a flexible whitespace separator)
pub const PRODUCT_NAMES: &[&str] = &[
    r"ESXi", r"vCenter\s+Server", r"vCenter", r"Workstation", r"Fusion", r"Windows", r"Office",
    r"Exchange", r"SharePoint", r"Chrome", r"Firefox", r"Safari", r"Cloud\s+Foundation",
    r"Telco\s+Cloud", r"Linux", r"macOS",
];

/// Product editions
pub const PRODUCT_EDITIONS: &[&str] = &[
    "Pro", "Standard", "Enterprise", "Professional", "Ultimate", "Home",
];

fn alternation(items: &[&str]) -> String {
    items.join("|")
}

/// The ordered rule table
pub static TERM_RULES: Lazy<Vec<TermRule>> = Lazy::new(|| {
    let companies = alternation(COMPANY_NAMES);
    let products = alternation(PRODUCT_NAMES);
    let editions = alternation(PRODUCT_EDITIONS);

    vec![
        // Advisory identifiers
        TermRule::new("cve_id", TermCategory::CveId, r"(?i)\bCVE-\d{4}-\d{4,7}\b"),
        TermRule::new("vmsa_id", TermCategory::CveId, r"(?i)\bVMSA-\d{4}-\d{4}(?:\.\d+)?\b"),
        // Scores
        TermRule::new(
            "cvss_vector",
            TermCategory::CvssScore,
            r"\bCVSS:\d\.\d(?:/[A-Za-z]{1,3}:[A-Za-z])+",
        ),
        TermRule::new("cvss_label", TermCategory::CvssScore, r"(?i)\bCVSSv?\d+(?:\.\d+)?\b"),
        TermRule::new(
            "score_range",
            TermCategory::CvssScore,
            r"\b\d+\.\d+\s?[-\u{2013}]\s?\d+\.\d+\b",
        ),
        // Versions
        TermRule::new(
            "version",
            TermCategory::Version,
            r"(?i)\b\d+\.\d+(?:\.\d+)*(?:\s*build\s*\d+)?\b",
        ),
        TermRule::new("build_number", TermCategory::Version, r"(?i)\bbuild\s+\d+\b"),
        // Named entities
        TermRule::new("company", TermCategory::Company, &format!(r"\b(?:{companies})\b")),
        TermRule::new(
            "product_release",
            TermCategory::Product,
            &format!(r"\b(?:(?:{companies})\s+)?(?:{products})(?:\s+\d+(?:\.\d+)+)\b"),
        ),
        TermRule::new("product", TermCategory::Product, &format!(r"\b(?:{products})\b")),
        TermRule::new("edition", TermCategory::Product, &format!(r"\b(?:{editions})\b")),
        // Generic technical shapes
        TermRule::new(
            "url",
            TermCategory::Url,
            r#"https?://[\x21-\x7E&&[^<>"]]*[\x21-\x7E&&[^<>".,;:!?)\]]]"#,
        ),
        TermRule::new(
            "email",
            TermCategory::Email,
            r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}",
        ),
        TermRule::new("windows_path", TermCategory::FilePath, r"\b[A-Za-z]:\\[\x21-\x7E]+"),
        TermRule::with_group(
            "posix_path",
            TermCategory::FilePath,
            r"(?:^|[\s(]|[^\x00-\x7F])(/(?:[A-Za-z0-9_.\-]+/)*[A-Za-z0-9_.\-]+/?)",
            1,
        ),
        TermRule::new("registry_key", TermCategory::RegistryKey, r"\bHKEY_[A-Z_]+\\[\x21-\x7E]+"),
        TermRule::new(
            "registry_hive",
            TermCategory::RegistryKey,
            r"\bHK(?:LM|CU|CR|CC|U)\\[\x21-\x7E]+",
        ),
        TermRule::new("ipv4", TermCategory::Ip, r"\b(?:\d{1,3}\.){3}\d{1,3}\b"),
        TermRule::new("mac", TermCategory::Mac, r"\b(?:[0-9A-Fa-f]{2}[:\-]){5}[0-9A-Fa-f]{2}\b"),
        TermRule::new(
            "uuid",
            TermCategory::Hash,
            r"\b[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}\b",
        ),
        TermRule::new("hash", TermCategory::Hash, r"\b[a-fA-F0-9]{32,64}\b"),
        TermRule::new("port", TermCategory::Port, r"(?i)\bports?\s+\d{1,5}\b"),
        TermRule::new("proto_port", TermCategory::Port, r"(?i)\b(?:tcp|udp)/\d{1,5}\b"),
        TermRule::new("extension", TermCategory::Extension, r"\.[A-Za-z][A-Za-z0-9]{1,4}\b"),
    ]
});

/// Well-formedness checks for a matched term, per category
pub(crate) fn is_well_formed(category: TermCategory, term: &str) -> bool {
    static CVE_EXACT: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)^(?:CVE-\d{4}-\d{4,7}|VMSA-\d{4}-\d{4}(?:\.\d+)?)$").expect("Invalid regex"));
    static CVSS_EXACT: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"(?i)^(?:CVSSv?\d+(?:\.\d+)?|CVSS:\d\.\d(?:/[A-Za-z]{1,3}:[A-Za-z])+|\d+\.\d+\s?[-\u{2013}]\s?\d+\.\d+)$")
            .expect("Invalid regex")
    });

    match category {
        TermCategory::CveId => CVE_EXACT.is_match(term),
        TermCategory::CvssScore => CVSS_EXACT.is_match(term),
        TermCategory::Url => term.starts_with("http://") || term.starts_with("https://"),
        TermCategory::Email => term
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && domain.contains('.'))
            .unwrap_or(false),
        _ => true,
    }
}
