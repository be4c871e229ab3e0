/*!
 * Common test utilities for the cve-translator test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use cve_translator::providers::mock::{MockEmbedder, MockTranslator};
use cve_translator::translation::{OrchestratorOptions, TranslationOrchestrator};
use cve_translator::validation::SemanticValidator;

/// The advisory sentence used across the pipeline tests
pub const ADVISORY_SENTENCE: &str =
    "CVE-2025-41225 affects VMware vCenter Server 8.0.3 with a CVSSv3 score of 8.8.";

/// A short multi-paragraph advisory
pub const SAMPLE_ADVISORY: &str = "VMSA-2025-0010: VMware ESXi, Workstation, and Fusion updates address multiple vulnerabilities

CVE-2025-41225 is an authenticated command-execution vulnerability in VMware vCenter Server 8.0.3. VMware has evaluated the severity of this issue to be in the Important severity range with a maximum CVSSv3 base score of 8.8.

A malicious actor with network access to 192.168.10.24 on port 443 may exploit this issue. See https://support.broadcom.com/web/ecx/support-content-notification/-/external/content/SecurityAdvisories/0/25717 for details.

7.0.3
";

/// Install env_logger once for tests that want log output
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Orchestrator over a mock translator, without validation
pub fn mock_orchestrator(translator: MockTranslator) -> TranslationOrchestrator {
    TranslationOrchestrator::new(Arc::new(translator), OrchestratorOptions::default())
}

/// Orchestrator over a mock translator with a mock-embedding validator
pub fn validating_orchestrator(translator: MockTranslator) -> TranslationOrchestrator {
    mock_orchestrator(translator).with_validator(SemanticValidator::new(Arc::new(MockEmbedder::new())))
}
