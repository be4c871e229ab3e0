/*!
 * Integration tests for whole-document translation through the controller
 */

use std::sync::Arc;

use cve_translator::app_config::Config;
use cve_translator::app_controller::{Controller, RunOptions};
use cve_translator::errors::ErrorCategory;
use cve_translator::providers::mock::{MockEmbedder, MockTranslator};

use crate::common::{SAMPLE_ADVISORY, create_temp_dir, create_test_file, init_logger};

fn controller(translator: MockTranslator) -> Controller {
    Controller::with_providers(
        Config::default(),
        Arc::new(translator),
        Some(Arc::new(MockEmbedder::new())),
    )
}

#[tokio::test]
async fn test_run_withSampleAdvisory_shouldWriteOutputAndReport() {
    init_logger();
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "advisory.txt", SAMPLE_ADVISORY).unwrap();
    let report_path = dir.path().join("report.json");

    let report = controller(MockTranslator::working())
        .run(
            &input,
            RunOptions {
                output: None,
                report: Some(report_path.clone()),
                preserve_terms: true,
                show_progress: false,
            },
        )
        .await
        .unwrap();

    let expected_output = dir.path().join("advisory.ja.txt");
    assert_eq!(report.output, expected_output);
    let output = std::fs::read_to_string(&expected_output).unwrap();
    assert!(output.starts_with("[ja] VMSA-2025-0010: VMware ESXi"));
    assert!(output.contains("\n\n[ja] CVE-2025-41225 is an authenticated"));
    assert!(output.contains("https://support.broadcom.com/web/ecx/support-content-notification/-/external/content/SecurityAdvisories/0/25717"));
    // The bare version paragraph is copied untouched
    assert!(output.ends_with("\n\n7.0.3\n"));

    assert_eq!(report.stats.total_blocks, 4);
    assert_eq!(report.stats.translatable_blocks, 3);
    assert_eq!(report.stats.successful_blocks, 3);
    assert!(report.results.iter().all(|r| r.terms_preserved));

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(json["target_language"], "ja");
    assert_eq!(json["stats"]["translatable_blocks"], 3);
    assert_eq!(json["statistics"]["successful_translations"], 3);
    assert_eq!(json["results"].as_array().unwrap().len(), 3);
    assert_eq!(json["results"][0]["success"], true);
    assert_eq!(json["results"][0]["validation"]["status"], "validated");
}

#[tokio::test]
async fn test_run_withFailingTranslator_shouldKeepOriginalDocument() {
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "advisory.txt", SAMPLE_ADVISORY).unwrap();
    let output_path = dir.path().join("out.txt");

    let report = controller(MockTranslator::failing(ErrorCategory::Authentication))
        .run(
            &input,
            RunOptions {
                output: Some(output_path.clone()),
                report: None,
                preserve_terms: true,
                show_progress: false,
            },
        )
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&output_path).unwrap(), SAMPLE_ADVISORY);
    assert_eq!(report.stats.failed_blocks, 3);
    assert!(report
        .results
        .iter()
        .all(|r| r.error_type == Some(ErrorCategory::Authentication)));
}

#[tokio::test]
async fn test_run_withoutPreservation_shouldSendTermsUnmasked() {
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "advisory.txt", SAMPLE_ADVISORY).unwrap();
    let mock = MockTranslator::identity();

    controller(mock.clone())
        .run(&input, RunOptions::default())
        .await
        .unwrap();

    let sent = mock.received_texts();
    assert_eq!(sent.len(), 3);
    assert!(sent.iter().any(|text| text.contains("CVE-2025-41225")));
    assert!(sent.iter().all(|text| !text.contains("[KEEP:")));
}

#[tokio::test]
async fn test_run_withUnsupportedExtension_shouldFail() {
    let dir = create_temp_dir().unwrap();
    let input = create_test_file(dir.path(), "advisory.docx", SAMPLE_ADVISORY).unwrap();

    let result = controller(MockTranslator::working()).run(&input, RunOptions::default()).await;
    assert!(result.is_err());
}
