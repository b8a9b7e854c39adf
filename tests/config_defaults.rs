use cukereport::config::Config;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    // Pretty report to stdout, lenient decoding
    assert!(config.general.output.is_none());
    assert!(!config.general.strict);
    assert!(config.report.pretty);
}
