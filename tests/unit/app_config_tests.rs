/*!
 * Tests for application configuration functionality
 */

use edml::app_config::{Config, LogLevel, OutputConfig, ParserConfig, SortOrder};
use edml::timecode::SampleRate;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert!(!config.parser.strict);
    assert!(!config.parser.stop_on_error);
    assert_eq!(config.output.sort, SortOrder::None);
    assert_eq!(config.output.resample_to, None);
    assert_eq!(config.output.output_suffix, "normalized");
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();

    // Unknown sample rate name
    config.output.resample_to = Some("S12345".to_string());
    assert!(config.validate().is_err());
    config.output.resample_to = Some("s96000".to_string());
    assert!(config.validate().is_ok());

    // Empty suffix
    config.output.output_suffix = "  ".to_string();
    assert!(config.validate().is_err());

    // Suffix with a path separator
    config.output.output_suffix = "out/put".to_string();
    assert!(config.validate().is_err());
    config.output.output_suffix = "fixed".to_string();
    assert!(config.validate().is_ok());
}

/// Test the resolved target sample rate
#[test]
fn test_target_sample_rate_withRateName_shouldResolve() {
    let mut config = Config::default();
    assert_eq!(config.target_sample_rate().unwrap(), None);

    config.output.resample_to = Some("S88200".to_string());
    assert_eq!(config.target_sample_rate().unwrap(), Some(SampleRate::S88200));
}

/// Test that a partial JSON file fills in defaults
#[test]
fn test_deserialize_withPartialJson_shouldUseDefaults() {
    let json = r#"{ "parser": { "strict": true }, "output": { "sort": "channel" }, "log_level": "debug" }"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert!(config.parser.strict);
    assert!(!config.parser.stop_on_error);
    assert_eq!(config.output.sort, SortOrder::Channel);
    assert_eq!(config.output.output_suffix, "normalized");
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Test that an empty JSON object is the default config
#[test]
fn test_deserialize_withEmptyObject_shouldEqualDefault() {
    let config: Config = serde_json::from_str("{}").unwrap();
    assert_eq!(config, Config::default());
}

/// Test writing and reading back a config
#[test]
fn test_serialize_withCustomValues_shouldRoundTrip() {
    let config = Config {
        parser: ParserConfig { strict: false, stop_on_error: true },
        output: OutputConfig {
            sort: SortOrder::Time,
            resample_to: Some("S44100".to_string()),
            output_suffix: "fixed".to_string(),
        },
        log_level: LogLevel::Warn,
    };

    let json = serde_json::to_string_pretty(&config).unwrap();
    assert!(json.contains("\"sort\": \"time\""));
    assert!(json.contains("\"log_level\": \"warn\""));

    let read: Config = serde_json::from_str(&json).unwrap();
    assert_eq!(read, config);
}

/// Test sort order names
#[test]
fn test_sort_order_fromStr_withNames_shouldParse() {
    assert_eq!("Channel".parse::<SortOrder>().unwrap(), SortOrder::Channel);
    assert_eq!("time".parse::<SortOrder>().unwrap(), SortOrder::Time);
    assert_eq!(SortOrder::None.to_string(), "none");
    assert!("random".parse::<SortOrder>().is_err());
}

/// Test the strict parser preset
#[test]
fn test_parser_config_strict_shouldOnlySetStrict() {
    let config = ParserConfig::strict();
    assert!(config.strict);
    assert!(!config.stop_on_error);
}
