use super::loading::apply_defaults;
use super::validation::validate_config;
use super::*;
use crate::location::CachePolicy;
use serial_test::serial;
use std::fs;
use tempfile::tempdir;

fn create_test_config(latitude: Option<f64>, longitude: Option<f64>) -> Config {
    Config {
        latitude,
        longitude,
        ..Config::default()
    }
}

#[test]
fn test_empty_config_is_valid() {
    assert!(validate_config(&Config::default()).is_ok());
}

#[test]
fn test_config_validation_coordinates() {
    assert!(validate_config(&create_test_config(Some(40.7128), Some(-74.0060))).is_ok());
    assert!(validate_config(&create_test_config(Some(90.0), Some(180.0))).is_ok());
    assert!(validate_config(&create_test_config(Some(-90.0), Some(-180.0))).is_ok());

    assert!(validate_config(&create_test_config(Some(91.0), Some(0.0))).is_err());
    assert!(validate_config(&create_test_config(Some(0.0), Some(-181.0))).is_err());
}

#[test]
fn test_config_validation_half_location() {
    let err = validate_config(&create_test_config(Some(51.5), None)).unwrap_err();
    assert!(err.to_string().contains("longitude is missing"));
    let err = validate_config(&create_test_config(None, Some(-0.12))).unwrap_err();
    assert!(err.to_string().contains("latitude is missing"));
}

#[test]
fn test_config_validation_default_location() {
    let config = Config {
        default_latitude: Some(-95.0),
        ..Config::default()
    };
    let err = validate_config(&config).unwrap_err();
    assert!(err.to_string().contains("default_latitude"));
}

#[test]
fn test_config_validation_cache_minutes() {
    for minutes in [-1, 0, 1, 60, 10_080] {
        let config = Config {
            cache_minutes: Some(minutes),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok(), "{minutes} should be valid");
    }

    let config = Config {
        cache_minutes: Some(-2),
        ..Config::default()
    };
    assert!(validate_config(&config).is_err());
}

#[test]
fn test_config_validation_ranges() {
    for (timeout, valid) in [(0, false), (1, true), (60, true), (61, false)] {
        let config = Config {
            location_timeout: Some(timeout),
            ..Config::default()
        };
        assert_eq!(validate_config(&config).is_ok(), valid, "timeout {timeout}");
    }

    for (step, valid) in [(0, false), (1, true), (3600, true), (3601, false)] {
        let config = Config {
            transition_step: Some(step),
            ..Config::default()
        };
        assert_eq!(validate_config(&config).is_ok(), valid, "step {step}");
    }
}

#[test]
fn test_config_validation_frame_template() {
    let with = |template: &str| Config {
        frame_template: Some(template.to_string()),
        ..Config::default()
    };
    assert!(validate_config(&with("{index}.jpg")).is_ok());
    assert!(validate_config(&with("frames/desert_{index}.heic.png")).is_ok());
    assert!(validate_config(&with("frame.jpg")).is_err());
    assert!(validate_config(&with("/abs/{index}.jpg")).is_err());
}

#[test]
fn test_apply_defaults() {
    let mut config = create_test_config(None, None);
    apply_defaults(&mut config);

    assert_eq!(config.cache_minutes, Some(DEFAULT_CACHE_MINUTES));
    assert_eq!(config.destination.as_deref(), Some(DEFAULT_DESTINATION));
    assert_eq!(config.location_timeout, Some(DEFAULT_LOCATION_TIMEOUT));
    assert_eq!(config.transition_step, Some(DEFAULT_TRANSITION_STEP));
    assert_eq!(config.frame_template.as_deref(), Some(DEFAULT_FRAME_TEMPLATE));
    assert_eq!(config.default_latitude, Some(DEFAULT_LATITUDE));
    // Location stays unset so lookup and cache still run
    assert_eq!(config.latitude, None);
    assert_eq!(config.location_command, None);
}

#[test]
fn test_accessors() {
    let config = Config {
        cache_minutes: Some(-1),
        location_command: Some("  echo 1 2 ".to_string()),
        location_timeout: Some(3),
        transition_step: Some(300),
        ..Config::default()
    };

    assert_eq!(config.cache_policy().unwrap(), CachePolicy::Always);
    assert_eq!(
        config.location_provider(),
        Some(CommandProvider::new(
            "echo 1 2",
            std::time::Duration::from_secs(3)
        ))
    );
    assert_eq!(config.transition_step().as_secs(), 300);
    assert_eq!(config.frame_template(), "{index}.jpg");
    assert_eq!(config.destination_path(), PathBuf::from("/tmp/img.jpg"));
    assert_eq!(config.fixed_location(), None);
    assert_eq!(config.fallback_location().latitude, DEFAULT_LATITUDE);
}

#[test]
fn test_blank_location_command_is_no_provider() {
    let config = Config {
        location_command: Some("   ".to_string()),
        ..Config::default()
    };
    assert_eq!(config.location_provider(), None);
}

#[test]
fn test_config_toml_parsing() {
    let content = r#"
latitude = 48.8566
longitude = 2.3522
cache_minutes = 0
destination = "~/Pictures/current.jpg"
location_command = "gpspipe -w -n 5 | my-parser"
location_timeout = 10
transition_step = 120
frame_template = "frame_{index}.png"
"#;

    let config: Config = toml::from_str(content).unwrap();
    assert!(validate_config(&config).is_ok());
    assert_eq!(config.fixed_location().unwrap().longitude, 2.3522);
    assert_eq!(config.cache_policy().unwrap(), CachePolicy::Never);
    assert_eq!(config.transition_step, Some(120));
    assert_eq!(config.frame_template(), "frame_{index}.png");
}

#[test]
fn test_config_malformed_toml() {
    let malformed_content = r#"
cache_minutes = "sixty"
"#;

    let result: Result<Config, _> = toml::from_str(malformed_content);
    assert!(result.is_err());
}

#[test]
fn test_load_from_path_applies_defaults() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    fs::write(&config_path, "transition_step = 30\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.transition_step, Some(30));
    assert_eq!(config.cache_minutes, Some(DEFAULT_CACHE_MINUTES));
}

#[test]
fn test_load_from_path_missing_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
fn test_load_from_path_rejects_invalid_values() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    fs::write(&config_path, "location_timeout = 600\n").unwrap();

    let err = Config::load_from_path(&config_path).unwrap_err();
    assert!(format!("{err:#}").contains("location_timeout"));
}

#[test]
fn test_geo_toml_loading() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    let geo_path = temp_dir.path().join("geo.toml");

    fs::write(&config_path, "cache_minutes = 15\n").unwrap();
    fs::write(
        &geo_path,
        r#"
# Geographic coordinates
latitude = 51.5074
longitude = -0.1278
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.latitude, Some(51.5074));
    assert_eq!(config.longitude, Some(-0.1278));
}

#[test]
fn test_geo_toml_overrides_main_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    let geo_path = temp_dir.path().join("geo.toml");

    fs::write(&config_path, "latitude = 40.7128\nlongitude = -74.0060\n").unwrap();
    fs::write(&geo_path, "latitude = 51.5074\nlongitude = -0.1278\n").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.latitude, Some(51.5074));
    assert_eq!(config.longitude, Some(-0.1278));
}

#[test]
fn test_malformed_geo_toml_fallback() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    let geo_path = temp_dir.path().join("geo.toml");

    fs::write(&config_path, "latitude = 40.7128\nlongitude = -74.0060\n").unwrap();
    fs::write(&geo_path, "latitude = \"somewhere\"").unwrap();

    let config = Config::load_from_path(&config_path).unwrap();
    assert_eq!(config.latitude, Some(40.7128));
    assert_eq!(config.longitude, Some(-74.0060));
}

#[test]
fn test_out_of_range_geo_toml_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("solarwall.toml");
    fs::write(&config_path, "").unwrap();
    fs::write(temp_dir.path().join("geo.toml"), "latitude = 100.0\nlongitude = 0.0\n").unwrap();

    assert!(Config::load_from_path(&config_path).is_err());
}

#[test]
#[serial]
fn test_load_without_config_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();

    let original = std::env::var("XDG_CONFIG_HOME").ok();
    unsafe {
        std::env::set_var("XDG_CONFIG_HOME", temp_dir.path());
    }

    let result = load();

    unsafe {
        match original {
            Some(value) => std::env::set_var("XDG_CONFIG_HOME", value),
            None => std::env::remove_var("XDG_CONFIG_HOME"),
        }
    }

    let config = result.unwrap();
    assert_eq!(config.frame_template.as_deref(), Some(DEFAULT_FRAME_TEMPLATE));
    assert!(
        !temp_dir.path().join("solarwall").join("solarwall.toml").exists(),
        "Loading must not create a config file"
    );
}
