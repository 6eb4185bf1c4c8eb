use crate::cli::Cli;
use crate::error::CommotionError;

use launch_core::config::AppConfig;

use common::{ApplicationKey, Message, RunLevel};

use std::path::PathBuf;

use clap::Parser;

/// **VALUE**: Short flags parse the way the launcher has always accepted them.
#[test]
fn given_short_flags_when_parsed_then_all_fields_set() {
    // GIVEN/WHEN: Every short flag
    let cli = Cli::try_parse_from([
        "commotion", "-v", "4", "-l", "/tmp/c.log", "-d", "-m", "restart", "-k", "meshKey",
    ])
    .expect("flags should parse");

    // THEN: Each lands in its field
    assert_eq!(cli.verbose, Some(4));
    assert_eq!(cli.logfile, Some(PathBuf::from("/tmp/c.log")));
    assert!(cli.daemon);
    assert_eq!(cli.message.as_deref(), Some("restart"));
    assert_eq!(cli.key.as_deref(), Some("meshKey"));
}

#[test]
fn given_verbosity_out_of_range_when_parsed_then_rejected() {
    assert!(Cli::try_parse_from(["commotion", "--verbose", "0"]).is_err());
    assert!(Cli::try_parse_from(["commotion", "--verbose", "6"]).is_err());
}

#[test]
fn given_no_flags_when_into_settings_then_config_values_kept() {
    // GIVEN: A daemon config and no flags
    let config = AppConfig {
        key: "fromConfig".to_string(),
        daemon: true,
        ..AppConfig::default()
    };

    // WHEN: Building settings
    let settings = Cli::default().into_settings(config).expect("valid settings");

    // THEN: Config values, default message
    assert_eq!(settings.key, ApplicationKey::new("fromConfig").expect("key"));
    assert_eq!(settings.run_level, RunLevel::Daemon);
    assert!(settings.message.is_none());
}

/// **VALUE**: Flags win over the config file.
#[test]
fn given_flags_when_into_settings_then_flags_override_config() {
    // GIVEN: A config and flags that disagree with it
    let config = AppConfig {
        key: "fromConfig".to_string(),
        verbosity: 2,
        ..AppConfig::default()
    };
    let cli = Cli::try_parse_from([
        "commotion", "--key", "fromFlag", "--verbose", "5", "--daemon", "--message", "showMain",
    ])
    .expect("flags should parse");

    // WHEN: Building settings
    let settings = cli.into_settings(config).expect("valid settings");

    // THEN: Flag values used
    assert_eq!(settings.key, ApplicationKey::new("fromFlag").expect("key"));
    assert_eq!(settings.verbosity, 5);
    assert_eq!(settings.run_level, RunLevel::Daemon);
    assert_eq!(settings.message, Some(Message::show_main()));
}

/// **BUG THIS CATCHES**: A blank `--key` silently sharing a lock named ".lock"
/// with every other blank launch.
#[test]
fn given_blank_key_flag_when_into_settings_then_config_error() {
    let cli = Cli::try_parse_from(["commotion", "--key", "  "]).expect("flags should parse");

    let result = cli.into_settings(AppConfig::default());

    assert!(matches!(result, Err(CommotionError::Config { .. })));
}
