//! Loading the bot configuration from INI files

mod common;

use common::TestLogging;
use turbo::config::write_template;
use turbo::prelude::*;

#[test]
fn token_only_file_resolves_every_default() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[Auth]\nToken = abc123\n");

    let config = Config::load(&path, logging.logger()).unwrap();

    assert_eq!(config.token(), "abc123");
    assert_eq!(config.password, None);
    assert!(!config.selfbot);
    assert!(config.allow_pms);
    assert_eq!(config.prefix, "!");
    assert!(config.delete);
    assert_eq!(config.db_host, "localhost");
    assert_eq!(config.db_port, 28015);
    assert_eq!(config.db_user, "admin");
    assert_eq!(config.db_password, "");
    assert_eq!(config.db_name, "turbo");
    assert!(!config.no_database);
    assert!(config.read_aliases);
    assert!(config.selfbot_message_edit);
    assert_eq!(config.db_table_tags, "tags");
    assert!(config.discrim_revert);
    assert!(config.backup_tags);
}

#[test]
fn every_option_is_read() {
    let logging = TestLogging::new();
    let path = logging.write_file(
        "config.ini",
        r#"
[Auth]
Token = tok
Password = secret

[General]
Selfbot = yes
AllowPms = off
Prefix = ?
Delete = false

[Database]
Host = db.example.org
Port = 12345
User = bot
Password = pw
Name = turbo_test

[Advanced]
NoDatabase = true
ReadAliases = no
SelfbotMessageEdit = 0
DbTable_Tags = custom_tags
DiscrimRevert = False
BackupTags = OFF
"#,
    );

    let config = Config::load(&path, logging.logger()).unwrap();

    assert_eq!(config.password.as_deref(), Some("secret"));
    assert!(config.selfbot);
    assert!(!config.allow_pms);
    assert_eq!(config.prefix, "?");
    assert!(!config.delete);
    assert_eq!(config.db_host, "db.example.org");
    assert_eq!(config.db_port, 12345);
    assert_eq!(config.db_user, "bot");
    assert_eq!(config.db_password, "pw");
    assert_eq!(config.db_name, "turbo_test");
    assert!(config.no_database);
    assert!(!config.read_aliases);
    assert!(!config.selfbot_message_edit);
    assert_eq!(config.db_table_tags, "custom_tags");
    assert!(!config.discrim_revert);
    assert!(!config.backup_tags);
}

#[test]
fn successful_load_is_logged_on_debug() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[Auth]\nToken = abc\n");

    Config::load(&path, logging.logger()).unwrap();

    let contents = logging.file_contents();
    assert!(contents
        .lines()
        .any(|line| line.contains("] DEBUG (") && line.contains("Loaded configuration")));
    assert!(logging.critical_lines().is_empty());
}

#[test]
fn missing_file_is_fatal() {
    let logging = TestLogging::new();
    let path = logging.dir.path().join("absent.ini");

    let err = Config::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(ref p) if p == &path));
    let critical = logging.critical_lines();
    assert_eq!(critical.len(), 1);
    assert!(critical[0].contains("does not exist"));
}

#[test]
fn directory_is_not_a_config_file() {
    let logging = TestLogging::new();

    let err = Config::load(logging.dir.path(), logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn malformed_file_is_fatal() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[Auth\nToken = abc\n");

    let err = Config::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::Parse(_)));
    assert_eq!(logging.critical_lines().len(), 1);
}

#[test]
fn invalid_utf8_is_fatal() {
    let logging = TestLogging::new();
    let path = logging.dir.path().join("config.ini");
    std::fs::write(&path, b"[Auth]\nToken = \xff\xfe\n").unwrap();

    let err = Config::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn absent_token_is_fatal_even_when_the_file_parses() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[General]\nPrefix = $\n");

    let err = Config::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::MissingToken));
    let critical = logging.critical_lines();
    assert_eq!(critical.len(), 1);
    assert!(critical[0].contains("You must provide a token in the config"));
}

#[test]
fn empty_token_is_fatal() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[Auth]\nToken =\n");

    let err = Config::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::MissingToken));
}

#[test]
fn non_numeric_port_is_a_type_error() {
    let logging = TestLogging::new();
    let path = logging.write_file("config.ini", "[Auth]\nToken = abc\n[Database]\nPort = abc\n");

    let err = Config::load(&path, logging.logger()).unwrap_err();

    match err {
        ConfigError::InvalidValue {
            section,
            key,
            value,
            expected,
        } => {
            assert_eq!(section, "Database");
            assert_eq!(key, "Port");
            assert_eq!(value, "abc");
            assert_eq!(expected, "integer");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn non_boolean_flag_is_a_type_error() {
    let err = "[Auth]\nToken = abc\n[General]\nSelfbot = sometimes\n"
        .parse::<Config>()
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidValue { expected: "boolean", .. }));
}

#[test]
fn default_section_supplies_fallbacks() {
    let config: Config = "[DEFAULT]\nPassword = shared\n\n[Auth]\nToken = abc\n\n[Database]\nHost = h\n"
        .parse()
        .unwrap();

    assert_eq!(config.password.as_deref(), Some("shared"));
    assert_eq!(config.db_password, "shared");
    assert_eq!(config.db_host, "h");
}

#[test]
fn continuation_lines_do_not_swallow_the_next_option() {
    let config: Config = "[Auth]\nToken = abc\n  def\nPassword = p\n"
        .parse()
        .unwrap();

    assert_eq!(config.token(), "abc\ndef");
    assert_eq!(config.password.as_deref(), Some("p"));
}

#[test]
fn settings_from_a_tokenless_source_are_rejected() {
    let source: ConfigSource = "[General]\nPrefix = ?\n".parse().unwrap();

    assert!(matches!(
        Config::from_source(&source),
        Err(ConfigError::MissingToken)
    ));
}

#[test]
fn option_names_are_case_insensitive() {
    let config: Config = "[Auth]\ntoken = abc\n[Database]\nPORT = 1\n".parse().unwrap();

    assert_eq!(config.token(), "abc");
    assert_eq!(config.db_port, 1);
}

#[test]
fn reduced_format_only_needs_the_token() {
    let logging = TestLogging::new();
    let path = logging.write_file("auth.ini", "[Auth]\nToken = xyz\n");

    let config = TokenConfig::load(&path, logging.logger()).unwrap();

    assert_eq!(config.token(), "xyz");
}

#[test]
fn reduced_format_rejects_a_missing_token() {
    let logging = TestLogging::new();
    let path = logging.write_file("auth.ini", "[Auth]\n");

    let err = TokenConfig::load(&path, logging.logger()).unwrap_err();

    assert!(matches!(err, ConfigError::MissingToken));
    assert_eq!(logging.critical_lines().len(), 1);
}

#[test]
fn template_is_written_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("config.ini");

    write_template(&path).unwrap();
    assert!(write_template(&path).is_err());

    let contents = std::fs::read_to_string(&path).unwrap();
    let filled = contents.replacen("Token =", "Token = filled-in", 1);
    let config: Config = filled.parse().unwrap();
    assert_eq!(config.token(), "filled-in");
    assert_eq!(config.db_name, "turbo");
}
