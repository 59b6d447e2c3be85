//! End-to-end resolution scenarios.

use installator::cli::BootstrapArgs;
use installator::config::{
    resolve, ConfigSource, EnvOverrides, PropertyKey, Resolution, SourceError, ValidationError,
};
use installator::lifecycle::{prepare, Startup};

mod common;

use common::Workspace;

fn resolved(resolution: Resolution) -> (ConfigSource, installator::ValidatedConfig) {
    match resolution {
        Resolution::Resolved { source, config } => (source, config),
        other => panic!("expected a resolved configuration, got {other:?}"),
    }
}

#[test]
fn test_nothing_available_is_not_found() {
    let ws = Workspace::new();
    let outcome = resolve(&BootstrapArgs::default(), &EnvOverrides::default(), ws.path()).unwrap();

    let Resolution::NotFound { rejections } = outcome else {
        panic!("expected NotFound");
    };
    assert_eq!(rejections.len(), 2);
    assert!(matches!(
        rejections[0].1,
        SourceError::Invalid(ValidationError::MissingProperty(PropertyKey::Port))
    ));
    assert!(matches!(rejections[1].1, SourceError::Unavailable { .. }));
}

#[test]
fn test_not_found_exits_with_failure() {
    let ws = Workspace::new();
    let startup = prepare(&BootstrapArgs::default(), &EnvOverrides::default(), ws.path());
    assert!(matches!(startup, Startup::Exit(1)));
}

#[test]
fn test_help_exits_successfully() {
    let ws = Workspace::new();
    ws.write_valid("installator.properties", 8000);
    let startup = prepare(&BootstrapArgs::help(), &ws.valid_env(8000), ws.path());
    assert!(matches!(startup, Startup::Exit(0)));
}

#[test]
fn test_help_with_file_exits_with_usage_error() {
    let ws = Workspace::new();
    let args = BootstrapArgs {
        help: true,
        config_file: Some("installator.properties".into()),
    };
    let startup = prepare(&args, &EnvOverrides::default(), ws.path());
    assert!(matches!(startup, Startup::Exit(2)));
}

#[test]
fn test_overrides_resolve_without_default_file() {
    let ws = Workspace::new();
    let (source, config) =
        resolved(resolve(&BootstrapArgs::default(), &ws.valid_env(8000), ws.path()).unwrap());

    assert_eq!(source, ConfigSource::Overrides);
    assert_eq!(config.port(), 8000);
    assert_eq!(config.property_file_location(), &ws.app_properties());
    assert_eq!(config.conf_service_url().as_str(), "http://localhost:9999/");
}

#[test]
fn test_overrides_win_over_valid_explicit_file() {
    let ws = Workspace::new();
    let file = ws.write_valid("explicit.properties", 9100);
    let (source, config) =
        resolved(resolve(&BootstrapArgs::with_file(file), &ws.valid_env(8000), ws.path()).unwrap());

    assert_eq!(source, ConfigSource::Overrides);
    assert_eq!(config.port(), 8000);
}

#[test]
fn test_explicit_file_after_incomplete_overrides() {
    let ws = Workspace::new();
    ws.write_valid("installator.properties", 9200);
    let file = ws.write_valid("explicit.properties", 9100);
    let partial: EnvOverrides = [("JETTY_PORT", "7000")].into_iter().collect();

    let (source, config) =
        resolved(resolve(&BootstrapArgs::with_file(&file), &partial, ws.path()).unwrap());

    assert_eq!(source, ConfigSource::ExplicitFile(file));
    assert_eq!(config.port(), 9100);
}

#[test]
fn test_relative_explicit_file_uses_working_dir() {
    let ws = Workspace::new();
    ws.write_valid("explicit.properties", 9100);
    let (source, _) = resolved(
        resolve(
            &BootstrapArgs::with_file("explicit.properties"),
            &EnvOverrides::default(),
            ws.path(),
        )
        .unwrap(),
    );
    assert_eq!(source, ConfigSource::ExplicitFile(ws.path().join("explicit.properties")));
}

#[test]
fn test_missing_explicit_file_falls_back_to_default() {
    let ws = Workspace::new();
    ws.write_valid("installator.properties", 9200);

    let outcome = resolve(
        &BootstrapArgs::with_file("does-not-exist.properties"),
        &EnvOverrides::default(),
        ws.path(),
    )
    .unwrap();
    let (source, config) = resolved(outcome);

    assert_eq!(source, ConfigSource::DefaultFile(ws.path().join("installator.properties")));
    assert_eq!(config.port(), 9200);
}

#[test]
fn test_invalid_explicit_file_falls_back_to_default() {
    let ws = Workspace::new();
    ws.write_valid("installator.properties", 9200);
    let bad = ws.write(
        "bad.properties",
        &format!(
            "jetty-port=abc\nproperty-file-location={}\nconf-service-url=http://localhost:9999\n",
            ws.app_properties().display()
        ),
    );

    let (_, config) =
        resolved(resolve(&BootstrapArgs::with_file(bad), &EnvOverrides::default(), ws.path()).unwrap());
    assert_eq!(config.port(), 9200);
}

#[test]
fn test_invalid_default_file_reports_reason() {
    let ws = Workspace::new();
    ws.write(
        "installator.properties",
        "jetty-port=8000\nproperty-file-location=missing.properties\nconf-service-url=http://localhost:9999\n",
    );

    let outcome = resolve(&BootstrapArgs::default(), &EnvOverrides::default(), ws.path()).unwrap();
    let Resolution::NotFound { rejections } = outcome else {
        panic!("expected NotFound");
    };
    let (source, reason) = rejections.last().unwrap();
    assert!(matches!(source, ConfigSource::DefaultFile(_)));
    assert!(reason.to_string().contains("missing.properties"));
}

#[test]
fn test_unreadable_file_is_fatal() {
    let ws = Workspace::new();
    ws.write_valid("installator.properties", 9200);
    std::fs::create_dir(ws.path().join("conf.d")).unwrap();

    let err = resolve(&BootstrapArgs::with_file("conf.d"), &EnvOverrides::default(), ws.path())
        .unwrap_err();
    assert!(!err.is_usage());
}

#[test]
fn test_malformed_escape_is_fatal() {
    let ws = Workspace::new();
    ws.write("installator.properties", "jetty-port=\\uZZZZ\n");

    let err = resolve(&BootstrapArgs::default(), &EnvOverrides::default(), ws.path()).unwrap_err();
    assert!(err.to_string().contains("line 1"));
}

#[test]
fn test_no_caching_between_attempts() {
    let ws = Workspace::new();
    let late = ws.path().join("late.properties");
    ws.write(
        "installator.properties",
        &format!(
            "jetty-port=8000\nproperty-file-location={}\nconf-service-url=http://localhost:9999\n",
            late.display()
        ),
    );
    let env = EnvOverrides::default();

    let first = resolve(&BootstrapArgs::default(), &env, ws.path()).unwrap();
    assert!(matches!(first, Resolution::NotFound { .. }));

    std::fs::write(&late, "").unwrap();
    let second = resolve(&BootstrapArgs::default(), &env, ws.path()).unwrap();
    assert!(second.config().is_some());
}

#[test]
fn test_permissive_port_values() {
    let ws = Workspace::new();
    for port in ["0", "-1"] {
        let env: EnvOverrides = [
            ("JETTY_PORT", port.to_string()),
            ("PROPERTY_FILE_LOCATION", ws.app_properties().display().to_string()),
            ("CONF_SERVICE_URL", "http://localhost:9999".to_string()),
        ]
        .into_iter()
        .collect();
        let outcome = resolve(&BootstrapArgs::default(), &env, ws.path()).unwrap();
        assert_eq!(outcome.config().map(|c| c.port()), port.parse::<i32>().ok());
    }
}

#[test]
fn test_complete_but_invalid_overrides_fall_through() {
    let ws = Workspace::new();
    let env: EnvOverrides = [
        ("JETTY_PORT", "abc".to_string()),
        ("PROPERTY_FILE_LOCATION", ws.app_properties().display().to_string()),
        ("CONF_SERVICE_URL", common::CONF_SERVICE_URL.to_string()),
    ]
    .into_iter()
    .collect();

    let Resolution::NotFound { rejections } =
        resolve(&BootstrapArgs::default(), &env, ws.path()).unwrap()
    else {
        panic!("expected NotFound");
    };
    assert_eq!(rejections[0].0, ConfigSource::Overrides);
    assert!(matches!(
        &rejections[0].1,
        SourceError::Invalid(ValidationError::InvalidPort(value)) if value == "abc"
    ));

    let file = ws.write_valid("explicit.properties", 9100);
    let (source, config) =
        resolved(resolve(&BootstrapArgs::with_file(&file), &env, ws.path()).unwrap());
    assert_eq!(source, ConfigSource::ExplicitFile(file));
    assert_eq!(config.port(), 9100);
}

#[test]
fn test_scheme_less_service_url_rejected() {
    let ws = Workspace::new();
    for url in ["localhost:9999", "conf-service:8080/api", "abc:xyz"] {
        let env: EnvOverrides = [
            ("JETTY_PORT", "8000".to_string()),
            ("PROPERTY_FILE_LOCATION", ws.app_properties().display().to_string()),
            ("CONF_SERVICE_URL", url.to_string()),
        ]
        .into_iter()
        .collect();

        let outcome = resolve(&BootstrapArgs::default(), &env, ws.path()).unwrap();
        let Resolution::NotFound { rejections } = outcome else {
            panic!("{url} should not resolve");
        };
        assert!(matches!(
            rejections[0].1,
            SourceError::Invalid(ValidationError::InvalidUrl { .. })
        ));
    }
}
