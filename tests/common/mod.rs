//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use installator::config::EnvOverrides;
use tempfile::TempDir;

pub const CONF_SERVICE_URL: &str = "http://localhost:9999";

/// A throwaway working directory with an existing application property file.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("app.properties"), "greeting=hello\n").unwrap();
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Absolute path of the existing application property file.
    pub fn app_properties(&self) -> PathBuf {
        self.path().join("app.properties")
    }

    /// Write a bootstrap file and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a complete, valid bootstrap file.
    pub fn write_valid(&self, name: &str, port: u16) -> PathBuf {
        let contents = format!(
            "# bootstrap\njetty-port={port}\nproperty-file-location={}\nconf-service-url={CONF_SERVICE_URL}\n",
            self.app_properties().display()
        );
        self.write(name, &contents)
    }

    /// Environment overrides carrying a complete, valid configuration.
    pub fn valid_env(&self, port: u16) -> EnvOverrides {
        [
            ("JETTY_PORT".to_string(), port.to_string()),
            (
                "PROPERTY_FILE_LOCATION".to_string(),
                self.app_properties().display().to_string(),
            ),
            ("CONF_SERVICE_URL".to_string(), CONF_SERVICE_URL.to_string()),
        ]
        .into_iter()
        .collect()
    }
}
