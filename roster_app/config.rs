use dotenvy::dotenv;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Prefix for absolute image links, without trailing slash.
    pub base_url: String,
    pub upload_dir: PathBuf,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let host = match env::var("ROSTER_HOST") {
            Ok(val) => val,
            Err(_) => "0.0.0.0".to_string(),
        };

        let port = match env::var("ROSTER_PORT") {
            Ok(val) => val.parse::<u16>().unwrap_or(3000),
            Err(_) => 3000,
        };

        let base_url = match env::var("ROSTER_BASE_URL") {
            Ok(val) => val.trim_end_matches('/').to_string(),
            Err(_) => format!("http://localhost:{port}"),
        };

        let upload_dir = match env::var("ROSTER_UPLOAD_DIR") {
            Ok(val) => PathBuf::from(val),
            Err(_) => PathBuf::from("uploads"),
        };

        let environment = match env::var("ROSTER_ENV") {
            Ok(val) => Environment::from(val),
            Err(_) => Environment::Production,
        };

        Self {
            host,
            port,
            base_url,
            upload_dir,
            environment,
        }
    }

    /// Public URL of a stored image file.
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.base_url, filename)
    }
}
