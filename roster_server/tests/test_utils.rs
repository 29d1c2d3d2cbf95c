#[cfg(test)]
pub mod tests {
    use async_trait::async_trait;
    use reqwest::{Client, multipart};
    use serde_json::{Value, json};
    use std::{path::PathBuf, sync::Arc};
    use tokio::net::TcpListener;

    use roster_app::{
        app_bus::AppBus,
        config::{Config, Environment},
        test_utils::tests::{MockImageStore, MockPlayerRepository, MockUnitOfWorkProvider},
        uow::{UnitOfWork, UnitOfWorkProvider},
    };
    use roster_types::{Result, errors::ApplicationError};
    use roster_web::{AppState, WebRouter};

    /// A running server on an ephemeral port, backed by in-memory storage.
    #[allow(dead_code)]
    pub struct TestApp {
        pub client: Client,
        pub base_url: String,
        pub players: Arc<MockPlayerRepository>,
        pub images: Arc<MockImageStore>,
    }

    #[allow(dead_code)]
    impl TestApp {
        pub fn url(&self, path: &str) -> String {
            format!("{}{}", self.base_url, path)
        }

        /// Creates a player through the API and returns its JSON.
        pub async fn create_player(&self, name: &str, team: &str, runs: i64) -> Value {
            let res = self
                .client
                .post(self.url("/api/players"))
                .json(&player_json(name, team, runs))
                .send()
                .await
                .unwrap();
            assert_eq!(res.status().as_u16(), 201, "player creation should succeed");
            res.json().await.unwrap()
        }
    }

    #[allow(dead_code)]
    pub fn test_config(environment: Environment) -> Arc<Config> {
        Arc::new(Config {
            host: "127.0.0.1".to_string(),
            port: 0,
            base_url: "http://localhost:3000".to_string(),
            upload_dir: PathBuf::from("uploads"),
            environment,
        })
    }

    async fn spawn(state: AppState) -> Result<String> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        tokio::spawn(WebRouter::serve_on(listener, state));
        Ok(format!("http://{addr}"))
    }

    #[allow(dead_code)]
    pub async fn setup_web_app() -> Result<TestApp> {
        let provider = Arc::new(MockUnitOfWorkProvider::new());
        let images = Arc::new(MockImageStore::new());
        let app_bus = Arc::new(AppBus::new(
            test_config(Environment::Production),
            provider.clone(),
        ));

        let base_url = spawn(AppState::new(app_bus, images.clone())).await?;

        Ok(TestApp {
            client: Client::new(),
            base_url,
            players: provider.players(),
            images,
        })
    }

    /// A provider whose database is never reachable.
    #[allow(dead_code)]
    pub struct UnavailableUnitOfWorkProvider {}

    #[async_trait]
    impl UnitOfWorkProvider for UnavailableUnitOfWorkProvider {
        async fn tx<'p>(&'p self) -> Result<Box<dyn UnitOfWork<'p> + 'p>, ApplicationError> {
            Err(ApplicationError::Infrastructure(
                "database unavailable".to_string(),
            ))
        }
    }

    /// Server whose every player operation fails with an internal error.
    #[allow(dead_code)]
    pub async fn setup_broken_web_app(environment: Environment) -> Result<(Client, String)> {
        let app_bus = Arc::new(AppBus::new(
            test_config(environment),
            Arc::new(UnavailableUnitOfWorkProvider {}),
        ));
        let base_url = spawn(AppState::new(app_bus, Arc::new(MockImageStore::new()))).await?;

        Ok((Client::new(), base_url))
    }

    #[allow(dead_code)]
    pub fn player_json(name: &str, team: &str, runs: i64) -> Value {
        json!({
            "name": name,
            "team": team,
            "country": "India",
            "runs": runs,
            "salary": 1_500_000,
            "role": "Batsman",
        })
    }

    /// Multipart form with the given text fields and an optional `image` part.
    #[allow(dead_code)]
    pub fn player_multipart(
        fields: &[(&str, &str)],
        image: Option<(Vec<u8>, &str)>,
    ) -> multipart::Form {
        let mut form = multipart::Form::new();
        for (name, value) in fields {
            form = form.text(name.to_string(), value.to_string());
        }
        if let Some((bytes, mime)) = image {
            let part = multipart::Part::bytes(bytes)
                .file_name("photo")
                .mime_str(mime)
                .unwrap();
            form = form.part("image", part);
        }
        form
    }
}
