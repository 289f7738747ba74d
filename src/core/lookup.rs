use crate::core::progress::{tracked_kills, RaidProgress};
use crate::core::ConfigProvider;
use crate::domain::model::{Boss, Character};
use crate::utils::error::{Result, TallyError};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use url::Url;

/// 查詢結束時只會送出其中一個事件
#[derive(Debug)]
pub enum LookupEvent {
    Completed(Vec<Character>),
    Failed(TallyError),
}

/// 每個角色一個 HTTP GET，解析出追蹤首領的擊殺數
#[derive(Debug, Clone)]
pub struct LookupEngine {
    client: Client,
    base_url: Url,
    locale: Option<String>,
    api_key: Option<String>,
    concurrent_requests: usize,
}

impl LookupEngine {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let base_url = Url::parse(config.base_url())?;
        if base_url.cannot_be_a_base() {
            return Err(TallyError::InvalidConfigValueError {
                field: "lookup.base_url".to_string(),
                value: config.base_url().to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs()))
            .build()?;

        Ok(Self {
            client,
            base_url,
            locale: config.locale().map(str::to_string),
            api_key: config.api_key().map(str::to_string),
            concurrent_requests: config.concurrent_requests().max(1),
        })
    }

    /// `{base}/{realm}/{name}?fields=progression`
    pub fn character_url(&self, character: &Character) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| TallyError::ConfigError {
                message: format!("{} cannot be used as a base URL", self.base_url),
            })?
            .pop_if_empty()
            .push(&character.realm)
            .push(&character.name);

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", "progression");
            if let Some(locale) = &self.locale {
                query.append_pair("locale", locale);
            }
            if let Some(api_key) = &self.api_key {
                query.append_pair("apikey", api_key);
            }
        }

        Ok(url)
    }

    pub async fn fetch_character(&self, character: &Character, tracked: &[Boss]) -> Result<Character> {
        let url = self.character_url(character)?;
        tracing::debug!("Looking up {} ({})", character.name, character.realm);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        tracing::debug!("API response status for {}: {}", character.name, status);

        if !status.is_success() {
            return Err(TallyError::HttpStatusError {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        let progress: RaidProgress = serde_json::from_str(&body)?;

        if !progress.name.is_empty()
            && !Character::new(progress.name.as_str(), &progress.realm).eq(character)
        {
            tracing::warn!(
                "Requested {} ({}) but API answered for {} ({})",
                character.name,
                character.realm,
                progress.name,
                progress.realm
            );
        }

        let mut result = character.without_kills();
        result.achievement_points = progress.achievement_points;
        result.bosses = tracked_kills(&progress, tracked);
        Ok(result)
    }

    /// 所有角色完成後回傳（保持輸入順序）；第一個錯誤會中止其他請求
    pub async fn run(&self, characters: &[Character], tracked: &[Boss]) -> Result<Vec<Character>> {
        if characters.is_empty() {
            tracing::info!("No characters to look up");
            return Ok(Vec::new());
        }

        tracing::info!(
            "🔍 Looking up {} characters for {} tracked bosses",
            characters.len(),
            tracked.len()
        );

        let limiter = Arc::new(Semaphore::new(self.concurrent_requests));
        let tracked = Arc::new(tracked.to_vec());
        let mut tasks = JoinSet::new();

        for (index, character) in characters.iter().cloned().enumerate() {
            let engine = self.clone();
            let limiter = Arc::clone(&limiter);
            let tracked = Arc::clone(&tracked);
            tasks.spawn(async move {
                let _permit = limiter.acquire_owned().await;
                let result = engine.fetch_character(&character, &tracked).await;
                (index, character, result)
            });
        }

        let mut results: Vec<Option<Character>> = vec![None; characters.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, character, result) = joined?;
            match result {
                Ok(found) => results[index] = Some(found),
                Err(e) => {
                    tasks.abort_all();
                    tracing::error!(
                        "❌ Lookup failed for {} ({}): {}",
                        character.name,
                        character.realm,
                        e
                    );
                    return Err(TallyError::LookupFailed {
                        name: character.name,
                        realm: character.realm,
                        source: Box::new(e),
                    });
                }
            }
        }

        let characters: Vec<Character> = results.into_iter().flatten().collect();
        tracing::info!("✅ Processed {} characters", characters.len());
        Ok(characters)
    }

    /// 事件形式的 `run`
    pub fn spawn_lookup(
        &self,
        characters: Vec<Character>,
        tracked: Vec<Boss>,
    ) -> mpsc::Receiver<LookupEvent> {
        let (tx, rx) = mpsc::channel(1);
        let engine = self.clone();

        tokio::spawn(async move {
            let event = match engine.run(&characters, &tracked).await {
                Ok(found) => LookupEvent::Completed(found),
                Err(e) => LookupEvent::Failed(e),
            };
            if tx.send(event).await.is_err() {
                tracing::debug!("Lookup listener went away before the result arrived");
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use httpmock::prelude::*;

    fn engine_for(base_url: &str) -> LookupEngine {
        let mut config = TomlConfig::default();
        config.lookup.base_url = base_url.to_string();
        LookupEngine::new(&config).unwrap()
    }

    fn progress_body(name: &str, realm: &str, points: u32, kills: u32) -> serde_json::Value {
        serde_json::json!({
            "name": name,
            "realm": realm,
            "achievementPoints": points,
            "progression": {
                "raids": [{
                    "name": "Firelands",
                    "id": 5723,
                    "bosses": [
                        {"id": 52409, "name": "Ragnaros", "normalKills": kills, "heroicKills": 1}
                    ]
                }]
            }
        })
    }

    #[test]
    fn test_character_url() {
        let engine = engine_for("http://eu.battle.net/api/wow/character/");
        let character = Character::new("Thrall", "Argent Dawn");

        let url = engine.character_url(&character).unwrap();

        assert_eq!(
            url.as_str(),
            "http://eu.battle.net/api/wow/character/Argent-Dawn/Thrall?fields=progression"
        );
    }

    #[test]
    fn test_character_url_encodes_name_and_adds_options() {
        let mut config = TomlConfig::default();
        config.lookup.locale = Some("en_GB".to_string());
        config.lookup.api_key = Some("abc".to_string());
        let engine = LookupEngine::new(&config).unwrap();

        let url = engine.character_url(&Character::new("Åsa", "Ravencrest")).unwrap();

        assert_eq!(
            url.as_str(),
            "http://eu.battle.net/api/wow/character/Ravencrest/%C3%85sa?fields=progression&locale=en_GB&apikey=abc"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = TomlConfig::default();
        config.lookup.base_url = "not a url".to_string();
        assert!(LookupEngine::new(&config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_character_parses_tracked_kills() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/character/Ravencrest/Thrall")
                .query_param("fields", "progression");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(progress_body("Thrall", "Ravencrest", 9000, 14));
        });

        let engine = engine_for(&server.url("/character/"));
        let tracked = vec![Boss::new("Ragnaros", 52409)];
        let result = engine
            .fetch_character(&Character::new("Thrall", "Ravencrest"), &tracked)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(result.achievement_points, 9000);
        assert_eq!(result.bosses.len(), 1);
        assert_eq!(result.bosses[0].normal_kills, 14);
        assert_eq!(result.bosses[0].heroic_kills, 1);
    }

    #[tokio::test]
    async fn test_fetch_character_not_found() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Nobody");
            then.status(404);
        });

        let engine = engine_for(&server.url("/character/"));
        let err = engine
            .fetch_character(&Character::new("Nobody", "Ravencrest"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, TallyError::HttpStatusError { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_run_keeps_roster_order() {
        let server = MockServer::start();
        for (name, kills) in [("Thrall", 3), ("Jaina", 8), ("Anduin", 5)] {
            server.mock(|when, then| {
                when.method(GET).path(format!("/character/Ravencrest/{}", name));
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(progress_body(name, "Ravencrest", 100, kills));
            });
        }

        let engine = engine_for(&server.url("/character/"));
        let characters = vec![
            Character::new("Thrall", "Ravencrest"),
            Character::new("Jaina", "Ravencrest"),
            Character::new("Anduin", "Ravencrest"),
        ];
        let tracked = vec![Boss::new("Ragnaros", 52409)];

        let results = engine.run(&characters, &tracked).await.unwrap();

        let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Thrall", "Jaina", "Anduin"]);
        assert_eq!(results[1].bosses[0].normal_kills, 8);
    }

    #[tokio::test]
    async fn test_run_reports_failing_character() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Thrall");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(progress_body("Thrall", "Ravencrest", 100, 1));
        });
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Ghost");
            then.status(404);
        });

        let engine = engine_for(&server.url("/character/"));
        let characters = vec![
            Character::new("Thrall", "Ravencrest"),
            Character::new("Ghost", "Ravencrest"),
        ];

        let err = engine.run(&characters, &[]).await.unwrap_err();

        match err {
            TallyError::LookupFailed { name, realm, .. } => {
                assert_eq!(name, "Ghost");
                assert_eq!(realm, "Ravencrest");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    fn engine_with_limit(base_url: &str, concurrent_requests: usize) -> LookupEngine {
        let mut config = TomlConfig::default();
        config.lookup.base_url = base_url.to_string();
        config.lookup.concurrent_requests = Some(concurrent_requests);
        LookupEngine::new(&config).unwrap()
    }

    fn mock_slow(server: &MockServer, name: &str, delay: Duration) {
        server.mock(|when, then| {
            when.method(GET).path(format!("/character/Ravencrest/{}", name));
            then.status(200)
                .delay(delay)
                .header("Content-Type", "application/json")
                .json_body(progress_body(name, "Ravencrest", 100, 1));
        });
    }

    #[tokio::test]
    async fn test_run_stops_waiting_after_first_failure() {
        let server = MockServer::start();
        mock_slow(&server, "Thrall", Duration::from_secs(5));
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Ghost");
            then.status(404);
        });

        let engine = engine_for(&server.url("/character/"));
        let characters = vec![
            Character::new("Thrall", "Ravencrest"),
            Character::new("Ghost", "Ravencrest"),
        ];

        let started = std::time::Instant::now();
        let err = engine.run(&characters, &[]).await.unwrap_err();

        assert!(started.elapsed() < Duration::from_secs(3));
        assert!(matches!(err, TallyError::LookupFailed { ref name, .. } if name == "Ghost"));
    }

    #[tokio::test]
    async fn test_run_respects_concurrent_request_limit() {
        let server = MockServer::start();
        let delay = Duration::from_millis(400);
        mock_slow(&server, "Thrall", delay);
        mock_slow(&server, "Jaina", delay);

        let characters = vec![
            Character::new("Thrall", "Ravencrest"),
            Character::new("Jaina", "Ravencrest"),
        ];

        let serial = engine_with_limit(&server.url("/character/"), 1);
        let started = std::time::Instant::now();
        let results = serial.run(&characters, &[]).await.unwrap();
        assert_eq!(results.len(), 2);
        assert!(started.elapsed() >= delay * 2);

        let parallel = engine_with_limit(&server.url("/character/"), 2);
        let started = std::time::Instant::now();
        parallel.run(&characters, &[]).await.unwrap();
        assert!(started.elapsed() < delay * 2);
    }

    #[tokio::test]
    async fn test_malformed_payload_is_serialization_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Thrall");
            then.status(200).body("<html>maintenance</html>");
        });

        let engine = engine_for(&server.url("/character/"));
        let err = engine
            .fetch_character(&Character::new("Thrall", "Ravencrest"), &[])
            .await
            .unwrap_err();

        assert!(matches!(err, TallyError::SerializationError(_)));
    }

    #[tokio::test]
    async fn test_spawn_lookup_with_no_characters_completes() {
        let engine = engine_for("http://127.0.0.1:9/character/");
        let mut events = engine.spawn_lookup(Vec::new(), vec![Boss::new("Ragnaros", 52409)]);

        match events.recv().await {
            Some(LookupEvent::Completed(found)) => assert!(found.is_empty()),
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(events.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_spawn_lookup_reports_failure_event() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/character/Ravencrest/Thrall");
            then.status(503);
        });

        let engine = engine_for(&server.url("/character/"));
        let mut events =
            engine.spawn_lookup(vec![Character::new("Thrall", "Ravencrest")], Vec::new());

        match events.recv().await {
            Some(LookupEvent::Failed(TallyError::LookupFailed { name, .. })) => {
                assert_eq!(name, "Thrall")
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
