use anyhow::Result;
use httpmock::prelude::*;
use mount_odds::config::settings::DEFAULT_SETTINGS_FILE;
use mount_odds::{LocalStorage, LookupPipeline, Roster, SettingsStore, TallyEngine, TallyError, TomlConfig};
use tempfile::TempDir;

fn progress(name: &str, realm: &str, points: u32, ragnaros: u32, archimonde: u32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "realm": realm,
        "achievementPoints": points,
        "faction": 0,
        "totalHonorableKills": 0,
        "progression": {
            "raids": [
                {
                    "name": "Firelands",
                    "id": 5723,
                    "bosses": [
                        {"id": 52409, "name": "Ragnaros", "normalKills": ragnaros, "heroicKills": 1}
                    ]
                },
                {
                    "name": "Hellfire Citadel",
                    "id": 7545,
                    "bosses": [
                        {"id": 1799, "name": "Archimonde", "normalKills": archimonde}
                    ]
                }
            ]
        }
    })
}

fn config_toml(base_url: &str, output_path: &str) -> String {
    format!(
        r#"
[lookup]
base_url = "{}"
default_realm = "Argent Dawn"
concurrent_requests = 2

[output]
path = "{}"
formats = ["txt", "csv"]
"#,
        base_url,
        output_path.replace('\\', "/")
    )
}

/// 從設定檔讀取清單，查詢後寫出報表
#[tokio::test]
async fn test_end_to_end_lookup_from_saved_settings() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data = LocalStorage::new(temp_dir.path());

    let settings = r##"
bosses = ["# Firelands", "52409#Ragnaros", "1799#Archimonde"]
characters = ["Thrall (Argent-Dawn)", "Jaina"]
"##;
    tokio::fs::write(temp_dir.path().join(DEFAULT_SETTINGS_FILE), settings).await?;

    let server = MockServer::start();
    let thrall_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/wow/character/Argent-Dawn/Thrall")
            .query_param("fields", "progression");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(progress("Thrall", "Argent Dawn", 4200, 40, 2));
    });
    let jaina_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/wow/character/Argent-Dawn/Jaina")
            .query_param("fields", "progression");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(progress("Jaina", "Argent Dawn", 4200, 27, 8));
    });

    let output_dir = temp_dir.path().join("reports");
    let config = TomlConfig::from_toml_str(&config_toml(
        &server.url("/api/wow/character/"),
        output_dir.to_str().unwrap(),
    ))?;

    let store = SettingsStore::load(&data, DEFAULT_SETTINGS_FILE).await?;
    let roster = Roster::from_settings(store, config.lookup.default_realm.as_deref());
    assert_eq!(roster.characters.len(), 2);
    assert_eq!(roster.bosses.len(), 2);

    let pipeline = LookupPipeline::new(LocalStorage::new(&output_dir), config, roster)?;
    let result = TallyEngine::new(pipeline).run().await?;

    thrall_mock.assert();
    jaina_mock.assert();

    let summary = &result.summary;
    assert!(!summary.multiple_accounts);
    let names: Vec<&str> = summary.characters.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Total", "Thrall", "Jaina"]);

    let total = summary.total().unwrap();
    assert_eq!(total.boss(52409).unwrap().normal_kills, 67);
    assert_eq!(total.boss(52409).unwrap().heroic_kills, 2);
    assert_eq!(total.boss(1799).unwrap().normal_kills, 10);

    let text = tokio::fs::read_to_string(output_dir.join("Thrall.txt")).await?;
    assert_eq!(
        text,
        "Archimonde total kills: (10-0) - % of people with mount: 9.6%\n\
         Ragnaros total kills: (67-2) - % of people with mount: 50.0%\n"
    );

    assert!(result.output.starts_with("Thrall.txt, Thrall_"));
    let mut entries = tokio::fs::read_dir(&output_dir).await?;
    let mut csv_found = false;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_name().to_string_lossy().ends_with(".csv") {
            let csv = tokio::fs::read_to_string(entry.path()).await?;
            assert!(csv.starts_with("character,realm,boss"));
            assert!(csv.contains("Jaina,Argent-Dawn,Ragnaros,52409,27,1,"));
            csv_found = true;
        }
    }
    assert!(csv_found);

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_with_missing_character() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let missing = server.mock(|when, then| {
        when.method(GET).path("/api/wow/character/Ravencrest/Ghost");
        then.status(404);
    });

    let config = TomlConfig::from_toml_str(&config_toml(
        &server.url("/api/wow/character/"),
        temp_dir.path().to_str().unwrap(),
    ))?;

    let mut roster = Roster::default();
    roster.add_boss("Ragnaros", 52409);
    roster.add_character("Ghost", "Ravencrest");

    let pipeline = LookupPipeline::new(LocalStorage::new(temp_dir.path()), config, roster)?;
    let err = TallyEngine::new(pipeline).run().await.unwrap_err();

    missing.assert();
    assert_eq!(err.user_friendly_message(), "Error while looking up character Ghost-Ravencrest");
    assert!(matches!(
        err,
        TallyError::LookupFailed { ref source, .. }
            if matches!(**source, TallyError::HttpStatusError { status: 404, .. })
    ));

    Ok(())
}

#[tokio::test]
async fn test_end_to_end_with_no_characters() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let any_request = server.mock(|when, then| {
        when.method(GET);
        then.status(200);
    });

    let config = TomlConfig::from_toml_str(&config_toml(
        &server.url("/api/wow/character/"),
        temp_dir.path().to_str().unwrap(),
    ))?;

    let mut roster = Roster::default();
    roster.add_boss("Ragnaros", 52409);

    let pipeline = LookupPipeline::new(LocalStorage::new(temp_dir.path()), config, roster)?;
    let result = TallyEngine::new(pipeline).run().await?;

    any_request.assert_hits(0);
    assert!(result.summary.characters.is_empty());
    assert!(result.output.is_empty());

    Ok(())
}
