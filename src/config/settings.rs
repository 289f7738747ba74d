//! 跨次執行保存首領與角色清單。
//!
//! 每個清單是一組字串行：首領為 `id#name`，角色為 `Name (Realm)`。
//! 以 `#` 開頭的行與空白行會被忽略，因此可以在檔案中寫註解。

use crate::core::Storage;
use crate::domain::model::{Boss, Character};
use crate::utils::error::{Result, TallyError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SETTINGS_FILE: &str = "settings.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SettingsStore {
    #[serde(default)]
    pub bosses: Vec<String>,
    #[serde(default)]
    pub characters: Vec<String>,
}

/// 過濾註解與空白行
pub fn read_setting_lines(lines: &[String]) -> Vec<&str> {
    lines
        .iter()
        .map(|line| line.trim())
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .collect()
}

pub fn boss_line(boss: &Boss) -> String {
    format!("{}#{}", boss.id, boss.name)
}

pub fn character_line(character: &Character) -> String {
    format!("{} ({})", character.name, character.realm)
}

pub fn parse_boss_line(line: &str) -> Result<Boss> {
    let (id, name) = line.split_once('#').ok_or_else(|| TallyError::SettingsError {
        message: format!("boss entry '{}' is not in id#name form", line),
    })?;

    let id = id.trim().parse::<u32>().map_err(|e| TallyError::SettingsError {
        message: format!("boss entry '{}' has an invalid id: {}", line, e),
    })?;

    let name = name.trim();
    if name.is_empty() {
        return Err(TallyError::SettingsError {
            message: format!("boss entry '{}' has no name", line),
        });
    }

    Ok(Boss::new(name, id))
}

/// 沒有 `(Realm)` 的行使用預設伺服器；若未設定則視為錯誤
pub fn parse_character_line(line: &str, default_realm: Option<&str>) -> Result<Character> {
    let (name, realm) = match line.split_once('(') {
        Some((name, rest)) => {
            let realm = rest.split(')').next().unwrap_or_default();
            (name.trim(), realm.trim())
        }
        None => {
            let realm = default_realm.ok_or_else(|| TallyError::SettingsError {
                message: format!("character entry '{}' has no realm and no default realm is set", line),
            })?;
            (line.trim(), realm.trim())
        }
    };

    if name.is_empty() || realm.is_empty() {
        return Err(TallyError::SettingsError {
            message: format!("character entry '{}' is not in 'Name (Realm)' form", line),
        });
    }

    Ok(Character::new(name, realm))
}

impl SettingsStore {
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let data = match storage.read_file(path).await {
            Ok(data) => data,
            Err(TallyError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No settings file at {}, starting with empty lists", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e),
        };

        let content = String::from_utf8(data).map_err(|e| TallyError::SettingsError {
            message: format!("{} is not valid UTF-8: {}", path, e),
        })?;
        Self::from_toml_str(&content)
    }

    pub async fn save<S: Storage>(&self, storage: &S, path: &str) -> Result<()> {
        let content = self.to_toml_string()?;
        storage.write_file(path, content.as_bytes()).await?;
        tracing::debug!(
            "Saved {} boss and {} character entries to {}",
            self.bosses.len(),
            self.characters.len(),
            path
        );
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| TallyError::SettingsError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| TallyError::SettingsError {
            message: format!("TOML serialization error: {}", e),
        })
    }

    pub fn boss_entries(&self) -> Vec<&str> {
        read_setting_lines(&self.bosses)
    }

    pub fn character_entries(&self) -> Vec<&str> {
        read_setting_lines(&self.characters)
    }

    pub fn contains_boss(&self, boss: &Boss) -> bool {
        contains(&self.bosses, &boss_line(boss))
    }

    pub fn contains_character(&self, character: &Character) -> bool {
        contains(&self.characters, &character_line(character))
    }

    pub fn add_boss(&mut self, boss: &Boss) -> bool {
        add(&mut self.bosses, boss_line(boss))
    }

    pub fn add_character(&mut self, character: &Character) -> bool {
        add(&mut self.characters, character_line(character))
    }

    pub fn remove_boss(&mut self, boss: &Boss) -> bool {
        remove(&mut self.bosses, &boss_line(boss))
    }

    pub fn remove_character(&mut self, character: &Character) -> bool {
        remove(&mut self.characters, &character_line(character))
    }
}

fn contains(lines: &[String], line: &str) -> bool {
    lines.iter().any(|l| l.trim() == line)
}

fn add(lines: &mut Vec<String>, line: String) -> bool {
    if contains(lines, &line) {
        return false;
    }
    lines.push(line);
    true
}

fn remove(lines: &mut Vec<String>, line: &str) -> bool {
    let before = lines.len();
    lines.retain(|l| l.trim() != line);
    lines.len() != before
}
