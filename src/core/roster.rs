use crate::config::settings::{parse_boss_line, parse_character_line, SettingsStore};
use crate::domain::model::{Boss, Character};
use crate::utils::error::Result;
use crate::utils::validation::{validate_boss_id, validate_name, validate_realm};

/// 追蹤中的首領與角色清單，所有變更同步到設定
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub bosses: Vec<Boss>,
    pub characters: Vec<Character>,
    pub settings: SettingsStore,
}

impl Roster {
    /// 先讀首領再讀角色；可解析的行改寫為標準格式（重複的行會被合併），
    /// 註解與無法解析的行原樣保留
    pub fn from_settings(settings: SettingsStore, default_realm: Option<&str>) -> Self {
        let mut roster = Self::default();

        for line in settings.bosses {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                roster.settings.bosses.push(line);
                continue;
            }
            match parse_boss_line(entry) {
                Ok(boss) => {
                    roster.add_boss(&boss.name, boss.id);
                }
                Err(e) => {
                    tracing::warn!("Skipping boss entry: {}", e);
                    roster.settings.bosses.push(line);
                }
            }
        }

        for line in settings.characters {
            let entry = line.trim();
            if entry.is_empty() || entry.starts_with('#') {
                roster.settings.characters.push(line);
                continue;
            }
            match parse_character_line(entry, default_realm) {
                Ok(character) => {
                    roster.add_character(&character.name, &character.realm);
                }
                Err(e) => {
                    tracing::warn!("Skipping character entry: {}", e);
                    roster.settings.characters.push(line);
                }
            }
        }

        tracing::debug!(
            "Roster loaded: {} bosses, {} characters",
            roster.bosses.len(),
            roster.characters.len()
        );
        roster
    }

    pub fn add_boss(&mut self, name: &str, id: u32) -> bool {
        let boss = Boss::new(name, id);
        if self.bosses.contains(&boss) {
            return false;
        }
        self.settings.add_boss(&boss);
        self.bosses.push(boss);
        true
    }

    pub fn add_character(&mut self, name: &str, realm: &str) -> bool {
        let character = Character::new(name, realm);
        if self.characters.contains(&character) {
            return false;
        }
        self.settings.add_character(&character);
        self.characters.push(character);
        true
    }

    /// 先驗證使用者輸入再新增
    pub fn add_boss_input(&mut self, id: &str, name: &str) -> Result<bool> {
        validate_name("Name", name)?;
        let id = validate_boss_id(id)?;
        Ok(self.add_boss(name, id))
    }

    pub fn add_character_input(&mut self, name: &str, realm: &str) -> Result<bool> {
        validate_name("Name", name)?;
        validate_realm(realm)?;
        Ok(self.add_character(name, realm))
    }

    pub fn remove_boss(&mut self, id: u32) -> bool {
        let Some(index) = self.bosses.iter().position(|b| b.id == id) else {
            return false;
        };
        let boss = self.bosses.remove(index);
        self.settings.remove_boss(&boss);
        true
    }

    pub fn remove_character(&mut self, name: &str, realm: &str) -> bool {
        let Some(index) = self.characters.iter().position(|c| c.matches(name, realm)) else {
            return false;
        };
        let character = self.characters.remove(index);
        self.settings.remove_character(&character);
        true
    }

    pub fn save_current_bosses(&mut self) {
        for boss in &self.bosses {
            self.settings.add_boss(boss);
        }
    }

    /// `Total` 不寫入設定
    pub fn save_current_characters(&mut self) {
        for character in self.characters.iter().filter(|c| !c.is_total()) {
            self.settings.add_character(character);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }
}
