use serde::{Deserialize, Serialize};

/// 彙總用的虛擬角色名稱
pub const TOTAL_NAME: &str = "Total";

/// 追蹤中的首領及其擊殺次數
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub name: String,
    pub normal_kills: u32,
    pub heroic_kills: u32,
}

impl Boss {
    pub fn new(name: impl Into<String>, id: u32) -> Self {
        Self::with_kills(name, id, 0, 0)
    }

    pub fn with_kills(name: impl Into<String>, id: u32, normal_kills: u32, heroic_kills: u32) -> Self {
        Self {
            id,
            name: name.into(),
            normal_kills,
            heroic_kills,
        }
    }

    pub fn without_kills(&self) -> Self {
        Self::new(self.name.clone(), self.id)
    }

    pub fn total_kills(&self) -> u32 {
        self.normal_kills.saturating_add(self.heroic_kills)
    }
}

// 首領以 id 判斷相等
impl PartialEq for Boss {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Boss {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub realm: String,
    pub achievement_points: u32,
    pub bosses: Vec<Boss>,
}

impl Character {
    /// 伺服器名稱中的空白會轉為連字號，與 API 路徑格式一致
    pub fn new(name: impl Into<String>, realm: &str) -> Self {
        Self {
            name: name.into(),
            realm: realm.trim().replace(' ', "-"),
            achievement_points: 0,
            bosses: Vec::new(),
        }
    }

    pub fn total() -> Self {
        Self {
            name: TOTAL_NAME.to_string(),
            realm: String::new(),
            achievement_points: 0,
            bosses: Vec::new(),
        }
    }

    pub fn is_total(&self) -> bool {
        self.name == TOTAL_NAME && self.realm.is_empty()
    }

    pub fn without_kills(&self) -> Self {
        Self {
            name: self.name.clone(),
            realm: self.realm.clone(),
            achievement_points: self.achievement_points,
            bosses: self.bosses.iter().map(Boss::without_kills).collect(),
        }
    }

    /// Stable sort, most kills first.
    pub fn sort_bosses(&mut self) {
        self.bosses
            .sort_by(|a, b| b.total_kills().cmp(&a.total_kills()));
    }

    pub fn top_kills(&self) -> u32 {
        self.bosses.iter().map(Boss::total_kills).max().unwrap_or(0)
    }

    pub fn boss(&self, id: u32) -> Option<&Boss> {
        self.bosses.iter().find(|b| b.id == id)
    }

    pub fn matches(&self, name: &str, realm: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
            && self.realm.to_lowercase() == realm.trim().replace(' ', "-").to_lowercase()
    }
}

impl PartialEq for Character {
    fn eq(&self, other: &Self) -> bool {
        self.matches(&other.name, &other.realm)
    }
}

impl Eq for Character {}

/// 一次查詢經統計後的結果
#[derive(Debug, Clone)]
pub struct LookupSummary {
    /// 已排序；若有啟用則包含 `Total`
    pub characters: Vec<Character>,
    /// 清單中的第一個角色（排序前），報表以此命名
    pub primary: Option<String>,
    pub multiple_accounts: bool,
    pub drop_rate: f64,
}

impl LookupSummary {
    pub fn total(&self) -> Option<&Character> {
        self.characters.iter().find(|c| c.is_total())
    }
}
