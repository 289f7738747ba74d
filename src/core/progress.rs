//! Character progression payload returned by `?fields=progression`.

use crate::domain::model::Boss;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidProgress {
    pub name: String,
    pub realm: String,
    #[serde(default)]
    pub achievement_points: u32,
    #[serde(default)]
    pub faction: u32,
    #[serde(default)]
    pub progression: Progression,
    #[serde(default)]
    pub total_honorable_kills: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progression {
    #[serde(default)]
    pub raids: Vec<Raid>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Raid {
    pub name: String,
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub lfr: u32,
    #[serde(default)]
    pub normal: u32,
    #[serde(default)]
    pub heroic: u32,
    #[serde(default)]
    pub mythic: u32,
    #[serde(default)]
    pub bosses: Vec<RaidBoss>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaidBoss {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub normal_kills: u32,
    pub heroic_kills: Option<u32>,
    pub lfr_kills: Option<u32>,
    pub mythic_kills: Option<u32>,
}

impl RaidBoss {
    pub fn to_boss(&self) -> Boss {
        Boss::with_kills(
            self.name.clone(),
            self.id,
            self.normal_kills,
            self.heroic_kills.unwrap_or(0),
        )
    }
}

/// 依追蹤順序取出每個首領的擊殺數；同一 id 出現在多個副本時各自保留
pub fn tracked_kills(progress: &RaidProgress, tracked: &[Boss]) -> Vec<Boss> {
    let mut kills = Vec::new();
    for wanted in tracked {
        for raid in &progress.progression.raids {
            kills.extend(
                raid.bosses
                    .iter()
                    .filter(|boss| boss.id == wanted.id)
                    .map(RaidBoss::to_boss),
            );
        }
    }
    kills
}
