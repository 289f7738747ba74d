use crate::core::stats::{boss_drop_chance, total_character};
use crate::core::Storage;
use crate::domain::model::{Character, LookupSummary};
use crate::utils::error::{Result, TallyError};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub character: String,
    pub realm: String,
    pub boss: String,
    pub boss_id: u32,
    pub normal_kills: u32,
    pub heroic_kills: u32,
    pub drop_chance: f64,
}

#[derive(Debug, Clone)]
pub struct KillReport {
    pub rows: Vec<ReportRow>,
    pub summary: LookupSummary,
}

impl KillReport {
    pub fn from_summary(summary: LookupSummary) -> Self {
        let rows = summary
            .characters
            .iter()
            .flat_map(|character| rows_for(character, summary.drop_rate))
            .collect();
        Self { rows, summary }
    }

    /// 文字報表：所有角色合計後每個首領一行，依首領名稱排序
    pub fn render_text(&self) -> Vec<String> {
        let Some(source) = total_character(&self.summary.characters) else {
            return Vec::new();
        };

        let mut bosses = source.bosses;
        bosses.sort_by(|a, b| a.name.cmp(&b.name));
        bosses
            .iter()
            .map(|boss| {
                format!(
                    "{} total kills: ({}-{}) - % of people with mount: {:.1}%",
                    boss.name,
                    boss.normal_kills,
                    boss.heroic_kills,
                    boss_drop_chance(boss, self.summary.drop_rate)
                )
            })
            .collect()
    }

    pub fn render_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in &self.rows {
            writer.serialize(row)?;
        }
        let data = writer.into_inner().map_err(|e| TallyError::ProcessingError {
            message: format!("failed to flush CSV output: {}", e),
        })?;
        String::from_utf8(data).map_err(|e| TallyError::ProcessingError {
            message: format!("CSV output is not UTF-8: {}", e),
        })
    }

    /// 以清單中的第一個角色命名輸出檔
    pub fn file_stem(&self) -> String {
        self.summary
            .primary
            .clone()
            .unwrap_or_else(|| "report".to_string())
    }

    /// 依格式寫出報表，回傳寫出的檔名
    pub async fn save<S: Storage>(&self, storage: &S, formats: &[String]) -> Result<Vec<String>> {
        let stem = self.file_stem();
        let mut written = Vec::new();

        for format in formats {
            match format.as_str() {
                "txt" => {
                    let name = format!("{}.txt", stem);
                    let mut content = self.render_text().join("\n");
                    content.push('\n');
                    storage.write_file(&name, content.as_bytes()).await?;
                    written.push(name);
                }
                "csv" => {
                    let name = format!(
                        "{}_{}.csv",
                        stem,
                        chrono::Local::now().format("%Y%m%d_%H%M%S")
                    );
                    storage.write_file(&name, self.render_csv()?.as_bytes()).await?;
                    written.push(name);
                }
                other => {
                    return Err(TallyError::InvalidConfigValueError {
                        field: "output.formats".to_string(),
                        value: other.to_string(),
                        reason: "Unsupported format".to_string(),
                    })
                }
            }
        }

        tracing::debug!("Report written: {:?}", written);
        Ok(written)
    }
}

fn rows_for(character: &Character, drop_rate: f64) -> Vec<ReportRow> {
    character
        .bosses
        .iter()
        .map(|boss| ReportRow {
            character: character.name.clone(),
            realm: character.realm.clone(),
            boss: boss.name.clone(),
            boss_id: boss.id,
            normal_kills: boss.normal_kills,
            heroic_kills: boss.heroic_kills,
            drop_chance: boss_drop_chance(boss, drop_rate),
        })
        .collect()
}
