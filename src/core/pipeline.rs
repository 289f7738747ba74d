use crate::core::lookup::{LookupEngine, LookupEvent};
use crate::core::report::KillReport;
use crate::core::roster::Roster;
use crate::core::stats::{has_multiple_accounts, rank_characters, total_character};
use crate::core::{ConfigProvider, Pipeline, Storage};
use crate::domain::model::{Character, LookupSummary};
use crate::utils::error::{Result, TallyError};

/// extract = 查詢 API，transform = Total 與排序，load = 寫出報表
pub struct LookupPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    roster: Roster,
    engine: LookupEngine,
}

impl<S: Storage, C: ConfigProvider> LookupPipeline<S, C> {
    pub fn new(storage: S, config: C, roster: Roster) -> Result<Self> {
        let engine = LookupEngine::new(&config)?;
        Ok(Self {
            storage,
            config,
            roster,
            engine,
        })
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for LookupPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<Character>> {
        let mut events = self
            .engine
            .spawn_lookup(self.roster.characters.clone(), self.roster.bosses.clone());

        match events.recv().await {
            Some(LookupEvent::Completed(characters)) => Ok(characters),
            Some(LookupEvent::Failed(e)) => Err(e),
            None => Err(TallyError::ProcessingError {
                message: "lookup ended without reporting a result".to_string(),
            }),
        }
    }

    async fn transform(&self, mut characters: Vec<Character>) -> Result<LookupSummary> {
        let primary = characters.first().map(|c| c.name.clone());
        let multiple_accounts = has_multiple_accounts(&characters);
        if multiple_accounts {
            tracing::warn!("⚠️ There seem to be multiple accounts among the looked-up characters");
        }

        if self.config.include_total() {
            if let Some(total) = total_character(&characters) {
                characters.push(total);
            }
        }

        rank_characters(&mut characters);

        Ok(LookupSummary {
            characters,
            primary,
            multiple_accounts,
            drop_rate: self.config.drop_rate(),
        })
    }

    async fn load(&self, summary: &LookupSummary) -> Result<String> {
        if summary.characters.is_empty() {
            tracing::info!("Nothing to report");
            return Ok(String::new());
        }

        let report = KillReport::from_summary(summary.clone());
        let written = report.save(&self.storage, self.config.output_formats()).await?;
        Ok(written.join(", "))
    }
}
