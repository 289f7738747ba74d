use crate::core::Pipeline;
use crate::domain::model::LookupSummary;
use crate::utils::error::Result;

#[derive(Debug)]
pub struct EngineOutput {
    pub summary: LookupSummary,
    /// 寫出的報表檔案；沒有角色時為空字串
    pub output: String,
}

pub struct TallyEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> TallyEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<EngineOutput> {
        tracing::info!("🚀 Starting lookup");

        let characters = self.pipeline.extract().await?;
        tracing::info!("Fetched {} characters", characters.len());

        let summary = self.pipeline.transform(characters).await?;
        tracing::debug!(
            "Summary has {} rows (multiple accounts: {})",
            summary.characters.len(),
            summary.multiple_accounts
        );

        let output = self.pipeline.load(&summary).await?;
        if !output.is_empty() {
            tracing::info!("📁 Report saved to: {}", output);
        }

        Ok(EngineOutput { summary, output })
    }
}
