use clap::Parser;
use mount_odds::config::settings::{character_line, DEFAULT_SETTINGS_FILE};
use mount_odds::config::{BossAction, CharacterAction, Command};
use mount_odds::core::stats::{boss_drop_chance, drop_chance};
use mount_odds::core::ConfigProvider;
use mount_odds::domain::model::LookupSummary;
use mount_odds::utils::error::ErrorSeverity;
use mount_odds::utils::validation::{validate_boss_id, validate_range, Validate};
use mount_odds::utils::logger;
use mount_odds::{
    CliConfig, LocalStorage, LookupPipeline, Result, Roster, SettingsStore, TallyEngine,
    TallyError, TomlConfig,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);
    tracing::debug!("CLI config: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ mount-odds failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

async fn run(cli: CliConfig) -> Result<()> {
    let mut config = TomlConfig::load_or_default(&cli.config)?;
    config.validate()?;

    let data = LocalStorage::new(&cli.data_dir);
    let settings = SettingsStore::load(&data, DEFAULT_SETTINGS_FILE).await?;
    let mut roster = Roster::from_settings(settings, config.default_realm());

    let command = cli.command.unwrap_or(Command::Lookup { no_total: false });
    match command {
        Command::Lookup { no_total } => {
            if no_total {
                config.stats.include_total = false;
            }
            let output = LocalStorage::new(config.output_path());
            let pipeline = LookupPipeline::new(output, config, roster)?;
            let engine = TallyEngine::new(pipeline);

            let result = engine.run().await?;
            print_summary(&result.summary);
            if !result.output.is_empty() {
                println!("📁 Output saved to: {}", result.output);
            }
        }
        Command::Boss { action } => {
            match action {
                BossAction::Add { id, name } => {
                    if roster.add_boss_input(&id, &name)? {
                        println!("✅ Tracking {} ({})", name, id);
                    } else {
                        println!("Boss {} is already tracked", id);
                    }
                }
                BossAction::Remove { id } => {
                    let id = validate_boss_id(&id)?;
                    if roster.remove_boss(id) {
                        println!("🗑️ Removed boss {}", id);
                    } else {
                        println!("Boss {} is not tracked", id);
                    }
                }
                BossAction::List => {
                    for boss in &roster.bosses {
                        println!("{:>8}  {}", boss.id, boss.name);
                    }
                    return Ok(());
                }
            }
            roster.settings.save(&data, DEFAULT_SETTINGS_FILE).await?;
        }
        Command::Character { action } => {
            match action {
                CharacterAction::Add { name, realm } => {
                    let realm = resolve_realm(realm, &config)?;
                    if roster.add_character_input(&name, &realm)? {
                        println!("✅ Added {} ({})", name, realm);
                    } else {
                        println!("{} ({}) is already saved", name, realm);
                    }
                }
                CharacterAction::Remove { name, realm } => {
                    let realm = resolve_realm(realm, &config)?;
                    if roster.remove_character(&name, &realm) {
                        println!("🗑️ Removed {} ({})", name, realm);
                    } else {
                        println!("{} ({}) is not saved", name, realm);
                    }
                }
                CharacterAction::List => {
                    for character in &roster.characters {
                        println!("{}", character_line(character));
                    }
                    return Ok(());
                }
            }
            roster.settings.save(&data, DEFAULT_SETTINGS_FILE).await?;
        }
        Command::Odds { kills, rate } => {
            let rate = rate.unwrap_or_else(|| config.drop_rate());
            validate_range("rate", rate, 0.0, 1.0)?;
            println!(
                "{} kills at {:.2}% per kill: {:.1}% chance of at least one drop",
                kills,
                rate * 100.0,
                drop_chance(kills, rate)
            );
        }
    }

    Ok(())
}

fn resolve_realm(realm: Option<String>, config: &TomlConfig) -> Result<String> {
    realm
        .or_else(|| config.default_realm().map(str::to_string))
        .ok_or_else(|| TallyError::MissingConfigError {
            field: "realm (argument or lookup.default_realm)".to_string(),
        })
}

fn print_summary(summary: &LookupSummary) {
    if summary.characters.is_empty() {
        println!("No characters saved. Add one with `mount-odds character add <name> <realm>`.");
        return;
    }

    if summary.multiple_accounts {
        println!("⚠️ There seem to be multiple accounts among these characters.");
    }

    for character in &summary.characters {
        if character.is_total() {
            println!("{}", character.name);
        } else {
            println!("{}", character_line(character));
        }
        println!(
            "  {:<24} {:>6} {:>6} {:>7}",
            "Name", "Normal", "Heroic", "%"
        );
        for boss in &character.bosses {
            println!(
                "  {:<24} {:>6} {:>6} {:>6.1}%",
                boss.name,
                boss.normal_kills,
                boss.heroic_kills,
                boss_drop_chance(boss, summary.drop_rate)
            );
        }
    }
}
