use crate::domain::model::{Boss, Character};

/// 至少出現一次掉落的機率（百分比，取到小數一位）：`1 - (1 - p)^kills`
pub fn drop_chance(kills: u32, drop_rate: f64) -> f64 {
    let exponent = i32::try_from(kills).unwrap_or(i32::MAX);
    let chance = (1.0 - (1.0 - drop_rate).powi(exponent)) * 100.0;
    (chance * 10.0).round() / 10.0
}

pub fn boss_drop_chance(boss: &Boss, drop_rate: f64) -> f64 {
    drop_chance(boss.total_kills(), drop_rate)
}

/// 依首領 id 加總所有角色的擊殺數，保留首次出現的順序
pub fn total_character(characters: &[Character]) -> Option<Character> {
    let mut sources = characters.iter().filter(|c| !c.is_total()).peekable();
    sources.peek()?;

    let mut total = Character::total();
    for character in sources {
        total.achievement_points = total.achievement_points.max(character.achievement_points);
        for boss in &character.bosses {
            match total.bosses.iter_mut().find(|b| b.id == boss.id) {
                Some(sum) => {
                    sum.normal_kills = sum.normal_kills.saturating_add(boss.normal_kills);
                    sum.heroic_kills = sum.heroic_kills.saturating_add(boss.heroic_kills);
                }
                None => total.bosses.push(boss.clone()),
            }
        }
    }
    Some(total)
}

/// 角色內首領依擊殺數排序，角色再依最高擊殺數由多到少排序（同分保持原順序）
pub fn rank_characters(characters: &mut [Character]) {
    for character in characters.iter_mut() {
        character.sort_bosses();
    }
    characters.sort_by(|a, b| b.top_kills().cmp(&a.top_kills()));
}

/// 成就點數不同代表角色可能來自不同帳號
pub fn has_multiple_accounts(characters: &[Character]) -> bool {
    let mut points = characters
        .iter()
        .filter(|c| !c.is_total())
        .map(|c| c.achievement_points);
    match points.next() {
        Some(first) => points.any(|p| p != first),
        None => false,
    }
}
