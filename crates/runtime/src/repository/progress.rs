//! Typed access to persisted player progress.

use std::collections::BTreeSet;
use std::sync::Arc;

use super::{KeyValueStore, Result};

/// Storage keys. Their spelling is shared with existing save data.
pub mod keys {
    pub const PLAYER_NAME: &str = "player_name";
    pub const PLAYER_COINS: &str = "playerCoins";
    pub const EQUIPPED_WEAPON: &str = "equippedWeapon";
    pub const PURCHASED_LIVES: &str = "purchasedLives";
    pub const DEFEATED_BOSS_LEVELS: &str = "defeatedBossLevels";
    pub const HIGH_SCORE: &str = "jumpjump_highscore";

    /// Per-player boss marker, `<player>_boss_<level>`.
    pub fn boss_marker(player: &str, level: u32) -> String {
        format!("{player}_boss_{level}")
    }

    pub const BOSS_DEFEATED: &str = "defeated";
}

/// Player progress on top of any [`KeyValueStore`].
///
/// Numeric values that are missing or unparsable read as zero, and a
/// malformed boss list reads as empty; progress degrades instead of failing.
/// Storage errors are returned to the caller.
#[derive(Clone)]
pub struct ProgressRepository {
    store: Arc<dyn KeyValueStore>,
}

impl ProgressRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn player_name(&self) -> Result<Option<String>> {
        self.store.get(keys::PLAYER_NAME)
    }

    pub fn set_player_name(&self, name: &str) -> Result<()> {
        self.store.set(keys::PLAYER_NAME, name)
    }

    pub fn coins(&self) -> Result<u32> {
        self.read_number(keys::PLAYER_COINS)
    }

    /// Adds to the wallet and returns the new balance.
    pub fn add_coins(&self, amount: u32) -> Result<u32> {
        let balance = self.coins()?.saturating_add(amount);
        self.store.set(keys::PLAYER_COINS, &balance.to_string())?;
        Ok(balance)
    }

    /// Spends from the wallet. Returns `false` and changes nothing if the
    /// balance is too low.
    pub fn spend_coins(&self, amount: u32) -> Result<bool> {
        let balance = self.coins()?;
        if balance < amount {
            return Ok(false);
        }
        self.store
            .set(keys::PLAYER_COINS, &(balance - amount).to_string())?;
        Ok(true)
    }

    pub fn equipped_weapon(&self) -> Result<Option<String>> {
        self.store.get(keys::EQUIPPED_WEAPON)
    }

    pub fn set_equipped_weapon(&self, weapon: &str) -> Result<()> {
        self.store.set(keys::EQUIPPED_WEAPON, weapon)
    }

    pub fn add_purchased_lives(&self, lives: u32) -> Result<u32> {
        let total = self.read_number::<u32>(keys::PURCHASED_LIVES)?.saturating_add(lives);
        self.store.set(keys::PURCHASED_LIVES, &total.to_string())?;
        Ok(total)
    }

    /// Consumes the purchased lives: returns them and resets the counter to `"0"`.
    pub fn take_purchased_lives(&self) -> Result<u32> {
        let lives = self.read_number(keys::PURCHASED_LIVES)?;
        self.store.set(keys::PURCHASED_LIVES, "0")?;
        Ok(lives)
    }

    /// Levels whose boss has been defeated, ascending.
    pub fn defeated_boss_levels(&self) -> Result<Vec<u32>> {
        let Some(raw) = self.store.get(keys::DEFEATED_BOSS_LEVELS)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<u32>>(&raw) {
            Ok(levels) => Ok(levels),
            Err(e) => {
                tracing::warn!("Ignoring malformed {}: {}", keys::DEFEATED_BOSS_LEVELS, e);
                Ok(Vec::new())
            }
        }
    }

    /// Records a boss defeat for `player`: sets the per-player marker and adds
    /// the level to the shared list (once).
    pub fn mark_boss_defeated(&self, player: &str, level: u32) -> Result<()> {
        self.store
            .set(&keys::boss_marker(player, level), keys::BOSS_DEFEATED)?;

        let mut levels: BTreeSet<u32> = self.defeated_boss_levels()?.into_iter().collect();
        if levels.insert(level) {
            let levels: Vec<u32> = levels.into_iter().collect();
            self.store
                .set(keys::DEFEATED_BOSS_LEVELS, &serde_json::to_string(&levels)?)?;
        }
        Ok(())
    }

    pub fn is_boss_defeated(&self, player: &str, level: u32) -> Result<bool> {
        Ok(self
            .store
            .get(&keys::boss_marker(player, level))?
            .is_some_and(|v| v == keys::BOSS_DEFEATED))
    }

    pub fn high_score(&self) -> Result<u64> {
        self.read_number(keys::HIGH_SCORE)
    }

    /// Stores `score` if it beats the current high score. Returns whether it did.
    pub fn record_score(&self, score: u64) -> Result<bool> {
        if score <= self.high_score()? {
            return Ok(false);
        }
        self.store.set(keys::HIGH_SCORE, &score.to_string())?;
        Ok(true)
    }

    fn read_number<T>(&self, key: &str) -> Result<T>
    where
        T: std::str::FromStr + Default,
    {
        Ok(self
            .store
            .get(key)?
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;

    fn repo() -> (Arc<InMemoryStore>, ProgressRepository) {
        let store = Arc::new(InMemoryStore::new());
        (store.clone(), ProgressRepository::new(store))
    }

    #[test]
    fn purchased_lives_are_consumed_once() {
        let (store, progress) = repo();
        progress.add_purchased_lives(2).unwrap();

        assert_eq!(progress.take_purchased_lives().unwrap(), 2);
        assert_eq!(store.get(keys::PURCHASED_LIVES).unwrap().as_deref(), Some("0"));
        assert_eq!(progress.take_purchased_lives().unwrap(), 0);
    }

    #[test]
    fn high_score_only_rises() {
        let (_, progress) = repo();
        assert!(progress.record_score(500).unwrap());
        assert!(!progress.record_score(300).unwrap());
        assert!(!progress.record_score(500).unwrap());
        assert_eq!(progress.high_score().unwrap(), 500);
    }

    #[test]
    fn boss_defeats_are_listed_once() {
        let (store, progress) = repo();
        progress.mark_boss_defeated("ana", 3).unwrap();
        progress.mark_boss_defeated("ana", 1).unwrap();
        progress.mark_boss_defeated("ben", 3).unwrap();

        assert_eq!(progress.defeated_boss_levels().unwrap(), vec![1, 3]);
        assert_eq!(
            store.get("ana_boss_3").unwrap().as_deref(),
            Some("defeated")
        );
        assert!(progress.is_boss_defeated("ben", 3).unwrap());
        assert!(!progress.is_boss_defeated("ben", 1).unwrap());
    }

    #[test]
    fn garbage_values_read_as_defaults() {
        let (store, progress) = repo();
        store.set(keys::PLAYER_COINS, "lots").unwrap();
        store.set(keys::DEFEATED_BOSS_LEVELS, "{not json").unwrap();

        assert_eq!(progress.coins().unwrap(), 0);
        assert!(progress.defeated_boss_levels().unwrap().is_empty());
    }

    #[test]
    fn spending_needs_enough_coins() {
        let (_, progress) = repo();
        progress.add_coins(5).unwrap();
        assert!(!progress.spend_coins(6).unwrap());
        assert!(progress.spend_coins(5).unwrap());
        assert_eq!(progress.coins().unwrap(), 0);
    }
}
