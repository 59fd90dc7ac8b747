//! Game configuration
//!
//! Tunables for combat, hazards and the player's starting dice, loadable from
//! an rc-style file:
//!
//! ```text
//! # dicebound.rc
//! OPTIONS=combat:legacy,trap_tile:3
//! OPTIONS=!instant_win
//! OPTIONS=player_damage:1-3
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::CombatRules;
use crate::consts::POWERUP_OFFERS;
use crate::entity::{Player, StatRange};
use crate::hazard::HazardTable;
use crate::level::ProceduralSpec;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Invalid value '{1}' for option '{0}'")]
    InvalidValue(String, String),

    #[error("Missing value for option '{0}'")]
    MissingValue(String),
}

/// Starting dice for a fresh run, before meta upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerTemplate {
    /// Starting HP; `None` uses the first level's start value
    pub hp: Option<u32>,
    pub damage: StatRange,
    pub speed: StatRange,
    pub intelligence: StatRange,
}

impl Default for PlayerTemplate {
    fn default() -> Self {
        Self {
            hp: None,
            damage: StatRange::new(1, 2),
            speed: StatRange::new(1, 2),
            intelligence: StatRange::new(1, 2),
        }
    }
}

impl PlayerTemplate {
    pub fn build(&self, level_start_value: u32) -> Player {
        Player::new(
            self.hp.unwrap_or(level_start_value),
            self.damage,
            self.speed,
            self.intelligence,
        )
    }
}

/// All rules tunables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub combat: CombatRules,
    pub hazards: HazardTable,
    pub player: PlayerTemplate,
    /// Generator settings for levels without a usable layout
    pub procedural: ProceduralSpec,
    /// Power-ups offered between levels
    pub powerup_offers: usize,
    pub detect_unwinnable: bool,
    pub instant_win: bool,
    /// Value range of items from delayed spawns
    pub spawn_item_value: StatRange,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            combat: CombatRules::default(),
            hazards: HazardTable::default(),
            player: PlayerTemplate::default(),
            procedural: ProceduralSpec::default(),
            powerup_offers: POWERUP_OFFERS,
            detect_unwinnable: true,
            instant_win: true,
            spawn_item_value: StatRange::new(1, 2),
        }
    }
}

fn parse_range(name: &str, value: &str) -> Result<StatRange, ConfigError> {
    let invalid = || ConfigError::InvalidValue(name.to_string(), value.to_string());
    let (min, max) = match value.split_once('-') {
        Some((lo, hi)) => (
            lo.trim().parse().map_err(|_| invalid())?,
            hi.trim().parse().map_err(|_| invalid())?,
        ),
        None => {
            let n: u32 = value.parse().map_err(|_| invalid())?;
            (n, n)
        }
    };
    if min > max {
        return Err(invalid());
    }
    Ok(StatRange::new(min, max))
}

fn parse_number(name: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue(name.to_string(), value.to_string()))
}

impl GameConfig {
    /// Load configuration from a file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::parse_config(&contents)
    }

    /// Parse configuration from rc-format text
    pub fn parse_config(contents: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for line in contents.lines() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if let Some(opts) = line.strip_prefix("OPTIONS=") {
                for opt in opts.split(',') {
                    config.parse_option(opt.trim())?;
                }
            }
        }

        Ok(config)
    }

    fn parse_option(&mut self, opt: &str) -> Result<(), ConfigError> {
        let (negated, name) = match opt.strip_prefix('!') {
            Some(name) => (true, name),
            None => (false, opt),
        };

        if let Some((key, value)) = name.split_once(':') {
            return self.set_option(key.trim(), value.trim());
        }

        self.set_bool_option(name, !negated)
    }

    fn set_bool_option(&mut self, name: &str, value: bool) -> Result<(), ConfigError> {
        match name {
            "instant_win" => self.instant_win = value,
            "detect_unwinnable" => self.detect_unwinnable = value,
            "combat" | "damage_tile" | "trap_tile" | "trap_chance" | "offers" | "player_hp"
            | "player_damage" | "player_speed" | "player_intelligence" | "spawn_value" => {
                return Err(ConfigError::MissingValue(name.to_string()));
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    fn set_option(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        match name {
            "combat" => {
                self.combat = match value.to_lowercase().as_str() {
                    "duel" | "hp" => CombatRules::HpDuel,
                    "legacy" | "strict" => CombatRules::ValueAbsorb { strict: true },
                    "legacy-lenient" | "lenient" => CombatRules::ValueAbsorb { strict: false },
                    _ => {
                        return Err(ConfigError::InvalidValue(
                            name.to_string(),
                            value.to_string(),
                        ));
                    }
                };
            }
            "damage_tile" => self.hazards.damage = parse_number(name, value)?,
            "trap_tile" => self.hazards.trap = parse_number(name, value)?,
            "trap_chance" => {
                let pct = parse_number(name, value)?;
                if pct > 100 {
                    return Err(ConfigError::InvalidValue(
                        name.to_string(),
                        value.to_string(),
                    ));
                }
                self.hazards.trap_skip_percent = pct;
            }
            "offers" => self.powerup_offers = parse_number(name, value)? as usize,
            "player_hp" => {
                let hp = parse_number(name, value)?;
                if hp == 0 {
                    return Err(ConfigError::InvalidValue(
                        name.to_string(),
                        value.to_string(),
                    ));
                }
                self.player.hp = Some(hp);
            }
            "player_damage" => self.player.damage = parse_range(name, value)?,
            "player_speed" => self.player.speed = parse_range(name, value)?,
            "player_intelligence" => self.player.intelligence = parse_range(name, value)?,
            "spawn_value" => self.spawn_item_value = parse_range(name, value)?,
            "instant_win" | "detect_unwinnable" => {
                self.set_bool_option(name, !matches!(value, "false" | "off" | "0"))?;
            }
            _ => return Err(ConfigError::UnknownOption(name.to_string())),
        }
        Ok(())
    }

    /// Save configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_config_string())
            .map_err(|e| ConfigError::IoError(e.to_string()))
    }

    /// Render in the format [`GameConfig::parse_config`] reads
    ///
    /// The procedural generator settings are not part of the rc format.
    pub fn to_config_string(&self) -> String {
        let mut lines = Vec::new();
        lines.push("# DiceBound configuration file".to_string());
        lines.push(String::new());

        let combat = match self.combat {
            CombatRules::HpDuel => "duel",
            CombatRules::ValueAbsorb { strict: true } => "legacy",
            CombatRules::ValueAbsorb { strict: false } => "legacy-lenient",
        };
        lines.push(format!("OPTIONS=combat:{combat}"));
        lines.push(format!(
            "OPTIONS=damage_tile:{},trap_tile:{},trap_chance:{}",
            self.hazards.damage, self.hazards.trap, self.hazards.trap_skip_percent
        ));
        lines.push(format!(
            "OPTIONS={},{}",
            if self.instant_win { "instant_win" } else { "!instant_win" },
            if self.detect_unwinnable {
                "detect_unwinnable"
            } else {
                "!detect_unwinnable"
            }
        ));
        lines.push(format!("OPTIONS=offers:{}", self.powerup_offers));

        lines.push(String::new());
        lines.push("# Starting dice".to_string());
        if let Some(hp) = self.player.hp {
            lines.push(format!("OPTIONS=player_hp:{hp}"));
        }
        lines.push(format!("OPTIONS=player_damage:{}", self.player.damage));
        lines.push(format!("OPTIONS=player_speed:{}", self.player.speed));
        lines.push(format!(
            "OPTIONS=player_intelligence:{}",
            self.player.intelligence
        ));
        lines.push(format!("OPTIONS=spawn_value:{}", self.spawn_item_value));

        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.combat, CombatRules::HpDuel);
        assert_eq!(config.hazards.damage, 1);
        assert_eq!(config.hazards.trap, 2);
        assert_eq!(config.hazards.trap_skip_percent, 0);
        assert_eq!(config.powerup_offers, 3);
        assert!(config.instant_win);
        assert!(config.detect_unwinnable);
    }

    #[test]
    fn test_parse_options() {
        let config = GameConfig::parse_config(
            "# comment\n\
             OPTIONS=combat:legacy,trap_tile:3\n\
             OPTIONS=!instant_win\n\
             OPTIONS=player_damage:1-3,player_hp:5\n",
        )
        .unwrap();
        assert_eq!(config.combat, CombatRules::ValueAbsorb { strict: true });
        assert_eq!(config.hazards.trap, 3);
        assert!(!config.instant_win);
        assert_eq!(config.player.damage, StatRange::new(1, 3));
        assert_eq!(config.player.hp, Some(5));
    }

    #[test]
    fn test_bad_options() {
        assert_eq!(
            GameConfig::parse_config("OPTIONS=telepathy"),
            Err(ConfigError::UnknownOption("telepathy".to_string()))
        );
        assert!(matches!(
            GameConfig::parse_config("OPTIONS=player_speed:3-1"),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            GameConfig::parse_config("OPTIONS=trap_chance:150"),
            Err(ConfigError::InvalidValue(..))
        ));
        assert!(matches!(
            GameConfig::parse_config("OPTIONS=combat"),
            Err(ConfigError::MissingValue(_))
        ));
    }

    #[test]
    fn test_roundtrip() {
        let mut config = GameConfig::default();
        config.combat = CombatRules::ValueAbsorb { strict: false };
        config.detect_unwinnable = false;
        config.player.hp = Some(4);
        config.spawn_item_value = StatRange::new(2, 3);
        let back = GameConfig::parse_config(&config.to_config_string()).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_load_from_file() {
        let dir = std::env::temp_dir().join(format!("dicebound-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("dicebound.rc");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "OPTIONS=damage_tile:4").unwrap();
        drop(file);
        let config = GameConfig::load_from_file(&path).unwrap();
        assert_eq!(config.hazards.damage, 4);
        std::fs::remove_dir_all(&dir).unwrap();

        assert!(matches!(
            GameConfig::load_from_file(&dir.join("missing.rc")),
            Err(ConfigError::IoError(_))
        ));
    }
}
