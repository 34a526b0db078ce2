use std::path::Path;

pub(crate) use nexus_engine::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use nexus_engine::games::tictactoe::{
    Difficulty, GameMode, GameSettings, MatchOptions, MatchSession, PlayerProfile, PlayerSlot, StartOption,
};
use serde::{Deserialize, Serialize};

const CONFIG_FILE: &str = "nexus_tictactoe_config.yaml";

pub type ClientConfigManager = ConfigManager<FileContentConfigProvider, Config, YamlConfigSerializer>;

pub fn get_config_manager(path: Option<&Path>) -> ClientConfigManager {
    match path {
        Some(path) => ConfigManager::from_yaml_file(path),
        None => ConfigManager::from_yaml_file(CONFIG_FILE),
    }
}

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
pub struct Config {
    pub player1: PlayerProfile,
    pub player2: PlayerProfile,
    #[serde(default)]
    pub ai_difficulty: Difficulty,
    #[serde(default)]
    pub start_option: StartOption,
    #[serde(default)]
    pub ai_human_side: PlayerSlot,
    #[serde(default)]
    pub game_mode: GameMode,
    pub grid_size: usize,
    pub win_length: usize,
}

impl Config {
    pub fn settings(&self) -> GameSettings {
        GameSettings {
            grid_size: self.grid_size,
            win_length: self.win_length,
        }
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            player1: self.player1.clone(),
            player2: self.player2.clone(),
            mode: self.game_mode,
            human_side: self.ai_human_side,
            difficulty: self.ai_difficulty,
            start_option: self.start_option,
            settings: self.settings(),
        }
    }

    /// Copies scores, stored names and preferences out of a running match.
    pub fn record_session(&mut self, session: &MatchSession) {
        self.player1 = session.stored_profile(PlayerSlot::Player1);
        self.player2 = session.stored_profile(PlayerSlot::Player2);
        self.ai_difficulty = session.difficulty();
        self.start_option = session.start_option();
        self.ai_human_side = session.human_side();
        self.game_mode = session.mode();
        let settings = session.settings();
        self.grid_size = settings.grid_size;
        self.win_length = settings.win_length;
    }
}

impl Validate for Config {
    fn validate(&self) -> Result<(), String> {
        if self.player1.symbol.is_empty() || self.player2.symbol.is_empty() {
            return Err("player symbols must not be empty".to_string());
        }
        if self.player1.symbol == self.player2.symbol {
            return Err("players must use different symbols".to_string());
        }
        if self.player1.name.trim().is_empty() || self.player2.name.trim().is_empty() {
            return Err("player names must not be empty".to_string());
        }
        self.settings().validate()
    }
}

impl Default for Config {
    fn default() -> Self {
        let settings = GameSettings::default();
        Self {
            player1: PlayerProfile::new("X", "Player 1"),
            player2: PlayerProfile::new("O", "Player 2"),
            ai_difficulty: Difficulty::Medium,
            start_option: StartOption::Alternate,
            ai_human_side: PlayerSlot::Player1,
            game_mode: GameMode::Pvp,
            grid_size: settings.grid_size,
            win_length: settings.win_length,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_engine::config::{ConfigContentProvider, ConfigSerializer};
    use nexus_engine::games::SessionRng;
    use nexus_engine::games::tictactoe::Position;

    fn get_temp_file_path() -> String {
        use std::env;
        let mut path = env::temp_dir();
        let random_number: u32 = rand::random();
        let file_name = format!("temp_nexus_tictactoe_config_{}.yaml", random_number);
        path.push(file_name);
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_string() {
        let default_config = Config::default();
        let serializer = YamlConfigSerializer::new();
        let serialized_string = serializer.serialize(&default_config).unwrap();
        let deserialized_config: Config = serializer.deserialize(&serialized_string).unwrap();
        assert_eq!(default_config, deserialized_config);
    }

    #[test]
    fn test_default_config_can_be_serialized_and_deserialized_manager() {
        let mut config = Config::default();
        config.player1.score = 4;
        config.player1.games = 7;
        config.grid_size = 5;
        config.win_length = 4;
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(Path::new(&file_path)));

        assert!(manager.set_config(&config).is_ok());
        assert_eq!(manager.get_config().unwrap(), config);

        let fresh_manager = get_config_manager(Some(Path::new(&file_path)));
        assert_eq!(fresh_manager.get_config().unwrap(), config);
        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_config_file_does_not_exist_returns_default_config() {
        let manager = get_config_manager(Some(Path::new("this_file_does_not_exist.yaml")));
        assert_eq!(manager.get_config().unwrap(), Config::default());
    }

    #[test]
    fn test_missing_preferences_fall_back_to_defaults() {
        let content = r#"
            player1:
              symbol: "★"
              name: Ada
            player2:
              symbol: "☾"
              name: Grace
              score: 2
              games: 3
            grid_size: 4
            win_length: 3
        "#;
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider.set_config_content(content).unwrap();

        let manager: ClientConfigManager = ConfigManager::new(content_provider, YamlConfigSerializer::new());
        let config = manager.get_config().unwrap();
        assert_eq!(config.player1.score, 0);
        assert_eq!(config.player2.score, 2);
        assert_eq!(config.ai_difficulty, Difficulty::Medium);
        assert_eq!(config.start_option, StartOption::Alternate);
        assert_eq!(config.game_mode, GameMode::Pvp);
        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_invalid_config_cant_be_read() {
        let invalid_config_content = r#"
            player1:
              symbol: X
              name: Ada
            player2:
              symbol: X
              name: Grace
            grid_size: 3
            win_length: 3
        "#;
        let file_path = get_temp_file_path();
        let content_provider = FileContentConfigProvider::new(file_path.clone());
        content_provider.set_config_content(invalid_config_content).unwrap();

        let manager: ClientConfigManager = ConfigManager::new(content_provider, YamlConfigSerializer::new());
        assert!(manager.get_config().is_err());
        let _ = std::fs::remove_file(file_path);
    }

    #[test]
    fn test_win_length_longer_than_grid_is_rejected() {
        let config = Config {
            grid_size: 4,
            win_length: 5,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_record_session_keeps_stored_names() {
        let config = Config {
            game_mode: GameMode::Pvc,
            ai_difficulty: Difficulty::Hard,
            start_option: StartOption::Player1,
            ..Config::default()
        };
        let mut rng = SessionRng::new(3);
        let mut session = MatchSession::new(config.match_options(), &mut rng).unwrap();
        assert_eq!(session.player(PlayerSlot::Player2).name, "AI (hard)");

        session.play_human(Position::new(1, 1)).unwrap();
        let mut saved = Config::default();
        saved.record_session(&session);
        assert_eq!(saved.player2.name, "Player 2");
        assert_eq!(saved.game_mode, GameMode::Pvc);
        assert_eq!(saved.ai_difficulty, Difficulty::Hard);
        assert_eq!(saved.start_option, StartOption::Player1);
    }

    #[test]
    fn test_renamed_players_and_symbols_are_saved() {
        let file_path = get_temp_file_path();
        let manager = get_config_manager(Some(Path::new(&file_path)));
        let mut rng = SessionRng::new(8);
        let mut session = MatchSession::new(Config::default().match_options(), &mut rng).unwrap();
        session.rename(PlayerSlot::Player1, "Ada").unwrap();
        session.set_symbol(PlayerSlot::Player2, "☾", &mut rng).unwrap();

        manager
            .update_config(|config| config.record_session(&session))
            .unwrap();
        let reloaded = get_config_manager(Some(Path::new(&file_path))).get_config().unwrap();
        assert_eq!(reloaded.player1.name, "Ada");
        assert_eq!(reloaded.player1.symbol, "X");
        assert_eq!(reloaded.player2.symbol, "☾");
        let _ = std::fs::remove_file(file_path);
    }
}
