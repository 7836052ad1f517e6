//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

/// Default round length in milliseconds
pub const DEFAULT_DURATION_MS: u64 = 60_000;

/// Default countdown cadence in milliseconds
pub const DEFAULT_TICK_MS: u64 = 1_000;

/// CLI argument parsing structure
#[derive(Parser)]
#[command(name = "timefighter")]
#[command(about = "A timed tapping game served over a local HTTP control surface")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20560")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Round length in milliseconds
    #[arg(short, long, default_value_t = DEFAULT_DURATION_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub duration_ms: u64,

    /// Countdown tick interval in milliseconds
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_parser = clap::value_parser!(u64).range(1..))]
    pub tick_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Timing configuration for the game session
    pub fn game_config(&self) -> GameConfig {
        GameConfig::new(
            Duration::from_millis(self.duration_ms),
            Duration::from_millis(self.tick_ms),
        )
    }
}

/// Fixed timing of a play-through, set once at construction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameConfig {
    pub total_duration: Duration,
    pub tick_interval: Duration,
}

impl GameConfig {
    pub fn new(total_duration: Duration, tick_interval: Duration) -> Self {
        Self {
            total_duration,
            tick_interval,
        }
    }

    /// Whole seconds shown on the clock when a round starts
    pub fn total_seconds(&self) -> u32 {
        u32::try_from(self.total_duration.as_secs()).unwrap_or(u32::MAX)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(DEFAULT_DURATION_MS),
            Duration::from_millis(DEFAULT_TICK_MS),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_one_minute_round() {
        let config = Config::try_parse_from(["timefighter"]).unwrap();
        assert_eq!(config.address(), "127.0.0.1:20560");
        assert_eq!(config.log_level(), "info");
        assert_eq!(config.game_config(), GameConfig::default());
        assert_eq!(GameConfig::default().total_seconds(), 60);
    }

    #[test]
    fn timing_flags_override_defaults() {
        let config = Config::try_parse_from([
            "timefighter", "-d", "3000", "--tick-ms", "500", "-v",
        ])
        .unwrap();
        assert_eq!(config.log_level(), "debug");
        let game = config.game_config();
        assert_eq!(game.total_duration, Duration::from_secs(3));
        assert_eq!(game.tick_interval, Duration::from_millis(500));
        assert_eq!(game.total_seconds(), 3);
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert!(Config::try_parse_from(["timefighter", "--duration-ms", "0"]).is_err());
        assert!(Config::try_parse_from(["timefighter", "--tick-ms", "0"]).is_err());
    }
}
