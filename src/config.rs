//! Command-line configuration

use crate::errors::CliError;
use crate::playback::DEFAULT_INTERVAL;
use crate::structures::Capacity;
use crate::Value;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Environment variable holding the default log filter
pub const LOG_ENV: &str = "STEPWISE_LOG";

pub const DEFAULT_CANVAS_CENTER: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    Array,
    Stack,
    Queue,
    Deque,
    Singly,
    Doubly,
    Circular,
    Bst,
    Bfs,
    Dfs,
    Linear,
    Binary,
    Bubble,
    Insertion,
}

impl Scenario {
    pub const ALL: [Scenario; 14] = [
        Scenario::Array,
        Scenario::Stack,
        Scenario::Queue,
        Scenario::Deque,
        Scenario::Singly,
        Scenario::Doubly,
        Scenario::Circular,
        Scenario::Bst,
        Scenario::Bfs,
        Scenario::Dfs,
        Scenario::Linear,
        Scenario::Binary,
        Scenario::Bubble,
        Scenario::Insertion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::Array => "array",
            Scenario::Stack => "stack",
            Scenario::Queue => "queue",
            Scenario::Deque => "deque",
            Scenario::Singly => "singly",
            Scenario::Doubly => "doubly",
            Scenario::Circular => "circular",
            Scenario::Bst => "bst",
            Scenario::Bfs => "bfs",
            Scenario::Dfs => "dfs",
            Scenario::Linear => "linear",
            Scenario::Binary => "binary",
            Scenario::Bubble => "bubble",
            Scenario::Insertion => "insertion",
        }
    }

    /// One-line summary for the usage text
    pub fn summary(self) -> &'static str {
        match self {
            Scenario::Array => "insert, update and remove in a dynamic array",
            Scenario::Stack => "push until overflow, then peek and pop",
            Scenario::Queue => "enqueue until overflow, then dequeue",
            Scenario::Deque => "push and pop at both ends",
            Scenario::Singly => "singly linked list walks from the head",
            Scenario::Doubly => "doubly linked list walks from the closer end",
            Scenario::Circular => "circular list rewires through its tail",
            Scenario::Bst => "insert, find, traverse and delete in a BST",
            Scenario::Bfs => "breadth-first search: [start] [target]",
            Scenario::Dfs => "depth-first search: [start] [target]",
            Scenario::Linear => "linear search: <target> [values...]",
            Scenario::Binary => "binary search: <target> [values...]",
            Scenario::Bubble => "bubble sort",
            Scenario::Insertion => "insertion sort",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| CliError::UnknownScenario(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub scenario: Scenario,
    /// Positional values; their meaning depends on the scenario
    pub values: Vec<Value>,
    pub interval: Duration,
    /// `None` lets the scenario pick its own
    pub capacity: Option<Capacity>,
    pub canvas_center: f64,
    pub seed: Option<u64>,
    pub json: bool,
    /// Log filter; overrides [`LOG_ENV`]
    pub log: Option<String>,
}

impl Config {
    pub fn new(scenario: Scenario) -> Self {
        Config {
            scenario,
            values: Vec::new(),
            interval: DEFAULT_INTERVAL,
            capacity: None,
            canvas_center: DEFAULT_CANVAS_CENTER,
            seed: None,
            json: false,
            log: None,
        }
    }

    /// Parse arguments (program name already stripped)
    ///
    /// Returns `Ok(None)` when help was requested.
    pub fn from_args<I>(args: I) -> Result<Option<Self>, CliError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let mut config: Option<Config> = None;
        let mut values = Vec::new();
        let mut pending = Options::default();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "-h" | "--help" => return Ok(None),
                "--json" => pending.json = true,
                "--interval" => {
                    let ms: u64 = parse(&mut args, "--interval", "interval")?;
                    if ms == 0 {
                        return Err(CliError::InvalidValue {
                            what: "interval",
                            value: ms.to_string(),
                        });
                    }
                    pending.interval = Some(Duration::from_millis(ms));
                }
                "--capacity" => {
                    let limit: usize = parse(&mut args, "--capacity", "capacity")?;
                    pending.capacity = Some(Capacity::fixed(limit)?);
                }
                "--canvas-center" => {
                    let center: f64 = parse(&mut args, "--canvas-center", "canvas center")?;
                    if !center.is_finite() {
                        return Err(CliError::InvalidValue {
                            what: "canvas center",
                            value: center.to_string(),
                        });
                    }
                    pending.canvas_center = Some(center);
                }
                "--seed" => pending.seed = Some(parse(&mut args, "--seed", "seed")?),
                "--log" => {
                    pending.log = Some(args.next().ok_or(CliError::MissingValue("--log"))?)
                }
                option if option.starts_with("--") => {
                    return Err(CliError::UnknownOption(option.to_string()))
                }
                word => match config {
                    None => config = Some(Config::new(word.parse()?)),
                    Some(_) => values.push(word.parse().map_err(|_| CliError::InvalidValue {
                        what: "value",
                        value: word.to_string(),
                    })?),
                },
            }
        }

        let mut config = config.ok_or(CliError::MissingScenario)?;
        config.values = values;
        pending.apply(&mut config);
        Ok(Some(config))
    }
}

/// Options seen before the scenario name is known
#[derive(Default)]
struct Options {
    interval: Option<Duration>,
    capacity: Option<Capacity>,
    canvas_center: Option<f64>,
    seed: Option<u64>,
    json: bool,
    log: Option<String>,
}

impl Options {
    fn apply(self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(center) = self.canvas_center {
            config.canvas_center = center;
        }
        config.capacity = self.capacity;
        config.seed = self.seed;
        config.json = self.json;
        config.log = self.log;
    }
}

fn parse<T: FromStr>(
    args: &mut impl Iterator<Item = String>,
    option: &'static str,
    what: &'static str,
) -> Result<T, CliError> {
    let raw = args.next().ok_or(CliError::MissingValue(option))?;
    raw.parse()
        .map_err(|_| CliError::InvalidValue { what, value: raw })
}

/// Usage text printed for `--help` and argument errors
pub fn usage(program: &str) -> String {
    let mut text = format!("Usage: {} <scenario> [values...] [options]\n\nScenarios:\n", program);
    for scenario in Scenario::ALL {
        text.push_str(&format!("  {:<10} {}\n", scenario.name(), scenario.summary()));
    }
    text.push_str(
        "\nOptions:\n  \
         --interval <ms>       auto-play interval (default 600)\n  \
         --capacity <n>        fixed capacity for array/stack/queue/deque\n  \
         --canvas-center <x>   x coordinate of the BST root (default 400)\n  \
         --seed <n>            generate random input from this seed\n  \
         --json                print the frames as JSON instead of the TUI\n  \
         --log <filter>        log filter, overrides STEPWISE_LOG\n",
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(line: &str) -> Vec<String> {
        line.split_whitespace().map(str::to_string).collect()
    }

    #[test]
    fn parses_scenario_values_and_options() {
        let config = Config::from_args(args("stack 5 7 9 --capacity 2 --interval 250 --json"))
            .unwrap()
            .unwrap();
        assert_eq!(config.scenario, Scenario::Stack);
        assert_eq!(config.values, vec![5, 7, 9]);
        assert_eq!(config.capacity, Some(Capacity::Fixed(2)));
        assert_eq!(config.interval, Duration::from_millis(250));
        assert!(config.json);
        assert_eq!(config.canvas_center, DEFAULT_CANVAS_CENTER);
    }

    #[test]
    fn options_may_come_first() {
        let config = Config::from_args(args("--seed 42 bst --canvas-center 120"))
            .unwrap()
            .unwrap();
        assert_eq!(config.scenario, Scenario::Bst);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.canvas_center, 120.0);
    }

    #[test]
    fn negative_values_are_positional() {
        let config = Config::from_args(args("linear -3 4 -3")).unwrap().unwrap();
        assert_eq!(config.values, vec![-3, 4, -3]);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Config::from_args(args("")),
            Err(CliError::MissingScenario)
        ));
        assert!(matches!(
            Config::from_args(args("heap")),
            Err(CliError::UnknownScenario(_))
        ));
        assert!(matches!(
            Config::from_args(args("array --capacity 0")),
            Err(CliError::Engine(_))
        ));
        assert!(matches!(
            Config::from_args(args("array --interval")),
            Err(CliError::MissingValue("--interval"))
        ));
        assert!(matches!(
            Config::from_args(args("array x")),
            Err(CliError::InvalidValue { what: "value", .. })
        ));
        assert!(matches!(
            Config::from_args(args("array --fast")),
            Err(CliError::UnknownOption(_))
        ));
        assert!(Config::from_args(args("bfs --help")).unwrap().is_none());
    }
}
