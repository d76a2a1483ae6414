//! Configuration strings for agents.
//!
//! The grammar, with parameters optional and falling back to the listed defaults:
//!
//! | spec | agent |
//! |---|---|
//! | `random` | [`RandomAgent`](crate::agent::RandomAgent) |
//! | `greedy` | [`GreedyAgent`](crate::agent::GreedyAgent) |
//! | `minimax[:depth]` | [`MinimaxAgent`](crate::agent::MinimaxAgent), depth 4 |
//! | `alpha_beta[:depth]` | [`AlphaBetaAgent`](crate::agent::AlphaBetaAgent), depth 4 |
//! | `expectimax[:depth[:random\|greedy]]` | [`ExpectimaxAgent`](crate::agent::ExpectimaxAgent), depth 4 vs `random` |
//! | `monte_carlo[:iterations[:exploration]]` | [`MctsAgent`](crate::agent::MctsAgent), 50 iterations, exploration 1.5 |
//! | `qlearn[:alpha:gamma:epsilon]` | [`QLearnAgent`](crate::agent::QLearnAgent), 0.3/0.9/0.1, fresh table |
//!
//! Unknown names and invalid parameters fail fast with
//! [`ConfigError`](crate::error::ConfigError) before any game starts.
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

use crate::agent::expectimax::{GreedyOpponent, UniformOpponent};
use crate::agent::{
    Agent, AlphaBetaAgent, ExpectimaxAgent, GreedyAgent, MctsAgent, MinimaxAgent, QLearnAgent,
    QTable, RandomAgent,
};
use crate::agent::qlearn::QLearnParams;
use crate::board::MAX_SIZE;
use crate::error::ConfigError;
use crate::eval::ScoreDiff;

const AGENT_NAMES: &[&str] = &[
    "random",
    "greedy",
    "minimax",
    "alpha_beta",
    "expectimax",
    "monte_carlo",
    "qlearn",
];

/// A parsed and validated agent configuration, ready to [`build`](AgentSpec::build).
#[derive(Debug, Clone, PartialEq)]
pub enum AgentSpec {
    Random,
    Greedy,
    Minimax { depth: u32 },
    AlphaBeta { depth: u32 },
    Expectimax { depth: u32, opponent: OpponentKind },
    MonteCarlo { iterations: u64, exploration: f32 },
    QLearn { alpha: f32, gamma: f32, epsilon: f32 },
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum OpponentKind {
    Random,
    Greedy,
}

impl AgentSpec {
    /// Build the configured agent, seeding its RNG from `seed`.
    /// The Q-learning agent starts from a fresh empty table; training code that
    /// wants to inject a trained table constructs [`QLearnAgent`] directly.
    pub fn build(&self, seed: u64) -> Box<dyn Agent> {
        let rng = Xoshiro256PlusPlus::seed_from_u64(seed);

        match *self {
            AgentSpec::Random => Box::new(RandomAgent::new(rng)),
            AgentSpec::Greedy => Box::new(GreedyAgent::new(ScoreDiff, rng)),
            AgentSpec::Minimax { depth } => Box::new(MinimaxAgent::new(depth, ScoreDiff, rng)),
            AgentSpec::AlphaBeta { depth } => Box::new(AlphaBetaAgent::new(depth, ScoreDiff, rng)),
            AgentSpec::Expectimax {
                depth,
                opponent: OpponentKind::Random,
            } => Box::new(ExpectimaxAgent::new(depth, ScoreDiff, UniformOpponent, rng)),
            AgentSpec::Expectimax {
                depth,
                opponent: OpponentKind::Greedy,
            } => Box::new(ExpectimaxAgent::new(
                depth,
                ScoreDiff,
                GreedyOpponent::new(ScoreDiff),
                rng,
            )),
            AgentSpec::MonteCarlo {
                iterations,
                exploration,
            } => Box::new(MctsAgent::new(iterations, exploration, rng)),
            AgentSpec::QLearn {
                alpha,
                gamma,
                epsilon,
            } => {
                let params = QLearnParams {
                    alpha,
                    gamma,
                    epsilon,
                    ..QLearnParams::default()
                };
                Box::new(QLearnAgent::new(params, QTable::new(), rng))
            }
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        fn check_range(name: &'static str, value: f32, ok: bool, range: &'static str) -> Result<(), ConfigError> {
            if ok {
                Ok(())
            } else {
                Err(ConfigError::ParamOutOfRange { name, value, range })
            }
        }

        match *self {
            AgentSpec::Random | AgentSpec::Greedy => Ok(()),
            AgentSpec::Minimax { depth } | AgentSpec::AlphaBeta { depth } | AgentSpec::Expectimax { depth, .. } => {
                if depth == 0 {
                    Err(ConfigError::InvalidDepth(depth))
                } else {
                    Ok(())
                }
            }
            AgentSpec::MonteCarlo {
                iterations,
                exploration,
            } => {
                if iterations == 0 {
                    return Err(ConfigError::InvalidIterations(iterations));
                }
                check_range(
                    "exploration",
                    exploration,
                    exploration.is_finite() && exploration >= 0.0,
                    ">= 0",
                )
            }
            AgentSpec::QLearn { alpha, gamma, epsilon } => {
                check_range("alpha", alpha, alpha > 0.0 && alpha <= 1.0, "(0, 1]")?;
                check_range("gamma", gamma, (0.0..=1.0).contains(&gamma), "[0, 1]")?;
                check_range("epsilon", epsilon, (0.0..=1.0).contains(&epsilon), "[0, 1]")
            }
        }
    }
}

/// Validate a board size coming from configuration.
pub fn check_board_size(size: u32) -> Result<u8, ConfigError> {
    if (1..=MAX_SIZE as u32).contains(&size) {
        Ok(size as u8)
    } else {
        Err(ConfigError::InvalidBoardSize(size))
    }
}

impl FromStr for AgentSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match parse::agent_spec(s) {
            Ok((_, spec)) => {
                spec.validate()?;
                Ok(spec)
            }
            Err(_) => {
                let name = s.split(':').next().unwrap_or(s);
                if AGENT_NAMES.contains(&name) {
                    Err(ConfigError::MalformedSpec(s.to_owned()))
                } else {
                    Err(ConfigError::UnknownAgent(name.to_owned()))
                }
            }
        }
    }
}

impl Display for AgentSpec {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match *self {
            AgentSpec::Random => write!(f, "random"),
            AgentSpec::Greedy => write!(f, "greedy"),
            AgentSpec::Minimax { depth } => write!(f, "minimax:{}", depth),
            AgentSpec::AlphaBeta { depth } => write!(f, "alpha_beta:{}", depth),
            AgentSpec::Expectimax { depth, opponent } => {
                let opponent = match opponent {
                    OpponentKind::Random => "random",
                    OpponentKind::Greedy => "greedy",
                };
                write!(f, "expectimax:{}:{}", depth, opponent)
            }
            AgentSpec::MonteCarlo {
                iterations,
                exploration,
            } => write!(f, "monte_carlo:{}:{}", iterations, exploration),
            AgentSpec::QLearn { alpha, gamma, epsilon } => {
                write!(f, "qlearn:{}:{}:{}", alpha, gamma, epsilon)
            }
        }
    }
}

mod parse {
    use nom::branch::alt;
    use nom::bytes::complete::tag;
    use nom::character::complete::{char, digit1};
    use nom::combinator::{eof, map, map_res, opt, value};
    use nom::number::complete::float;
    use nom::sequence::{preceded, terminated, tuple};
    use nom::IResult;

    use super::{AgentSpec, OpponentKind};

    pub fn agent_spec(input: &str) -> IResult<&str, AgentSpec> {
        let int_u32 = || map_res(digit1, str::parse::<u32>);
        let int_u64 = || map_res(digit1, str::parse::<u64>);

        let minimax = map(
            preceded(tag("minimax"), opt(preceded(char(':'), int_u32()))),
            |depth| AgentSpec::Minimax {
                depth: depth.unwrap_or(4),
            },
        );

        let alpha_beta = map(
            preceded(tag("alpha_beta"), opt(preceded(char(':'), int_u32()))),
            |depth| AgentSpec::AlphaBeta {
                depth: depth.unwrap_or(4),
            },
        );

        let opponent = alt((
            value(OpponentKind::Random, tag("random")),
            value(OpponentKind::Greedy, tag("greedy")),
        ));

        let expectimax = map(
            tuple((
                tag("expectimax"),
                opt(preceded(char(':'), int_u32())),
                opt(preceded(char(':'), opponent)),
            )),
            |(_, depth, opponent)| AgentSpec::Expectimax {
                depth: depth.unwrap_or(4),
                opponent: opponent.unwrap_or(OpponentKind::Random),
            },
        );

        let monte_carlo = map(
            tuple((
                tag("monte_carlo"),
                opt(preceded(char(':'), int_u64())),
                opt(preceded(char(':'), float)),
            )),
            |(_, iterations, exploration)| AgentSpec::MonteCarlo {
                iterations: iterations.unwrap_or(50),
                exploration: exploration.unwrap_or(1.5),
            },
        );

        let qlearn = map(
            tuple((
                tag("qlearn"),
                opt(tuple((
                    preceded(char(':'), float),
                    preceded(char(':'), float),
                    preceded(char(':'), float),
                ))),
            )),
            |(_, params)| {
                let (alpha, gamma, epsilon) = params.unwrap_or((0.3, 0.9, 0.1));
                AgentSpec::QLearn { alpha, gamma, epsilon }
            },
        );

        terminated(
            alt((
                value(AgentSpec::Random, tag("random")),
                value(AgentSpec::Greedy, tag("greedy")),
                minimax,
                alpha_beta,
                expectimax,
                monte_carlo,
                qlearn,
            )),
            eof,
        )(input)
    }
}
