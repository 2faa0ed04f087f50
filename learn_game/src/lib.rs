use crate::agent::QLearningAgent;
use crate::board::{Board, Mark, Outcome};
use crate::error::{InvalidMove, SessionError};
use crate::frontend::Frontend;
use log::{debug, info, warn};
use rand::rngs::StdRng;
use rand::Rng;
use std::fmt;

pub mod agent;
pub mod board;
pub mod config;
pub mod error;
pub mod frontend;
pub mod q_table;

/// The human always plays crosses and moves first.
pub const HUMAN: Mark = Mark::Cross;
pub const AGENT: Mark = Mark::Nought;

/// Reward handed to the agent when the game ends; `None` while in play.
pub fn terminal_reward(outcome: Outcome) -> Option<f64> {
    match outcome {
        Outcome::Win(mark) if mark == AGENT => Some(1.0),
        Outcome::Win(_) => Some(-1.0),
        Outcome::Drawn => Some(0.5),
        Outcome::InPlay => None,
    }
}

/// What happened during one call to [`Game::play_human_move`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TurnReport {
    pub agent_move: Option<usize>,
    pub outcome: Outcome,
    /// Terminal reward given to the agent, if the turn ended the game.
    pub reward: Option<f64>,
}

/// One board plus the learning agent playing O on it.
///
/// The agent, and with it the value table, outlives the board: [`Game::reset`]
/// only clears the cells.
pub struct Game<R: Rng = StdRng> {
    board: Board,
    outcome: Outcome,
    agent: QLearningAgent<R>,
}

impl<R: Rng> Game<R> {
    pub fn new(agent: QLearningAgent<R>) -> Self {
        Game {
            board: Board::new(),
            outcome: Outcome::InPlay,
            agent,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn to_move(&self) -> Mark {
        self.board.to_move()
    }

    pub fn agent(&self) -> &QLearningAgent<R> {
        &self.agent
    }

    pub fn reset(&mut self) {
        self.board = Board::new();
        self.outcome = Outcome::InPlay;
        info!("new game, value table holds {} entries", self.agent.table().len());
    }

    /// Places `mark` at `index` if the game is running, it is `mark`'s turn
    /// and the cell is empty. Returns the outcome after the move.
    pub fn apply_move(&mut self, index: usize, mark: Mark) -> Result<Outcome, InvalidMove> {
        if self.outcome.is_terminal() {
            return Err(InvalidMove::GameOver);
        }
        if mark != self.board.to_move() {
            return Err(InvalidMove::OutOfTurn(mark));
        }
        self.board.place(index, mark)?;
        self.outcome = self.board.detect_outcome();
        debug!("{} played {}, outcome {:?}", mark.as_char(), index, self.outcome);
        Ok(self.outcome)
    }

    /// Plays the human's cross at `index`, lets the agent answer if the game
    /// goes on, and settles the terminal reward if either move ended it.
    pub fn play_human_move(&mut self, index: usize) -> Result<TurnReport, InvalidMove> {
        let outcome = self.apply_move(index, HUMAN)?;
        let mut report = TurnReport {
            agent_move: None,
            outcome,
            reward: None,
        };
        if !outcome.is_terminal() {
            report.agent_move = Some(self.agent_turn()?);
            report.outcome = self.outcome;
        }
        report.reward = self.finish();
        Ok(report)
    }

    fn agent_turn(&mut self) -> Result<usize, InvalidMove> {
        let prev_state = self.board.state();
        let action = self.agent.choose_action(&prev_state, &prev_state.available_actions());
        self.apply_move(action, AGENT)?;
        let next_state = self.board.state();
        // Reward 0 and no terminal flag, even when this move ends the game.
        self.agent
            .update_value(&prev_state, Some(action), 0.0, Some(&next_state), false);
        Ok(action)
    }

    /// Terminal update keyed by the final state and no action.
    fn finish(&mut self) -> Option<f64> {
        let reward = terminal_reward(self.outcome)?;
        let final_state = self.board.state();
        self.agent.update_value(&final_state, None, reward, None, true);
        info!("game over at {}: {:?}, reward {}", final_state, self.outcome, reward);
        Some(reward)
    }
}

/// Running tally over the games of one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub human_wins: u32,
    pub agent_wins: u32,
    pub draws: u32,
}

impl Scoreboard {
    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win(mark) if mark == HUMAN => self.human_wins += 1,
            Outcome::Win(_) => self.agent_wins += 1,
            Outcome::Drawn => self.draws += 1,
            Outcome::InPlay => {}
        }
    }

    pub fn games(&self) -> u32 {
        self.human_wins + self.agent_wins + self.draws
    }
}

impl fmt::Display for Scoreboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} games: X won {}, O won {}, {} drawn",
            self.games(),
            self.human_wins,
            self.agent_wins,
            self.draws
        )
    }
}

/// Drives games through a [`Frontend`] until the human stops asking for more.
pub struct Session<F, R: Rng = StdRng> {
    game: Game<R>,
    frontend: F,
    scoreboard: Scoreboard,
}

impl<F: Frontend, R: Rng> Session<F, R> {
    pub fn new(game: Game<R>, frontend: F) -> Self {
        Session {
            game,
            frontend,
            scoreboard: Scoreboard::default(),
        }
    }

    pub fn game(&self) -> &Game<R> {
        &self.game
    }

    pub fn scoreboard(&self) -> Scoreboard {
        self.scoreboard
    }

    pub fn into_parts(self) -> (Game<R>, F) {
        (self.game, self.frontend)
    }

    /// Plays one game from an empty board to its outcome. Rejected moves are
    /// reported to the frontend and asked for again.
    pub fn play_game(&mut self) -> Result<Outcome, SessionError> {
        self.game.reset();
        loop {
            self.frontend.render(self.game.board())?;
            let cell = self.frontend.choose_cell(self.game.board())?;
            match self.game.play_human_move(cell) {
                Ok(report) if report.outcome.is_terminal() => {
                    self.frontend.render(self.game.board())?;
                    self.frontend.announce(report.outcome)?;
                    self.scoreboard.record(report.outcome);
                    return Ok(report.outcome);
                }
                Ok(_) => {}
                Err(err) => {
                    warn!("rejected move {}: {}", cell, err);
                    self.frontend.reject(&err)?;
                }
            }
        }
    }

    pub fn run(&mut self) -> Result<Scoreboard, SessionError> {
        loop {
            self.play_game()?;
            if !self.frontend.play_again()? {
                break;
            }
        }
        info!("session finished, {}", self.scoreboard);
        Ok(self.scoreboard)
    }
}
