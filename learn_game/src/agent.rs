use crate::board::State;
use crate::config::AgentConfig;
use crate::q_table::ValueTable;
use itertools::Itertools;
use log::debug;
use rand::rngs::StdRng;
use rand::{prelude::SliceRandom, Rng, SeedableRng};

/// Epsilon-greedy agent learning by one-step Q-learning.
///
/// The agent owns its value table and its random source; both are handed in
/// at construction so a caller can start from a prepared table or replay a
/// game exactly with a seeded generator.
#[derive(Debug)]
pub struct QLearningAgent<R: Rng = StdRng> {
    table: ValueTable,
    learning_rate: f64,
    discount_factor: f64,
    epsilon: f64,
    rng: R,
}

impl QLearningAgent<StdRng> {
    /// Empty table, seeded from `config.seed` or from system entropy.
    pub fn from_config(config: &AgentConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        QLearningAgent::new(config, ValueTable::new(), rng)
    }
}

impl<R: Rng> QLearningAgent<R> {
    pub fn new(config: &AgentConfig, table: ValueTable, rng: R) -> Self {
        QLearningAgent {
            table,
            learning_rate: config.learning_rate,
            discount_factor: config.discount_factor,
            epsilon: config.epsilon,
            rng,
        }
    }

    pub fn table(&self) -> &ValueTable {
        &self.table
    }

    pub fn table_mut(&mut self) -> &mut ValueTable {
        &mut self.table
    }

    /// Picks a move among `available`: a uniform random one with probability
    /// epsilon, otherwise one of the highest-valued moves, ties broken at
    /// random.
    ///
    /// # Panics
    ///
    /// Panics if `available` is empty. Callers check for a terminal board first.
    pub fn choose_action(&mut self, state: &State, available: &[usize]) -> usize {
        assert!(
            !available.is_empty(),
            "choose_action called on a board with no empty cell ({})",
            state
        );
        if self.rng.gen::<f64>() < self.epsilon {
            let action = *available
                .choose(&mut self.rng)
                .expect("available is not empty");
            debug!("state {}: exploring with move {}", state, action);
            return action;
        }
        let best_moves = available.iter().max_set_by(|&&action1, &&action2| {
            self.table
                .value(state, Some(action1))
                .total_cmp(&self.table.value(state, Some(action2)))
        });
        let action = **best_moves
            .choose(&mut self.rng)
            .expect("available is not empty");
        debug!("state {}: greedy move {} out of {:?}", state, action, best_moves);
        action
    }

    /// One-step Q-learning:
    /// `Q(s,a) <- Q(s,a) + lr * (reward + gamma * max_a' Q(s',a') - Q(s,a))`.
    ///
    /// The bootstrap term is zero when `is_terminal` is set or there is no
    /// next state. Returns the stored value.
    pub fn update_value(
        &mut self,
        prev_state: &State,
        action: Option<usize>,
        reward: f64,
        next_state: Option<&State>,
        is_terminal: bool,
    ) -> f64 {
        let next_max = match next_state {
            Some(next) if !is_terminal => self.table.max_value(next, &next.available_actions()),
            _ => 0.0,
        };
        let old_value = self.table.value(prev_state, action);
        let new_value = old_value
            + self.learning_rate * (reward + self.discount_factor * next_max - old_value);
        debug!(
            "update ({}, {:?}): {:.4} -> {:.4} (reward {}, next max {:.4})",
            prev_state, action, old_value, new_value, reward, next_max
        );
        self.table.set(*prev_state, action, new_value);
        new_value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{Board, Mark};
    use std::collections::HashSet;

    fn greedy_config() -> AgentConfig {
        AgentConfig {
            epsilon: 0.0,
            ..AgentConfig::default()
        }
    }

    fn agent_with(config: &AgentConfig, seed: u64) -> QLearningAgent {
        QLearningAgent::new(config, ValueTable::new(), StdRng::seed_from_u64(seed))
    }

    #[test]
    fn greedy_agent_picks_unique_maximum() {
        let state = Board::new().state();
        let mut table = ValueTable::new();
        table.set(state, Some(4), 10.0);
        for seed in 0..20 {
            let mut agent =
                QLearningAgent::new(&greedy_config(), table.clone(), StdRng::seed_from_u64(seed));
            let available: Vec<usize> = (0..9).collect();
            assert_eq!(agent.choose_action(&state, &available), 4);
        }
    }

    #[test]
    fn ties_are_broken_among_best_moves_only() {
        let state = Board::new().state();
        let mut table = ValueTable::new();
        table.set(state, Some(2), 0.5);
        table.set(state, Some(6), 0.5);
        table.set(state, Some(0), -0.3);
        let mut agent = QLearningAgent::new(&greedy_config(), table, StdRng::seed_from_u64(3));
        let available: Vec<usize> = (0..9).collect();
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let action = agent.choose_action(&state, &available);
            assert!(action == 2 || action == 6, "picked {}", action);
            seen.insert(action);
        }
        assert_eq!(seen.len(), 2);
    }

    #[test]
    fn unseen_moves_tie_at_zero() {
        let state = Board::new().state();
        let mut agent = agent_with(&greedy_config(), 11);
        let mut seen = HashSet::new();
        for _ in 0..500 {
            seen.insert(agent.choose_action(&state, &[1, 3, 5]));
        }
        assert_eq!(seen, [1, 3, 5].into_iter().collect::<HashSet<_>>());
    }

    #[test]
    fn exploring_agent_stays_within_available_moves() {
        let config = AgentConfig {
            epsilon: 1.0,
            ..AgentConfig::default()
        };
        let state = Board::new().state();
        let mut table = ValueTable::new();
        table.set(state, Some(4), 10.0);
        let mut agent = QLearningAgent::new(&config, table, StdRng::seed_from_u64(5));
        let mut seen = HashSet::new();
        for _ in 0..200 {
            let action = agent.choose_action(&state, &[0, 4, 8]);
            assert!([0, 4, 8].contains(&action));
            seen.insert(action);
        }
        assert!(seen.contains(&0) && seen.contains(&8));
    }

    #[test]
    #[should_panic(expected = "no empty cell")]
    fn choosing_without_moves_is_a_contract_violation() {
        let mut agent = agent_with(&greedy_config(), 0);
        agent.choose_action(&Board::new().state(), &[]);
    }

    #[test]
    fn terminal_update_ignores_next_state() {
        let mut agent = agent_with(&AgentConfig::default(), 0);
        let state = Board::new().state();
        let value = agent.update_value(&state, Some(0), 1.0, None, true);
        assert!((value - 0.1).abs() < 1e-12);
        assert!((agent.table().value(&state, Some(0)) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn non_terminal_update_bootstraps_from_next_state() {
        let mut agent = agent_with(&AgentConfig::default(), 0);
        let prev = Board::new().state();
        let mut board = Board::new();
        board.place(4, Mark::Nought).unwrap();
        let next = board.state();
        agent.table_mut().set(next, Some(0), 0.8);
        agent.table_mut().set(next, Some(1), -0.4);
        agent.table_mut().set(prev, Some(4), 0.2);
        // 0.2 + 0.1 * (0 + 0.95 * 0.8 - 0.2)
        let value = agent.update_value(&prev, Some(4), 0.0, Some(&next), false);
        assert!((value - 0.256).abs() < 1e-12);
        // terminal flag wins over a supplied next state
        let value = agent.update_value(&prev, Some(4), 0.0, Some(&next), true);
        assert!((value - (0.256 - 0.0256)).abs() < 1e-12);
    }

    #[test]
    fn negative_next_values_are_capped_by_unseen_moves() {
        let mut agent = agent_with(&AgentConfig::default(), 0);
        let prev = Board::new().state();
        let mut board = Board::new();
        board.place(0, Mark::Cross).unwrap();
        let next = board.state();
        agent.table_mut().set(next, Some(1), -1.0);
        let value = agent.update_value(&prev, Some(0), 0.0, Some(&next), false);
        assert_eq!(value, 0.0);
    }
}
