use crate::board::State;
use std::collections::HashMap;
use std::ops::Deref;

/// Key of one estimate. Terminal updates use `None` as the action.
pub type StateAction = (State, Option<usize>);

/// Sparse table of expected returns. Unseen entries read as zero and
/// nothing is ever removed.
#[derive(Debug, Clone)]
pub struct ValueTable {
    values: HashMap<StateAction, f64>,
}

impl Deref for ValueTable {
    type Target = HashMap<StateAction, f64>;
    fn deref(&self) -> &<Self as Deref>::Target {
        &self.values
    }
}

impl Default for ValueTable {
    fn default() -> Self {
        ValueTable::new()
    }
}

impl ValueTable {
    pub fn new() -> Self {
        ValueTable {
            values: HashMap::with_capacity(1024),
        }
    }

    pub fn value(&self, state: &State, action: Option<usize>) -> f64 {
        self.values.get(&(*state, action)).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, state: State, action: Option<usize>, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Largest estimate over `actions` in `state`, counting unseen entries as
    /// zero. An empty action list yields zero.
    pub fn max_value(&self, state: &State, actions: &[usize]) -> f64 {
        actions
            .iter()
            .map(|&action| self.value(state, Some(action)))
            .max_by(|value1, value2| value1.total_cmp(value2))
            .unwrap_or(0.0)
    }
}
