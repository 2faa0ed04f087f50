use crate::error::{InvalidMove, ParseStateError};
use itertools::Itertools;
use ndarray::prelude::*;
use std::fmt;
use std::str::FromStr;

/// Number of cells on the board; actions are indices below this.
pub const CELLS: usize = 9;

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Mark {
    Cross,
    Nought,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Self::Cross => Mark::Nought,
            Self::Nought => Mark::Cross,
        }
    }
    pub fn as_char(self) -> char {
        match self {
            Self::Cross => 'X',
            Self::Nought => 'O',
        }
    }
}

fn cell_char(cell: Option<Mark>) -> char {
    cell.map_or('-', Mark::as_char)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InPlay,
    Drawn,
    Win(Mark),
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InPlay)
    }
}

/// Snapshot of the nine cells, used as the value-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct State([Option<Mark>; CELLS]);

impl State {
    pub fn cells(&self) -> &[Option<Mark>; CELLS] {
        &self.0
    }
    pub fn available_actions(&self) -> Vec<usize> {
        self.0.iter().positions(|cell| cell.is_none()).collect()
    }
}

impl From<[Option<Mark>; CELLS]> for State {
    fn from(cells: [Option<Mark>; CELLS]) -> Self {
        State(cells)
    }
}

/// Parses the same layout `Display` prints, e.g. `"XX-OO----"`.
impl FromStr for State {
    type Err = ParseStateError;
    fn from_str(layout: &str) -> Result<Self, Self::Err> {
        let cells: Vec<Option<Mark>> = layout
            .chars()
            .map(|ch| match ch {
                'X' => Ok(Some(Mark::Cross)),
                'O' => Ok(Some(Mark::Nought)),
                '-' => Ok(None),
                _ => Err(ParseStateError(layout.to_owned())),
            })
            .collect::<Result<_, _>>()?;
        let cells: [Option<Mark>; CELLS] = cells
            .try_into()
            .map_err(|_| ParseStateError(layout.to_owned()))?;
        Ok(State(cells))
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().map(|&cell| cell_char(cell)).collect::<String>())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: Array2<Option<Mark>>,
}

fn coords(index: usize) -> [usize; 2] {
    [index / 3, index % 3]
}

fn line_winner(line: ArrayView1<Option<Mark>>) -> Option<Mark> {
    let first = line[0]?;
    line.iter().all(|&cell| cell == Some(first)).then_some(first)
}

impl Board {
    pub fn new() -> Self {
        Board {
            cells: Array::from_elem((3, 3), None),
        }
    }

    pub fn from_state(state: &State) -> Self {
        let mut board = Board::new();
        for (slot, &cell) in board.cells.iter_mut().zip(state.cells()) {
            *slot = cell;
        }
        board
    }

    pub fn state(&self) -> State {
        let mut cells = [None; CELLS];
        for (slot, &cell) in cells.iter_mut().zip(self.cells.iter()) {
            *slot = cell;
        }
        State(cells)
    }

    /// Contents of the cell at `index`; `None` for empty or out-of-range cells.
    pub fn cell(&self, index: usize) -> Option<Mark> {
        if index >= CELLS {
            return None;
        }
        self.cells[coords(index)]
    }

    /// Puts `mark` on an empty cell. Turn order is the controller's business.
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<(), InvalidMove> {
        if index >= CELLS {
            return Err(InvalidMove::OutOfRange(index));
        }
        let cell = &mut self.cells[coords(index)];
        if cell.is_some() {
            return Err(InvalidMove::Occupied(index));
        }
        *cell = Some(mark);
        Ok(())
    }

    pub fn available_actions(&self) -> Vec<usize> {
        self.cells.iter().positions(|cell| cell.is_none()).collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    pub fn count(&self, mark: Mark) -> usize {
        self.cells.iter().filter(|&&cell| cell == Some(mark)).count()
    }

    /// X moves first, so O is to move exactly when X is one mark ahead.
    pub fn to_move(&self) -> Mark {
        if self.count(Mark::Cross) > self.count(Mark::Nought) {
            Mark::Nought
        } else {
            Mark::Cross
        }
    }

    /// Scans rows, columns, then both diagonals; the first complete line wins.
    pub fn detect_outcome(&self) -> Outcome {
        let lines = self
            .cells
            .rows()
            .into_iter()
            .chain(self.cells.columns())
            .chain(std::iter::once(self.cells.diag()))
            .chain(std::iter::once(self.cells.slice(s![.., ..;-1]).into_diag()));
        for line in lines {
            if let Some(mark) = line_winner(line) {
                return Outcome::Win(mark);
            }
        }
        if self.is_full() {
            Outcome::Drawn
        } else {
            Outcome::InPlay
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "* * * * *")?;
        for (a, b, c) in self.cells.iter().map(|&cell| cell_char(cell)).tuples::<(_, _, _)>() {
            writeln!(f, "* {} {} {} *", a, b, c)?;
        }
        write!(f, "* * * * *")
    }
}
