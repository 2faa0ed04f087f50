use crate::board::{Board, Mark, Outcome};
use crate::error::InvalidMove;
use std::io::{self, BufRead, Write};

/// What a presentation layer has to provide to host a session.
pub trait Frontend {
    fn render(&mut self, board: &Board) -> io::Result<()>;
    /// Cell index 0-8 picked by the human player.
    fn choose_cell(&mut self, board: &Board) -> io::Result<usize>;
    fn reject(&mut self, err: &InvalidMove) -> io::Result<()>;
    fn announce(&mut self, outcome: Outcome) -> io::Result<()>;
    fn play_again(&mut self) -> io::Result<bool>;
}

pub fn outcome_message(outcome: Outcome) -> String {
    match outcome {
        Outcome::Win(mark) => format!("{} wins!", mark.as_char()),
        Outcome::Drawn => "It's a draw!".to_owned(),
        Outcome::InPlay => "The game is still in play.".to_owned(),
    }
}

/// Line-based frontend: the human enters a row and a column, 1 to 3 each.
pub struct TerminalFrontend<I, O> {
    input: I,
    output: O,
    name: String,
}

impl<I: BufRead, O: Write> TerminalFrontend<I, O> {
    pub fn new(input: I, output: O, name: String) -> Self {
        TerminalFrontend {
            input,
            output,
            name,
        }
    }

    pub fn into_output(self) -> O {
        self.output
    }

    fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_owned())
    }

    fn read_coordinate(&mut self, label: &str) -> io::Result<usize> {
        writeln!(self.output, "please, enter the {} number (1-3):", label)?;
        loop {
            let line = self.read_line()?;
            match line.parse::<usize>() {
                Ok(n @ 1..=3) => return Ok(n - 1),
                _ => writeln!(
                    self.output,
                    "Unknown symbol, please, try again (a number 1, 2 or 3):"
                )?,
            }
        }
    }
}

impl<I: BufRead, O: Write> Frontend for TerminalFrontend<I, O> {
    fn render(&mut self, board: &Board) -> io::Result<()> {
        writeln!(self.output, "{}", board)
    }

    fn choose_cell(&mut self, _board: &Board) -> io::Result<usize> {
        writeln!(
            self.output,
            "{}, please, choose your move ({})",
            self.name,
            Mark::Cross.as_char()
        )?;
        let row = self.read_coordinate("row")?;
        let col = self.read_coordinate("column")?;
        Ok(row * 3 + col)
    }

    fn reject(&mut self, err: &InvalidMove) -> io::Result<()> {
        writeln!(self.output, "{}, please, choose another one.", err)
    }

    fn announce(&mut self, outcome: Outcome) -> io::Result<()> {
        writeln!(self.output, "Game Over: {}", outcome_message(outcome))
    }

    fn play_again(&mut self) -> io::Result<bool> {
        writeln!(self.output, "Do you want to play again? (y/n)")?;
        loop {
            let line = self.read_line()?;
            match line.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "Please, answer y or n:")?,
            }
        }
    }
}
