use hydrodraughts::{GameState, Side, Square};
use std::env;
use std::io::{self, BufRead};

/// Terminal driver for the rules engine. All input mapping and drawing live
/// here; the engine only ever sees validated squares.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    let first_to_move = match args.get(1) {
        Some(arg) => match Side::from_str(arg) {
            Some(side) => side,
            None => {
                println!("Usage: cargo run --bin play [red|black]");
                return;
            }
        },
        None => Side::Red,
    };

    let mut game = GameState::new(first_to_move);
    println!("{}", render(&game));
    println!("{} to move. Enter \"row,col\" (e.g. 2,1), or \"quit\".", game.turn.to_str());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let Ok(line) = line else { break };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        match parse_square(input) {
            Ok(square) => {
                if !game.select(square) {
                    println!("nothing to do at ({}, {})", square.row(), square.col());
                }
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        }

        println!("{}", render(&game));
        if let Some(side) = game.winner() {
            println!("{} wins!", side.to_str());
            break;
        }
        println!("{} to move.", game.turn.to_str());
    }
}

fn parse_square(input: &str) -> Result<Square, String> {
    let mut parts = input.split(',');
    let (Some(row), Some(col), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected \"row,col\", got \"{input}\""));
    };
    let (Ok(row), Ok(col)) = (row.trim().parse::<i16>(), col.trim().parse::<i16>()) else {
        return Err(format!("expected numbers, got \"{input}\""));
    };
    Square::new(row, col).map_err(|e| e.to_string())
}

/// Draw the board: r/b for men, R/B for kings, * for an offered destination.
fn render(game: &GameState) -> String {
    let mut out = String::from("  0 1 2 3 4 5 6 7\n");
    for row in 0..8i16 {
        out.push_str(&format!("{row} "));
        for col in 0..8i16 {
            let square = Square::new(row, col).expect("rows and cols run 0..8");
            let glyph = match game.board.piece_at(square) {
                Some(piece) => match (piece.side(), piece.is_king()) {
                    (Side::Red, false) => 'r',
                    (Side::Red, true) => 'R',
                    (Side::Black, false) => 'b',
                    (Side::Black, true) => 'B',
                },
                None if game.valid_moves.contains_key(&square) => '*',
                None if square.is_playable() => '.',
                None => ' ',
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
