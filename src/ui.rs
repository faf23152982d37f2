//! Plain-text rendering of the two boards for the command line.

use std::fmt::Write;

use crate::common::Cell;
use crate::config::{BOARD_SIZE, SHIPS};
use crate::session::Session;

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out, "    {}", title);
    out.push_str("     ");
    for x in 0..BOARD_SIZE {
        let _ = write!(out, " {}", x);
    }
    out.push('\n');
}

/// The local fleet with incoming shots: `S` ship, `X` hit ship, `o` miss.
pub fn render_own_board(session: &Session) -> String {
    let mut out = String::new();
    header(&mut out, "Your fleet");
    for y in 0..BOARD_SIZE {
        let _ = write!(out, "    {:1} ", y);
        for x in 0..BOARD_SIZE {
            let cell = Cell::new(x, y);
            let ship = session.fleet.iter().any(|p| p.contains(cell));
            let shot = session.incoming.contains(&cell);
            let ch = match (ship, shot) {
                (true, true) => 'X',
                (true, false) => 'S',
                (false, true) => 'o',
                (false, false) => '.',
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    let sunk = session.sunk_own_ships();
    for def in SHIPS {
        if session.fleet.iter().any(|p| p.ship == def) {
            let state = if sunk.contains(&def) { "SUNK" } else { "Active" };
            let _ = writeln!(out, "      {} ({}): {}", def, def.length(), state);
        }
    }
    out
}

/// What the local player knows of the opponent: `X` hit, `o` miss.
pub fn render_target_board(session: &Session) -> String {
    let mut out = String::new();
    header(&mut out, "Opponent");
    for y in 0..BOARD_SIZE {
        let _ = write!(out, "    {:1} ", y);
        for x in 0..BOARD_SIZE {
            let cell = Cell::new(x, y);
            let ch = if session.hits.contains(&cell) {
                'X'
            } else if session.misses.contains(&cell) {
                'o'
            } else {
                '.'
            };
            let _ = write!(out, " {}", ch);
        }
        out.push('\n');
    }
    if !session.sunk_enemy_ships.is_empty() {
        let names: Vec<&str> = session.sunk_enemy_ships.iter().map(String::as_str).collect();
        let _ = writeln!(out, "      Sunk: {}", names.join(", "));
    }
    out
}

/// Parse a target typed as `x,y` or `x y`.
pub fn parse_target(input: &str) -> Result<Cell, String> {
    let parts: Vec<&str> = input
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
        .collect();
    let [x, y] = parts.as_slice() else {
        return Err(format!("Expected two numbers like 3,4 - got '{}'", input.trim()));
    };
    let x: i32 = x.parse().map_err(|_| format!("Invalid x '{}'", x))?;
    let y: i32 = y.parse().map_err(|_| format!("Invalid y '{}'", y))?;
    Ok(Cell::new(x, y))
}
