// Play against the bundled search bot from the terminal

use skua::{
    bot::{Bot, SearchBot},
    position::PrettyStyle,
    types::{Outcome, OutcomeFilter, WinReason},
    Color, MoveChain,
};
use std::io::{self, BufRead, Write};

fn main() {
    let mut stdin = io::stdin().lock();

    let mut bot = SearchBot::new(4);
    let mut chain = MoveChain::new_initial();

    println!("You play White. Enter moves in UCI (like e2e4), or 'resign' to give up.");
    println!();

    loop {
        if let Some(outcome) = chain.outcome() {
            println!("{}", chain.last().pretty(PrettyStyle::Ascii));
            println!("Game over: {}", outcome);
            println!("Moves: {}", chain.uci_list());
            break;
        }

        match chain.last().side() {
            Color::White => {
                println!("{}", chain.last().pretty(PrettyStyle::Ascii));
                print!("Your move ({}): ", chain.last().fullmove_number());
                io::stdout().flush().unwrap();
                let mut s = String::new();
                if stdin.read_line(&mut s).unwrap() == 0 {
                    break;
                }
                let s = s.trim();
                if s == "resign" {
                    chain.set_outcome(Outcome::win(Color::Black, WinReason::Resign));
                    continue;
                }
                if let Err(e) = chain.push_uci(s) {
                    println!("Bad move: {}", e);
                    println!();
                    continue;
                }
                println!();
            }
            Color::Black => {
                let mv = bot.choose_move(chain.last()).unwrap();
                println!("I play {}", mv);
                println!();
                chain.push(mv).unwrap();
            }
        }

        chain.set_auto_outcome(OutcomeFilter::Relaxed);
    }
}
