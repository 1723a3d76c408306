//! Libris - Binary Entry Point
//!
//! Interactive lending tracker: a prompted line loop over stdin. Each line
//! is parsed into a command and applied to the library; `quit` or EOF ends
//! the session.

use std::io::{self, BufRead, Write};

use libris::library::{execute, parse, Command, Library};

fn main() {
    let mut lib = Library::new();

    println!("Welcome to the library, please enter a command");
    println!("Enter quit to exit the application");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            break;
        }

        let Some(Ok(line)) = lines.next() else {
            break; // EOF or a broken pipe ends the session
        };

        match parse(&line) {
            Ok(Some(Command::Quit)) => {
                println!("Byebye!");
                break;
            }
            Ok(Some(cmd)) => println!("{}", execute(&mut lib, cmd)),
            Ok(None) => {}
            Err(e) => println!("{e}"),
        }
    }
}
