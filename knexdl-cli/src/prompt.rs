use std::io::{self, BufRead, Write};

fn is_yes(answer: &str) -> bool {
    answer.trim_start().to_lowercase().starts_with('y')
}

/// Asks a yes/no question on the terminal.
pub fn ask(query: &str) -> io::Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, " - {query} (y/n): ")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let value = is_yes(&answer);
    writeln!(stderr, " - {}", if value { "Ok" } else { "Nop" })?;
    Ok(value)
}
