//! Terminal report for each process snipe touches.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use crossterm::style::{style, Stylize};
use snipe_core::Listener;

const RULER: &str = "──────────────────────────────────────────────────";

#[derive(Debug, Clone, Copy)]
enum Tone {
    Found,
    Kill,
    Fail,
    Dry,
    Port,
    Pid,
    Dim,
    Error,
}

/// Writes the human readable report. Colors are only emitted when the
/// printer was built for a terminal.
pub struct Printer<W> {
    out: W,
    color: bool,
}

impl Printer<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout(), atty::is(atty::Stream::Stdout))
    }
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, color: bool) -> Self {
        Self { out, color }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn paint<D: Display>(&self, text: D, tone: Tone) -> String {
        if !self.color {
            return text.to_string();
        }
        let styled = style(text);
        match tone {
            Tone::Found => styled.green().bold(),
            Tone::Kill | Tone::Fail | Tone::Error => styled.red().bold(),
            Tone::Dry => styled.yellow().bold(),
            Tone::Port => styled.cyan(),
            Tone::Pid => styled.yellow(),
            Tone::Dim => styled.dim(),
        }
        .to_string()
    }

    pub fn found(&mut self, listener: &Listener) -> io::Result<()> {
        self.block(listener, "found", Tone::Found, "", true)
    }

    pub fn dry_run(&mut self, listener: &Listener) -> io::Result<()> {
        self.block(listener, "dry  ", Tone::Dry, " - would kill", true)
    }

    pub fn killed(&mut self, listener: &Listener) -> io::Result<()> {
        self.block(listener, "kill ", Tone::Kill, "", true)
    }

    pub fn kill_failed(&mut self, listener: &Listener) -> io::Result<()> {
        self.block(listener, "fail ", Tone::Fail, " - couldn't kill", false)
    }

    pub fn not_found(&mut self, port: u16) -> io::Result<()> {
        let line = format!(
            "{}{}",
            self.paint("nothing on port ", Tone::Dim),
            self.paint(port, Tone::Port)
        );
        writeln!(self.out, "{line}")
    }

    /// Print `prompt [y/N] ` and read the answer from `input`.
    /// Only `y` and `yes` (any case) count as consent; EOF declines.
    pub fn confirm<R: BufRead>(&mut self, prompt: &str, input: &mut R) -> io::Result<bool> {
        write!(self.out, "{prompt} [y/N] ")?;
        self.out.flush()?;

        let mut answer = String::new();
        if input.read_line(&mut answer)? == 0 {
            return Ok(false);
        }
        let answer = answer.trim().to_lowercase();
        Ok(answer == "y" || answer == "yes")
    }

    fn block(
        &mut self,
        listener: &Listener,
        label: &str,
        tone: Tone,
        suffix: &str,
        with_path: bool,
    ) -> io::Result<()> {
        let ruler = self.paint(RULER, Tone::Dim);
        let header = format!(
            "  {} :{}  pid {}{}",
            self.paint(label, tone),
            self.paint(listener.port, Tone::Port),
            self.paint(listener.pid, Tone::Pid),
            suffix
        );
        let cmd = format!(
            "  {}   {}",
            self.paint("cmd", Tone::Dim),
            listener.info.command_or_unknown()
        );

        writeln!(self.out, "{ruler}")?;
        writeln!(self.out, "{header}")?;
        writeln!(self.out, "{cmd}")?;
        if with_path {
            let path = format!(
                "  {}  {}",
                self.paint("path", Tone::Dim),
                listener.info.file_path_or_unknown()
            );
            writeln!(self.out, "{path}")?;
        }
        writeln!(self.out, "{ruler}")
    }
}

/// Print `error: <message>` to stderr.
pub fn print_error(err: &anyhow::Error) {
    let color = atty::is(atty::Stream::Stderr);
    let label = if color {
        "error:".red().to_string()
    } else {
        "error:".to_string()
    };
    eprintln!("{label} {err:#}");
}
