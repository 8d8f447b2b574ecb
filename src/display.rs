use spinoff::{Color, Spinner, spinners};
use std::io::IsTerminal;

pub struct SpinnerContainer {
    instance: Option<Spinner>,
}

impl SpinnerContainer {
    // The spinner api itself doesn't provide a way to create an empty instance,
    // so an Option stands in until one is needed.
    pub fn new() -> Self {
        SpinnerContainer { instance: None }
    }

    pub fn stop_with_message(&mut self, message: &str) {
        // Note that it has to take ownership to prevent double stopping.
        match self.instance.take() {
            Some(mut s) => s.stop_with_message(message),
            None => println!("{}", message),
        }
    }

    /// Starts a spinner unless the user opted out or stdout isn't a terminal.
    ///
    /// Scheduled runs write to a log, not a terminal, so they never see one.
    pub fn start_unless_no_terminal_or(&mut self, no_animate: bool, text: &'static str) {
        if no_animate || !std::io::stdout().is_terminal() {
            return;
        }

        self.instance = Some(Spinner::new(spinners::Dots, text, Color::Blue));
    }
}

impl Drop for SpinnerContainer {
    fn drop(&mut self) {
        if let Some(s) = self.instance.as_mut() {
            // Errors bubble out of main with the spinner still running, clear the line first.
            s.stop_with_message("");
        }
    }
}
