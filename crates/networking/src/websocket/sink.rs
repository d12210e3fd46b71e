//! Display sink contract

use petshop_core::DisplayLine;

/// Receives every line meant for the user: chat messages and notices
pub trait DisplaySink {
    fn display(&mut self, line: DisplayLine);
}

/// Collects lines in order; handy for headless use and tests
impl DisplaySink for Vec<DisplayLine> {
    fn display(&mut self, line: DisplayLine) {
        self.push(line);
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn display(&mut self, line: DisplayLine) {
        (**self).display(line);
    }
}
