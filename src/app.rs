use jiff::civil::Date;

use crate::cli::Cli;
use crate::display::SpinnerContainer;

pub struct App {
    pub cli: Cli,
    pub display: SpinnerContainer,

    /// The day the run happens on. Reports always cover the month before it.
    pub today: Date,
}

impl App {
    pub fn new(cli: Cli, today: Date) -> Self {
        App {
            cli,
            display: SpinnerContainer::new(),
            today,
        }
    }
}
