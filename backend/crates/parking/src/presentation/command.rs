//! Main menu commands

use std::fmt;

/// Action picked from the main menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParkingCommand {
    /// `1` - allocate a spot for an arriving vehicle
    EnterParking,
    /// `2` - close the ticket of a leaving vehicle
    ExitParking,
    /// `3` - leave the shell
    Shutdown,
    /// Anything else
    Unsupported,
}

impl ParkingCommand {
    /// Commands shown in the menu, in order
    pub const MENU: [ParkingCommand; 3] = [
        ParkingCommand::EnterParking,
        ParkingCommand::ExitParking,
        ParkingCommand::Shutdown,
    ];

    /// Menu number, `None` for [`ParkingCommand::Unsupported`]
    pub const fn number(&self) -> Option<u32> {
        match self {
            Self::EnterParking => Some(1),
            Self::ExitParking => Some(2),
            Self::Shutdown => Some(3),
            Self::Unsupported => None,
        }
    }

    /// Map a menu selection; non-numeric input arrives as `None`
    pub fn from_selection(selection: Option<u32>) -> Self {
        Self::MENU
            .into_iter()
            .find(|command| command.number() == selection)
            .unwrap_or(Self::Unsupported)
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::EnterParking => "New Vehicle Entering - Allocate Parking Space",
            Self::ExitParking => "Vehicle Exiting - Generate Ticket Price",
            Self::Shutdown => "Shutdown System",
            Self::Unsupported => "Unsupported",
        }
    }

    /// Whether the shell keeps running after this command
    #[inline]
    pub const fn continues(&self) -> bool {
        !matches!(self, Self::Shutdown)
    }
}

impl fmt::Display for ParkingCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.number() {
            Some(number) => write!(f, "{} {}", number, self.label()),
            None => f.write_str(self.label()),
        }
    }
}
