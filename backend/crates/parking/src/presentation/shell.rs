//! Interactive Shell
//!
//! Menu-driven console front end. Reads answers from any [`BufRead`] and
//! writes prompts to any [`Write`], so a whole session can be replayed in
//! tests. A failed action is reported and the menu comes back; only
//! shutdown, closed input or a broken output stream end the loop.

use crate::application::ticket_lifecycle::TicketLifecycle;
use crate::domain::repository::{ParkingSpotRepository, RecurringUserRepository, TicketRepository};
use crate::domain::value_objects::{ParkingType, VehicleRegNumber};
use crate::error::{ParkingError, ParkingResult};
use crate::presentation::command::ParkingCommand;
use platform::clock::from_epoch_seconds;
use platform::console::{ConsoleError, InputReader};
use std::io::{BufRead, Write};
use std::sync::Arc;

/// Format of in/out times shown to the operator (UTC)
pub const TIME_FORMAT: &str = "%H:%M %-d.%B.%Y";

/// Render epoch seconds with [`TIME_FORMAT`]
pub fn format_time(epoch_seconds: i64) -> String {
    from_epoch_seconds(epoch_seconds)
        .format(TIME_FORMAT)
        .to_string()
}

/// Interactive Shell
pub struct InteractiveShell<P, T, U, R, W>
where
    P: ParkingSpotRepository,
    T: TicketRepository,
    U: RecurringUserRepository,
    R: BufRead,
    W: Write,
{
    lifecycle: Arc<TicketLifecycle<P, T, U>>,
    input: InputReader<R>,
    output: W,
}

impl<P, T, U, R, W> InteractiveShell<P, T, U, R, W>
where
    P: ParkingSpotRepository,
    T: TicketRepository,
    U: RecurringUserRepository,
    R: BufRead,
    W: Write,
{
    pub fn new(lifecycle: Arc<TicketLifecycle<P, T, U>>, input: R, output: W) -> Self {
        Self {
            lifecycle,
            input: InputReader::new(input),
            output,
        }
    }

    /// Give back the output sink
    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the menu loop until shutdown or end of input
    pub async fn run(&mut self) -> ParkingResult<()> {
        tracing::info!("Parking shell started");
        writeln!(self.output, "Welcome to Parking System!")?;

        loop {
            self.print_menu()?;

            let selection = match self.input.read_selection() {
                Ok(selection) => selection,
                Err(ConsoleError::EndOfInput) => {
                    tracing::info!("Input closed, leaving shell");
                    break;
                }
                Err(err) => return Err(err.into()),
            };

            if selection.is_none() {
                writeln!(
                    self.output,
                    "Invalid input provided. Please enter valid number for proceeding further"
                )?;
            }

            let command = ParkingCommand::from_selection(selection);
            tracing::debug!(command = ?command, "Menu command selected");

            let result = match command {
                ParkingCommand::EnterParking => self.process_incoming_vehicle().await,
                ParkingCommand::ExitParking => self.process_exiting_vehicle().await,
                ParkingCommand::Shutdown => {
                    writeln!(self.output, "Exiting from the system!")?;
                    Ok(())
                }
                ParkingCommand::Unsupported => {
                    writeln!(
                        self.output,
                        "Unsupported option. Please enter a number corresponding to the provided menu"
                    )?;
                    Ok(())
                }
            };

            match result {
                Ok(()) => {}
                Err(ParkingError::Console(ConsoleError::EndOfInput)) => {
                    tracing::info!("Input closed mid-dialogue, leaving shell");
                    break;
                }
                Err(err) => self.report(err)?,
            }

            if !command.continues() {
                break;
            }
        }

        tracing::info!("Parking shell stopped");
        Ok(())
    }

    fn print_menu(&mut self) -> ParkingResult<()> {
        writeln!(
            self.output,
            "Please select an option. Simply enter the number to choose an action"
        )?;
        for command in ParkingCommand::MENU {
            writeln!(self.output, "{command}")?;
        }
        Ok(())
    }

    async fn process_incoming_vehicle(&mut self) -> ParkingResult<()> {
        let parking_type = self.read_parking_type()?;

        // Check before asking for the plate so a full lot is reported right away
        if self
            .lifecycle
            .next_parking_number_if_available(parking_type)
            .await?
            .is_none()
        {
            return Err(ParkingError::SpotUnavailable(parking_type));
        }

        let vehicle = self.read_vehicle_reg_number()?;
        let ticket = self.lifecycle.process_entry(parking_type, vehicle).await?;

        writeln!(self.output, "Generated Ticket and saved in DB")?;
        writeln!(
            self.output,
            "Please park your vehicle in spot number:{}",
            ticket.parking_spot.number
        )?;
        writeln!(
            self.output,
            "Recorded in-time for vehicle number:{} is: {}",
            ticket.vehicle_reg_number,
            format_time(ticket.in_time)
        )?;
        Ok(())
    }

    async fn process_exiting_vehicle(&mut self) -> ParkingResult<()> {
        let vehicle = self.read_vehicle_reg_number()?;
        let receipt = self.lifecycle.process_exit(&vehicle).await?;

        writeln!(
            self.output,
            "Please pay the parking fare: {:.2}€",
            receipt.price
        )?;
        writeln!(
            self.output,
            "Recorded out-time for vehicle number: {} is: {}",
            receipt.vehicle,
            format_time(receipt.out_time)
        )?;
        Ok(())
    }

    fn read_parking_type(&mut self) -> ParkingResult<ParkingType> {
        writeln!(self.output, "Please select vehicle type from menu")?;
        for parking_type in ParkingType::ALL {
            writeln!(self.output, "{} {}", parking_type.id(), parking_type)?;
        }

        let selection = self.input.read_selection()?;
        selection
            .and_then(|number| i16::try_from(number).ok())
            .and_then(ParkingType::from_id)
            .ok_or_else(|| {
                ParkingError::UnknownParkingType(
                    selection.map(|number| number.to_string()).unwrap_or_default(),
                )
            })
    }

    fn read_vehicle_reg_number(&mut self) -> ParkingResult<VehicleRegNumber> {
        writeln!(
            self.output,
            "Please type the vehicle registration number and press enter key"
        )?;
        let raw = self.input.read_non_blank()?;
        VehicleRegNumber::new(raw)
    }

    /// Log the failure and tell the operator what happened
    fn report(&mut self, err: ParkingError) -> ParkingResult<()> {
        err.log();

        let message = match &err {
            ParkingError::SpotUnavailable(_) => {
                "Error fetching parking number from DB. Parking slots might be full".to_string()
            }
            ParkingError::TicketNotFound(vehicle) => {
                format!("No open ticket found for vehicle number: {vehicle}")
            }
            ParkingError::InvalidVehicleRegNumber { .. }
            | ParkingError::Console(ConsoleError::Blank) => {
                "Invalid input provided. Please enter a valid string for vehicle registration number"
                    .to_string()
            }
            ParkingError::UnknownParkingType(_) => "Incorrect input provided".to_string(),
            other => format!(
                "Unable to process request ({}). Please try again",
                other.kind().as_str()
            ),
        };

        writeln!(self.output, "{message}")?;
        Ok(())
    }
}
