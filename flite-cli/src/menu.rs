use anyhow::Result;
use flite_core::{NewPassenger, PassengerId, SeatClass, TripId};
use flite_store::{CancelError, LoadReport, ReservationStore};
use std::io::{BufRead, Write};

use crate::display;
use crate::instrument::{self, format_elapsed};

const MENU: &str = "
===== MAIN MENU =====
1. Add Passenger
2. Delete Passenger
3. Display Manifest By Trip
4. Display Seating Chart (By Trip)
5. Search Passenger By ID
6. Display Manifest By Trip And Class
7. Export Trip Manifest As JSON
8. Show Statistics
9. Export Load Report As JSON
0. Exit
Choice: ";

/// Interactive session over one store. Input is read a line at a time so the
/// session can be driven from a script as easily as from a terminal.
pub struct Session<R, W> {
    store: ReservationStore,
    load_report: Option<LoadReport>,
    input: R,
    out: W,
}

/// What a prompt produced.
enum Answer<T> {
    Value(T),
    Invalid,
    Eof,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(store: ReservationStore, input: R, out: W) -> Self {
        Self {
            store,
            load_report: None,
            input,
            out,
        }
    }

    /// Keep the report of the startup load so it can be exported later.
    pub fn with_load_report(mut self, report: LoadReport) -> Self {
        self.load_report = Some(report);
        self
    }

    pub fn store(&self) -> &ReservationStore {
        &self.store
    }

    pub fn into_store(self) -> ReservationStore {
        self.store
    }

    /// Loop until `0` or end of input.
    pub fn run(&mut self) -> Result<()> {
        loop {
            write!(self.out, "{}", MENU)?;
            self.out.flush()?;

            let choice = match self.read_number()? {
                Answer::Value(choice) => choice,
                Answer::Invalid => {
                    writeln!(self.out, "Invalid input.")?;
                    continue;
                }
                Answer::Eof => break,
            };
            if choice == 0 {
                writeln!(self.out, "Goodbye!")?;
                break;
            }

            let (outcome, elapsed) = instrument::timed(|| self.dispatch(choice));
            let keep_going = outcome?;
            writeln!(self.out, "Operation Time: {}", format_elapsed(elapsed))?;
            if !keep_going {
                break;
            }
        }
        tracing::debug!(records = self.store.len(), "Session ended");
        Ok(())
    }

    /// Returns false once input is exhausted.
    fn dispatch(&mut self, choice: i64) -> Result<bool> {
        match choice {
            1 => self.add_passenger(),
            2 => self.delete_passenger(),
            3 => self.show_manifest(),
            4 => self.show_seating_chart(),
            5 => self.search_passenger(),
            6 => self.show_manifest_by_class(),
            7 => self.export_manifest(),
            8 => self.show_stats(),
            9 => self.export_load_report(),
            _ => {
                writeln!(self.out, "Invalid choice.")?;
                Ok(true)
            }
        }
    }

    fn add_passenger(&mut self) -> Result<bool> {
        let geometry = *self.store.geometry();

        let passenger_id = match self.ask_number("\nEnter Passenger ID: ")? {
            Answer::Value(id) => id,
            other => return self.abandon(other),
        };
        if passenger_id <= 0 {
            writeln!(self.out, "Passenger ID must be positive.")?;
            return Ok(true);
        }
        let exists = PassengerId::try_from(passenger_id)
            .ok()
            .and_then(|id| self.store.find_by_passenger_id(id))
            .is_some();
        if exists {
            writeln!(self.out, "Passenger ID already exists!")?;
            return Ok(true);
        }

        let trip_id = match self.ask_number("Enter Trip Number (>=1): ")? {
            Answer::Value(trip) => trip,
            other => return self.abandon(other),
        };
        if trip_id < 1 {
            writeln!(self.out, "Trip number must be 1 or above.")?;
            return Ok(true);
        }

        let name = match self.ask_line("Enter Name: ")? {
            Some(name) => name,
            None => return Ok(false),
        };

        let row_prompt = format!("Enter Seat Row (1-{}): ", geometry.rows());
        let seat_row = match self.ask_number(&row_prompt)? {
            Answer::Value(row) => row - 1,
            other => return self.abandon(other),
        };
        if !geometry.contains_row(seat_row) {
            writeln!(self.out, "Seat row must be between 1 and {}.", geometry.rows())?;
            return Ok(true);
        }

        let last_letter = geometry.column_letters().last().unwrap_or('A');
        let seat_column = match self.ask_line(&format!("Enter Seat Column (A-{}): ", last_letter))? {
            Some(text) => text.chars().next().unwrap_or(' ').to_ascii_uppercase(),
            None => return Ok(false),
        };
        if geometry.column_index(seat_column).is_none() {
            writeln!(self.out, "Seat column must be between A and {}.", last_letter)?;
            return Ok(true);
        }

        let seat_taken = TripId::try_from(trip_id)
            .map(|trip| self.store.is_seat_taken(trip, seat_row as u32, seat_column))
            .unwrap_or(false);
        if seat_taken {
            writeln!(self.out, "This seat is already taken for this trip.")?;
            return Ok(true);
        }

        let seat_class = match self.ask_line("Enter Class (Economy/Business/First): ")? {
            Some(class) => class,
            None => return Ok(false),
        };

        let candidate = NewPassenger {
            passenger_id,
            trip_id,
            name,
            seat_row,
            seat_column,
            seat_class,
        };
        match self.store.insert(candidate) {
            Ok(id) => {
                tracing::info!(passenger_id = id, "Passenger added");
                writeln!(self.out, "Passenger added successfully.")?;
            }
            Err(err) => writeln!(self.out, "{}.", err)?,
        }
        Ok(true)
    }

    fn delete_passenger(&mut self) -> Result<bool> {
        let id = match self.ask_passenger_id("\nEnter Passenger ID to delete: ")? {
            Answer::Value(id) => id,
            other => return self.abandon(other),
        };
        let Some(id) = id else {
            writeln!(self.out, "Passenger not found.")?;
            return Ok(true);
        };
        match self.store.cancel(id) {
            Ok(removed) => {
                tracing::info!(passenger_id = removed.passenger_id, trip_id = removed.trip_id, "Passenger removed");
                writeln!(self.out, "Passenger removed successfully.")?;
            }
            Err(CancelError::NotFound(_)) => writeln!(self.out, "Passenger not found.")?,
        }
        Ok(true)
    }

    fn show_manifest(&mut self) -> Result<bool> {
        let trip = match self.ask_trip()? {
            Answer::Value(trip) => trip,
            other => return self.abandon(other),
        };
        let title = format!("Passenger Manifest for Trip {}", trip_label(trip));
        let records = trip.map(|t| self.store.list_by_trip(t)).unwrap_or_default();
        display::write_manifest(&mut self.out, &title, &records)?;
        Ok(true)
    }

    fn show_seating_chart(&mut self) -> Result<bool> {
        let trip = match self.ask_trip()? {
            Answer::Value(Some(trip)) => trip,
            Answer::Value(None) => {
                writeln!(self.out, "Trip number must be 1 or above.")?;
                return Ok(true);
            }
            other => return self.abandon(other),
        };
        let chart = self.store.seating_chart(trip);
        display::write_seating_chart(&mut self.out, &chart)?;
        Ok(true)
    }

    fn search_passenger(&mut self) -> Result<bool> {
        let id = match self.ask_passenger_id("\nEnter Passenger ID to search: ")? {
            Answer::Value(id) => id,
            other => return self.abandon(other),
        };
        let store = &self.store;
        let (found, elapsed) = instrument::timed(|| id.and_then(|id| store.find_by_passenger_id(id)));
        match found {
            Some(record) => {
                writeln!(self.out, "\nPassenger Found!")?;
                display::write_passenger(&mut self.out, record)?;
            }
            None => writeln!(self.out, "\nPassenger not found.")?,
        }
        writeln!(self.out, "Search Time: {}", format_elapsed(elapsed))?;
        Ok(true)
    }

    fn show_manifest_by_class(&mut self) -> Result<bool> {
        let trip = match self.ask_trip()? {
            Answer::Value(trip) => trip,
            other => return self.abandon(other),
        };
        let class: SeatClass = match self.ask_line("Enter Class (Economy/Business/First): ")? {
            Some(text) => match text.parse() {
                Ok(class) => class,
                Err(_) => {
                    writeln!(self.out, "Invalid class. Please enter Economy, Business, or First.")?;
                    return Ok(true);
                }
            },
            None => return Ok(false),
        };
        let title = format!("{} Passengers for Trip {}", class, trip_label(trip));
        let records = trip
            .map(|t| self.store.list_by_trip_and_class(t, class))
            .unwrap_or_default();
        display::write_manifest(&mut self.out, &title, &records)?;
        Ok(true)
    }

    fn export_manifest(&mut self) -> Result<bool> {
        let trip = match self.ask_trip()? {
            Answer::Value(trip) => trip,
            other => return self.abandon(other),
        };
        let records = trip.map(|t| self.store.list_by_trip(t)).unwrap_or_default();
        let json = serde_json::to_string_pretty(&records)?;
        writeln!(self.out, "{}", json)?;
        Ok(true)
    }

    fn show_stats(&mut self) -> Result<bool> {
        let trips: Vec<TripId> = self.store.trip_ids().into_iter().collect();
        let footprint = instrument::footprint(&self.store);
        display::write_stats(&mut self.out, &trips, footprint)?;
        Ok(true)
    }

    fn export_load_report(&mut self) -> Result<bool> {
        match &self.load_report {
            Some(report) => {
                let json = serde_json::to_string_pretty(report)?;
                writeln!(self.out, "{}", json)?;
            }
            None => writeln!(self.out, "No dataset has been loaded.")?,
        }
        Ok(true)
    }

    /// Report a bad or missing answer. Returns whether to keep going.
    fn abandon<T>(&mut self, answer: Answer<T>) -> Result<bool> {
        match answer {
            Answer::Eof => Ok(false),
            _ => {
                writeln!(self.out, "Invalid input.")?;
                Ok(true)
            }
        }
    }

    /// Trip numbers below 1 parse as `None` so lookups simply find nothing.
    fn ask_trip(&mut self) -> Result<Answer<Option<TripId>>> {
        Ok(match self.ask_number("Enter Trip Number: ")? {
            Answer::Value(trip) => Answer::Value(TripId::try_from(trip).ok().filter(|t| *t >= 1)),
            Answer::Invalid => Answer::Invalid,
            Answer::Eof => Answer::Eof,
        })
    }

    /// IDs that cannot exist in the store parse as `None`.
    fn ask_passenger_id(&mut self, prompt: &str) -> Result<Answer<Option<PassengerId>>> {
        Ok(match self.ask_number(prompt)? {
            Answer::Value(id) => Answer::Value(PassengerId::try_from(id).ok()),
            Answer::Invalid => Answer::Invalid,
            Answer::Eof => Answer::Eof,
        })
    }

    fn ask_number(&mut self, prompt: &str) -> Result<Answer<i64>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        self.read_number()
    }

    fn ask_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt)?;
        self.out.flush()?;
        self.read_line()
    }

    fn read_number(&mut self) -> Result<Answer<i64>> {
        Ok(match self.read_line()? {
            Some(line) => match line.parse() {
                Ok(n) => Answer::Value(n),
                Err(_) => Answer::Invalid,
            },
            None => Answer::Eof,
        })
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn trip_label(trip: Option<TripId>) -> String {
    trip.map(|t| t.to_string()).unwrap_or_else(|| "-".to_string())
}
