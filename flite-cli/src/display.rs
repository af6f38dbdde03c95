use flite_core::{PassengerRecord, TripId};
use flite_store::{LoadReport, SeatingChart};
use std::io::{self, Write};

use crate::instrument::{format_elapsed, Footprint};

pub fn write_passenger<W: Write>(out: &mut W, record: &PassengerRecord) -> io::Result<()> {
    writeln!(out, "Trip: {}", record.trip_id)?;
    writeln!(out, "ID: {}", record.passenger_id)?;
    writeln!(out, "Name: {}", record.name)?;
    writeln!(out, "Seat: {}", record.seat())?;
    writeln!(out, "Class: {}", record.seat_class)
}

pub fn write_manifest<W: Write>(
    out: &mut W,
    title: &str,
    records: &[&PassengerRecord],
) -> io::Result<()> {
    writeln!(out, "\n{}", title)?;
    writeln!(out, "-------------------------------------")?;
    if records.is_empty() {
        return writeln!(out, "No passengers found for this trip.");
    }
    for record in records {
        writeln!(
            out,
            "ID: {} | Name: {} | Seat: {} | Class: {}",
            record.passenger_id,
            record.name,
            record.seat(),
            record.seat_class
        )?;
    }
    writeln!(out, "Total: {}", records.len())
}

/// Every seat is drawn: `X` booked, `O` free.
pub fn write_seating_chart<W: Write>(out: &mut W, chart: &SeatingChart<'_>) -> io::Result<()> {
    writeln!(out, "\nSeating Chart for Trip {}\n", chart.trip_id())?;
    write!(out, "   ")?;
    for letter in chart.geometry().column_letters() {
        write!(out, "{} ", letter)?;
    }
    writeln!(out)?;

    for (index, row) in chart.rows().enumerate() {
        write!(out, "{:>2} ", index + 1)?;
        for seat in row {
            write!(out, "{} ", if seat.is_some() { 'X' } else { 'O' })?;
        }
        writeln!(out)?;
    }
    writeln!(out, "\nBooked: {} | Free: {}", chart.occupied(), chart.available())
}

pub fn write_load_report<W: Write>(out: &mut W, report: &LoadReport) -> io::Result<()> {
    writeln!(out, "\nCSV loaded successfully.")?;
    writeln!(out, "Passengers inserted: {}", report.inserted)?;
    writeln!(out, "Passengers moved to different trips: {}", report.displaced)?;
    writeln!(out, "Lines skipped: {}", report.skipped)?;
    writeln!(out, "Time taken: {}", format_elapsed(report.elapsed))?;
    writeln!(out, "Finished at: {}", report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"))
}

pub fn write_stats<W: Write>(out: &mut W, trips: &[TripId], footprint: Footprint) -> io::Result<()> {
    writeln!(out, "\nPassengers: {}", footprint.records)?;
    match (trips.first(), trips.last()) {
        (Some(first), Some(last)) => {
            writeln!(out, "Trips: {} (numbered {} to {})", trips.len(), first, last)?
        }
        _ => writeln!(out, "Trips: 0")?,
    }
    writeln!(out, "Approximate memory: {} bytes", footprint.bytes)
}
