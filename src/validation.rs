//! Input validation for simulation runs.
//!
//! Checks raw collaborator input and assembled process lists before any
//! scheduler executes. Detects:
//! - Missing or non-numeric arrival/burst values
//! - Negative arrival times
//! - Non-positive burst times
//! - Duplicate process IDs
//! - Process sets whose worst-case finish time overflows the clock
//! - Missing or non-positive Round-Robin quanta
//!
//! Nothing is mutated on failure, so a rejected run leaves no partial state.

use std::collections::HashSet;

use crate::error::{ProcessField, SimError, SimResult};
use crate::models::Process;

/// Parses one raw time field (arrival or burst) supplied as text.
///
/// Surrounding whitespace is ignored. Range checks are applied by
/// [`check_arrival`] / [`check_burst`].
pub fn parse_time(raw: Option<&str>, process: &str, field: ProcessField) -> SimResult<i64> {
    let text = match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Err(SimError::invalid_input(process, field, "value is missing")),
    };
    text.parse::<i64>().map_err(|_| {
        SimError::invalid_input(process, field, format!("'{text}' is not an integer"))
    })
}

/// Checks that an arrival time is non-negative.
pub fn check_arrival(process: &str, arrival: i64) -> SimResult<()> {
    if arrival < 0 {
        return Err(SimError::invalid_input(
            process,
            ProcessField::Arrival,
            format!("must be >= 0, got {arrival}"),
        ));
    }
    Ok(())
}

/// Checks that a burst time is positive.
pub fn check_burst(process: &str, burst: i64) -> SimResult<()> {
    if burst <= 0 {
        return Err(SimError::invalid_input(
            process,
            ProcessField::Burst,
            format!("must be > 0, got {burst}"),
        ));
    }
    Ok(())
}

/// Parses and checks raw arrival/burst text for the process that would
/// receive `id`.
///
/// # Returns
/// `(arrival, burst)` on success.
pub fn parse_process_input(
    id: &str,
    arrival: Option<&str>,
    burst: Option<&str>,
) -> SimResult<(i64, i64)> {
    let arrival = parse_time(arrival, id, ProcessField::Arrival)?;
    let burst = parse_time(burst, id, ProcessField::Burst)?;
    check_arrival(id, arrival)?;
    check_burst(id, burst)?;
    Ok((arrival, burst))
}

/// Computes `max(arrival) + sum(burst)`, the latest time any schedule of
/// `processes` can reach.
///
/// Every per-process time is at most this bound, so the set is also
/// rejected when `count * bound` would overflow the metric totals.
///
/// # Errors
/// `InvalidProcessInput` naming the process at which the bound stops
/// fitting in an `i64`.
pub fn check_time_bound<'a>(processes: impl IntoIterator<Item = &'a Process>) -> SimResult<i64> {
    let mut total_burst = 0i64;
    let mut count = 0i64;
    let mut latest: Option<&Process> = None;
    let mut newest: Option<&Process> = None;

    for p in processes {
        total_burst = total_burst.checked_add(p.burst).ok_or_else(|| {
            SimError::invalid_input(
                &p.id,
                ProcessField::Burst,
                "total burst time overflows the clock",
            )
        })?;
        count += 1;
        if latest.map_or(true, |l| p.arrival > l.arrival) {
            latest = Some(p);
        }
        newest = Some(p);
    }

    let (Some(latest), Some(newest)) = (latest, newest) else {
        return Ok(0);
    };
    let bound = latest.arrival.checked_add(total_burst).ok_or_else(|| {
        SimError::invalid_input(
            &latest.id,
            ProcessField::Arrival,
            "arrival plus total burst time overflows the clock",
        )
    })?;
    if bound.checked_mul(count).is_none() {
        return Err(SimError::invalid_input(
            &newest.id,
            ProcessField::Burst,
            "summed waiting and turnaround times would overflow",
        ));
    }
    Ok(bound)
}

/// Parses a Round-Robin quantum supplied as text.
pub fn parse_quantum(raw: &str) -> SimResult<i64> {
    let text = raw.trim();
    let quantum = text
        .parse::<i64>()
        .map_err(|_| SimError::invalid_quantum(text))?;
    check_quantum(quantum)?;
    Ok(quantum)
}

/// Checks that a quantum is positive.
pub fn check_quantum(quantum: i64) -> SimResult<()> {
    if quantum <= 0 {
        return Err(SimError::invalid_quantum(quantum));
    }
    Ok(())
}

/// Collects every problem in a process list.
///
/// Checks:
/// 1. No empty IDs
/// 2. No duplicate IDs
/// 3. `arrival >= 0`
/// 4. `burst > 0`
/// 5. `max(arrival) + sum(burst)` fits in an `i64`
///
/// An empty list is reported as `EmptyInput`.
pub fn find_violations(processes: &[Process]) -> Vec<SimError> {
    let mut errors = Vec::new();

    if processes.is_empty() {
        errors.push(SimError::EmptyInput);
        return errors;
    }

    let mut ids = HashSet::new();
    for (i, p) in processes.iter().enumerate() {
        if p.id.trim().is_empty() {
            errors.push(SimError::invalid_input(
                format!("#{}", i + 1),
                ProcessField::Id,
                "id is empty",
            ));
        } else if !ids.insert(p.id.as_str()) {
            errors.push(SimError::invalid_input(
                &p.id,
                ProcessField::Id,
                "duplicate process id",
            ));
        }

        if let Err(e) = check_arrival(&p.id, p.arrival) {
            errors.push(e);
        }
        if let Err(e) = check_burst(&p.id, p.burst) {
            errors.push(e);
        }
    }

    if errors.is_empty() {
        if let Err(e) = check_time_bound(processes) {
            errors.push(e);
        }
    }

    errors
}

/// Validates a process list, returning the first problem found.
pub fn validate_processes(processes: &[Process]) -> SimResult<()> {
    match find_violations(processes).into_iter().next() {
        Some(err) => {
            log::warn!("rejecting process list: {err}");
            Err(err)
        }
        None => Ok(()),
    }
}
