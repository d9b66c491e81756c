//! Text Gantt rendering of a schedule.
//!
//! One row per thread; each column is an equal slice of `[0, horizon)`
//! showing the base-36 digit of the task id running at the slice midpoint,
//! or `.` when the thread is idle.
//!
//! ```text
//! RR-FIFO  horizon=3000000
//! T0 |000000000000000000001111111111|
//! ```

use std::fmt::Write;

use crate::models::Schedule;

/// Renders `schedule` over `[0, horizon)` with `width` columns per row.
pub fn render_gantt(schedule: &Schedule, horizon: i64, width: usize) -> String {
    let width = width.max(1);
    let mut out = String::new();
    let _ = writeln!(out, "{}  horizon={}", schedule.name, horizon);

    for thread in 0..schedule.thread_count {
        let assignments = schedule.assignments_for_thread(thread);
        let row: String = (0..width)
            .map(|col| {
                if horizon <= 0 {
                    return '.';
                }
                // midpoint of the column, in simulated time
                let t = ((2 * col + 1) as f64 * horizon as f64 / (2 * width) as f64) as i64;
                assignments
                    .iter()
                    .find(|a| a.start <= t && t < a.finish)
                    .map_or('.', |a| task_glyph(a.task_id))
            })
            .collect();
        let _ = writeln!(out, "T{thread} |{row}|");
    }
    out
}

fn task_glyph(task_id: u32) -> char {
    std::char::from_digit(task_id % 36, 36).unwrap_or('?')
}
