//! Plain-text rendering of allocation results.

use std::fmt::Write;

use crate::alloc::{Assignment, SolutionSet};
use crate::catalog::ResourceCatalog;

/// Renders one assignment as a per-type table.
///
/// ```text
/// Solution 0
///     Type 0. Capacity=2 - Cost=50 - Count=1 - Subtotal=50
///     ...
///     Total capacity: 14
///     Total cost: 130
/// ```
pub fn render_assignment(catalog: &ResourceCatalog, assignment: &Assignment) -> String {
    let mut out = format!("Solution {}\n", assignment.index);
    for (i, resource) in catalog.iter().enumerate() {
        let label = if resource.name.is_empty() {
            format!("Type {i}")
        } else {
            format!("Type {i} ({})", resource.name)
        };
        let _ = writeln!(
            out,
            "\t{label}. Capacity={} - Cost={} - Count={} - Subtotal={}",
            resource.unit_capacity,
            resource.unit_cost,
            assignment.count(i).unwrap_or(0),
            assignment.type_cost(i).unwrap_or(0.0)
        );
    }
    let _ = writeln!(out, "\tTotal capacity: {}", assignment.total_capacity());
    let _ = write!(out, "\tTotal cost: {}", assignment.total_cost());
    out
}

/// Renders every assignment of a solution set.
pub fn render(catalog: &ResourceCatalog, solutions: &SolutionSet) -> String {
    if solutions.is_empty() {
        return "No assignment meets the capacity target".to_string();
    }
    let mut out = format!("{} solution(s)\n", solutions.len());
    for assignment in solutions {
        out.push_str(&render_assignment(catalog, assignment));
        out.push('\n');
    }
    out
}

/// Emits the rendered report through the `log` facade at info level.
pub fn log_solutions(catalog: &ResourceCatalog, solutions: &SolutionSet) {
    log::info!("{}", render(catalog, solutions));
}
