use prettytable::{Cell, Row, Table};

use crate::search::statistics::Statistics;

/// Renders per-worker search statistics as a printable table, with a totals
/// row at the bottom.
pub fn render_stats_table(workers: &[Statistics]) -> String {
    let mut table = Table::new();
    table.add_row(Row::new(vec![
        Cell::new("Worker"),
        Cell::new("Nodes"),
        Cell::new("Failures"),
        Cell::new("Propagations"),
        Cell::new("Steals"),
        Cell::new("Peak Depth"),
    ]));

    let mut total = Statistics::default();
    for (index, stats) in workers.iter().enumerate() {
        total.merge(stats);
        table.add_row(Row::new(vec![
            Cell::new(&index.to_string()),
            Cell::new(&stats.nodes.to_string()),
            Cell::new(&stats.failures.to_string()),
            Cell::new(&stats.propagations.to_string()),
            Cell::new(&stats.steals.to_string()),
            Cell::new(&stats.peak_depth.to_string()),
        ]));
    }

    table.add_row(Row::new(vec![
        Cell::new("Total"),
        Cell::new(&total.nodes.to_string()),
        Cell::new(&total.failures.to_string()),
        Cell::new(&total.propagations.to_string()),
        Cell::new(&total.steals.to_string()),
        Cell::new(&total.peak_depth.to_string()),
    ]));

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_one_row_per_worker_plus_totals() {
        let per_worker = vec![
            Statistics {
                nodes: 12,
                failures: 4,
                propagations: 30,
                steals: 0,
                peak_depth: 6,
                frames: 0,
            },
            Statistics {
                nodes: 3,
                failures: 1,
                propagations: 9,
                steals: 1,
                peak_depth: 2,
                frames: 0,
            },
        ];
        let rendered = render_stats_table(&per_worker);
        assert!(rendered.contains("Nodes"));
        assert!(rendered.contains("Total"));
        assert!(rendered.contains("15"));
    }
}
