#[derive(Clone, Copy, Debug, Default)]
pub struct TableOptions {
    pub max_width: Option<usize>,
}

impl TableOptions {
    /// Width limit from `COLUMNS`, ignored below 40.
    #[must_use]
    pub fn from_env() -> Self {
        let max_width = std::env::var("COLUMNS")
            .ok()
            .and_then(|value| value.parse::<usize>().ok())
            .filter(|width| *width >= 40);
        Self { max_width }
    }
}

/// Render a simple aligned table for string rows.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    fit_widths(&mut widths, headers, options.max_width);

    let header_line = render_row(headers.iter().map(|h| (*h).to_string()), &widths);
    let divider = "-".repeat(header_line.chars().count());

    let mut lines = Vec::with_capacity(2 + rows.len());
    lines.push(header_line);
    lines.push(divider);
    lines.extend(rows.iter().map(|row| {
        render_row(
            (0..widths.len()).map(|i| row.get(i).cloned().unwrap_or_else(|| "-".to_string())),
            &widths,
        )
    }));
    lines.join("\n")
}

fn render_row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| {
            let text = truncate_text(&cell, *width);
            let pad = width.saturating_sub(text.chars().count());
            format!("{text}{}", " ".repeat(pad))
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn fit_widths(widths: &mut [usize], headers: &[&str], max_width: Option<usize>) {
    let Some(max_width) = max_width else {
        return;
    };

    let separators = widths.len().saturating_sub(1) * 2;
    let mut total = widths.iter().sum::<usize>() + separators;

    while total > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(idx, width)| **width > headers[*idx].len().max(6))
            .max_by_key(|(_, width)| **width)
            .map(|(idx, _)| idx);

        let Some(idx) = widest else {
            break;
        };

        widths[idx] -= 1;
        total -= 1;
    }
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out: String = value.chars().take(width - 1).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn columns_align_to_widest_cell() {
        let rows = vec![
            vec!["AccountKeeper".to_string(), "authkeeper.AccountKeeper".to_string()],
            vec!["BankKeeper".to_string(), "bankkeeper.BaseKeeper".to_string()],
        ];
        let table = render_table(&["name", "type"], &rows, TableOptions::default());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "name           type");
        assert!(lines[1].chars().all(|c| c == '-'));
        assert_eq!(lines[2], "AccountKeeper  authkeeper.AccountKeeper");
        assert_eq!(lines[3], "BankKeeper     bankkeeper.BaseKeeper");
    }

    #[test]
    fn narrow_terminal_truncates_widest_column() {
        let rows = vec![vec![
            "x".to_string(),
            "github.com/cosmos/cosmos-sdk/x/staking.AppModuleBasic".to_string(),
        ]];
        let table = render_table(
            &["n", "module"],
            &rows,
            TableOptions {
                max_width: Some(40),
            },
        );
        let row = table.lines().nth(2).expect("row line");
        assert!(row.chars().count() <= 40);
        assert!(row.ends_with('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let rows = vec![vec!["only".to_string()]];
        let table = render_table(&["a", "b"], &rows, TableOptions::default());
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with('-')));
    }
}
