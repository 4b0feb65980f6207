//! Plain column-aligned tables

/// Column alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Render rows under a header, padding every column to its widest cell
pub fn render_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let render_row = |cells: Vec<&str>| -> String {
        let line = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let width = widths.get(i).copied().unwrap_or(0);
                match aligns.get(i).copied().unwrap_or(Align::Left) {
                    Align::Left => format!("{:<width$}", cell, width = width),
                    Align::Right => format!("{:>width$}", cell, width = width),
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        format!("{}\n", line.trim_end())
    };

    let mut output = render_row(headers.to_vec());
    for row in rows {
        output.push_str(&render_row(row.iter().map(String::as_str).collect()));
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_table() {
        let rows = vec![
            vec!["error".to_string(), "Vale.Spelling".to_string(), "12".to_string()],
            vec!["warning".to_string(), "Docs.Passive".to_string(), "3".to_string()],
        ];
        let table = render_table(
            &["severity", "check", "count"],
            &[Align::Left, Align::Left, Align::Right],
            &rows,
        );

        assert_eq!(
            table,
            "severity  check          count\n\
             error     Vale.Spelling     12\n\
             warning   Docs.Passive       3\n"
        );
    }

    #[test]
    fn test_render_empty_table() {
        let table = render_table(&["a", "b"], &[], &[]);
        assert_eq!(table, "a  b\n");
    }
}
