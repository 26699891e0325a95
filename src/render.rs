//! HTML fragments for solver output.
//!
//! Every piece of text that comes from users or from the solver goes through
//! [`escape_html`] before it is inserted.

use std::fmt::Write;

use simplex_api_sdk::{Cell, ProblemPayload, SimplexTable, Solution, SolverResult};

/// Shown instead of an optimal value that is absent or not a number
pub const MISSING_VALUE: &str = "N/A";

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}

/// Format with two decimals, as values are shown in summaries
pub fn format_fixed(value: f64) -> String {
    format!("{:.2}", value)
}

/// Round to six decimals and drop trailing zeros, as table cells are shown
pub fn format_cell_number(value: f64) -> String {
    let rounded: f64 = format!("{:.6}", value).parse().unwrap_or(value);
    if rounded == 0.0 {
        // no "-0"
        return "0".to_string();
    }
    rounded.to_string()
}

/// The result card shown on the editor page after a submission
///
/// With `inputs`, only the first `inputs.C.len()` variables are listed
/// (the decision variables); without, every variable is.
pub fn render_result(result: &SolverResult, inputs: Option<&ProblemPayload>) -> String {
    let solution = result.solucion.as_ref();
    let optimal_value = solution
        .and_then(|s| s.valor_optimo)
        .map(format_fixed)
        .unwrap_or_else(|| MISSING_VALUE.to_string());

    let mut items = String::new();
    if let Some(solution) = solution {
        let variables = match inputs {
            Some(p) => solution.variables.decision(p.num_variables()),
            None => solution.variables.decision(solution.variables.len()),
        };
        for var in variables {
            let _ = write!(
                items,
                "<li>{}: {}</li>",
                escape_html(&var.name),
                format_fixed(var.value)
            );
        }
    }

    let tables_link = if result.is_optimal() {
        r#"<a href="/tablas" class="btn btn-tablas btn-full btn-large">View tables</a>"#
    } else {
        ""
    };

    format!(
        r#"<h3 class="section-title">Result</h3>
<div class="resultado-card">
  <p><strong>Status:</strong> {status}</p>
  <p><strong>Optimal value:</strong> {optimal_value}</p>
  <p><strong>Variables:</strong></p>
  <ul class="resultado-list">{items}</ul>
  {tables_link}
</div>"#,
        status = escape_html(&result.status),
    )
}

/// Panel for a failed submission: transport errors and unbuildable payloads
pub fn render_error(message: &str) -> String {
    format!(
        r#"<h3 class="section-title">Result</h3>
<div class="resultado-card">
  <p class="resultado-error"><strong>Error:</strong> {}</p>
  <p class="resultado-error-sub">Check the server logs for more details.</p>
</div>"#,
        escape_html(message)
    )
}

/// Panel for a submission stopped by validation
pub fn render_validation_error(message: &str) -> String {
    format!(
        r#"<div class="alert alert-error">
  <strong>⚠️ Validation error</strong>
  <p>{}</p>
</div>"#,
        escape_html(message)
    )
}

/// Link opening the two-variable plot in a new browsing context
pub fn render_graph_affordance(visible: bool) -> String {
    if !visible {
        return String::new();
    }
    r#"<div id="accionesExtra" class="acciones-extra">
  <a id="btnVerGrafico" href="/graph" target="_blank" rel="noopener" class="btn btn-secondary btn-full">View graph</a>
</div>"#
        .to_string()
}

/// All tables in order, or a notice when there are none
pub fn render_tables(tables: &[SimplexTable]) -> String {
    if tables.is_empty() {
        return "<p class='resultado-error-sub'>No tables were received from the server.</p>"
            .to_string();
    }
    tables.iter().map(render_table).collect()
}

fn render_table(table: &SimplexTable) -> String {
    let title = if table.titulo.is_empty() {
        "Table"
    } else {
        table.titulo.as_str()
    };

    let headers: String = table
        .headers
        .iter()
        .map(|h| format!("<th>{}</th>", escape_html(h)))
        .collect();

    let mut body = String::new();
    for row in &table.filas {
        let _ = write!(body, "<tr>{}</tr>", render_cells(row));
    }
    if !table.fila_obj.is_empty() {
        let _ = write!(
            body,
            r#"<tr class="fila-obj">{}</tr>"#,
            render_cells(&table.fila_obj)
        );
    }

    format!(
        r#"<details class="tabla-container" open>
  <summary class="tabla-summary">{title}</summary>
  <div class="table-wrapper">
    <table class="simplex-table">
      <thead><tr>{headers}</tr></thead>
      <tbody>{body}</tbody>
    </table>
  </div>
</details>"#,
        title = escape_html(title),
    )
}

// The first cell labels the row; the others are values.
fn render_cells(row: &[Cell]) -> String {
    row.iter()
        .enumerate()
        .map(|(i, cell)| {
            if i == 0 {
                format!(r#"<th class="th-row">{}</th>"#, escape_html(&cell_text(cell)))
            } else {
                format!("<td>{}</td>", format_cell(cell))
            }
        })
        .collect()
}

fn cell_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => n.to_string(),
        Cell::Label(s) => s.clone(),
    }
}

fn format_cell(cell: &Cell) -> String {
    match cell {
        Cell::Number(n) => format_cell_number(*n),
        Cell::Label(s) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => format_cell_number(n),
            _ => escape_html(s),
        },
    }
}

/// Status card of the tables page
pub fn render_status(status: &str) -> String {
    let status = if status.is_empty() { "unknown" } else { status };
    format!(
        r#"<h2 class="section-title">Status</h2>
<div class="resultado-card">
  <p><strong>Result:</strong> {}</p>
</div>"#,
        escape_html(status)
    )
}

/// Solution summary of the tables page, listing every variable
pub fn render_summary(solution: Option<&Solution>) -> String {
    let Some(solution) = solution else {
        return String::new();
    };

    let value = solution
        .valor_optimo
        .map(format_fixed)
        .unwrap_or_else(|| "Not available".to_string());

    let items: String = solution
        .variables
        .iter()
        .filter(|v| !v.name.is_empty())
        .map(|v| format!("<li>{}: {}</li>", escape_html(&v.name), format_fixed(v.value)))
        .collect();

    format!(
        r#"<h2 class="section-title">Solution</h2>
<div class="resultado-card">
  <p><strong>Optimal value:</strong> {value}</p>
  <p><strong>Variables:</strong></p>
  <ul class="resultado-list">{items}</ul>
</div>"#
    )
}

/// Message shown when the tables page has nothing to render
pub fn render_notice(title: &str, subtitle: &str) -> String {
    format!(
        r#"<p class="resultado-error"><strong>{}</strong></p>
<p class="resultado-error-sub">{}</p>"#,
        escape_html(title),
        escape_html(subtitle)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use simplex_api_sdk::{Operator, ProblemType, Variables};

    fn optimal_result() -> SolverResult {
        serde_json::from_str(
            r#"{"status":"optimo","solucion":{"variables":{"x1":4,"x2":6,"s1":0,"s2":0},"valor_optimo":38},"tablas":[]}"#,
        )
        .unwrap()
    }

    fn two_variables() -> ProblemPayload {
        ProblemPayload {
            problem_type: ProblemType::Maximization,
            c: vec![3.0, 5.0],
            li: vec![vec![1.0, 0.0]],
            o: vec![Operator::LessEqual],
            ld: vec![4.0],
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b a="1">&'</b>"#),
            "&lt;b a=&quot;1&quot;&gt;&amp;&#039;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_format_cell_number() {
        assert_eq!(format_cell_number(4.0), "4");
        assert_eq!(format_cell_number(1.0 / 3.0), "0.333333");
        assert_eq!(format_cell_number(2.5000004), "2.5");
        assert_eq!(format_cell_number(-0.0000001), "0");
    }

    #[test]
    fn test_result_lists_decision_variables() {
        let html = render_result(&optimal_result(), Some(&two_variables()));
        assert!(html.contains("<p><strong>Optimal value:</strong> 38.00</p>"));
        assert!(html.contains("<li>x1: 4.00</li><li>x2: 6.00</li></ul>"));
        assert!(!html.contains("s1"));
        assert!(html.contains("View tables"));
    }

    #[test]
    fn test_result_without_inputs_lists_everything() {
        let html = render_result(&optimal_result(), None);
        assert!(html.contains("<li>s2: 0.00</li>"));
    }

    #[test]
    fn test_non_optimal_result() {
        let result = SolverResult {
            status: "no acotado".to_string(),
            solucion: None,
            tablas: vec![],
        };
        let html = render_result(&result, Some(&two_variables()));
        assert!(html.contains("no acotado"));
        assert!(html.contains(MISSING_VALUE));
        assert!(!html.contains("View tables"));
    }

    #[test]
    fn test_status_is_escaped() {
        let result = SolverResult {
            status: "<script>alert(1)</script>".to_string(),
            ..Default::default()
        };
        let html = render_result(&result, None);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_empty_tables_notice() {
        assert!(render_tables(&[]).contains("No tables were received"));
    }

    #[test]
    fn test_table_rows_and_objective_row() {
        let table = SimplexTable {
            titulo: "Phase 1 <1>".to_string(),
            headers: vec!["Base".to_string(), "x1".to_string(), "LD (RHS)".to_string()],
            filas: vec![vec![
                Cell::Label("s1".to_string()),
                Cell::Number(1.0 / 3.0),
                Cell::Label("n/a <x>".to_string()),
            ]],
            fila_obj: vec![Cell::Label("Z".to_string()), Cell::Number(-3.0), Cell::Number(0.0)],
        };

        let html = render_tables(&[table]);
        assert!(html.contains("Phase 1 &lt;1&gt;"));
        assert!(html.contains(r#"<th class="th-row">s1</th><td>0.333333</td><td>n/a &lt;x&gt;</td>"#));
        assert!(html.contains(r#"<tr class="fila-obj"><th class="th-row">Z</th><td>-3</td><td>0</td></tr>"#));
    }

    #[test]
    fn test_table_without_objective_row_or_title() {
        let table = SimplexTable {
            filas: vec![vec![Cell::Label("s1".to_string()), Cell::Label("2.5".to_string())]],
            ..Default::default()
        };
        let html = render_tables(&[table]);
        assert!(html.contains(r#"<summary class="tabla-summary">Table</summary>"#));
        assert!(html.contains("<td>2.5</td>"));
        assert!(!html.contains("fila-obj"));
    }

    #[test]
    fn test_summary_lists_all_variables() {
        let solution = Solution {
            variables: Variables::new([("x1", 2.0), ("s1", 1.25)]),
            valor_optimo: None,
        };
        let html = render_summary(Some(&solution));
        assert!(html.contains("Not available"));
        assert!(html.contains("<li>x1: 2.00</li><li>s1: 1.25</li>"));
        assert_eq!(render_summary(None), "");
    }

    #[test]
    fn test_graph_affordance() {
        assert_eq!(render_graph_affordance(false), "");
        assert!(render_graph_affordance(true).contains(r#"target="_blank""#));
    }
}
