//! Full pages: the editor form projected from [`EditorState`] and the
//! tables page projected from the stored result.

use std::fmt::Write;

use simplex_api_sdk::{Operator, ProblemType, SolverResult};

use crate::domain::form::{self, FieldId, NumericField, MAX_VARIABLES, VARIABLE_COUNT_FIELD};
use crate::editor::{EditorState, ResultsPanel};
use crate::render::{self, escape_html};
use crate::store::SlotRead;

const EDITOR_TEMPLATE: &str = include_str!("../static/editor.html");
const TABLES_TEMPLATE: &str = include_str!("../static/tablas.html");

/// Replace `{{key}}` placeholders in one pass
///
/// Inserted values are not scanned again, so placeholder-like text coming
/// from the solver stays literal.
pub fn fill(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find("}}") else {
            out.push_str(&rest[start..]);
            return out;
        };
        let key = &after[..end];
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                out.push_str("{{");
                out.push_str(key);
                out.push_str("}}");
            }
        }
        rest = &after[end + 2..];
    }
    out.push_str(rest);
    out
}

/// The editor page for the current state
pub fn editor_page(state: &EditorState) -> String {
    let (results, results_class) = match &state.results {
        ResultsPanel::Hidden => (String::new(), "hidden"),
        ResultsPanel::Solved { result, inputs } => {
            (render::render_result(result, inputs.as_ref()), "")
        }
        ResultsPanel::Failed { message } => (render::render_error(message), ""),
        ResultsPanel::Invalid { message } => (render::render_validation_error(message), ""),
    };

    fill(
        EDITOR_TEMPLATE,
        &[
            ("sense_controls", &sense_controls(state.form.sense())),
            ("variable_count", &variable_count_input(state)),
            ("objective", &objective_row(state)),
            ("constraints", &constraint_rows(state)),
            ("results", &results),
            ("results_class", results_class),
            ("graph", &render::render_graph_affordance(state.graph_offered)),
        ],
    )
}

fn sense_controls(sense: ProblemType) -> String {
    let class = |active: bool| if active { "btn-primary" } else { "btn-secondary" };
    format!(
        r#"<button id="btnMax" type="submit" name="action" value="sense:max" class="btn {}">MAX</button>
<button id="btnMin" type="submit" name="action" value="sense:min" class="btn {}">MIN</button>"#,
        class(sense == ProblemType::Maximization),
        class(sense == ProblemType::Minimization),
    )
}

fn variable_count_input(state: &EditorState) -> String {
    format!(
        r#"<input type="number" id="numVariables" name="{}" min="1" max="{}" step="1" value="{}" class="input-field">"#,
        VARIABLE_COUNT_FIELD,
        MAX_VARIABLES,
        escape_html(state.form.variable_count_input())
    )
}

fn numeric_input(state: &EditorState, id: FieldId, field: &NumericField, extra_class: &str) -> String {
    let invalid = field.is_invalid() || state.invalid_fields.contains(&id);
    let focus = state.invalid_fields.first() == Some(&id);
    format!(
        r#"<input type="text" inputmode="decimal" autocomplete="off" name="{id}" value="{value}" class="input-field variable-input{extra}{error}"{autofocus}>"#,
        value = escape_html(field.text()),
        extra = extra_class,
        error = if invalid { " input-error" } else { "" },
        autofocus = if focus { " autofocus" } else { "" },
    )
}

fn terms<'a>(
    state: &EditorState,
    fields: impl Iterator<Item = (FieldId, &'a NumericField)>,
    count: usize,
) -> String {
    let mut out = String::new();
    for (i, (id, field)) in fields.enumerate() {
        let class = match id {
            FieldId::Coefficient { index, .. } => format!(" a{}", index + 1),
            _ => String::new(),
        };
        out.push_str(&numeric_input(state, id, field, &class));
        let _ = write!(out, " x<sub>{}</sub>", i + 1);
        if i + 1 < count {
            out.push_str(" + ");
        }
    }
    out
}

fn objective_row(state: &EditorState) -> String {
    let form = &state.form;
    let fields = form
        .objective()
        .iter()
        .enumerate()
        .map(|(i, f)| (FieldId::Objective(i), f));
    format!(
        r#"<label class="input-label">{} </label>{}"#,
        form.objective_label(),
        terms(state, fields, form.objective().len())
    )
}

fn operator_select(row: form::RowId, selected: Operator) -> String {
    let options: String = Operator::ALL
        .iter()
        .map(|op| {
            format!(
                r#"<option value="{}"{}>{}</option>"#,
                escape_html(op.as_str()),
                if *op == selected { " selected" } else { "" },
                op.symbol()
            )
        })
        .collect();
    format!(
        r#"<select name="{}" class="input-field operador">{}</select>"#,
        form::operator_field(row),
        options
    )
}

fn constraint_rows(state: &EditorState) -> String {
    let mut out = String::new();
    for row in state.form.constraints() {
        let id = row.id();
        let fields = row
            .coefficients()
            .iter()
            .enumerate()
            .map(|(index, f)| (FieldId::Coefficient { row: id, index }, f));
        let _ = write!(
            out,
            r#"<div class="restriccion-row restriccion" id="row-{id}">
  {terms}
  {operator}
  {rhs}
  <button class="btn btn-delete btnEliminar" type="submit" name="action" value="remove:{id}" title="Remove constraint">&times;</button>
</div>
"#,
            terms = terms(state, fields, row.coefficients().len()),
            operator = operator_select(id, row.operator()),
            rhs = numeric_input(state, FieldId::Rhs(id), row.rhs(), " b"),
        );
    }
    out
}

/// The tables page for whatever the result slot holds
pub fn tables_page(stored: SlotRead<SolverResult>) -> String {
    let (status, tables, summary) = match stored {
        SlotRead::Present(result) => (
            render::render_status(&result.status),
            render::render_tables(&result.tablas),
            render::render_summary(result.solucion.as_ref()),
        ),
        SlotRead::Absent => (
            render::render_notice(
                "No data to show.",
                "Solve a problem first and then come back to this page.",
            ),
            String::new(),
            String::new(),
        ),
        SlotRead::Corrupt => (
            render::render_notice("Error reading data.", "The stored result is not valid."),
            String::new(),
            String::new(),
        ),
    };

    let summary_class = if summary.is_empty() { "hidden" } else { "" };
    fill(
        TABLES_TEMPLATE,
        &[
            ("status", &status),
            ("tables", &tables),
            ("summary", &summary),
            ("summary_class", summary_class),
        ],
    )
}
