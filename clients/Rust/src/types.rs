use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Status the solver reports when an optimal solution was found
pub const OPTIMAL_STATUS: &str = "optimo";

/// Whether the objective function is maximized or minimized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProblemType {
    /// Maximize the objective function
    #[default]
    Maximization,
    /// Minimize the objective function
    Minimization,
}

impl ProblemType {
    /// Wire name of the problem type
    pub fn as_str(&self) -> &'static str {
        match self {
            ProblemType::Maximization => "maximization",
            ProblemType::Minimization => "minimization",
        }
    }
}

/// Relational operator of a constraint row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Operator {
    /// Left-hand side is at most the right-hand side
    #[default]
    #[serde(rename = "<=")]
    LessEqual,
    /// Left-hand side equals the right-hand side
    #[serde(rename = "=")]
    Equal,
    /// Left-hand side is at least the right-hand side
    #[serde(rename = ">=")]
    GreaterEqual,
}

impl Operator {
    /// All operators, in the order they are offered to users
    pub const ALL: [Operator; 3] = [Operator::LessEqual, Operator::Equal, Operator::GreaterEqual];

    /// Wire representation (`<=`, `=`, `>=`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::LessEqual => "<=",
            Operator::Equal => "=",
            Operator::GreaterEqual => ">=",
        }
    }

    /// Mathematical symbol used for display
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::LessEqual => "≤",
            Operator::Equal => "=",
            Operator::GreaterEqual => "≥",
        }
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "<=" => Ok(Operator::LessEqual),
            "=" => Ok(Operator::Equal),
            ">=" => Ok(Operator::GreaterEqual),
            other => Err(format!("unknown operator '{}'", other)),
        }
    }
}

/// A linear program in the shape accepted by the solve endpoints
///
/// `c` holds one coefficient per variable; `li`, `o` and `ld` hold one entry
/// per constraint (coefficients, operator and right-hand side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemPayload {
    /// Optimization sense
    pub problem_type: ProblemType,
    /// Objective coefficients
    #[serde(rename = "C")]
    pub c: Vec<f64>,
    /// Constraint coefficients, one row per constraint
    #[serde(rename = "LI")]
    pub li: Vec<Vec<f64>>,
    /// Constraint operators
    #[serde(rename = "O")]
    pub o: Vec<Operator>,
    /// Constraint right-hand sides
    #[serde(rename = "LD")]
    pub ld: Vec<f64>,
}

impl ProblemPayload {
    /// Number of decision variables
    pub fn num_variables(&self) -> usize {
        self.c.len()
    }

    /// Number of constraints
    pub fn num_constraints(&self) -> usize {
        self.li.len()
    }

    /// Whether the problem can be drawn on a plane
    pub fn is_two_dimensional(&self) -> bool {
        self.c.len() == 2
    }
}

/// Value of one solver variable
#[derive(Debug, Clone, PartialEq)]
pub struct VariableValue {
    /// Variable name as reported by the solver (`x1`, `s1`, ...)
    pub name: String,
    /// Value in the reported solution
    pub value: f64,
}

/// Variable values in the order the solver listed them
///
/// On the wire this is a JSON object; the order of its keys is kept.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Variables(Vec<VariableValue>);

impl Variables {
    /// Create from an ordered list of (name, value) pairs
    pub fn new<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        Variables(
            pairs
                .into_iter()
                .map(|(name, value)| VariableValue { name: name.into(), value })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &VariableValue> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.iter().find(|v| v.name == name).map(|v| v.value)
    }

    /// The decision variables of a problem with `count` variables
    ///
    /// The solver lists decision variables before slack and surplus variables.
    pub fn decision(&self, count: usize) -> &[VariableValue] {
        &self.0[..count.min(self.0.len())]
    }
}

impl Serialize for Variables {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for v in &self.0 {
            map.serialize_entry(&v.name, &v.value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Variables {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Variables;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of variable names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, f64>()? {
                    values.push(VariableValue { name, value });
                }
                Ok(Variables(values))
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}

/// Final solution reported by the solver
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Solution {
    /// Variable values, decision variables first
    #[serde(default, deserialize_with = "null_as_default")]
    pub variables: Variables,
    /// Objective value, absent when the solver did not report a number
    #[serde(default, deserialize_with = "number_or_none")]
    pub valor_optimo: Option<f64>,
}

/// A table cell: a row label or a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Label(String),
}

/// One simplex tableau as produced by the solver
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SimplexTable {
    #[serde(default, deserialize_with = "null_as_default")]
    pub titulo: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub headers: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub filas: Vec<Vec<Cell>>,
    /// Objective (Z) row; may be empty
    #[serde(default, deserialize_with = "null_as_default")]
    pub fila_obj: Vec<Cell>,
}

/// Response body of the tabular solve endpoint
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SolverResult {
    /// Solver outcome (`optimo`, `no acotado`, `infactible`, ...)
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    /// Final solution, absent when no optimum was reached
    #[serde(default)]
    pub solucion: Option<Solution>,
    /// Tableau history in iteration order
    #[serde(default, deserialize_with = "null_as_default")]
    pub tablas: Vec<SimplexTable>,
}

impl SolverResult {
    /// Whether the status denotes an optimal solution
    pub fn is_optimal(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case(OPTIMAL_STATUS)
    }
}

/// A parsed solve result together with the body it was parsed from
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResponse {
    pub result: SolverResult,
    /// Raw response body, kept verbatim for persistence
    pub body: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn number_or_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_f64())
}
