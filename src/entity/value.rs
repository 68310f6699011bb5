use serde::{Deserialize, Serialize};

/// A variable value supplied to a render call or declared as a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// A declared default that is not a scalar (list, mapping, null), kept
    /// as written and rendered as its JSON text.
    Structured(serde_yaml::Value),
}

impl Value {
    /// Runtime kind name, as reported in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::Structured(_) => "structured",
        }
    }

    /// Convert a YAML node, keeping scalars typed.
    pub fn from_yaml(node: &serde_yaml::Value) -> Self {
        match node {
            serde_yaml::Value::Bool(b) => Value::Boolean(*b),
            serde_yaml::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Integer(i),
                (None, Some(x)) => Value::Float(x),
                (None, None) => Value::Text(n.to_string()),
            },
            serde_yaml::Value::String(s) => Value::Text(s.clone()),
            other => Value::Structured(other.clone()),
        }
    }

    /// Infer a value from command-line text: booleans, then integers, then
    /// floats, falling back to text.
    pub fn infer(raw: &str) -> Self {
        match raw {
            "true" => return Value::Boolean(true),
            "false" => return Value::Boolean(false),
            _ => {}
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Value::Integer(n);
        }
        if let Ok(f) = raw.parse::<f64>() {
            if f.is_finite() {
                return Value::Float(f);
            }
        }
        Value::Text(raw.to_string())
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{:.1}", x),
            Value::Float(x) => write!(f, "{}", x),
            Value::Text(s) => f.write_str(s),
            Value::Structured(serde_yaml::Value::Null) => Ok(()),
            Value::Structured(node) => match serde_json::to_string(node) {
                Ok(json) => f.write_str(&json),
                Err(_) => {
                    let yaml = serde_yaml::to_string(node).map_err(|_| std::fmt::Error)?;
                    f.write_str(yaml.trim_end())
                }
            },
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

/// Declared type tag of a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarType {
    #[serde(alias = "str")]
    String,
    #[serde(alias = "int")]
    Integer,
    Float,
    #[serde(alias = "bool")]
    Boolean,
    /// Any tag outside the known set; never checked.
    #[serde(other)]
    Unrecognized,
}

impl VarType {
    /// Whether `value` satisfies this tag. Whole numbers are accepted where
    /// a float is declared.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (VarType::Unrecognized, _) => true,
            (VarType::String, Value::Text(_)) => true,
            (VarType::Integer, Value::Integer(_)) => true,
            (VarType::Float, Value::Float(_) | Value::Integer(_)) => true,
            (VarType::Boolean, Value::Boolean(_)) => true,
            _ => false,
        }
    }
}

impl std::fmt::Display for VarType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarType::String => write!(f, "string"),
            VarType::Integer => write!(f, "integer"),
            VarType::Float => write!(f, "float"),
            VarType::Boolean => write!(f, "boolean"),
            VarType::Unrecognized => write!(f, "unrecognized"),
        }
    }
}

impl std::str::FromStr for VarType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "string" | "str" => Ok(VarType::String),
            "integer" | "int" => Ok(VarType::Integer),
            "float" => Ok(VarType::Float),
            "boolean" | "bool" => Ok(VarType::Boolean),
            _ => Err(format!("Invalid variable type: {}", s)),
        }
    }
}
