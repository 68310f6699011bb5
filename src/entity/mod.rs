mod prompt;
mod value;

pub use prompt::{PromptRecord, VariableSpec};
pub use value::{Value, VarType};

use std::collections::BTreeMap;

/// Variables supplied to a render call, keyed by name.
pub type Variables = BTreeMap<String, Value>;
