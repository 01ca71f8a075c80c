//! Function result types after error augmentation

/// The result list a generated function declares, plus what its returns need
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    /// Result type as written in the output, e.g. `(int, error)`
    pub return_type: Option<String>,
    /// Zero values that precede the error when a `throw` returns
    pub zero_values: Vec<String>,
    /// An `error` result was appended to what the source declared
    pub augmented: bool,
    /// The source declared no result at all and `error` was synthesized
    pub synthesized: bool,
}

impl Signature {
    /// Resolve the generated result type for a declared one.
    ///
    /// Functions that neither `try` nor `throw` keep their declaration.
    pub fn resolve(return_type: Option<&str>, needs_error: bool) -> Self {
        if !needs_error {
            return Self {
                return_type: return_type.map(str::to_string),
                ..Self::default()
            };
        }

        let Some(declared) = return_type else {
            return Self {
                return_type: Some("error".to_string()),
                zero_values: Vec::new(),
                augmented: true,
                synthesized: true,
            };
        };

        let results = split_results(declared);
        if let Some((last, rest)) = results.split_last()
            && last == "error"
        {
            return Self {
                return_type: Some(declared.to_string()),
                zero_values: rest.iter().map(|ty| zero_value(ty)).collect(),
                augmented: false,
                synthesized: false,
            };
        }

        Self {
            return_type: Some(format!("({}, error)", results.join(", "))),
            zero_values: results.iter().map(|ty| zero_value(ty)).collect(),
            augmented: true,
            synthesized: false,
        }
    }

    /// Values for a successful `return`, with `nil` appended for the added error result
    pub fn success_values(&self, values: Vec<String>) -> Vec<String> {
        if !self.augmented {
            return values;
        }
        let mut values = if values.is_empty() {
            self.zero_values.clone()
        } else {
            values
        };
        values.push("nil".to_string());
        values
    }

    /// Values for a `return` that raises `error`
    pub fn error_values(&self, error: String) -> Vec<String> {
        let mut values = self.zero_values.clone();
        values.push(error);
        values
    }
}

/// Split `(A, B)` into its result types; a lone type yields itself
pub fn split_results(return_type: &str) -> Vec<String> {
    let trimmed = return_type.trim();
    let Some(inner) = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
    else {
        return vec![trimmed.to_string()];
    };

    let mut results = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in inner.chars() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                results.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    if !current.trim().is_empty() {
        results.push(current.trim().to_string());
    }
    results
}

/// The Go zero value for a type written as source text
pub fn zero_value(ty: &str) -> String {
    let ty = ty.trim();
    match ty {
        "int" | "int8" | "int16" | "int32" | "int64" | "uint" | "uint8" | "uint16" | "uint32"
        | "uint64" | "uintptr" | "byte" | "rune" | "float32" | "float64" | "complex64"
        | "complex128" => "0".to_string(),
        "string" => "\"\"".to_string(),
        "bool" => "false".to_string(),
        "error" | "any" => "nil".to_string(),
        _ if ["*", "[]", "map[", "chan", "<-chan", "func", "interface"]
            .iter()
            .any(|prefix| ty.starts_with(prefix)) =>
        {
            "nil".to_string()
        }
        _ => format!("*new({})", ty),
    }
}
