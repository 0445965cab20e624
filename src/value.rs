use {
    regex::{Captures, Regex},
    std::{fmt, sync::LazyLock},
};

/// A typed argument for a log message template.
///
/// Values are usually built with `From`, which the logging macros do for
/// every argument. Anything else that implements [`fmt::Display`] can be
/// captured with [`Value::display`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    UInt(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// An already rendered [`fmt::Display`] value.
    Display(String),
}

impl Value {
    /// Capture any displayable value by rendering it now.
    pub fn display<T: fmt::Display + ?Sized>(value: &T) -> Self {
        Value::Display(value.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) | Value::Display(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::UInt(u) => write!(f, "{u}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Char(c) => write!(f, "{c}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<&String> for Value {
    fn from(value: &String) -> Self {
        Value::Str(value.clone())
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<char> for Value {
    fn from(value: char) -> Self {
        Value::Char(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value as f64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

macro_rules! value_from_int {
    ($variant:ident, $target:ty: $($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(value: $t) -> Self {
                    Value::$variant(value as $target)
                }
            }
        )*
    };
}

value_from_int!(Int, i64: i8, i16, i32, i64, isize);
value_from_int!(UInt, u64: u8, u16, u32, u64, usize);

impl From<&std::path::Path> for Value {
    fn from(value: &std::path::Path) -> Self {
        Value::Str(value.display().to_string())
    }
}

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{\{|\}\}|\{\}").expect("valid placeholder pattern"));

/// Render `template` with `args`.
///
/// Each `{}` is replaced with the next argument in order, and `{{` / `}}`
/// produce literal braces. A placeholder with no argument left renders as
/// `{!missing}`; arguments left over once the template is exhausted are
/// appended as ` {!extra: a, b}`.
///
/// # Examples
/// ```
/// use rollog::{interpolate, Value};
///
/// let line = interpolate("user {} logged in after {} tries", &["ada".into(), 3.into()]);
/// assert_eq!(line, "user ada logged in after 3 tries");
///
/// assert_eq!(interpolate("{{}} {}", &[]), "{} {!missing}");
/// assert_eq!(interpolate("done", &[Value::Bool(true)]), "done {!extra: true}");
/// ```
pub fn interpolate(template: &str, args: &[Value]) -> String {
    let mut next = args.iter();
    let mut out = PLACEHOLDER
        .replace_all(template, |caps: &Captures| match &caps[0] {
            "{{" => "{".to_string(),
            "}}" => "}".to_string(),
            _ => next.next().map_or_else(|| "{!missing}".to_string(), Value::to_string),
        })
        .into_owned();

    let extra: Vec<String> = next.map(Value::to_string).collect();
    if !extra.is_empty() {
        out.push_str(&format!(" {{!extra: {}}}", extra.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fills_placeholders_in_order() {
        let args = [Value::from("test-string"), Value::from(42u8), Value::from(-7i32), Value::from(1.5)];
        assert_eq!(
            interpolate("a={} b={} c={} d={}", &args),
            "a=test-string b=42 c=-7 d=1.5"
        );
    }

    #[test]
    fn template_without_args_is_unchanged() {
        assert_eq!(interpolate("plain message", &[]), "plain message");
        assert_eq!(interpolate("", &[]), "");
    }

    #[test]
    fn escaped_braces_are_not_placeholders() {
        assert_eq!(interpolate("{{{}}}", &["x".into()]), "{x}");
        assert_eq!(interpolate("map {{ k: {} }}", &[Value::Char('v')]), "map { k: v }");
    }

    #[test]
    fn reports_missing_and_extra_arguments() {
        assert_eq!(interpolate("{} and {}", &["one".into()]), "one and {!missing}");
        assert_eq!(
            interpolate("another", &["test789".into(), "test233".into()]),
            "another {!extra: test789, test233}"
        );
    }

    #[test]
    fn display_captures_arbitrary_types() {
        let addr = std::net::Ipv4Addr::new(127, 0, 0, 1);
        assert_eq!(interpolate("bound {}", &[Value::display(&addr)]), "bound 127.0.0.1");
    }
}
