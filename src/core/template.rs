//! `${Column}` / `${Column:default}` variable references

/// One variable reference found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableRef<'a> {
    /// Referenced column name, trimmed
    pub column: &'a str,
    /// Default literal, trimmed, if one was given after ':'
    pub default: Option<&'a str>,
}

/// A template split into literal text and variable references
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    Variable(VariableRef<'a>),
}

/// Split a template into segments. `${}` and an unterminated `${` stay literal.
pub fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("${") {
        let body_start = start + 2;
        let Some(len) = rest[body_start..].find('}') else {
            break;
        };
        if len == 0 {
            out.push(Segment::Literal(&rest[..body_start + 1]));
            rest = &rest[body_start + 1..];
            continue;
        }
        if start > 0 {
            out.push(Segment::Literal(&rest[..start]));
        }
        let body = &rest[body_start..body_start + len];
        let variable = match body.split_once(':') {
            Some((column, default)) => VariableRef {
                column: column.trim(),
                default: Some(default.trim()),
            },
            None => VariableRef {
                column: body.trim(),
                default: None,
            },
        };
        out.push(Segment::Variable(variable));
        rest = &rest[body_start + len + 1..];
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }
    out
}

/// True when the text holds at least one variable reference
pub fn has_variables(text: &str) -> bool {
    segments(text)
        .iter()
        .any(|s| matches!(s, Segment::Variable(_)))
}

/// Replace every variable reference with the text produced by `lookup`
pub fn substitute<E, F>(template: &str, mut lookup: F) -> Result<String, E>
where
    F: FnMut(&VariableRef<'_>) -> Result<String, E>,
{
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(var) => out.push_str(&lookup(&var)?),
        }
    }
    Ok(out)
}

/// Rewrite `${Column:default}` references as `${Column}`
pub fn strip_defaults(template: &str) -> String {
    let mut out = String::with_capacity(template.len());
    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(var) => {
                out.push_str("${");
                out.push_str(var.column);
                out.push('}');
            }
        }
    }
    out
}
