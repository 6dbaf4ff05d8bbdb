//! `PIVOTIFYJS_STYLE_GRADIENT:"Column"="from:..;to:..;sort:..;target:.."`

use super::lines;
use crate::core::color;
use crate::error::{PivotError, PivotResult};
use crate::types::{GradientInstruction, GradientTarget, StyleInstruction};
use regex::Regex;
use tracing::debug;

pub const GRADIENT_KEYWORD: &str = "PIVOTIFYJS_STYLE_GRADIENT";

const DEFAULT_COLOR: &str = "transparent";

/// Gradient instructions, one per directive line
pub fn parse_gradients(text: &str) -> PivotResult<Vec<StyleInstruction>> {
    let pattern = Regex::new(&format!(r#"^{}:"([^"]+)"="([^"]*)"$"#, GRADIENT_KEYWORD))
        .map_err(|e| PivotError::InvalidDirective(format!("Regex error: {}", e)))?;

    let mut instructions = Vec::new();
    for line in lines(text)? {
        if !line.starts_with(&format!("{}:", GRADIENT_KEYWORD)) {
            continue;
        }
        let captures = pattern.captures(line).ok_or_else(|| {
            PivotError::InvalidDirective(format!(
                "expected {}:\"Column\"=\"from:..;to:..\", got: {}",
                GRADIENT_KEYWORD, line
            ))
        })?;
        let gradient = parse_params(captures[1].trim(), &captures[2])?;
        instructions.push(StyleInstruction::Gradient(gradient));
    }
    Ok(instructions)
}

fn parse_params(column: &str, params: &str) -> PivotResult<GradientInstruction> {
    let mut target = GradientTarget::Background;
    let mut descending = false;
    let mut from: Option<String> = None;
    let mut to: Option<String> = None;

    for pair in params.split(';') {
        let Some((key, value)) = pair.split_once(':') else {
            continue;
        };
        let (key, value) = (key.trim(), value.trim());
        if key.is_empty() || value.is_empty() {
            continue;
        }
        match key {
            "target" => {
                target = match value {
                    "bg" | "background" => GradientTarget::Background,
                    "text" => GradientTarget::Text,
                    _ => {
                        return Err(PivotError::InvalidStyle(format!(
                            "Invalid target value: {}. Allowed values are 'bg', 'background', 'text'.",
                            value
                        )))
                    }
                }
            }
            "sort" => {
                descending = match value {
                    "ascending" => false,
                    "descending" => true,
                    _ => {
                        return Err(PivotError::InvalidStyle(format!(
                            "Invalid sort value: {}. Allowed values are 'ascending', 'descending'.",
                            value
                        )))
                    }
                }
            }
            "from" => from = Some(validate_color(value)?),
            "to" => to = Some(validate_color(value)?),
            other => debug!(key = other, "ignoring unknown gradient parameter"),
        }
    }

    if from.is_none() && to.is_none() {
        return Err(PivotError::InvalidStyle(
            "At least one of 'from' and 'to' color must be specified for gradient styling."
                .to_string(),
        ));
    }

    let from = from.unwrap_or_else(|| DEFAULT_COLOR.to_string());
    let to = to.unwrap_or_else(|| DEFAULT_COLOR.to_string());
    let (from, to) = if descending { (to, from) } else { (from, to) };

    Ok(GradientInstruction {
        column: column.to_string(),
        target,
        from,
        to,
    })
}

fn validate_color(value: &str) -> PivotResult<String> {
    if color::is_valid(value) {
        Ok(value.to_string())
    } else {
        Err(PivotError::InvalidStyle(format!(
            "Invalid color value: {}. Must be a valid hex code or CSS color name.",
            value
        )))
    }
}
