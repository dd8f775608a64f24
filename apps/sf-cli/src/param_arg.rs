//! `--param name=value[:min:max[:step]]` arguments.

use sf_controls::ParamConfig;
use sf_expr::{ExprCoercion, RawValue, ValueCoercion};

#[derive(Debug, Clone, PartialEq)]
pub struct ParamArg {
    pub name: String,
    pub config: ParamConfig,
}

/// clap value parser. Numbers may be constant expressions (`pi/2`).
///
/// Without explicit bounds the default `[-1, 1]` slider range is widened to
/// include the value, so the value is never clamped.
pub fn parse_param(spec: &str) -> Result<ParamArg, String> {
    let (name, rest) = spec
        .split_once('=')
        .ok_or_else(|| "expected NAME=VALUE".to_string())?;
    let name = name.trim();
    if name.is_empty() {
        return Err("missing parameter name".to_string());
    }

    let numbers = rest
        .split(':')
        .map(|part| {
            ExprCoercion
                .coerce_real(&RawValue::from(part), false)
                .map_err(|e| e.to_string())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = ParamConfig::new().value(numbers[0]);
    match numbers.as_slice() {
        [value] => {
            config = config.range(config.min.min(*value), config.max.max(*value));
        }
        [_, min, max] => config = config.range(*min, *max),
        [_, min, max, step] => config = config.range(*min, *max).step(*step),
        _ => return Err("expected VALUE, VALUE:MIN:MAX or VALUE:MIN:MAX:STEP".to_string()),
    }
    config.validate().map_err(|e| e.to_string())?;

    Ok(ParamArg {
        name: name.to_string(),
        config,
    })
}
