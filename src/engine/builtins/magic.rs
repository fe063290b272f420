//! `${magic:keyword}` variables
//!
//! Date/time keywords follow the usual date-format tokens (`yyyy`, `MM`,
//! `dd`, `hh`, ...), plus a few shortcuts such as `date` and `datetime`.

use crate::engine::context::Context;
use crate::engine::registry::VariableRegistry;
use crate::error::{EvalError, EvalResult};
use crate::utils::paths;
use chrono::{DateTime, Datelike, Local, TimeZone, Timelike};
use std::fmt::Display;

pub fn register(registry: &mut VariableRegistry) {
    registry.add("magic", |ctx, keyword| expand(ctx, keyword, &Local::now()));
}

/// Expand one magic keyword at time `now`
pub fn expand<Tz>(ctx: &Context, keyword: &str, now: &DateTime<Tz>) -> EvalResult<String>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let fmt = |spec: &str| now.format(spec).to_string();

    let value = match keyword {
        "d" => now.day().to_string(),
        "dd" => fmt("%d"),
        "ddd" => fmt("%a"),
        "dddd" => fmt("%A"),
        "M" => now.month().to_string(),
        "MM" => fmt("%m"),
        "MMM" => fmt("%b"),
        "MMMM" => fmt("%B"),
        "yy" => fmt("%y"),
        "yyyy" => fmt("%Y"),
        "h" | "H" => now.hour().to_string(),
        "hh" | "HH" => fmt("%H"),
        "m" => now.minute().to_string(),
        "mm" => fmt("%M"),
        "s" => now.second().to_string(),
        "ss" => fmt("%S"),
        "z" => now.timestamp_subsec_millis().to_string(),
        "zzz" => format!("{:03}", now.timestamp_subsec_millis()),
        "AP" | "A" => fmt("%p"),
        "ap" | "a" => fmt("%P"),
        "random" | "random_d" => rand::random::<u32>().to_string(),
        "date" => fmt("%Y-%m-%d"),
        "da" => fmt("%Y%m%d"),
        "time" => fmt("%H:%M:%S"),
        "datetime" => fmt("%Y-%m-%d %H:%M:%S"),
        "dt" => fmt("%Y%m%d %H:%M:%S"),
        "t" => fmt("%Z"),
        "w" => now.iso_week().week().to_string(),
        "note" => ctx
            .buffer
            .as_ref()
            .map(|b| paths::file_name(&b.path))
            .unwrap_or_default(),
        "no" => ctx
            .buffer
            .as_ref()
            .map(|b| paths::complete_base_name(&b.path))
            .unwrap_or_default(),
        // Attachment folders aren't tracked yet
        "att" => String::new(),
        other => {
            return Err(EvalError::UnknownArgument {
                variable: "magic".to_string(),
                argument: other.to_string(),
            })
        }
    };

    Ok(value)
}
