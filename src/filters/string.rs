//! String-oriented built-in filters.

use super::{wrong_type, FilterFn, FilterResult};
use crate::value::Value;
use std::collections::HashMap;
use std::sync::Arc;

pub fn register(map: &mut HashMap<String, FilterFn>) {
    let entries: Vec<(&str, FilterFn)> = vec![
        ("upcase", Arc::new(upcase)),
        ("downcase", Arc::new(downcase)),
        ("capitalize", Arc::new(capitalize)),
        ("strip", Arc::new(strip)),
        ("lstrip", Arc::new(lstrip)),
        ("rstrip", Arc::new(rstrip)),
        ("append", Arc::new(append)),
        ("prepend", Arc::new(prepend)),
        ("replace", Arc::new(replace)),
        ("remove", Arc::new(remove)),
        ("split", Arc::new(split)),
        ("truncate", Arc::new(truncate)),
        ("truncatewords", Arc::new(truncatewords)),
        ("escape", Arc::new(escape)),
        ("newline_to_br", Arc::new(newline_to_br)),
    ];
    for (name, f) in entries {
        map.insert(name.to_string(), f);
    }
}

fn as_str<'a>(filter: &str, input: &'a Value) -> std::result::Result<&'a str, String> {
    input.as_str().ok_or_else(|| wrong_type(filter, "string"))
}

fn arg_str(args: &[Value], index: usize) -> &str {
    args.get(index).and_then(Value::as_str).unwrap_or("")
}

fn upcase(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("upcase", input)?.to_uppercase()))
}

fn downcase(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("downcase", input)?.to_lowercase()))
}

fn capitalize(input: &Value, _args: &[Value]) -> FilterResult {
    let s = as_str("capitalize", input)?;
    let mut chars = s.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    };
    Ok(Value::Str(capitalized))
}

fn strip(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("strip", input)?.trim().to_string()))
}

fn lstrip(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("lstrip", input)?.trim_start().to_string()))
}

fn rstrip(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("rstrip", input)?.trim_end().to_string()))
}

fn append(input: &Value, args: &[Value]) -> FilterResult {
    Ok(Value::Str(format!("{}{}", as_str("append", input)?, arg_str(args, 0))))
}

fn prepend(input: &Value, args: &[Value]) -> FilterResult {
    Ok(Value::Str(format!("{}{}", arg_str(args, 0), as_str("prepend", input)?)))
}

fn replace(input: &Value, args: &[Value]) -> FilterResult {
    let s = as_str("replace", input)?;
    Ok(Value::Str(s.replace(arg_str(args, 0), arg_str(args, 1))))
}

fn remove(input: &Value, args: &[Value]) -> FilterResult {
    let s = as_str("remove", input)?;
    Ok(Value::Str(s.replace(arg_str(args, 0), "")))
}

fn split(input: &Value, args: &[Value]) -> FilterResult {
    let s = as_str("split", input)?;
    let sep = arg_str(args, 0);
    let parts = if sep.is_empty() {
        s.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        s.split(sep).map(|p| Value::Str(p.to_string())).collect()
    };
    Ok(Value::Array(parts))
}

fn truncate(input: &Value, args: &[Value]) -> FilterResult {
    let s = as_str("truncate", input)?;
    let max = args.first().and_then(Value::as_index).unwrap_or(50).max(0) as usize;
    let ellipsis = args.get(1).and_then(Value::as_str).unwrap_or("...");
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max {
        return Ok(Value::Str(s.to_string()));
    }
    let keep = max.saturating_sub(ellipsis.chars().count());
    let mut truncated: String = chars[..keep.min(chars.len())].iter().collect();
    truncated.push_str(ellipsis);
    Ok(Value::Str(truncated))
}

fn truncatewords(input: &Value, args: &[Value]) -> FilterResult {
    let s = as_str("truncatewords", input)?;
    let max = args.first().and_then(Value::as_index).unwrap_or(15).max(0) as usize;
    let ellipsis = args.get(1).and_then(Value::as_str).unwrap_or("...");
    let words: Vec<&str> = s.split_whitespace().collect();
    if words.len() <= max {
        return Ok(Value::Str(s.to_string()));
    }
    let mut truncated = words[..max].join(" ");
    truncated.push_str(ellipsis);
    Ok(Value::Str(truncated))
}

fn escape(input: &Value, _args: &[Value]) -> FilterResult {
    let s = as_str("escape", input)?;
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    Ok(Value::Str(out))
}

fn newline_to_br(input: &Value, _args: &[Value]) -> FilterResult {
    Ok(Value::Str(as_str("newline_to_br", input)?.replace('\n', "<br />\n")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upcase_downcase_roundtrip() {
        assert_eq!(upcase(&Value::Str("abC".into()), &[]).unwrap(), Value::Str("ABC".into()));
        assert_eq!(downcase(&Value::Str("abC".into()), &[]).unwrap(), Value::Str("abc".into()));
    }

    #[test]
    fn capitalize_only_first_char() {
        assert_eq!(
            capitalize(&Value::Str("hello world".into()), &[]).unwrap(),
            Value::Str("Hello world".into())
        );
    }

    #[test]
    fn strip_variants() {
        let s = Value::Str("  hi  ".into());
        assert_eq!(strip(&s, &[]).unwrap(), Value::Str("hi".into()));
        assert_eq!(lstrip(&s, &[]).unwrap(), Value::Str("hi  ".into()));
        assert_eq!(rstrip(&s, &[]).unwrap(), Value::Str("  hi".into()));
    }

    #[test]
    fn replace_and_remove() {
        let s = Value::Str("a-b-c".into());
        assert_eq!(
            replace(&s, &[Value::Str("-".into()), Value::Str("_".into())]).unwrap(),
            Value::Str("a_b_c".into())
        );
        assert_eq!(remove(&s, &[Value::Str("-".into())]).unwrap(), Value::Str("abc".into()));
    }

    #[test]
    fn split_on_separator() {
        let result = split(&Value::Str("a,b,c".into()), &[Value::Str(",".into())]).unwrap();
        assert_eq!(
            result,
            Value::Array(vec![Value::Str("a".into()), Value::Str("b".into()), Value::Str("c".into())])
        );
    }

    #[test]
    fn truncate_adds_ellipsis_past_limit() {
        let result = truncate(&Value::Str("hello world".into()), &[Value::Integer(5)]).unwrap();
        assert_eq!(result, Value::Str("he...".into()));
    }

    #[test]
    fn escape_html_entities() {
        assert_eq!(
            escape(&Value::Str("<a href=\"x\">".into()), &[]).unwrap(),
            Value::Str("&lt;a href=&quot;x&quot;&gt;".into())
        );
    }
}
