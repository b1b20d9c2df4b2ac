use std::io::{self, BufRead, Write};

use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": true,
                "message": message,
                "data": data.unwrap_or(Value::Null),
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// Output an error message in the appropriate format
pub fn output_error(output_format: &OutputFormat, message: &str) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let response = json!({
                "success": false,
                "message": message,
                "data": null,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!("Error: {}", message);
        }
    }
    Ok(())
}

/// Print raw response data as JSON, or via `text` in text mode
pub fn output_data(
    output_format: &OutputFormat,
    data: &Value,
    text: impl FnOnce(&Value),
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
        OutputFormat::Text => text(data),
    }
    Ok(())
}

fn field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

pub fn print_post(post: &Value) {
    println!("{}  {}", field(post, "id"), field(post, "title"));
    if let Some(author) = post.get("author") {
        println!("  by {} <{}>", field(author, "name"), field(author, "email"));
    }
    println!("  created {}  updated {}", field(post, "created_at"), field(post, "updated_at"));
    let image = field(post, "image");
    if !image.is_empty() {
        println!("  image {}", image);
    }
    println!();
    println!("{}", field(post, "content"));
}

pub fn print_post_list(data: &Value) {
    let posts = data.get("posts").and_then(Value::as_array);
    match posts {
        Some(posts) if !posts.is_empty() => {
            for post in posts {
                let author = post.get("author").map(|a| field(a, "name")).unwrap_or("");
                println!("{}  {:<40}  {}", field(post, "id"), field(post, "title"), author);
            }
        }
        _ => println!("No posts found"),
    }

    if let Some(pagination) = data.get("pagination") {
        println!(
            "\nPage {} of {} ({} posts)",
            pagination.get("page").and_then(Value::as_u64).unwrap_or(1),
            pagination.get("pages").and_then(Value::as_u64).unwrap_or(0),
            pagination.get("total").and_then(Value::as_u64).unwrap_or(0),
        );
    }
}

pub fn print_user(user: &Value) {
    println!("{} <{}>", field(user, "name"), field(user, "email"));
    println!("  id {}", field(user, "id"));
    let image = field(user, "image");
    if !image.is_empty() {
        println!("  image {}", image);
    }
}

/// Use `given` or read one line from stdin after printing `prompt` to stderr.
pub fn prompt_if_missing(given: Option<String>, prompt: &str) -> anyhow::Result<String> {
    if let Some(value) = given {
        return Ok(value);
    }

    eprint!("{}: ", prompt);
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let value = line.trim_end_matches(['\r', '\n']).to_string();
    if value.is_empty() {
        anyhow::bail!("{} is required", prompt);
    }
    Ok(value)
}
