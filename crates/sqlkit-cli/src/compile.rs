use crate::cli::CompileArgs;
use anyhow::Context as _;
use sqlkit::QuerySpec;
use std::io::Read as _;

pub fn run(args: CompileArgs) -> anyhow::Result<()> {
    if args.files.is_empty() {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        println!("{}", compile_one("<stdin>", &text, args.json)?);
        return Ok(());
    }

    for path in &args.files {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let label = path.display().to_string();
        println!("{}", compile_one(&label, &text, args.json)?);
    }
    Ok(())
}

fn compile_one(label: &str, text: &str, json: bool) -> anyhow::Result<String> {
    let query = QuerySpec::from_yaml(text)
        .and_then(QuerySpec::into_builder)
        .with_context(|| format!("{label}: invalid query"))?
        .build();
    tracing::debug!(target: "sqlkit.cli", file = label, params = query.args().len(), "compiled");

    if json {
        let value = serde_json::json!({
            "file": label,
            "sql": query.sql(),
            "args": query.args(),
        });
        return Ok(value.to_string());
    }

    let args = query
        .args()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("-- {label}\n{}\n-- args: [{args}]", query.sql()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: &str = r#"
select: [id, name]
from: users
where:
  - { field: status, op: "=", value: active }
  - { field: id, op: IN, value: [1, 2] }
limit: { limit: 10 }
"#;

    #[test]
    fn compile_plain_output() {
        let out = compile_one("users.yml", SPEC, false).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "-- users.yml");
        assert_eq!(
            lines[1],
            "SELECT id, name FROM users WHERE status = ? AND id IN(?,?) LIMIT 0,10"
        );
        assert!(lines[2].starts_with("-- args: ["));
    }

    #[test]
    fn compile_json_output() {
        let out = compile_one("users.yml", SPEC, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["file"], "users.yml");
        assert_eq!(value["args"], serde_json::json!(["active", 1, 2]));
    }

    #[test]
    fn compile_reports_bad_input() {
        let err = compile_one("bad.yml", "select: [id]\nbogus: 1\n", false).unwrap_err();
        assert!(format!("{err:#}").starts_with("bad.yml: invalid query"));
    }
}
