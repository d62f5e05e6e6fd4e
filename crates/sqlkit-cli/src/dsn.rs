use crate::cli::DsnArgs;
use anyhow::Context as _;
use sqlkit::{AppConfig, DatabaseConfig, Dsn};
use std::fmt::Write as _;

pub fn run(args: DsnArgs) -> anyhow::Result<()> {
    let config = match &args.config {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => {
            let cwd = std::env::current_dir().context("failed to read current directory")?;
            AppConfig::load_env(&cwd, &args.env)
                .with_context(|| format!("failed to load config for env {:?}", args.env))?
        }
    };

    print!("{}", render(&config.database, args.show_password));
    Ok(())
}

fn render(db: &DatabaseConfig, show_password: bool) -> String {
    let dsn = Dsn::from_config(db);
    let dsn_text = if show_password {
        dsn.to_string()
    } else {
        dsn.masked()
    };

    let mut out = String::new();
    let _ = writeln!(out, "driver:         {}", display_or_dash(&db.driver));
    let _ = writeln!(out, "dsn:            {dsn_text}");
    let _ = writeln!(out, "retries:        {}", db.retry_budget());
    let _ = writeln!(out, "max_open:       {}", limit(db.max_open_conns));
    let _ = writeln!(out, "max_idle:       {}", db.max_idle_conns);
    let _ = writeln!(
        out,
        "max_lifetime:   {}",
        db.conn_max_lifetime()
            .map(sqlkit::duration::format_duration)
            .unwrap_or_else(|| "unlimited".to_string())
    );
    out
}

fn display_or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn limit(n: usize) -> String {
    if n == 0 {
        "default".to_string()
    } else {
        n.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn db() -> DatabaseConfig {
        DatabaseConfig {
            driver: "mysql".into(),
            host: "db.internal:3306".into(),
            name: "api".into(),
            user: "svc".into(),
            password: "s3cret".into(),
            conn_max_lifetime_secs: 90,
            max_idle_conns: 2,
            ..Default::default()
        }
        .read_timeout(Duration::from_secs(5))
    }

    #[test]
    fn render_masks_password_by_default() {
        let out = render(&db(), false);
        assert!(out.contains(
            "dsn:            svc:****@tcp(db.internal:3306)/api?charset=utf8&parseTime=True&readTimeout=5s"
        ));
        assert!(!out.contains("s3cret"));
        assert!(out.contains("retries:        3"));
        assert!(out.contains("max_open:       default"));
        assert!(out.contains("max_lifetime:   1m30s"));
    }

    #[test]
    fn render_can_show_password() {
        let out = render(&db(), true);
        assert!(out.contains("svc:s3cret@tcp(db.internal:3306)/api"));
    }
}
