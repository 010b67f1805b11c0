use clap::Parser;
use predict_protocol::FieldName;
use std::path::PathBuf;

use crate::config::ClientConfig;

#[derive(Parser, Debug)]
#[command(
    name = "risk-console",
    version,
    about = "Terminal form for the diabetes risk prediction service"
)]
pub(crate) struct Args {
    #[arg(long, default_value = "config/risk-console.toml")]
    pub(crate) config: PathBuf,
    #[arg(long)]
    pub(crate) host: Option<String>,
    #[arg(long)]
    pub(crate) port: Option<u16>,
    #[arg(long, default_value = "logs")]
    pub(crate) log_dir: PathBuf,
    #[arg(long, default_value_t = false)]
    pub(crate) log_to_stderr: bool,
    /// Submit once without the TUI and print the result.
    #[arg(long, default_value_t = false)]
    pub(crate) headless: bool,
    /// Field assignment for headless mode, e.g. `--field Glucose=120`.
    #[arg(long = "field", value_name = "NAME=VALUE", value_parser = parse_field_assignment)]
    pub(crate) fields: Vec<(FieldName, String)>,
}

impl Args {
    pub(crate) fn apply_overrides(&self, config: &mut ClientConfig) {
        if let Some(host) = &self.host {
            config.endpoint.host = host.clone();
        }
        if let Some(port) = self.port {
            config.endpoint.port = port;
        }
    }
}

fn parse_field_assignment(raw: &str) -> Result<(FieldName, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got `{raw}`"))?;
    let name = FieldName::parse(name).map_err(|err| err.to_string())?;
    Ok((name, value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_assignments() {
        let args = Args::try_parse_from([
            "risk-console",
            "--headless",
            "--field",
            "Glucose=120",
            "--field",
            "bmi= 30.1",
        ])
        .expect("args");
        assert!(args.headless);
        assert_eq!(
            args.fields,
            vec![
                (FieldName::Glucose, "120".to_string()),
                (FieldName::Bmi, "30.1".to_string()),
            ]
        );
    }

    #[test]
    fn rejects_unknown_field() {
        assert!(Args::try_parse_from(["risk-console", "--field", "Weight=80"]).is_err());
        assert!(Args::try_parse_from(["risk-console", "--field", "Glucose"]).is_err());
    }

    #[test]
    fn overrides_endpoint() {
        let args =
            Args::try_parse_from(["risk-console", "--host", "10.1.1.1", "--port", "8080"])
                .expect("args");
        let mut config = ClientConfig::default();
        args.apply_overrides(&mut config);
        assert_eq!(config.endpoint.url().unwrap(), "http://10.1.1.1:8080/predict");
    }
}
