use clap::Parser;

use crate::application::dto::OutputFormat;
use crate::config::ConfigFile;

/// Default certificate identity for `--verify`, matching the
/// chainguard-images release workflow.
pub const DEFAULT_CERTIFICATE_IDENTITY: &str =
    "https://github.com/chainguard-images/images/.github/workflows/release.yaml@refs/heads/main";

/// Default OIDC issuer for `--verify` (GitHub Actions).
pub const DEFAULT_CERTIFICATE_OIDC_ISSUER: &str = "https://token.actions.githubusercontent.com";

/// Build and assess the supply-chain attestation graph of a container image
#[derive(Parser, Debug)]
#[command(name = "attest-graph")]
#[command(version)]
#[command(
    about = "Build and assess the supply-chain attestation graph of a container image",
    long_about = None
)]
pub struct Args {
    /// Container image reference, e.g. cgr.dev/chainguard/nginx:latest
    pub image: String,

    /// Target platform (OS/arch pair, defaults to linux/amd64)
    #[arg(short, long)]
    pub platform: Option<String>,

    /// Output format: json or markdown
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Output file path (if not specified, outputs to stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Query the vulnerability database for the SBOM's packages
    #[arg(long = "check-cve")]
    pub check_cve: bool,

    /// Path to a config file (defaults to ./attest-graph.config.yml when present)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Timeout in seconds for each attestation tool invocation
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Name or path of the cosign binary
    #[arg(long)]
    pub cosign_path: Option<String>,

    /// Verify the SBOM attestation signature instead of building the graph
    #[arg(long)]
    pub verify: bool,

    /// Required certificate identity for --verify
    #[arg(long, default_value = DEFAULT_CERTIFICATE_IDENTITY)]
    pub certificate_identity: String,

    /// Required certificate OIDC issuer for --verify
    #[arg(long, default_value = DEFAULT_CERTIFICATE_OIDC_ISSUER)]
    pub certificate_oidc_issuer: String,
}

/// Effective options after merging CLI flags with the config file.
/// CLI flags always win; config fills the gaps; defaults close the rest.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub platform: String,
    pub format: OutputFormat,
    pub check_cve: bool,
    pub timeout_seconds: u64,
    pub cosign_path: String,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn resolve(&self, config: Option<&ConfigFile>) -> ResolvedOptions {
        let config_platform = config.and_then(|c| c.platform.clone());
        let config_format = config
            .and_then(|c| c.format.as_deref())
            .and_then(|format| format.parse().ok());
        let config_check_cve = config.and_then(|c| c.check_cve);
        let config_timeout = config.and_then(|c| c.timeout_seconds);
        let config_cosign = config.and_then(|c| c.cosign_path.clone());

        ResolvedOptions {
            platform: self
                .platform
                .clone()
                .or(config_platform)
                .unwrap_or_else(|| "linux/amd64".to_string()),
            format: self
                .format
                .or(config_format)
                .unwrap_or(OutputFormat::Json),
            check_cve: self.check_cve || config_check_cve.unwrap_or(false),
            timeout_seconds: self.timeout.or(config_timeout).unwrap_or(30),
            cosign_path: self
                .cosign_path
                .clone()
                .or(config_cosign)
                .unwrap_or_else(|| "cosign".to_string()),
        }
    }
}
