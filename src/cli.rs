//! Command-line interface definitions for Tech News Poster.
//!
//! Platform credentials can be passed as flags but are normally read from
//! the environment (or a `.env` file loaded at startup).

use clap::Parser;

/// Command-line arguments for the Tech News Poster application.
///
/// # Examples
///
/// ```sh
/// # Follow the weekly schedule, posting for real
/// tech_news_poster
///
/// # Build today's post once and only log what would be sent
/// tech_news_poster --once --dry-run
///
/// # Custom ranking/schedule and a JSON archive of every run
/// tech_news_poster -c ./config.yaml -j ./archive
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to config.yaml file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Run the pipeline once and exit instead of following the schedule
    #[arg(long)]
    pub once: bool,

    /// Log the post instead of sending it
    #[arg(long)]
    pub dry_run: bool,

    /// Output directory for a JSON archive of each run
    #[arg(short, long)]
    pub json_output_dir: Option<String>,

    /// Instagram Graph API access token
    #[arg(long, env = "INSTAGRAM_ACCESS_TOKEN", hide_env_values = true)]
    pub instagram_access_token: Option<String>,

    /// Instagram business account id
    #[arg(long, env = "INSTAGRAM_ACCOUNT_ID")]
    pub instagram_account_id: Option<String>,

    /// LinkedIn member access token
    #[arg(long, env = "LINKEDIN_ACCESS_TOKEN", hide_env_values = true)]
    pub linkedin_access_token: Option<String>,

    /// LinkedIn person id, used as the post author (`urn:li:person:<id>`)
    #[arg(long, env = "LINKEDIN_PERSON_ID")]
    pub linkedin_person_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["tech_news_poster"]);

        assert!(!cli.once);
        assert!(!cli.dry_run);
        assert_eq!(cli.config, None);
        assert_eq!(cli.json_output_dir, None);
    }

    #[test]
    fn test_cli_flags() {
        let cli = Cli::parse_from([
            "tech_news_poster",
            "--once",
            "--dry-run",
            "-c",
            "./config.yaml",
            "-j",
            "/tmp/archive",
            "--linkedin-access-token",
            "token",
            "--linkedin-person-id",
            "abc123",
        ]);

        assert!(cli.once);
        assert!(cli.dry_run);
        assert_eq!(cli.config.as_deref(), Some("./config.yaml"));
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/archive"));
        assert_eq!(cli.linkedin_access_token.as_deref(), Some("token"));
        assert_eq!(cli.linkedin_person_id.as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["tech_news_poster", "--nope"]).is_err());
    }
}
